//! Search traces: the ordered log of place/remove steps a solver takes,
//! consumed by animation playback outside the solver.

use serde::{Deserialize, Serialize};

use crate::cover::BoxPlacement;
use crate::placement::Placement;

/// What a search step did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceKind {
    Place,
    Remove,
}

/// One step of a flat-board search.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEvent {
    pub kind: TraceKind,
    pub placement: Placement,
}

/// One step of a box search.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxTraceEvent {
    pub kind: TraceKind,
    pub placement: BoxPlacement,
}

/// An event buffer with a hard cap. Once the cap is exceeded the log stops
/// accepting events and reports overflow; the owning solve call is expected
/// to abort, keeping worst-case memory and playback length bounded.
pub struct TraceLog<E> {
    events: Vec<E>,
    limit: usize,
    overflowed: bool,
}

impl<E> TraceLog<E> {
    pub fn new(limit: usize) -> TraceLog<E> {
        TraceLog {
            events: Vec::new(),
            limit,
            overflowed: false,
        }
    }

    /// Appends an event. Returns false once the cap is exceeded.
    pub fn record(&mut self, event: E) -> bool {
        if self.events.len() >= self.limit {
            self.overflowed = true;
            return false;
        }
        self.events.push(event);
        true
    }

    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn into_events(self) -> Vec<E> {
        self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_stops_at_the_cap() {
        let mut log: TraceLog<u32> = TraceLog::new(2);
        assert!(log.record(1));
        assert!(log.record(2));
        assert!(!log.overflowed());
        assert!(!log.record(3));
        assert!(log.overflowed());
        assert_eq!(log.into_events(), vec![1, 2]);
    }

    #[test]
    fn zero_cap_overflows_immediately() {
        let mut log: TraceLog<u32> = TraceLog::new(0);
        assert!(!log.record(1));
        assert!(log.overflowed());
    }
}
