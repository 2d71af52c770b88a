//! Depth-first backtracking search for flat regions.
//!
//! The search always targets the first unoccupied cell in the region's scan
//! order, tries every unused shape, orientation and anchor offset that would
//! cover it, and applies the void pruning rule after every tentative
//! placement. Four operation modes layer over the same recursion: collecting
//! solutions, bounded counting, traced search, and a node-capped probe used
//! by puzzle generation.

use serde::{Deserialize, Serialize};

use crate::board::{Board, Region};
use crate::placement::{Placement, PlacementTable};
use crate::shapes::{ShapeId, SHAPE_COUNT};
use crate::trace::{TraceEvent, TraceKind, TraceLog};

/// Result of a bounded counting search.
///
/// `complete` is false when the counter hit the cap; the true count may be
/// higher. The reported count never exceeds the cap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionCount {
    pub count: usize,
    pub complete: bool,
}

/// Result of a traced search. An overflowing trace aborts the whole call:
/// callers are expected to retry in a cheaper untraced mode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TracedSearch {
    Done {
        solutions: Vec<Vec<Placement>>,
        trace: Vec<TraceEvent>,
    },
    Overflow,
}

/// Result of a node-capped solvability probe. Capping out is inconclusive,
/// deliberately distinct from an exhausted search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Probe {
    Solved(Vec<Placement>),
    Exhausted,
    CappedOut,
}

/// Returns the first completion of the prefix, or `None` when the prefix is
/// invalid or cannot be completed. The result contains the prefix placements
/// followed by the search's own.
pub fn solve_from_placements(
    region: &Region,
    shapes: &[ShapeId],
    prefix: &[Placement],
) -> Option<Vec<Placement>> {
    collect_solutions_from_placements(region, shapes, prefix, 1)
        .into_iter()
        .next()
}

/// Collects up to `max_solutions` distinct completions of the prefix.
pub fn collect_solutions_from_placements(
    region: &Region,
    shapes: &[ShapeId],
    prefix: &[Placement],
    max_solutions: usize,
) -> Vec<Vec<Placement>> {
    if max_solutions == 0 {
        return Vec::new();
    }
    let Some(mut search) = Search::new(region, shapes, prefix, Mode::Collect { max: max_solutions })
    else {
        return Vec::new();
    };
    search.run();
    search.solutions
}

/// Counts completions of the prefix, aborting the instant the counter
/// reaches `max_count`.
pub fn count_solutions_from_placements(
    region: &Region,
    shapes: &[ShapeId],
    prefix: &[Placement],
    max_count: usize,
) -> SolutionCount {
    if max_count == 0 {
        return SolutionCount {
            count: 0,
            complete: false,
        };
    }
    let Some(mut search) = Search::new(region, shapes, prefix, Mode::Count { max: max_count }) else {
        // An invalid prefix has no completions; zero is the exact count.
        return SolutionCount {
            count: 0,
            complete: true,
        };
    };
    let ending = search.run();
    SolutionCount {
        count: search.count,
        complete: matches!(ending, Step::Backtrack),
    }
}

/// Like [`collect_solutions_from_placements`], additionally recording a
/// place/remove event for every accepted placement and its undo. Exceeding
/// `max_events` aborts the call.
pub fn solve_with_trace_from_placements(
    region: &Region,
    shapes: &[ShapeId],
    prefix: &[Placement],
    max_solutions: usize,
    max_events: usize,
) -> TracedSearch {
    let mode = Mode::Traced {
        max: max_solutions.max(1),
        log: TraceLog::new(max_events),
    };
    let Some(mut search) = Search::new(region, shapes, prefix, mode) else {
        return TracedSearch::Done {
            solutions: Vec::new(),
            trace: Vec::new(),
        };
    };
    search.run();
    match search.mode {
        Mode::Traced { log, .. } if log.overflowed() => TracedSearch::Overflow,
        Mode::Traced { log, .. } => TracedSearch::Done {
            solutions: search.solutions,
            trace: log.into_events(),
        },
        _ => unreachable!("traced search keeps its mode"),
    }
}

/// First-solution search with a hard cap on recursion nodes, bounding the
/// worst-case latency of a solvability probe.
pub fn solve_bounded_from_placements(
    region: &Region,
    shapes: &[ShapeId],
    prefix: &[Placement],
    max_nodes: u64,
) -> Probe {
    let mode = Mode::Bounded {
        max_nodes,
        nodes: 0,
        capped: false,
    };
    let Some(mut search) = Search::new(region, shapes, prefix, mode) else {
        return Probe::Exhausted;
    };
    search.run();
    if matches!(search.mode, Mode::Bounded { capped: true, .. }) {
        return Probe::CappedOut;
    }
    match search.solutions.into_iter().next() {
        Some(solution) => Probe::Solved(solution),
        None => Probe::Exhausted,
    }
}

enum Mode {
    Collect { max: usize },
    Count { max: usize },
    Traced { max: usize, log: TraceLog<TraceEvent> },
    Bounded { max_nodes: u64, nodes: u64, capped: bool },
}

/// Whether to unwind the whole search or keep exploring siblings.
enum Step {
    Stop,
    Backtrack,
}

struct Search<'a> {
    region: &'a Region,
    table: PlacementTable,
    board: Board<'a>,
    shapes: &'a [ShapeId],
    used: [bool; SHAPE_COUNT],
    placed: Vec<Placement>,
    solutions: Vec<Vec<Placement>>,
    count: usize,
    mode: Mode,
}

impl<'a> Search<'a> {
    /// Applies the prefix to a fresh board. Returns `None` when the prefix
    /// conflicts with itself, leaves the region, reuses a shape, mislabels
    /// its cells, or already violates the pruning rule.
    fn new(
        region: &'a Region,
        shapes: &'a [ShapeId],
        prefix: &[Placement],
        mode: Mode,
    ) -> Option<Search<'a>> {
        let mut search = Search {
            region,
            table: PlacementTable::build(region, shapes),
            board: Board::new(region),
            shapes,
            used: [false; SHAPE_COUNT],
            placed: Vec::with_capacity(prefix.len() + shapes.len()),
            solutions: Vec::new(),
            count: 0,
            mode,
        };
        for supplied in prefix {
            // Re-sort the cells: placements that crossed the protocol
            // boundary may not be in canonical order.
            let placement = Placement::new(supplied.shape, supplied.cells);
            if !search.shapes.contains(&placement.shape)
                || search.used[placement.shape.index()]
                || !placement.matches_shape()
                || !placement.cells.iter().all(|&cell| search.board.is_free(cell))
            {
                return None;
            }
            search.board.occupy(&placement);
            search.used[placement.shape.index()] = true;
            search.placed.push(placement);
        }
        if !search.board.voids_are_fillable() {
            return None;
        }
        Some(search)
    }

    fn run(&mut self) -> Step {
        if let Mode::Bounded {
            max_nodes,
            nodes,
            capped,
        } = &mut self.mode
        {
            *nodes += 1;
            if *nodes > *max_nodes {
                *capped = true;
                return Step::Stop;
            }
        }

        let Some(anchor) = self.board.first_empty() else {
            return self.on_solution();
        };

        for i in 0..self.shapes.len() {
            let shape = self.shapes[i];
            if self.used[shape.index()] {
                continue;
            }
            let candidate_count = self.table.covering(self.region, shape, anchor).len();
            for k in 0..candidate_count {
                let candidate = self.table.covering(self.region, shape, anchor)[k];
                if !candidate.cells.iter().all(|&cell| self.board.is_free(cell)) {
                    continue;
                }

                // Tentative occupancy, immediately probed by the pruning rule.
                self.board.occupy(&candidate);
                if !self.board.voids_are_fillable() {
                    self.board.clear(&candidate);
                    continue;
                }

                self.used[shape.index()] = true;
                self.placed.push(candidate);
                if !self.record(TraceKind::Place, candidate) {
                    return Step::Stop;
                }

                if let Step::Stop = self.run() {
                    return Step::Stop;
                }

                self.placed.pop();
                self.used[shape.index()] = false;
                self.board.clear(&candidate);
                if !self.record(TraceKind::Remove, candidate) {
                    return Step::Stop;
                }
            }
        }
        Step::Backtrack
    }

    fn on_solution(&mut self) -> Step {
        match &mut self.mode {
            Mode::Collect { max } | Mode::Traced { max, .. } => {
                self.solutions.push(self.placed.clone());
                if self.solutions.len() >= *max {
                    Step::Stop
                } else {
                    Step::Backtrack
                }
            }
            Mode::Count { max } => {
                self.count += 1;
                if self.count >= *max {
                    Step::Stop
                } else {
                    Step::Backtrack
                }
            }
            Mode::Bounded { .. } => {
                self.solutions.push(self.placed.clone());
                Step::Stop
            }
        }
    }

    fn record(&mut self, kind: TraceKind, placement: Placement) -> bool {
        match &mut self.mode {
            Mode::Traced { log, .. } => log.record(TraceEvent { kind, placement }),
            _ => true,
        }
    }
}
