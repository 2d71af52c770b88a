//! Crate error taxonomy.
//!
//! Puzzle-shaped failures (an unsolvable region, a conflicting prefix, a
//! hit cap) are typed results, never errors; see the solver modules. The
//! variants here cover programming and protocol failures only, which must
//! not be folded into "no solution".

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A caller referenced a placement id outside the session's table.
    #[error("placement id {0} is not known to this session")]
    UnknownPlacement(usize),

    /// The cover/uncover bookkeeping produced an impossible state. This is
    /// a logic defect, not a puzzle property.
    #[error("internal solver invariant violated: {0}")]
    Internal(&'static str),
}
