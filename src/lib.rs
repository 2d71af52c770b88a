//! Pentomino Solver Library
//!
//! Solves pentomino exact-cover puzzles: tiling flat rectangles and masked
//! boards by depth-first backtracking with a void pruning rule, and filling
//! rectangular boxes with dancing-links exact cover. Callers talk to one
//! session per puzzle instance, either directly or through the serializable
//! request/response protocol.

pub mod backtrack;
pub mod board;
pub mod cover;
pub mod dlx;
pub mod error;
pub mod persistence;
pub mod placement;
pub mod protocol;
pub mod session;
pub mod shapes;
pub mod symmetry;
pub mod trace;
pub mod triplication;

pub use backtrack::{Probe, SolutionCount, TracedSearch};
pub use board::Region;
pub use cover::{BoxPlacement, BoxRegion};
pub use error::Error;
pub use placement::Placement;
pub use session::{BoxSession, RectSession, TracedBoxSearch};
pub use shapes::{BoxCell, Cell, ShapeId};
