//! Triplication puzzles: tile a pentomino blown up to three times its side
//! length (45 cells) with nine of the twelve shapes.
//!
//! Mask construction and solving are deterministic; randomness lives only
//! in puzzle generation, which repeatedly proposes a target and shape
//! subset and probes solvability under a node cap.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::backtrack::Probe;
use crate::board::Region;
use crate::session::RectSession;
use crate::shapes::ShapeId;

/// Number of shapes a triplication puzzle selects.
pub const TRIPLICATION_SHAPES: usize = 9;

/// The target shape scaled by three: every base cell becomes a 3x3 block.
pub fn triplication_mask(target: ShapeId) -> Region {
    let base = target.base_cells();
    let rows = (base.iter().map(|&(r, _)| r).max().unwrap() + 1) * 3;
    let cols = (base.iter().map(|&(_, c)| c).max().unwrap() + 1) * 3;
    let cells = base.iter().flat_map(|&(r, c)| {
        (0..3).flat_map(move |dr| (0..3).map(move |dc| (r * 3 + dr, c * 3 + dc)))
    });
    Region::mask(rows, cols, cells)
}

/// A generated puzzle: the target shape, its mask, and the nine shapes the
/// player may use, in letter order.
#[derive(Clone, Debug)]
pub struct TriplicationPuzzle {
    pub target: ShapeId,
    pub region: Region,
    pub shapes: Vec<ShapeId>,
}

/// Generation policy knobs. The node cap bounds the latency of each
/// solvability probe; a capped-out probe is treated as inconclusive and
/// simply consumes one attempt.
#[derive(Clone, Copy, Debug)]
pub struct GeneratorConfig {
    pub max_attempts: usize,
    pub max_nodes: u64,
}

impl Default for GeneratorConfig {
    fn default() -> GeneratorConfig {
        GeneratorConfig {
            max_attempts: 40,
            max_nodes: 200_000,
        }
    }
}

/// Proposes random target/shape combinations until one probes solvable, or
/// the attempt cap runs out.
pub fn generate<R: Rng>(rng: &mut R, config: &GeneratorConfig) -> Option<TriplicationPuzzle> {
    for attempt in 0..config.max_attempts {
        let target = *ShapeId::ALL
            .choose(rng)
            .expect("the catalogue is never empty");
        let mut shapes: Vec<ShapeId> = ShapeId::ALL
            .choose_multiple(rng, TRIPLICATION_SHAPES)
            .copied()
            .collect();
        shapes.sort_unstable();

        let region = triplication_mask(target);
        let session = RectSession::with_shapes(region, shapes);
        match session.probe(&[], config.max_nodes) {
            Probe::Solved(_) => {
                debug!(shape = ?target, attempt, "generated a solvable triplication");
                return Some(TriplicationPuzzle {
                    target,
                    region: session.region().clone(),
                    shapes: session.shapes().to_vec(),
                });
            }
            // Unsolvable and capped-out probes both move on to the next
            // candidate; only the probe result distinguishes them.
            Probe::Exhausted | Probe::CappedOut => continue,
        }
    }
    None
}
