//! Solve facades: one session per puzzle instance.
//!
//! A session fixes the region and shape catalogue at construction and then
//! answers solve/trace/hint requests statelessly — every call receives its
//! own prefix and owns its own scratch state, so independent sessions can
//! run on separate workers with nothing shared.

use tracing::debug;

use crate::backtrack::{
    collect_solutions_from_placements, count_solutions_from_placements, solve_bounded_from_placements,
    solve_from_placements, solve_with_trace_from_placements, Probe, SolutionCount, TracedSearch,
};
use crate::board::Region;
use crate::cover::{BoxPlacement, BoxRegion, CoverModel};
use crate::dlx::{Matrix, TracedCover};
use crate::error::Error;
use crate::placement::{count_placements, Placement};
use crate::shapes::{ShapeId, SHAPE_COUNT};
use crate::trace::BoxTraceEvent;

/// Facade over the flat backtracking solver for one region.
pub struct RectSession {
    region: Region,
    shapes: Vec<ShapeId>,
    placement_count: usize,
}

impl RectSession {
    /// A session over the full twelve-shape catalogue.
    pub fn new(region: Region) -> RectSession {
        RectSession::with_shapes(region, ShapeId::ALL.to_vec())
    }

    /// A session over a restricted catalogue, e.g. the nine shapes of a
    /// triplication puzzle.
    pub fn with_shapes(region: Region, shapes: Vec<ShapeId>) -> RectSession {
        let placement_count = count_placements(&region, &shapes);
        debug!(
            rows = region.rows(),
            cols = region.cols(),
            cells = region.len(),
            shapes = shapes.len(),
            placements = placement_count,
            "flat session ready"
        );
        RectSession {
            region,
            shapes,
            placement_count,
        }
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn shapes(&self) -> &[ShapeId] {
        &self.shapes
    }

    /// Number of legal placements across the catalogue.
    pub fn placement_count(&self) -> usize {
        self.placement_count
    }

    /// Up to `max_solutions` completions of the prefix, each the prefix
    /// placements followed by the search's own.
    pub fn solve(&self, prefix: &[Placement], max_solutions: usize) -> Vec<Vec<Placement>> {
        collect_solutions_from_placements(&self.region, &self.shapes, prefix, max_solutions)
    }

    pub fn solve_with_trace(
        &self,
        prefix: &[Placement],
        max_solutions: usize,
        max_events: usize,
    ) -> TracedSearch {
        solve_with_trace_from_placements(&self.region, &self.shapes, prefix, max_solutions, max_events)
    }

    /// The first not-yet-placed placement from the first completion, or
    /// `None` when the prefix cannot be completed or already is complete.
    pub fn hint(&self, prefix: &[Placement]) -> Option<Placement> {
        solve_from_placements(&self.region, &self.shapes, prefix)
            .and_then(|solution| solution.get(prefix.len()).copied())
    }

    pub fn count_solutions(&self, prefix: &[Placement], max_count: usize) -> SolutionCount {
        count_solutions_from_placements(&self.region, &self.shapes, prefix, max_count)
    }

    /// Node-capped solvability probe, used by puzzle generation.
    pub fn probe(&self, prefix: &[Placement], max_nodes: u64) -> Probe {
        solve_bounded_from_placements(&self.region, &self.shapes, prefix, max_nodes)
    }
}

/// A traced box search. Overflow aborts the call, like the flat solver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TracedBoxSearch {
    Done {
        solutions: Vec<Vec<usize>>,
        trace: Vec<BoxTraceEvent>,
    },
    Overflow,
}

/// Facade over the dancing-links solver for one box region. Holds the
/// immutable exact-cover model; every solve builds its own matrix.
pub struct BoxSession {
    model: CoverModel,
}

impl BoxSession {
    pub fn new(region: BoxRegion) -> BoxSession {
        BoxSession {
            model: CoverModel::new(region),
        }
    }

    pub fn model(&self) -> &CoverModel {
        &self.model
    }

    /// Number of legal placements, also the number of valid placement ids.
    pub fn placement_count(&self) -> usize {
        self.model.row_count()
    }

    /// Resolves placement ids to placements.
    pub fn resolve(&self, ids: &[usize]) -> Result<Vec<BoxPlacement>, Error> {
        ids.iter()
            .map(|&id| {
                self.model
                    .placement(id)
                    .copied()
                    .ok_or(Error::UnknownPlacement(id))
            })
            .collect()
    }

    /// Up to `max_solutions` exact covers consistent with the prefix, as
    /// placement-id lists. A conflicting prefix yields no solutions; an
    /// out-of-range id is a caller error.
    pub fn solve(&self, prefix: &[usize], max_solutions: usize) -> Result<Vec<Vec<usize>>, Error> {
        self.resolve(prefix)?;
        let Some(kept) = self.model.filter_rows(prefix) else {
            return Ok(Vec::new());
        };
        let mut matrix = self.restricted_matrix(&kept);
        let solutions = matrix.solve(max_solutions);
        self.check_solutions(&solutions)?;
        Ok(solutions)
    }

    pub fn solve_with_trace(
        &self,
        prefix: &[usize],
        max_solutions: usize,
        max_events: usize,
    ) -> Result<TracedBoxSearch, Error> {
        self.resolve(prefix)?;
        let Some(kept) = self.model.filter_rows(prefix) else {
            return Ok(TracedBoxSearch::Done {
                solutions: Vec::new(),
                trace: Vec::new(),
            });
        };
        let mut matrix = self.restricted_matrix(&kept);
        match matrix.solve_traced(max_solutions, max_events) {
            TracedCover::Overflow => Ok(TracedBoxSearch::Overflow),
            TracedCover::Done { solutions, events } => {
                self.check_solutions(&solutions)?;
                let trace = events
                    .into_iter()
                    .map(|(kind, row)| {
                        self.model
                            .placement(row)
                            .copied()
                            .map(|placement| BoxTraceEvent { kind, placement })
                            .ok_or(Error::Internal("trace references an unknown row"))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(TracedBoxSearch::Done { solutions, trace })
            }
        }
    }

    /// The first placement of the first found cover that is not already in
    /// the prefix.
    pub fn hint(&self, prefix: &[usize]) -> Result<Option<BoxPlacement>, Error> {
        let solutions = self.solve(prefix, 1)?;
        let Some(solution) = solutions.into_iter().next() else {
            return Ok(None);
        };
        match solution.into_iter().find(|id| !prefix.contains(id)) {
            Some(id) => Ok(Some(
                self.model
                    .placement(id)
                    .copied()
                    .ok_or(Error::Internal("cover solution references an unknown row"))?,
            )),
            None => Ok(None),
        }
    }

    fn restricted_matrix(&self, kept: &[usize]) -> Matrix {
        let rows: Vec<(usize, &[usize])> = kept
            .iter()
            .map(|&id| (id, self.model.row_columns(id)))
            .collect();
        Matrix::new(self.model.columns(), &rows)
    }

    /// A full cover uses each shape-usage column exactly once, so every
    /// solution must hold one row per shape. Anything else means the link
    /// bookkeeping is corrupt.
    fn check_solutions(&self, solutions: &[Vec<usize>]) -> Result<(), Error> {
        for solution in solutions {
            if solution.len() != SHAPE_COUNT {
                return Err(Error::Internal("cover solution must use every shape once"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn rect_session_solves_and_hints() {
        let session = RectSession::new(Region::rectangle(6, 10));
        assert!(session.placement_count() > 0);

        let solutions = session.solve(&[], 2);
        assert_eq!(solutions.len(), 2);
        assert_ne!(solutions[0], solutions[1]);

        let hint = session.hint(&[]).expect("empty board has a hint");
        assert_eq!(hint, solutions[0][0]);

        // Hinting from a complete board yields nothing further.
        assert_eq!(session.hint(&solutions[0]), None);
    }

    #[test]
    fn rect_session_counts_on_a_shaped_mask() {
        let session = RectSession::new(Region::mask(3, 3, *ShapeId::X.base_cells()));
        let counted = session.count_solutions(&[], 10);
        assert_eq!(counted.count, 1);
        assert!(counted.complete);
    }

    #[test]
    fn box_session_solves_the_standard_box() {
        let session = BoxSession::new(BoxRegion::new(3, 4, 5));
        let solutions = session.solve(&[], 1).unwrap();
        assert_eq!(solutions.len(), 1);

        let placements = session.resolve(&solutions[0]).unwrap();
        assert_eq!(placements.len(), 12);
        let shapes: FxHashSet<ShapeId> = placements.iter().map(|p| p.shape).collect();
        assert_eq!(shapes.len(), 12);
        let mut voxels = FxHashSet::default();
        for placement in &placements {
            for &cell in &placement.cells {
                assert!(voxels.insert(cell), "voxel covered twice");
            }
        }
        assert_eq!(voxels.len(), 60);
    }

    #[test]
    fn box_solving_is_deterministic() {
        let session = BoxSession::new(BoxRegion::new(3, 4, 5));
        assert_eq!(session.solve(&[], 1).unwrap(), session.solve(&[], 1).unwrap());
    }

    #[test]
    fn box_prefix_rows_survive_into_solutions() {
        let session = BoxSession::new(BoxRegion::new(3, 4, 5));
        let full = session.solve(&[], 1).unwrap().remove(0);
        let prefix = &full[..3];
        let solutions = session.solve(prefix, 1).unwrap();
        assert_eq!(solutions.len(), 1);
        for id in prefix {
            assert!(solutions[0].contains(id));
        }
    }

    #[test]
    fn box_hint_extends_the_prefix() {
        let session = BoxSession::new(BoxRegion::new(3, 4, 5));
        let full = session.solve(&[], 1).unwrap().remove(0);
        let hint = session.hint(&full[..2]).unwrap().expect("hint exists");
        let prefix_placements = session.resolve(&full[..2]).unwrap();
        assert!(!prefix_placements.contains(&hint));
    }

    #[test]
    fn unknown_placement_id_is_a_caller_error() {
        let session = BoxSession::new(BoxRegion::new(3, 4, 5));
        let bogus = session.placement_count() + 17;
        assert_eq!(session.solve(&[bogus], 1), Err(Error::UnknownPlacement(bogus)));
        assert_eq!(session.hint(&[bogus]), Err(Error::UnknownPlacement(bogus)));
    }

    #[test]
    fn conflicting_box_prefix_yields_no_solutions() {
        let session = BoxSession::new(BoxRegion::new(3, 4, 5));
        let a = 0usize;
        let b = (1..session.placement_count())
            .find(|&id| {
                session.model().placement(id).unwrap().shape
                    == session.model().placement(a).unwrap().shape
            })
            .unwrap();
        assert_eq!(session.solve(&[a, b], 1), Ok(Vec::new()));
    }

    #[test]
    fn traced_box_search_ends_on_a_place() {
        let session = BoxSession::new(BoxRegion::new(3, 4, 5));
        let outcome = session.solve_with_trace(&[], 1, 10_000_000).unwrap();
        let TracedBoxSearch::Done { solutions, trace } = outcome else {
            panic!("generous cap should not overflow");
        };
        assert_eq!(solutions.len(), 1);
        assert!(!trace.is_empty());
        assert_eq!(trace.last().unwrap().kind, crate::trace::TraceKind::Place);
    }

    #[test]
    fn traced_box_search_overflows_on_a_zero_cap() {
        let session = BoxSession::new(BoxRegion::new(3, 4, 5));
        assert_eq!(
            session.solve_with_trace(&[], 1, 0).unwrap(),
            TracedBoxSearch::Overflow
        );
    }
}
