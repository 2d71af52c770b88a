//! Concrete shape placements and the placement enumerator.
//!
//! A placement binds a shape to an in-region cell set: one of the shape's
//! orientations translated by an anchor offset. The enumerator slides every
//! orientation's bounding box across the region extent; pruning is the
//! solvers' job, not done here.

use serde::{Deserialize, Serialize};

use crate::board::Region;
use crate::shapes::{Cell, ShapeId, CELLS_PER_SHAPE, SHAPE_COUNT};
use crate::symmetry::normalize;

/// A shape bound to a concrete cell set inside a region.
///
/// Cells are absolute board coordinates, kept sorted so equal placements
/// compare equal regardless of construction order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    pub shape: ShapeId,
    pub cells: [Cell; CELLS_PER_SHAPE],
}

impl Placement {
    pub fn new(shape: ShapeId, mut cells: [Cell; CELLS_PER_SHAPE]) -> Placement {
        cells.sort_unstable();
        Placement { shape, cells }
    }

    /// An orientation translated so that its `index`-th cell lands on `target`.
    pub fn anchored(
        shape: ShapeId,
        orientation: &[Cell; CELLS_PER_SHAPE],
        index: usize,
        target: Cell,
    ) -> Placement {
        let (dr, dc) = (target.0 - orientation[index].0, target.1 - orientation[index].1);
        Placement::new(shape, std::array::from_fn(|i| (orientation[i].0 + dr, orientation[i].1 + dc)))
    }

    /// Whether two placements share a cell.
    pub fn overlaps(&self, other: &Placement) -> bool {
        self.cells.iter().any(|cell| other.cells.contains(cell))
    }

    /// Whether the cell set really is an orientation of the claimed shape.
    /// Guards placements supplied by callers across the protocol boundary.
    pub fn matches_shape(&self) -> bool {
        self.shape.orientations().contains(&normalize(self.cells))
    }

    /// Whether every cell lies inside the region.
    pub fn fits(&self, region: &Region) -> bool {
        self.cells.iter().all(|&cell| region.contains(cell))
    }
}

/// Every legal placement of one shape inside the region, in orientation
/// order then anchor order.
pub fn enumerate_placements(region: &Region, shape: ShapeId) -> Vec<Placement> {
    let mut placements = Vec::new();
    for orientation in shape.orientations() {
        let height = orientation.iter().map(|&(r, _)| r).max().unwrap() + 1;
        let width = orientation.iter().map(|&(_, c)| c).max().unwrap() + 1;
        for dr in 0..=(region.rows() - height) {
            for dc in 0..=(region.cols() - width) {
                let candidate = Placement::new(
                    shape,
                    std::array::from_fn(|i| (orientation[i].0 + dr, orientation[i].1 + dc)),
                );
                if candidate.fits(region) {
                    placements.push(candidate);
                }
            }
        }
    }
    placements
}

/// Total legal placements across a shape list. Reported at session startup.
pub fn count_placements(region: &Region, shapes: &[ShapeId]) -> usize {
    shapes
        .iter()
        .map(|&shape| enumerate_placements(region, shape).len())
        .sum()
}

/// Placements of each shape covering each region cell, indexed by shape
/// index and flat cell index. Built once per solve call and consulted at
/// every search node.
pub struct PlacementTable {
    by_shape: [Vec<Vec<Placement>>; SHAPE_COUNT],
}

impl PlacementTable {
    pub fn build(region: &Region, shapes: &[ShapeId]) -> PlacementTable {
        let extent = (region.rows() * region.cols()) as usize;
        let mut by_shape: [Vec<Vec<Placement>>; SHAPE_COUNT] =
            std::array::from_fn(|_| Vec::new());

        for &shape in shapes {
            let mut per_cell: Vec<Vec<Placement>> = vec![Vec::new(); extent];
            for &target in region.cells() {
                let slot = &mut per_cell[region.index(target)];
                for orientation in shape.orientations() {
                    for index in 0..CELLS_PER_SHAPE {
                        let candidate = Placement::anchored(shape, orientation, index, target);
                        if candidate.fits(region) {
                            slot.push(candidate);
                        }
                    }
                }
            }
            by_shape[shape.index()] = per_cell;
        }
        PlacementTable { by_shape }
    }

    /// Candidate placements of `shape` covering `cell`.
    pub fn covering(&self, region: &Region, shape: ShapeId, cell: Cell) -> &[Placement] {
        &self.by_shape[shape.index()][region.index(cell)]
    }
}
