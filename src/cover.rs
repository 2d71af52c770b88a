//! Exact-cover model for box-packing puzzles.
//!
//! Every legal placement of every shape inside the box becomes one
//! exact-cover row: one column per voxel it occupies plus one column for
//! the shape's usage slot. The row set is built once per region and stays
//! immutable; each solve builds its own dancing-links matrix from it.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::shapes::{BoxCell, ShapeId, CELLS_PER_SHAPE, SHAPE_COUNT};

/// A rectangular box to be filled completely, e.g. 3x4x5.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxRegion {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BoxRegion {
    pub fn new(x: i32, y: i32, z: i32) -> BoxRegion {
        assert!(x > 0 && y > 0 && z > 0, "box must be non-empty");
        BoxRegion { x, y, z }
    }

    pub fn volume(&self) -> usize {
        (self.x * self.y * self.z) as usize
    }

    #[inline]
    pub fn contains(&self, (cx, cy, cz): BoxCell) -> bool {
        cx >= 0 && cx < self.x && cy >= 0 && cy < self.y && cz >= 0 && cz < self.z
    }

    /// Flat x-major voxel index.
    #[inline]
    pub(crate) fn index(&self, (cx, cy, cz): BoxCell) -> usize {
        (cx * self.y * self.z + cy * self.z + cz) as usize
    }
}

/// A shape bound to a concrete voxel set inside a box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoxPlacement {
    pub shape: ShapeId,
    pub cells: [BoxCell; CELLS_PER_SHAPE],
}

impl BoxPlacement {
    pub fn new(shape: ShapeId, mut cells: [BoxCell; CELLS_PER_SHAPE]) -> BoxPlacement {
        cells.sort_unstable();
        BoxPlacement { shape, cells }
    }

    pub fn fits(&self, region: &BoxRegion) -> bool {
        self.cells.iter().all(|&cell| region.contains(cell))
    }
}

/// The immutable exact-cover rows for one box and the full shape catalogue.
/// Placement ids are row indices, stable for the model's lifetime.
pub struct CoverModel {
    region: BoxRegion,
    placements: Vec<BoxPlacement>,
    rows: Vec<Vec<usize>>,
    columns: usize,
}

impl CoverModel {
    pub fn new(region: BoxRegion) -> CoverModel {
        let volume = region.volume();
        let columns = volume + SHAPE_COUNT;
        let mut placements = Vec::new();
        let mut rows = Vec::new();

        for shape in ShapeId::ALL {
            for orientation in shape.box_orientations() {
                let extent_x = orientation.iter().map(|&(x, _, _)| x).max().unwrap() + 1;
                let extent_y = orientation.iter().map(|&(_, y, _)| y).max().unwrap() + 1;
                let extent_z = orientation.iter().map(|&(_, _, z)| z).max().unwrap() + 1;
                for dx in 0..=(region.x - extent_x) {
                    for dy in 0..=(region.y - extent_y) {
                        for dz in 0..=(region.z - extent_z) {
                            let placement = BoxPlacement::new(
                                shape,
                                std::array::from_fn(|i| {
                                    let (x, y, z) = orientation[i];
                                    (x + dx, y + dy, z + dz)
                                }),
                            );
                            // Sorted cells give sorted voxel columns; the
                            // shape slot lands past every voxel column.
                            let mut row: Vec<usize> = placement
                                .cells
                                .iter()
                                .map(|&cell| region.index(cell))
                                .collect();
                            row.push(volume + shape.index());
                            placements.push(placement);
                            rows.push(row);
                        }
                    }
                }
            }
        }

        debug!(
            rows = rows.len(),
            columns,
            volume,
            "built exact-cover model"
        );
        CoverModel {
            region,
            placements,
            rows,
            columns,
        }
    }

    pub fn region(&self) -> &BoxRegion {
        &self.region
    }

    /// Voxel columns plus shape-usage columns.
    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn placement(&self, id: usize) -> Option<&BoxPlacement> {
        self.placements.get(id)
    }

    pub fn row_columns(&self, id: usize) -> &[usize] {
        &self.rows[id]
    }

    /// Restricts the row set to an already-chosen prefix: the chosen rows
    /// themselves plus every row sharing no column with them. Since only a
    /// chosen row can cover its own columns in the restricted set, every
    /// full cover found there necessarily includes the whole prefix.
    ///
    /// Returns `None` when the chosen rows collide on a column, which means
    /// no solution is reachable from this prefix.
    pub fn filter_rows(&self, chosen: &[usize]) -> Option<Vec<usize>> {
        let mut used_cols = vec![false; self.columns];
        for &id in chosen {
            for &col in &self.rows[id] {
                if used_cols[col] {
                    return None;
                }
                used_cols[col] = true;
            }
        }

        let chosen_set: FxHashSet<usize> = chosen.iter().copied().collect();
        let mut keep = Vec::with_capacity(self.rows.len());
        for id in 0..self.rows.len() {
            if chosen_set.contains(&id) || self.rows[id].iter().all(|&col| !used_cols[col]) {
                keep.push(id);
            }
        }
        Some(keep)
    }
}

/// Renders box placements as letter grids, one x/y slice per z layer,
/// slices side by side.
pub fn format_box_placements(region: &BoxRegion, placements: &[BoxPlacement]) -> String {
    let mut grid: Vec<Option<ShapeId>> = vec![None; region.volume()];
    for placement in placements {
        for &cell in &placement.cells {
            if region.contains(cell) {
                grid[region.index(cell)] = Some(placement.shape);
            }
        }
    }

    let mut lines = Vec::new();
    let mut header = String::new();
    for z in 0..region.z {
        if z > 0 {
            header.push_str("  ");
        }
        header.push_str(&format!("z={:<width$}", z, width = region.x as usize));
    }
    lines.push(header.trim_end().to_string());

    for y in (0..region.y).rev() {
        let mut line = String::new();
        for z in 0..region.z {
            if z > 0 {
                line.push_str("  ");
            }
            for x in 0..region.x {
                match grid[region.index((x, y, z))] {
                    Some(shape) => line.push(shape.letter()),
                    None => line.push('.'),
                }
            }
        }
        lines.push(line);
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_box_has_sixty_plus_twelve_columns() {
        let model = CoverModel::new(BoxRegion::new(3, 4, 5));
        assert_eq!(model.columns(), 72);
    }

    #[test]
    fn rows_pair_five_voxels_with_one_shape_slot() {
        let region = BoxRegion::new(3, 4, 5);
        let volume = region.volume();
        let model = CoverModel::new(region);
        assert!(model.row_count() > 0);
        for id in 0..model.row_count() {
            let row = model.row_columns(id);
            assert_eq!(row.len(), CELLS_PER_SHAPE + 1);
            assert!(row[..CELLS_PER_SHAPE].iter().all(|&col| col < volume));
            let slot = row[CELLS_PER_SHAPE];
            assert_eq!(slot, volume + model.placement(id).unwrap().shape.index());
            assert!(row.windows(2).all(|w| w[0] < w[1]), "row not sorted");
        }
    }

    #[test]
    fn placements_lie_inside_the_box() {
        let region = BoxRegion::new(3, 4, 5);
        let model = CoverModel::new(region);
        for id in 0..model.row_count() {
            assert!(model.placement(id).unwrap().fits(&region));
        }
    }

    #[test]
    fn flat_box_placements_match_planar_enumeration() {
        // In a 1-voxel-thick box every shape lies flat, so the row count per
        // shape equals its planar placement count on the matching rectangle.
        let region = BoxRegion::new(6, 10, 1);
        let model = CoverModel::new(region);
        let rect = crate::board::Region::rectangle(6, 10);
        let planar: usize = crate::placement::count_placements(&rect, &ShapeId::ALL);
        assert_eq!(model.row_count(), planar);
    }

    #[test]
    fn conflicting_prefix_rows_filter_to_nothing() {
        let model = CoverModel::new(BoxRegion::new(3, 4, 5));
        // Two placements of the same shape always share its usage column.
        let a = 0;
        let b = (1..model.row_count())
            .find(|&id| model.placement(id).unwrap().shape == model.placement(a).unwrap().shape)
            .unwrap();
        assert_eq!(model.filter_rows(&[a, b]), None);
    }

    #[test]
    fn filtered_rows_are_column_disjoint_from_the_prefix() {
        let model = CoverModel::new(BoxRegion::new(3, 4, 5));
        let chosen = [0usize];
        let kept = model.filter_rows(&chosen).unwrap();
        assert!(kept.contains(&0));
        for &id in &kept {
            if id == 0 {
                continue;
            }
            let disjoint = model
                .row_columns(id)
                .iter()
                .all(|col| !model.row_columns(0).contains(col));
            assert!(disjoint, "row {id} shares a column with the prefix");
        }
        // An empty prefix keeps everything.
        assert_eq!(
            model.filter_rows(&[]).unwrap().len(),
            model.row_count()
        );
    }

    #[test]
    fn box_formatting_shows_layers() {
        let region = BoxRegion::new(2, 2, 2);
        let placement = BoxPlacement::new(
            ShapeId::I,
            [(0, 0, 0), (0, 0, 1), (0, 1, 0), (0, 1, 1), (1, 0, 0)],
        );
        // Not a legal pentomino arrangement, but formatting only reads cells.
        let text = format_box_placements(&region, &[placement]);
        assert!(text.starts_with("z=0"));
        assert!(text.contains('I'));
        assert!(text.contains('.'));
    }
}
