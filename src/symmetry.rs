//! Orientation canonicalization under the planar and spatial symmetry groups.
//!
//! A flat piece has 8 candidate transforms (4 quarter turns, each optionally
//! mirrored first); a solid piece has the 24 proper rotations of the cube.
//! Transformed cell sets are normalized so the minimum coordinate on every
//! axis is zero and the cells are sorted, then deduplicated by that canonical
//! form. Symmetric pieces collapse to fewer orientations.

use rustc_hash::FxHashSet;

use crate::shapes::{BoxCell, Cell, CELLS_PER_SHAPE};

/// All 24 rotation maps for a cube, as coordinate transforms.
///
/// Organized as 6 face-up choices x 4 turns around the vertical axis. Every
/// map is a sign/permutation matrix of determinant +1, so no reflection can
/// appear here.
const BOX_ROTATIONS: [fn(BoxCell) -> BoxCell; 24] = [
    // +Z face up, turn around Z
    |(x, y, z)| (x, y, z),
    |(x, y, z)| (-y, x, z),
    |(x, y, z)| (-x, -y, z),
    |(x, y, z)| (y, -x, z),
    // +Y face up, turn around Y
    |(x, y, z)| (x, -z, y),
    |(x, y, z)| (z, x, y),
    |(x, y, z)| (-x, z, y),
    |(x, y, z)| (-z, -x, y),
    // -Z face up, turn around Z
    |(x, y, z)| (x, -y, -z),
    |(x, y, z)| (y, x, -z),
    |(x, y, z)| (-x, y, -z),
    |(x, y, z)| (-y, -x, -z),
    // -Y face up, turn around Y
    |(x, y, z)| (x, z, -y),
    |(x, y, z)| (-z, x, -y),
    |(x, y, z)| (-x, -z, -y),
    |(x, y, z)| (z, -x, -y),
    // +X face up, turn around X
    |(x, y, z)| (z, y, -x),
    |(x, y, z)| (-y, z, -x),
    |(x, y, z)| (-z, -y, -x),
    |(x, y, z)| (y, -z, -x),
    // -X face up, turn around X
    |(x, y, z)| (-z, y, x),
    |(x, y, z)| (-y, -z, x),
    |(x, y, z)| (z, -y, x),
    |(x, y, z)| (y, z, x),
];

/// Applies one element of the planar symmetry group: an optional mirror on
/// the column axis followed by `turns` quarter turns.
fn planar_transform(cells: &[Cell; CELLS_PER_SHAPE], turns: u8, mirror: bool) -> [Cell; CELLS_PER_SHAPE] {
    let transformed = std::array::from_fn(|i| {
        let (r, c) = cells[i];
        let (mut x, mut y) = (r, if mirror { -c } else { c });
        for _ in 0..turns {
            (x, y) = (y, -x);
        }
        (x, y)
    });
    normalize(transformed)
}

/// Translates cells so the minimum row and column are zero, then sorts.
pub fn normalize(mut cells: [Cell; CELLS_PER_SHAPE]) -> [Cell; CELLS_PER_SHAPE] {
    let min_r = cells.iter().map(|&(r, _)| r).min().unwrap();
    let min_c = cells.iter().map(|&(_, c)| c).min().unwrap();
    for (r, c) in &mut cells {
        *r -= min_r;
        *c -= min_c;
    }
    cells.sort_unstable();
    cells
}

/// Translates cells so the minimum coordinate on every axis is zero, then sorts.
pub fn normalize_box(mut cells: [BoxCell; CELLS_PER_SHAPE]) -> [BoxCell; CELLS_PER_SHAPE] {
    let min_x = cells.iter().map(|&(x, _, _)| x).min().unwrap();
    let min_y = cells.iter().map(|&(_, y, _)| y).min().unwrap();
    let min_z = cells.iter().map(|&(_, _, z)| z).min().unwrap();
    for (x, y, z) in &mut cells {
        *x -= min_x;
        *y -= min_y;
        *z -= min_z;
    }
    cells.sort_unstable();
    cells
}

/// Generates the distinct planar orientations of a cell set, in first-seen
/// transform order.
pub fn unique_orientations(cells: &[Cell; CELLS_PER_SHAPE]) -> Vec<[Cell; CELLS_PER_SHAPE]> {
    let mut seen = FxHashSet::default();
    let mut variants = Vec::new();
    for mirror in [false, true] {
        for turns in 0..4 {
            let variant = planar_transform(cells, turns, mirror);
            if seen.insert(variant) {
                variants.push(variant);
            }
        }
    }
    variants
}

/// Generates the distinct spatial orientations of a cell set under the 24
/// proper rotations, in first-seen rotation order.
pub fn unique_box_orientations(cells: &[BoxCell; CELLS_PER_SHAPE]) -> Vec<[BoxCell; CELLS_PER_SHAPE]> {
    let mut seen = FxHashSet::default();
    let mut variants = Vec::new();
    for rotate in BOX_ROTATIONS {
        let variant = normalize_box(std::array::from_fn(|i| rotate(cells[i])));
        if seen.insert(variant) {
            variants.push(variant);
        }
    }
    variants
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::ShapeId;

    #[test]
    fn planar_orientation_counts_divide_group_order() {
        for shape in ShapeId::ALL {
            let count = shape.orientations().len();
            assert!(count >= 1, "{:?} produced no orientations", shape);
            assert_eq!(8 % count, 0, "{:?} count {} does not divide 8", shape, count);
        }
    }

    #[test]
    fn box_orientation_counts_divide_group_order() {
        for shape in ShapeId::ALL {
            let count = shape.box_orientations().len();
            assert!(count >= 1, "{:?} produced no orientations", shape);
            assert_eq!(24 % count, 0, "{:?} count {} does not divide 24", shape, count);
        }
    }

    #[test]
    fn fully_symmetric_x_has_one_planar_orientation() {
        assert_eq!(ShapeId::X.orientations().len(), 1);
    }

    #[test]
    fn known_planar_counts() {
        // Chiral, fully asymmetric shapes exhaust the group; the straight
        // piece collapses to two.
        assert_eq!(ShapeId::F.orientations().len(), 8);
        assert_eq!(ShapeId::I.orientations().len(), 2);
        assert_eq!(ShapeId::T.orientations().len(), 4);
        assert_eq!(ShapeId::Z.orientations().len(), 4);
    }

    #[test]
    fn known_box_counts() {
        // A straight line has one orientation per axis; the X piece keeps
        // its 8-element planar stabilizer, leaving 24 / 8 = 3.
        assert_eq!(ShapeId::I.box_orientations().len(), 3);
        assert_eq!(ShapeId::X.box_orientations().len(), 3);
    }

    #[test]
    fn canonicalization_is_idempotent() {
        for shape in ShapeId::ALL {
            for orientation in shape.orientations() {
                for variant in unique_orientations(orientation) {
                    assert!(
                        shape.orientations().contains(&variant),
                        "re-canonicalizing {:?} left its orientation set",
                        shape
                    );
                }
            }
        }
    }

    #[test]
    fn box_canonicalization_is_idempotent() {
        for shape in ShapeId::ALL {
            for orientation in shape.box_orientations() {
                for variant in unique_box_orientations(orientation) {
                    assert!(
                        shape.box_orientations().contains(&variant),
                        "re-canonicalizing {:?} left its orientation set",
                        shape
                    );
                }
            }
        }
    }

    #[test]
    fn orientations_stay_normalized() {
        for shape in ShapeId::ALL {
            for orientation in shape.orientations() {
                assert_eq!(normalize(*orientation), *orientation);
            }
            for orientation in shape.box_orientations() {
                assert_eq!(normalize_box(*orientation), *orientation);
            }
        }
    }
}
