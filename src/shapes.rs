//! The twelve pentomino shapes.
//!
//! Each shape is a set of five unit cells, normalized so the minimum row and
//! column are zero and the cells are sorted. The letter names follow the
//! standard pentomino naming scheme.

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::symmetry::{unique_box_orientations, unique_orientations};

/// A 2D board cell as (row, col).
pub type Cell = (i32, i32);

/// A 3D box cell as (x, y, z).
pub type BoxCell = (i32, i32, i32);

/// Number of cells in every pentomino.
pub const CELLS_PER_SHAPE: usize = 5;

/// Number of distinct pentomino shapes.
pub const SHAPE_COUNT: usize = 12;

/// One of the twelve pentomino letters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ShapeId {
    F,
    I,
    L,
    N,
    P,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
}

impl ShapeId {
    /// All twelve shapes in letter order. Search loops iterate this order,
    /// which keeps every solve deterministic.
    pub const ALL: [ShapeId; SHAPE_COUNT] = [
        ShapeId::F,
        ShapeId::I,
        ShapeId::L,
        ShapeId::N,
        ShapeId::P,
        ShapeId::T,
        ShapeId::U,
        ShapeId::V,
        ShapeId::W,
        ShapeId::X,
        ShapeId::Y,
        ShapeId::Z,
    ];

    /// Index of this shape in `ALL` (0..12).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The display letter for this shape.
    pub fn letter(self) -> char {
        match self {
            ShapeId::F => 'F',
            ShapeId::I => 'I',
            ShapeId::L => 'L',
            ShapeId::N => 'N',
            ShapeId::P => 'P',
            ShapeId::T => 'T',
            ShapeId::U => 'U',
            ShapeId::V => 'V',
            ShapeId::W => 'W',
            ShapeId::X => 'X',
            ShapeId::Y => 'Y',
            ShapeId::Z => 'Z',
        }
    }

    /// Parses a shape letter (case-sensitive).
    pub fn from_letter(letter: char) -> Option<ShapeId> {
        ShapeId::ALL.into_iter().find(|s| s.letter() == letter)
    }

    /// The base cell set for this shape, normalized to the origin.
    pub fn base_cells(self) -> &'static [Cell; CELLS_PER_SHAPE] {
        &BASE_CELLS[self.index()]
    }

    /// The distinct 2D orientations of this shape (rotations and mirrors).
    pub fn orientations(self) -> &'static [[Cell; CELLS_PER_SHAPE]] {
        &orientation_tables().planar[self.index()]
    }

    /// The distinct 3D orientations of this shape (proper rotations only,
    /// since a physical piece cannot be mirrored through space).
    pub fn box_orientations(self) -> &'static [[BoxCell; CELLS_PER_SHAPE]] {
        &orientation_tables().spatial[self.index()]
    }
}

/// Base cell sets indexed by `ShapeId`, in letter order.
const BASE_CELLS: [[Cell; CELLS_PER_SHAPE]; SHAPE_COUNT] = [
    // F
    [(0, 1), (1, 0), (1, 1), (1, 2), (2, 0)],
    // I
    [(0, 0), (0, 1), (0, 2), (0, 3), (0, 4)],
    // L
    [(0, 0), (1, 0), (2, 0), (3, 0), (3, 1)],
    // N
    [(0, 0), (1, 0), (1, 1), (2, 1), (3, 1)],
    // P
    [(0, 0), (0, 1), (1, 0), (1, 1), (2, 0)],
    // T
    [(0, 0), (0, 1), (0, 2), (1, 1), (2, 1)],
    // U
    [(0, 0), (0, 2), (1, 0), (1, 1), (1, 2)],
    // V
    [(0, 0), (1, 0), (2, 0), (2, 1), (2, 2)],
    // W
    [(0, 0), (1, 0), (1, 1), (2, 1), (2, 2)],
    // X
    [(0, 1), (1, 0), (1, 1), (1, 2), (2, 1)],
    // Y
    [(0, 1), (1, 1), (2, 0), (2, 1), (3, 1)],
    // Z
    [(0, 0), (0, 1), (1, 1), (2, 1), (2, 2)],
];

struct OrientationTables {
    planar: [Vec<[Cell; CELLS_PER_SHAPE]>; SHAPE_COUNT],
    spatial: [Vec<[BoxCell; CELLS_PER_SHAPE]>; SHAPE_COUNT],
}

/// Orientation tables are pure functions of the static shape data, computed
/// once for the process lifetime.
fn orientation_tables() -> &'static OrientationTables {
    static TABLES: OnceLock<OrientationTables> = OnceLock::new();
    TABLES.get_or_init(|| OrientationTables {
        planar: std::array::from_fn(|i| unique_orientations(&BASE_CELLS[i])),
        spatial: std::array::from_fn(|i| {
            let lifted: [BoxCell; CELLS_PER_SHAPE] =
                std::array::from_fn(|c| (BASE_CELLS[i][c].0, BASE_CELLS[i][c].1, 0));
            unique_box_orientations(&lifted)
        }),
    })
}
