//! Board regions and occupancy state for the flat solver.
//!
//! A region is either a full rectangle or an explicit mask of allowed cells
//! inside a bounding extent. Cells are addressed through a flat row-major
//! index; the region also fixes the anchor scan order used by the search.

use crate::placement::Placement;
use crate::shapes::{Cell, ShapeId};

/// The target area to be exactly covered. Immutable for a solving session.
#[derive(Clone, Debug)]
pub struct Region {
    rows: i32,
    cols: i32,
    /// Allowed-cell flags, indexed row-major over the bounding extent.
    allowed: Vec<bool>,
    /// Allowed cells in anchor scan order.
    scan: Vec<Cell>,
}

impl Region {
    /// A fully-filled rectangle.
    ///
    /// The scan order runs down columns when the rectangle is wider than
    /// tall and across rows otherwise, which opens up compact sub-regions
    /// sooner during search.
    pub fn rectangle(rows: i32, cols: i32) -> Region {
        assert!(rows > 0 && cols > 0, "rectangle must be non-empty");
        let mut scan = Vec::with_capacity((rows * cols) as usize);
        if cols > rows {
            for c in 0..cols {
                for r in 0..rows {
                    scan.push((r, c));
                }
            }
        } else {
            for r in 0..rows {
                for c in 0..cols {
                    scan.push((r, c));
                }
            }
        }
        Region {
            rows,
            cols,
            allowed: vec![true; (rows * cols) as usize],
            scan,
        }
    }

    /// A masked region given its allowed cells. The scan order is the
    /// sorted cell order.
    pub fn mask(rows: i32, cols: i32, cells: impl IntoIterator<Item = Cell>) -> Region {
        assert!(rows > 0 && cols > 0, "mask extent must be non-empty");
        let mut allowed = vec![false; (rows * cols) as usize];
        let mut scan: Vec<Cell> = Vec::new();
        for (r, c) in cells {
            assert!(
                r >= 0 && r < rows && c >= 0 && c < cols,
                "mask cell ({r}, {c}) outside the {rows}x{cols} extent"
            );
            let idx = (r * cols + c) as usize;
            if !allowed[idx] {
                allowed[idx] = true;
                scan.push((r, c));
            }
        }
        assert!(!scan.is_empty(), "mask must contain at least one cell");
        scan.sort_unstable();
        Region {
            rows,
            cols,
            allowed,
            scan,
        }
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    /// Number of allowed cells.
    pub fn len(&self) -> usize {
        self.scan.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scan.is_empty()
    }

    /// Allowed cells in anchor scan order.
    pub fn cells(&self) -> &[Cell] {
        &self.scan
    }

    /// Whether the cell lies inside the region.
    #[inline]
    pub fn contains(&self, (r, c): Cell) -> bool {
        r >= 0 && r < self.rows && c >= 0 && c < self.cols && self.allowed[(r * self.cols + c) as usize]
    }

    /// Flat row-major index of an in-extent cell.
    #[inline]
    pub(crate) fn index(&self, (r, c): Cell) -> usize {
        (r * self.cols + c) as usize
    }
}

/// Mutable occupancy over one region. Scratch state owned by a single
/// solve call.
pub struct Board<'a> {
    region: &'a Region,
    filled: Vec<Option<ShapeId>>,
    free: usize,
}

impl<'a> Board<'a> {
    pub fn new(region: &'a Region) -> Board<'a> {
        Board {
            region,
            filled: vec![None; (region.rows * region.cols) as usize],
            free: region.len(),
        }
    }

    pub fn region(&self) -> &Region {
        self.region
    }

    /// Whether the cell is inside the region and unoccupied.
    #[inline]
    pub fn is_free(&self, cell: Cell) -> bool {
        self.region.contains(cell) && self.filled[self.region.index(cell)].is_none()
    }

    /// The first unoccupied cell in scan order, or `None` when the region
    /// is completely filled.
    pub fn first_empty(&self) -> Option<Cell> {
        if self.free == 0 {
            return None;
        }
        self.region
            .cells()
            .iter()
            .copied()
            .find(|&cell| self.filled[self.region.index(cell)].is_none())
    }

    pub fn is_full(&self) -> bool {
        self.free == 0
    }

    /// Marks the placement's cells occupied. Callers must have checked the
    /// cells are free.
    pub fn occupy(&mut self, placement: &Placement) {
        for &cell in &placement.cells {
            let idx = self.region.index(cell);
            debug_assert!(self.filled[idx].is_none());
            self.filled[idx] = Some(placement.shape);
        }
        self.free -= placement.cells.len();
    }

    /// Reverts a previous `occupy`.
    pub fn clear(&mut self, placement: &Placement) {
        for &cell in &placement.cells {
            let idx = self.region.index(cell);
            debug_assert_eq!(self.filled[idx], Some(placement.shape));
            self.filled[idx] = None;
        }
        self.free += placement.cells.len();
    }

    /// The pruning rule: every 4-connected component of empty cells must
    /// have a size divisible by 5, or no set of pentominoes can fill it.
    pub fn voids_are_fillable(&self) -> bool {
        let mut visited = vec![false; self.filled.len()];
        let mut stack: Vec<Cell> = Vec::new();

        for &cell in self.region.cells() {
            let start = self.region.index(cell);
            if visited[start] || self.filled[start].is_some() {
                continue;
            }

            visited[start] = true;
            stack.push(cell);
            let mut size = 0usize;
            while let Some((r, c)) = stack.pop() {
                size += 1;
                for next in [(r - 1, c), (r + 1, c), (r, c - 1), (r, c + 1)] {
                    if !self.region.contains(next) {
                        continue;
                    }
                    let idx = self.region.index(next);
                    if visited[idx] || self.filled[idx].is_some() {
                        continue;
                    }
                    visited[idx] = true;
                    stack.push(next);
                }
            }

            if size % 5 != 0 {
                return false;
            }
        }
        true
    }
}

/// Renders placements on a region as a letter grid.
///
/// Occupied cells show their shape letter, empty region cells show '.',
/// cells outside a mask are blank. Lines carry no trailing whitespace and
/// the result has no trailing newline.
pub fn format_placements(region: &Region, placements: &[Placement]) -> String {
    let mut grid = vec![None; (region.rows * region.cols) as usize];
    for placement in placements {
        for &cell in &placement.cells {
            if region.contains(cell) {
                grid[region.index(cell)] = Some(placement.shape);
            }
        }
    }

    let mut lines = Vec::with_capacity(region.rows as usize);
    for r in 0..region.rows {
        let mut line = String::with_capacity(region.cols as usize);
        for c in 0..region.cols {
            if !region.contains((r, c)) {
                line.push(' ');
            } else {
                match grid[region.index((r, c))] {
                    Some(shape) => line.push(shape.letter()),
                    None => line.push('.'),
                }
            }
        }
        lines.push(line.trim_end().to_string());
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_rectangle_scans_column_major() {
        let region = Region::rectangle(6, 10);
        assert_eq!(&region.cells()[..3], &[(0, 0), (1, 0), (2, 0)]);
        assert_eq!(region.len(), 60);
    }

    #[test]
    fn tall_rectangle_scans_row_major() {
        let region = Region::rectangle(10, 6);
        assert_eq!(&region.cells()[..3], &[(0, 0), (0, 1), (0, 2)]);
    }

    #[test]
    fn mask_scans_sorted_cell_order() {
        let region = Region::mask(3, 3, [(2, 2), (0, 1), (1, 1), (2, 1), (1, 0)]);
        assert_eq!(region.cells(), &[(0, 1), (1, 0), (1, 1), (2, 1), (2, 2)]);
        assert!(region.contains((0, 1)));
        assert!(!region.contains((0, 0)));
        assert!(!region.contains((-1, 1)));
    }

    #[test]
    fn occupy_and_clear_roundtrip() {
        let region = Region::rectangle(2, 5);
        let mut board = Board::new(&region);
        let placement = Placement::new(ShapeId::I, [(0, 0), (0, 1), (0, 2), (0, 3), (0, 4)]);

        assert_eq!(board.first_empty(), Some((0, 0)));
        board.occupy(&placement);
        assert_eq!(board.first_empty(), Some((1, 0)));
        assert!(!board.is_full());
        assert!(!board.is_free((0, 2)));
        board.clear(&placement);
        assert_eq!(board.first_empty(), Some((0, 0)));
        assert!(board.is_free((0, 2)));
    }

    #[test]
    fn undersized_void_component_fails_pruning() {
        // Fill the I piece across the top of a 2x5 board minus two cells:
        // a mask of 8 cells leaves a 3-cell component after the placement.
        let region = Region::mask(2, 5, [(0, 0), (0, 1), (0, 2), (0, 3), (0, 4), (1, 0), (1, 1), (1, 2)]);
        let mut board = Board::new(&region);
        assert!(!board.voids_are_fillable());

        let placement = Placement::new(ShapeId::I, [(0, 0), (0, 1), (0, 2), (0, 3), (0, 4)]);
        board.occupy(&placement);
        assert!(!board.voids_are_fillable());
    }

    #[test]
    fn five_multiple_components_pass_pruning() {
        let region = Region::rectangle(2, 5);
        let board = Board::new(&region);
        assert!(board.voids_are_fillable());

        // Two disconnected components of 5 cells each still pass.
        let split = Region::mask(
            3,
            5,
            (0..5).map(|c| (0, c)).chain((0..5).map(|c| (2, c))),
        );
        let board = Board::new(&split);
        assert!(board.voids_are_fillable());
    }

    #[test]
    fn formats_partial_board() {
        let region = Region::rectangle(2, 5);
        let placement = Placement::new(ShapeId::I, [(0, 0), (0, 1), (0, 2), (0, 3), (0, 4)]);
        insta::assert_snapshot!(format_placements(&region, &[placement]), @r"
        IIIII
        .....
        ");
    }

    #[test]
    fn formats_masked_board() {
        let region = Region::mask(3, 3, [(0, 1), (1, 0), (1, 1), (1, 2), (2, 1)]);
        assert_eq!(format_placements(&region, &[]), " .\n...\n .");
    }
}
