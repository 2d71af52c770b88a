//! Dancing-links exact cover (Knuth's Algorithm X).
//!
//! The toroidal doubly-linked matrix lives in a flat arena of nodes
//! addressed by index, so `cover`/`uncover` keep their O(1) link surgery
//! without aliased pointers. Node 0 is the root of the column header ring;
//! headers occupy indices 1..=columns; row nodes follow in build order.

use crate::trace::{TraceKind, TraceLog};

const ROOT: usize = 0;

#[derive(Clone, Debug)]
struct Node {
    left: usize,
    right: usize,
    up: usize,
    down: usize,
    /// Column this node belongs to; headers name their own column.
    col: usize,
    /// Row id carried by row nodes, `usize::MAX` on headers and the root.
    row: usize,
}

/// A traced cover search. Overflowing the event cap aborts the whole call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TracedCover {
    Done {
        solutions: Vec<Vec<usize>>,
        events: Vec<(TraceKind, usize)>,
    },
    Overflow,
}

/// Sparse exact-cover matrix. Scratch state owned by a single solve call;
/// build a fresh matrix per search.
pub struct Matrix {
    nodes: Vec<Node>,
    sizes: Vec<usize>,
    columns: usize,
}

impl Matrix {
    /// Builds the matrix from sparse rows: each entry is a row id plus the
    /// sorted column indices that row covers.
    pub fn new(columns: usize, rows: &[(usize, &[usize])]) -> Matrix {
        assert!(columns > 0, "matrix needs at least one column");

        let node_count = 1 + columns + rows.iter().map(|(_, cols)| cols.len()).sum::<usize>();
        let mut nodes = Vec::with_capacity(node_count);

        nodes.push(Node {
            left: columns,
            right: 1,
            up: ROOT,
            down: ROOT,
            col: usize::MAX,
            row: usize::MAX,
        });
        for c in 0..columns {
            let header = c + 1;
            nodes.push(Node {
                left: header - 1,
                right: if header == columns { ROOT } else { header + 1 },
                up: header,
                down: header,
                col: c,
                row: usize::MAX,
            });
        }

        let mut matrix = Matrix {
            nodes,
            sizes: vec![0; columns],
            columns,
        };
        for &(row_id, cols) in rows {
            matrix.append_row(row_id, cols);
        }
        matrix
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    fn append_row(&mut self, row_id: usize, cols: &[usize]) {
        let mut first_in_row: Option<usize> = None;
        for &col in cols {
            assert!(col < self.columns, "column {col} out of range");
            let header = col + 1;
            let node = self.nodes.len();
            let above = self.nodes[header].up;

            self.nodes.push(Node {
                left: node,
                right: node,
                up: above,
                down: header,
                col,
                row: row_id,
            });
            self.nodes[above].down = node;
            self.nodes[header].up = node;
            self.sizes[col] += 1;

            if let Some(first) = first_in_row {
                let last = self.nodes[first].left;
                self.nodes[node].right = first;
                self.nodes[node].left = last;
                self.nodes[last].right = node;
                self.nodes[first].left = node;
            } else {
                first_in_row = Some(node);
            }
        }
    }

    /// Unlinks a column header from the ring and every row under it from
    /// the other columns those rows touch.
    fn cover(&mut self, col: usize) {
        let header = col + 1;
        let (left, right) = (self.nodes[header].left, self.nodes[header].right);
        self.nodes[left].right = right;
        self.nodes[right].left = left;

        let mut row_node = self.nodes[header].down;
        while row_node != header {
            let mut node = self.nodes[row_node].right;
            while node != row_node {
                let (up, down) = (self.nodes[node].up, self.nodes[node].down);
                self.nodes[up].down = down;
                self.nodes[down].up = up;
                self.sizes[self.nodes[node].col] -= 1;
                node = self.nodes[node].right;
            }
            row_node = self.nodes[row_node].down;
        }
    }

    /// Exact mirror image of `cover`, restoring every link it removed.
    fn uncover(&mut self, col: usize) {
        let header = col + 1;
        let mut row_node = self.nodes[header].up;
        while row_node != header {
            let mut node = self.nodes[row_node].left;
            while node != row_node {
                let (up, down) = (self.nodes[node].up, self.nodes[node].down);
                self.nodes[up].down = node;
                self.nodes[down].up = node;
                self.sizes[self.nodes[node].col] += 1;
                node = self.nodes[node].left;
            }
            row_node = self.nodes[row_node].up;
        }

        let (left, right) = (self.nodes[header].left, self.nodes[header].right);
        self.nodes[left].right = header;
        self.nodes[right].left = header;
    }

    /// The smallest live column, ties broken by encounter order around the
    /// header ring. Keeping the branching factor minimal is what makes the
    /// search tractable.
    fn choose(&self) -> usize {
        let mut best = self.nodes[ROOT].right;
        let mut best_size = self.sizes[self.nodes[best].col];
        let mut header = self.nodes[best].right;
        while header != ROOT && best_size > 0 {
            let size = self.sizes[self.nodes[header].col];
            if size < best_size {
                best = header;
                best_size = size;
            }
            header = self.nodes[header].right;
        }
        self.nodes[best].col
    }

    /// Collects up to `max_solutions` exact covers, each as the row ids of
    /// the chosen rows in selection order.
    pub fn solve(&mut self, max_solutions: usize) -> Vec<Vec<usize>> {
        let mut solutions = Vec::new();
        if max_solutions == 0 {
            return solutions;
        }
        let mut stack = Vec::new();
        self.search(&mut stack, &mut solutions, max_solutions, &mut None);
        solutions
    }

    /// Like [`Matrix::solve`], recording a place/remove event per row pushed
    /// and popped during the search.
    pub fn solve_traced(&mut self, max_solutions: usize, max_events: usize) -> TracedCover {
        let mut solutions = Vec::new();
        let mut stack = Vec::new();
        let mut log = Some(TraceLog::new(max_events));
        self.search(&mut stack, &mut solutions, max_solutions.max(1), &mut log);
        let log = log.expect("trace log survives the search");
        if log.overflowed() {
            TracedCover::Overflow
        } else {
            TracedCover::Done {
                solutions,
                events: log.into_events(),
            }
        }
    }

    /// Returns true when the whole search should stop.
    fn search(
        &mut self,
        stack: &mut Vec<usize>,
        solutions: &mut Vec<Vec<usize>>,
        max_solutions: usize,
        log: &mut Option<TraceLog<(TraceKind, usize)>>,
    ) -> bool {
        if self.nodes[ROOT].right == ROOT {
            solutions.push(stack.clone());
            return solutions.len() >= max_solutions;
        }

        let col = self.choose();
        if self.sizes[col] == 0 {
            return false;
        }
        self.cover(col);

        let header = col + 1;
        let mut row_node = self.nodes[header].down;
        while row_node != header {
            let row = self.nodes[row_node].row;
            stack.push(row);
            if let Some(log) = log {
                if !log.record((TraceKind::Place, row)) {
                    return true;
                }
            }

            let mut node = self.nodes[row_node].right;
            while node != row_node {
                self.cover(self.nodes[node].col);
                node = self.nodes[node].right;
            }

            if self.search(stack, solutions, max_solutions, log) {
                return true;
            }

            let mut node = self.nodes[row_node].left;
            while node != row_node {
                self.uncover(self.nodes[node].col);
                node = self.nodes[node].left;
            }
            stack.pop();
            if let Some(log) = log {
                if !log.record((TraceKind::Remove, row)) {
                    return true;
                }
            }

            row_node = self.nodes[row_node].down;
        }

        self.uncover(col);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Six rows over four columns with five known exact covers.
    fn sample_rows() -> Vec<(usize, Vec<usize>)> {
        vec![
            (0, vec![0, 2]),
            (1, vec![0, 3]),
            (2, vec![1, 2]),
            (3, vec![1, 3]),
            (4, vec![0, 2]),
            (5, vec![1, 3]),
        ]
    }

    fn build(rows: &[(usize, Vec<usize>)], columns: usize) -> Matrix {
        let borrowed: Vec<(usize, &[usize])> =
            rows.iter().map(|(id, cols)| (*id, cols.as_slice())).collect();
        Matrix::new(columns, &borrowed)
    }

    #[test]
    fn finds_exactly_the_known_solution_set() {
        let rows = sample_rows();
        let mut matrix = build(&rows, 4);
        let mut solutions = matrix.solve(100);
        for solution in &mut solutions {
            solution.sort_unstable();
        }
        solutions.sort();
        assert_eq!(
            solutions,
            vec![vec![0, 3], vec![0, 5], vec![1, 2], vec![3, 4], vec![4, 5]]
        );
    }

    #[test]
    fn solutions_cover_every_column_exactly_once() {
        let rows = sample_rows();
        let mut matrix = build(&rows, 4);
        for solution in matrix.solve(100) {
            let mut covered = [false; 4];
            for row_id in solution {
                for &col in &rows[row_id].1 {
                    assert!(!covered[col], "column {col} covered twice");
                    covered[col] = true;
                }
            }
            assert!(covered.iter().all(|&c| c));
        }
    }

    #[test]
    fn solution_cap_is_honored() {
        let rows = sample_rows();
        let mut matrix = build(&rows, 4);
        assert_eq!(matrix.solve(2).len(), 2);
        let mut matrix = build(&rows, 4);
        assert!(matrix.solve(0).is_empty());
    }

    #[test]
    fn uncoverable_column_means_no_solutions() {
        let rows = vec![(0, vec![0])];
        let mut matrix = build(&rows, 2);
        assert!(matrix.solve(10).is_empty());
    }

    #[test]
    fn single_column_single_row() {
        let rows = vec![(7, vec![0])];
        let mut matrix = build(&rows, 1);
        assert_eq!(matrix.solve(10), vec![vec![7]]);
    }

    #[test]
    fn search_is_deterministic() {
        let rows = sample_rows();
        let first = build(&rows, 4).solve(100);
        let second = build(&rows, 4).solve(100);
        assert_eq!(first, second);
    }

    #[test]
    fn traced_search_balances_events() {
        let rows = sample_rows();
        let mut matrix = build(&rows, 4);
        let TracedCover::Done { solutions, events } = matrix.solve_traced(1, 10_000) else {
            panic!("generous cap should not overflow");
        };
        assert_eq!(solutions.len(), 1);
        let places = events.iter().filter(|(k, _)| *k == TraceKind::Place).count();
        let removes = events.iter().filter(|(k, _)| *k == TraceKind::Remove).count();
        assert_eq!(places - removes, solutions[0].len());
    }

    #[test]
    fn traced_search_overflows_on_a_zero_cap() {
        let rows = sample_rows();
        let mut matrix = build(&rows, 4);
        assert_eq!(matrix.solve_traced(1, 0), TracedCover::Overflow);
    }
}
