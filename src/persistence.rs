//! File I/O for saving and loading solved boards.
//!
//! Binary format for `solutions.bin` (little endian):
//! - u32: solution count
//! - repeat per solution:
//!   - u32: placement count
//!   - repeat per placement:
//!     - u8: shape index (0-based, letter order)
//!     - repeat per cell: 2 bytes (row, col)
//!
//! `solutions.txt` holds the same solutions as letter grids for humans.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::board::{format_placements, Region};
use crate::placement::Placement;
use crate::shapes::{ShapeId, CELLS_PER_SHAPE};

const SOLUTIONS_BIN: &str = "solutions.bin";
const SOLUTIONS_TXT: &str = "solutions.txt";

/// Saves solutions to both binary and text files under `dir`.
pub fn save(dir: &Path, region: &Region, solutions: &[Vec<Placement>]) -> std::io::Result<()> {
    save_text(dir, region, solutions)?;
    save_binary(dir, solutions)?;
    Ok(())
}

fn save_text(dir: &Path, region: &Region, solutions: &[Vec<Placement>]) -> std::io::Result<()> {
    let mut file = File::create(dir.join(SOLUTIONS_TXT))?;
    writeln!(file, "Found {} solutions:\n", solutions.len())?;
    for (i, solution) in solutions.iter().enumerate() {
        writeln!(file, "Solution {}:", i + 1)?;
        writeln!(file, "{}", format_placements(region, solution))?;
        writeln!(file)?;
    }
    Ok(())
}

fn save_binary(dir: &Path, solutions: &[Vec<Placement>]) -> std::io::Result<()> {
    let mut file = File::create(dir.join(SOLUTIONS_BIN))?;

    file.write_all(&(solutions.len() as u32).to_le_bytes())?;
    for solution in solutions {
        file.write_all(&(solution.len() as u32).to_le_bytes())?;
        for placement in solution {
            file.write_all(&[placement.shape.index() as u8])?;
            for &(r, c) in &placement.cells {
                file.write_all(&[r as u8, c as u8])?;
            }
        }
    }
    Ok(())
}

/// Loads all solutions from the binary file under `dir`.
pub fn load_all(dir: &Path) -> Option<Vec<Vec<Placement>>> {
    let mut file = File::open(dir.join(SOLUTIONS_BIN)).ok()?;
    let mut u32_buffer = [0u8; 4];

    file.read_exact(&mut u32_buffer).ok()?;
    let solution_count = u32::from_le_bytes(u32_buffer) as usize;

    let mut solutions = Vec::with_capacity(solution_count);
    for _ in 0..solution_count {
        file.read_exact(&mut u32_buffer).ok()?;
        let placement_count = u32::from_le_bytes(u32_buffer) as usize;

        let mut solution = Vec::with_capacity(placement_count);
        for _ in 0..placement_count {
            let mut shape_buffer = [0u8; 1];
            file.read_exact(&mut shape_buffer).ok()?;
            let shape = *ShapeId::ALL.get(shape_buffer[0] as usize)?;

            let mut cells = [(0, 0); CELLS_PER_SHAPE];
            for cell in &mut cells {
                let mut cell_buffer = [0u8; 2];
                file.read_exact(&mut cell_buffer).ok()?;
                *cell = (cell_buffer[0] as i32, cell_buffer[1] as i32);
            }
            solution.push(Placement::new(shape, cells));
        }
        solutions.push(solution);
    }
    Some(solutions)
}

/// Returns the number of saved solutions without loading them all.
pub fn count(dir: &Path) -> Option<usize> {
    let mut file = File::open(dir.join(SOLUTIONS_BIN)).ok()?;
    let mut u32_buffer = [0u8; 4];
    file.read_exact(&mut u32_buffer).ok()?;
    Some(u32::from_le_bytes(u32_buffer) as usize)
}

/// Serializes solutions as pretty-printed JSON, the exchange format the
/// protocol types already use.
pub fn export_json(solutions: &[Vec<Placement>]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(solutions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_solutions() -> (Region, Vec<Vec<Placement>>) {
        let region = Region::rectangle(6, 10);
        let solution =
            crate::backtrack::solve_from_placements(&region, &ShapeId::ALL, &[]).unwrap();
        (region, vec![solution])
    }

    #[test]
    fn binary_roundtrip_is_exact() {
        let dir = std::env::temp_dir().join("fivefold_binary_roundtrip");
        std::fs::create_dir_all(&dir).unwrap();

        let (region, solutions) = sample_solutions();
        save(&dir, &region, &solutions).unwrap();
        assert_eq!(load_all(&dir), Some(solutions.clone()));
        assert_eq!(count(&dir), Some(1));
    }

    #[test]
    fn missing_file_loads_nothing() {
        let dir = std::env::temp_dir().join("fivefold_missing_file");
        std::fs::create_dir_all(&dir).unwrap();
        let _ = std::fs::remove_file(dir.join(SOLUTIONS_BIN));
        assert_eq!(load_all(&dir), None);
        assert_eq!(count(&dir), None);
    }

    #[test]
    fn json_export_parses_back() {
        let (_, solutions) = sample_solutions();
        let json = export_json(&solutions).unwrap();
        let parsed: Vec<Vec<Placement>> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, solutions);
    }
}
