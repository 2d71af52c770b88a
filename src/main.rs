//! Pentomino Solver
//!
//! Exercises the solving sessions from the command line: tile rectangles
//! and triplication masks with the twelve pentominoes, count solutions,
//! replay search traces, and fill boxes through the exact-cover path.

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use fivefold::board::format_placements;
use fivefold::cover::format_box_placements;
use fivefold::triplication::{generate, triplication_mask, GeneratorConfig};
use fivefold::{persistence, BoxRegion, BoxSession, Region, RectSession, TracedSearch};

/// Solves pentomino tiling puzzles on boards, masks and boxes.
#[derive(Parser)]
#[command(name = "fivefold")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Tile a rectangle and print the first solutions found.
    Solve {
        #[arg(long, default_value_t = 6)]
        rows: i32,
        #[arg(long, default_value_t = 10)]
        cols: i32,
        /// How many solutions to collect.
        #[arg(long, default_value_t = 1)]
        max: usize,
        /// Also write solutions.txt and solutions.bin to this directory.
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Count rectangle tilings up to a cap.
    Count {
        #[arg(long, default_value_t = 6)]
        rows: i32,
        #[arg(long, default_value_t = 10)]
        cols: i32,
        #[arg(long, default_value_t = 1000)]
        max: usize,
    },
    /// Solve a rectangle while recording the search trace.
    Trace {
        #[arg(long, default_value_t = 6)]
        rows: i32,
        #[arg(long, default_value_t = 10)]
        cols: i32,
        #[arg(long, default_value_t = 1_000_000)]
        max_events: usize,
    },
    /// Fill a box through the dancing-links exact-cover path.
    SolveBox {
        #[arg(long, default_value_t = 3)]
        x: i32,
        #[arg(long, default_value_t = 4)]
        y: i32,
        #[arg(long, default_value_t = 5)]
        z: i32,
        #[arg(long, default_value_t = 1)]
        max: usize,
    },
    /// Generate a solvable triplication puzzle and solve it.
    Triplicate {
        /// Seed for reproducible generation; random when omitted.
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value_t = 40)]
        attempts: usize,
    },
    /// Solve a rectangle and print the solutions as JSON.
    Export {
        #[arg(long, default_value_t = 6)]
        rows: i32,
        #[arg(long, default_value_t = 10)]
        cols: i32,
        #[arg(long, default_value_t = 1)]
        max: usize,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match Cli::parse().command {
        Command::Solve {
            rows,
            cols,
            max,
            save,
        } => run_solve(rows, cols, max, save),
        Command::Count { rows, cols, max } => run_count(rows, cols, max),
        Command::Trace {
            rows,
            cols,
            max_events,
        } => run_trace(rows, cols, max_events),
        Command::SolveBox { x, y, z, max } => run_solve_box(x, y, z, max),
        Command::Triplicate { seed, attempts } => run_triplicate(seed, attempts),
        Command::Export { rows, cols, max } => run_export(rows, cols, max),
    }
}

fn run_solve(rows: i32, cols: i32, max: usize, save: Option<PathBuf>) {
    let session = RectSession::new(Region::rectangle(rows, cols));
    let started = Instant::now();
    let solutions = session.solve(&[], max);
    println!(
        "Found {} solutions in {:.2?}",
        solutions.len(),
        started.elapsed()
    );
    for (i, solution) in solutions.iter().enumerate() {
        println!("Solution {}:", i + 1);
        println!("{}\n", format_placements(session.region(), solution));
    }
    if let Some(dir) = save {
        match persistence::save(&dir, session.region(), &solutions) {
            Ok(()) => println!("Wrote solutions.txt and solutions.bin to {}", dir.display()),
            Err(e) => eprintln!("Failed to save solutions: {}", e),
        }
    }
}

fn run_count(rows: i32, cols: i32, max: usize) {
    let session = RectSession::new(Region::rectangle(rows, cols));
    let started = Instant::now();
    let counted = session.count_solutions(&[], max);
    if counted.complete {
        println!("{} solutions ({:.2?})", counted.count, started.elapsed());
    } else {
        println!(
            "at least {} solutions, stopped at the cap ({:.2?})",
            counted.count,
            started.elapsed()
        );
    }
}

fn run_trace(rows: i32, cols: i32, max_events: usize) {
    let session = RectSession::new(Region::rectangle(rows, cols));
    match session.solve_with_trace(&[], 1, max_events) {
        TracedSearch::Done { solutions, trace } => {
            println!("{} search steps recorded", trace.len());
            match solutions.first() {
                Some(solution) => {
                    println!("{}", format_placements(session.region(), solution))
                }
                None => println!("no solution exists"),
            }
        }
        TracedSearch::Overflow => {
            eprintln!("trace exceeded {} events; retry without tracing", max_events)
        }
    }
}

fn run_solve_box(x: i32, y: i32, z: i32, max: usize) {
    let session = BoxSession::new(BoxRegion::new(x, y, z));
    println!("{} candidate placements", session.placement_count());
    let started = Instant::now();
    match session.solve(&[], max) {
        Ok(solutions) => {
            println!(
                "Found {} solutions in {:.2?}",
                solutions.len(),
                started.elapsed()
            );
            for (i, ids) in solutions.iter().enumerate() {
                let placements = session.resolve(ids).expect("solution ids are in range");
                println!("Solution {}:", i + 1);
                println!("{}\n", format_box_placements(session.model().region(), &placements));
            }
        }
        Err(e) => eprintln!("solve failed: {}", e),
    }
}

fn run_triplicate(seed: Option<u64>, attempts: usize) {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let config = GeneratorConfig {
        max_attempts: attempts,
        ..GeneratorConfig::default()
    };
    let Some(puzzle) = generate(&mut rng, &config) else {
        eprintln!("no solvable puzzle found in {} attempts", attempts);
        return;
    };

    let letters: String = puzzle.shapes.iter().map(|s| s.letter()).collect();
    println!("Triplicate {} using {}", puzzle.target.letter(), letters);
    println!("{}\n", format_placements(&triplication_mask(puzzle.target), &[]));

    let session = RectSession::with_shapes(puzzle.region, puzzle.shapes);
    match session.solve(&[], 1).first() {
        Some(solution) => println!("{}", format_placements(session.region(), solution)),
        None => eprintln!("generated puzzle did not solve; this is a bug"),
    }
}

fn run_export(rows: i32, cols: i32, max: usize) {
    let session = RectSession::new(Region::rectangle(rows, cols));
    let solutions = session.solve(&[], max);
    match persistence::export_json(&solutions) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("export failed: {}", e),
    }
}
