#![warn(clippy::pedantic)]
#![allow(clippy::too_many_lines)]

mod puzzle;

use alg::{Alg, Move, MoveMetric, SimplifyOptions};
use clap::{ArgAction, Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use env_logger::TimestampPrecision;
use itertools::Itertools;
use kpuzzle::KPuzzle;
use log::{LevelFilter, info};
use puzzle::{OptionArgs, geometry};
use puzzle_geometry::{PUZZLES, PuzzleGeometry};

/// Parses algs and derives twisty puzzles from their geometry
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Increase logging verbosity (can be repeated)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an alg and print it back in canonical form
    Alg {
        alg: String,
        #[arg(long)]
        invert: bool,
        /// Merge and cancel adjacent moves
        #[arg(long)]
        simplify: bool,
        /// Replace commutators, conjugates, and repeated groups by plain moves
        #[arg(long)]
        expand: bool,
        /// Also print move counts to stderr
        #[arg(long)]
        count: bool,
    },
    /// Print the definition of a puzzle as JSON
    Puzzle {
        /// A catalogue name like `megaminx`, or a description like `c f 0.5 f 0`
        puzzle: String,
        #[command(flatten)]
        options: OptionArgs,
        /// Print the orbits and turns instead of the definition
        #[arg(long)]
        summary: bool,
        /// Print the definition in ksolve format instead of JSON
        #[arg(long, conflicts_with = "summary")]
        ksolve: bool,
    },
    /// Apply an alg to the start state of a puzzle and print the state as JSON
    Apply {
        puzzle: String,
        alg: String,
        #[command(flatten)]
        options: OptionArgs,
    },
    /// List the puzzle catalogue
    List,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .format_timestamp(Some(TimestampPrecision::Millis))
        .init();

    match cli.command {
        Commands::Alg {
            alg,
            invert,
            simplify,
            expand,
            count,
        } => {
            let mut alg = Alg::parse(&alg).wrap_err("Failed to parse the alg")?;
            if expand {
                alg = alg.expand(None);
            }
            if invert {
                alg = alg.invert();
            }
            if simplify {
                alg = alg.simplify(&SimplifyOptions::default());
            }
            if count {
                eprintln!(
                    "{} moves, {} quarter turns, {} without rotations",
                    alg.count_moves(MoveMetric::Execution),
                    alg.count_moves(MoveMetric::Quantum),
                    alg.count_moves(MoveMetric::IgnoreRotations),
                );
            }
            println!("{alg}");
        }
        Commands::Puzzle {
            puzzle,
            options,
            summary,
            ksolve,
        } => {
            let geometry = geometry(&puzzle, &options.options()?)?;
            if summary {
                print_summary(&geometry)?;
            } else if ksolve {
                print!("{}", geometry.to_ksolve()?);
            } else {
                println!("{}", geometry.to_kpuzzle_definition()?.to_json()?);
            }
        }
        Commands::Apply {
            puzzle,
            alg,
            options,
        } => {
            let alg = Alg::parse(&alg).wrap_err("Failed to parse the alg")?;
            let kpuzzle = geometry(&puzzle, &options.options()?)?.to_kpuzzle()?;
            let state = kpuzzle.start_state().apply_alg(&alg)?;
            info!("Applied {} moves", alg.count_moves(MoveMetric::Execution));
            println!("{}", serde_json::to_string_pretty(state.state_data())?);
        }
        Commands::List => {
            for (name, description) in PUZZLES.entries().sorted_by_key(|(name, _)| *name) {
                println!("{name:<24}{description}");
            }
        }
    }

    Ok(())
}

fn print_summary(geometry: &PuzzleGeometry) -> color_eyre::Result<()> {
    let definition = geometry.to_kpuzzle_definition()?;
    println!("{}", geometry.description());
    println!("faces: {}", geometry.face_names().iter().join(" "));
    for (name, orbit) in definition.orbits() {
        println!(
            "orbit {name}: {} pieces, {} orientations",
            orbit.num_pieces, orbit.num_orientations
        );
    }
    let excluded = geometry
        .orbit_names()
        .into_iter()
        .filter(|name| definition.orbit(name).is_none())
        .join(" ");
    if !excluded.is_empty() {
        println!("unused orbits: {excluded}");
    }

    let kpuzzle = KPuzzle::new(definition.clone());
    let turns = definition
        .turns()
        .keys()
        .map(|name| {
            let order = kpuzzle
                .move_to_transformation(&Move::new(name, 1))
                .map_or_else(|_| "?".to_owned(), |t| t.repetition_order().to_string());
            format!("{name} ({order})")
        })
        .join(" ");
    println!("turns: {turns}");
    Ok(())
}
