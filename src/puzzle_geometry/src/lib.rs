#![warn(clippy::pedantic)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::float_cmp)]

//! Derives combinatorial twisty puzzles from a Platonic solid and a set of
//! planar cuts: the piece orbits, the turns and how they permute pieces,
//! and the names people use for them.

use kpuzzle::{KPuzzleDefinitionError, ksolve::KSolveError};
use thiserror::Error;

mod cache;
mod description;
mod events;
mod generator;
mod naming;
pub mod notation;
mod options;
mod output;
pub mod platonic;
pub mod quat;
mod shapes;
mod swizzler;
mod turns;

pub use cache::{PuzzleGeometryCache, get_puzzle_geometry_by_desc, get_puzzle_geometry_by_name};
pub use description::{PuzzleBaseShape, PuzzleCutDescription, PuzzleCutType, PuzzleDescription};
pub use events::{EventInfo, event_info, wca_event_info};
pub use generator::PuzzleGeometry;
pub use options::PuzzleGeometryOptions;
pub use quat::Quat;
pub use shapes::{PUZZLES, puzzle_description};
pub use swizzler::FaceNameSwizzler;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PuzzleGeometryError {
    #[error("Bad shape argument {0}")]
    BadShape(String),
    #[error("Bad cut argument {0}")]
    BadCut(String),
    #[error("Bad cut distance {0}")]
    BadCutDistance(String),
    #[error("Odd argument count in the puzzle description {0:?}: every cut needs a type and a distance")]
    BadArgumentCount(String),
    #[error("There is no puzzle named {0}")]
    UnknownPuzzle(String),
    #[error("Bad turn {0}")]
    BadTurn(String),
    #[error("Bad grip in turn {0}")]
    BadGrip(String),
    #[error("Cannot use a prefix with the full puzzle rotation {0}")]
    PrefixWithRotation(String),
    #[error("Bad slice spec {lo} {hi} in turn {turn}")]
    BadSliceSpec { turn: String, lo: i64, hi: i64 },
    #[error("The turn {0} moves the whole puzzle; full puzzle rotations must be written with a v suffix")]
    FullPuzzleRotation(String),
    #[error("Redundant turns named {0}")]
    RedundantTurns(String),
    #[error("The cuts produce degenerate geometry: {0}")]
    DegenerateGeometry(String),
    #[error("The face naming net is inconsistent: {0}")]
    BadNet(String),
    #[error("The puzzle has no {0:?} piece to hold fixed")]
    NoPieceToFix(PuzzleCutType),
    #[error("An axis with {0} slices has too many to turn")]
    TooManySlices(usize),
    #[error(transparent)]
    Definition(#[from] KPuzzleDefinitionError),
    #[error(transparent)]
    KSolve(#[from] KSolveError),
}
