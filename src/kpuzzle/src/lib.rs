#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use thiserror::Error;

pub mod combine;
mod definition;
mod kpuzzle;
pub mod ksolve;
mod puzzle_orientation;
mod puzzles;
mod state;
mod transformation;

pub use definition::{
    KPuzzleDefinition, KPuzzleDefinitionError, KPuzzleDefinitionFields, KPuzzleOrbitDefinition,
    KStateData, KStateOrbitData, KTransformationData, KTransformationOrbitData,
};
pub use kpuzzle::{KPuzzle, TurnNotation};
pub use puzzle_orientation::{PuzzleOrientationCache, puzzle_orientation_index};
pub use puzzles::{cube2x2x2, cube3x3x3};
pub use state::KState;
pub use transformation::KTransformation;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KPuzzleError {
    #[error("The puzzle {puzzle} has no move {name}")]
    UnknownMove { puzzle: String, name: String },
    #[error("The puzzle {puzzle} has no orbit {orbit}")]
    UnknownOrbit { puzzle: String, orbit: String },
    #[error(
        "The puzzle {0} has indistinguishable pieces, so its states do not determine unique transformations"
    )]
    NonUniqueTransformation(String),
    #[error("The state cannot be reached from the start state of {0}")]
    UnreachableState(String),
    #[error("{operation} only supports the 3x3x3, not {puzzle}")]
    Not3x3x3 {
        operation: &'static str,
        puzzle: String,
    },
    #[error("Invalid data for the orbit {orbit} of {puzzle}")]
    InvalidOrbitData { puzzle: String, orbit: String },
    #[error("No puzzle orientation puts center {u} on U and has L index {l}")]
    InvalidOrientationIndex { u: usize, l: usize },
}
