use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The effect of a transformation on one orbit. Slot `i` receives the piece
/// that was in slot `permutation[i]`, and its orientation is increased by
/// `orientation[i]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KTransformationOrbitData {
    pub permutation: Vec<usize>,
    pub orientation: Vec<u8>,
}

/// Which piece sits in each slot of an orbit, and how it is oriented
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KStateOrbitData {
    pub pieces: Vec<usize>,
    pub orientation: Vec<u8>,
}

pub type KTransformationData = BTreeMap<String, KTransformationOrbitData>;
pub type KStateData = BTreeMap<String, KStateOrbitData>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KPuzzleOrbitDefinition {
    pub num_pieces: usize,
    #[serde(rename = "orientations")]
    pub num_orientations: u8,
}

/// A validated puzzle definition. Every orbit named by the start state or a
/// turn is declared, and every array has the length the orbit declares.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "KPuzzleDefinitionFields")]
pub struct KPuzzleDefinition {
    name: String,
    orbits: BTreeMap<String, KPuzzleOrbitDefinition>,
    start_pieces: KStateData,
    turns: BTreeMap<String, KTransformationData>,
}

impl KPuzzleDefinition {
    /// Assembles a definition from parts that are known to be consistent
    pub(crate) fn from_parts(
        name: String,
        orbits: BTreeMap<String, KPuzzleOrbitDefinition>,
        start_pieces: KStateData,
        turns: BTreeMap<String, KTransformationData>,
    ) -> KPuzzleDefinition {
        KPuzzleDefinition {
            name,
            orbits,
            start_pieces,
            turns,
        }
    }

    pub(crate) fn extend_turns(&mut self, turns: BTreeMap<String, KTransformationData>) {
        self.turns.extend(turns);
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn orbits(&self) -> &BTreeMap<String, KPuzzleOrbitDefinition> {
        &self.orbits
    }

    #[must_use]
    pub fn orbit(&self, name: &str) -> Option<&KPuzzleOrbitDefinition> {
        self.orbits.get(name)
    }

    #[must_use]
    pub fn start_pieces(&self) -> &KStateData {
        &self.start_pieces
    }

    #[must_use]
    pub fn turns(&self) -> &BTreeMap<String, KTransformationData> {
        &self.turns
    }

    /// Parses and validates a definition from its JSON interchange form
    ///
    /// # Errors
    ///
    /// Fails if the JSON is malformed or describes an invalid definition
    pub fn from_json(json: &str) -> Result<KPuzzleDefinition, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// # Errors
    ///
    /// Serialization of a validated definition only fails if the writer does
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// A possibly invalid puzzle definition
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KPuzzleDefinitionFields {
    pub name: String,
    pub orbits: BTreeMap<String, KPuzzleOrbitDefinition>,
    pub start_pieces: KStateData,
    pub turns: BTreeMap<String, KTransformationData>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KPuzzleDefinitionError {
    #[error("The orbit {orbit} must have at least one orientation")]
    NoOrientations { orbit: String },
    #[error("{context} is missing the orbit {orbit}")]
    MissingOrbit { context: String, orbit: String },
    #[error("{context} names the orbit {orbit}, which the definition does not declare")]
    UndeclaredOrbit { context: String, orbit: String },
    #[error("Invalid piece count in {context} for {orbit}, expected {expected} pieces but got {actual}")]
    InvalidPieceCount {
        context: String,
        orbit: String,
        expected: usize,
        actual: usize,
    },
    #[error("Invalid orientation in {context} for {orbit}, expected a value below {orientations} but got {actual}")]
    InvalidOrientation {
        context: String,
        orbit: String,
        orientations: u8,
        actual: u8,
    },
    #[error("Piece out of range in {context} for {orbit}, expected a value below {pieces} but got {actual}")]
    PieceOutOfRange {
        context: String,
        orbit: String,
        pieces: usize,
        actual: usize,
    },
    #[error("The turn {turn} does not permute the orbit {orbit}")]
    NotAPermutation { turn: String, orbit: String },
}

fn check_orbit_names<'a>(
    orbits: &BTreeMap<String, KPuzzleOrbitDefinition>,
    context: &str,
    names: impl Iterator<Item = &'a String> + Clone,
) -> Result<(), KPuzzleDefinitionError> {
    if let Some(orbit) = names.clone().find(|name| !orbits.contains_key(*name)) {
        return Err(KPuzzleDefinitionError::UndeclaredOrbit {
            context: context.to_owned(),
            orbit: orbit.clone(),
        });
    }
    if let Some(orbit) = orbits
        .keys()
        .find(|orbit| !names.clone().any(|name| name == *orbit))
    {
        return Err(KPuzzleDefinitionError::MissingOrbit {
            context: context.to_owned(),
            orbit: orbit.clone(),
        });
    }
    Ok(())
}

fn check_lengths(
    context: &str,
    orbit: &str,
    expected: usize,
    lengths: [usize; 2],
) -> Result<(), KPuzzleDefinitionError> {
    match lengths.into_iter().find(|&actual| actual != expected) {
        Some(actual) => Err(KPuzzleDefinitionError::InvalidPieceCount {
            context: context.to_owned(),
            orbit: orbit.to_owned(),
            expected,
            actual,
        }),
        None => Ok(()),
    }
}

fn check_orientations(
    context: &str,
    orbit: &str,
    orientations: u8,
    values: &[u8],
) -> Result<(), KPuzzleDefinitionError> {
    match values.iter().find(|&&value| value >= orientations) {
        Some(&actual) => Err(KPuzzleDefinitionError::InvalidOrientation {
            context: context.to_owned(),
            orbit: orbit.to_owned(),
            orientations,
            actual,
        }),
        None => Ok(()),
    }
}

impl TryFrom<KPuzzleDefinitionFields> for KPuzzleDefinition {
    type Error = KPuzzleDefinitionError;

    fn try_from(fields: KPuzzleDefinitionFields) -> Result<Self, Self::Error> {
        for (orbit, orbit_def) in &fields.orbits {
            if orbit_def.num_orientations == 0 {
                return Err(KPuzzleDefinitionError::NoOrientations {
                    orbit: orbit.clone(),
                });
            }
        }

        check_orbit_names(&fields.orbits, "The start state", fields.start_pieces.keys())?;
        for (orbit, data) in &fields.start_pieces {
            let orbit_def = fields.orbits[orbit];
            let context = "The start state";
            check_lengths(
                context,
                orbit,
                orbit_def.num_pieces,
                [data.pieces.len(), data.orientation.len()],
            )?;
            check_orientations(context, orbit, orbit_def.num_orientations, &data.orientation)?;
            if let Some(&actual) = data.pieces.iter().find(|&&p| p >= orbit_def.num_pieces) {
                return Err(KPuzzleDefinitionError::PieceOutOfRange {
                    context: context.to_owned(),
                    orbit: orbit.clone(),
                    pieces: orbit_def.num_pieces,
                    actual,
                });
            }
        }

        for (turn, transformation) in &fields.turns {
            let context = format!("The turn {turn}");
            check_orbit_names(&fields.orbits, &context, transformation.keys())?;

            for (orbit, data) in transformation {
                let orbit_def = fields.orbits[orbit];
                check_lengths(
                    &context,
                    orbit,
                    orbit_def.num_pieces,
                    [data.permutation.len(), data.orientation.len()],
                )?;
                check_orientations(
                    &context,
                    orbit,
                    orbit_def.num_orientations,
                    &data.orientation,
                )?;

                let mut covered = vec![false; orbit_def.num_pieces];
                for &source in &data.permutation {
                    match covered.get_mut(source) {
                        Some(slot) => *slot = true,
                        None => {
                            return Err(KPuzzleDefinitionError::PieceOutOfRange {
                                context,
                                orbit: orbit.clone(),
                                pieces: orbit_def.num_pieces,
                                actual: source,
                            });
                        }
                    }
                }
                if covered.iter().any(|&x| !x) {
                    return Err(KPuzzleDefinitionError::NotAPermutation {
                        turn: turn.clone(),
                        orbit: orbit.clone(),
                    });
                }
            }
        }

        Ok(KPuzzleDefinition {
            name: fields.name,
            orbits: fields.orbits,
            start_pieces: fields.start_pieces,
            turns: fields.turns,
        })
    }
}
