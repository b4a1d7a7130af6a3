use std::{
    fmt,
    num::{NonZeroU8, NonZeroU16},
    str::FromStr,
};

use itertools::Itertools;
use thiserror::Error;

use crate::definition::{
    KPuzzleDefinition, KPuzzleDefinitionError, KPuzzleDefinitionFields, KPuzzleOrbitDefinition,
    KStateOrbitData, KTransformationOrbitData,
};

/// A puzzle in the KSolve text format, which external search tools such as
/// twsearch read. Sets are orbits, and permutations are 1-indexed.
#[derive(Clone, Debug, PartialEq)]
pub struct KSolve {
    name: String,
    sets: Vec<KSolveSet>,
    solved: KSolveTransformation,
    moves: Vec<KSolveMove>,
}

/// A piece orbit of a KSolve puzzle
#[derive(Clone, Debug, PartialEq)]
pub struct KSolveSet {
    name: String,
    piece_count: NonZeroU16,
    orientation_count: NonZeroU8,
}

/// One (piece, orientation) list per set, in the order of the sets
pub type KSolveTransformation = Vec<Vec<(NonZeroU16, u8)>>;

#[derive(Clone, Debug, PartialEq)]
pub struct KSolveMove {
    transformation: KSolveTransformation,
    name: String,
}

impl KSolve {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn sets(&self) -> &[KSolveSet] {
        &self.sets
    }

    #[must_use]
    pub fn moves(&self) -> &[KSolveMove] {
        &self.moves
    }

    /// The solved state. Pieces that look alike share a value.
    #[must_use]
    pub fn solved(&self) -> &KSolveTransformation {
        &self.solved
    }
}

impl KSolveSet {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn piece_count(&self) -> NonZeroU16 {
        self.piece_count
    }

    #[must_use]
    pub fn orientation_count(&self) -> NonZeroU8 {
        self.orientation_count
    }
}

impl KSolveMove {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn transformation(&self) -> &KSolveTransformation {
        &self.transformation
    }

    /// Converts KSolve's 1-indexed permutation vectors to 0-indexed ones
    #[must_use]
    pub fn zero_indexed_transformation(&self) -> Vec<Vec<(u16, u8)>> {
        self.transformation
            .iter()
            .map(|perm_and_ori| {
                perm_and_ori
                    .iter()
                    .map(|&(p, o)| (p.get() - 1, o))
                    .collect()
            })
            .collect()
    }
}

/// A possibly invalid KSolve puzzle representation
pub struct KSolveFields {
    pub name: String,
    pub sets: Vec<KSolveSet>,
    pub solved: KSolveTransformation,
    pub moves: Vec<KSolveMove>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KSolveError {
    #[error("Invalid set count, expected {0} sets but got {1}")]
    InvalidSetCount(usize, usize),
    #[error("Invalid piece count, expected {0} pieces but got {1}")]
    InvalidPieceCount(u16, usize),
    #[error("Invalid orientation delta, expected a value between 0 and {0} but got {1}")]
    InvalidOrientationDelta(u8, u8),
    #[error("Permutation out of range, expected a value between 1 and {0} but got {1}")]
    PermutationOutOfRange(u16, u16),
    #[error("The move {0} is not a permutation")]
    InvalidMove(String),
    #[error("The orbit {0} cannot be written as a KSolve set")]
    UnsupportedOrbit(String),
    #[error("Unknown set {0}")]
    UnknownSet(String),
    #[error("Line {line}: {message}")]
    Syntax { line: usize, message: String },
    #[error(transparent)]
    Definition(#[from] KPuzzleDefinitionError),
}

fn check_transformation(
    sets: &[KSolveSet],
    transformation: &KSolveTransformation,
    must_permute: Option<&str>,
) -> Result<(), KSolveError> {
    if transformation.len() != sets.len() {
        return Err(KSolveError::InvalidSetCount(sets.len(), transformation.len()));
    }

    for (orbit, set) in transformation.iter().zip(sets) {
        let expected_piece_count = set.piece_count.get();
        if orbit.len() != expected_piece_count as usize {
            return Err(KSolveError::InvalidPieceCount(
                expected_piece_count,
                orbit.len(),
            ));
        }

        let max_orientation_delta = set.orientation_count.get() - 1;
        let mut covered_perms = vec![false; expected_piece_count as usize];

        for &(perm, orientation_delta) in orbit {
            if orientation_delta > max_orientation_delta {
                return Err(KSolveError::InvalidOrientationDelta(
                    max_orientation_delta,
                    orientation_delta,
                ));
            }

            match covered_perms.get_mut((perm.get() - 1) as usize) {
                Some(i) => *i = true,
                None => {
                    return Err(KSolveError::PermutationOutOfRange(
                        expected_piece_count,
                        perm.get(),
                    ));
                }
            }
        }

        if let Some(name) = must_permute {
            if covered_perms.iter().any(|&x| !x) {
                return Err(KSolveError::InvalidMove(name.to_owned()));
            }
        }
    }

    Ok(())
}

impl TryFrom<KSolveFields> for KSolve {
    type Error = KSolveError;

    fn try_from(ksolve_fields: KSolveFields) -> Result<Self, Self::Error> {
        check_transformation(&ksolve_fields.sets, &ksolve_fields.solved, None)?;
        for ksolve_move in &ksolve_fields.moves {
            check_transformation(
                &ksolve_fields.sets,
                &ksolve_move.transformation,
                Some(&ksolve_move.name),
            )?;
        }

        Ok(KSolve {
            name: ksolve_fields.name,
            sets: ksolve_fields.sets,
            solved: ksolve_fields.solved,
            moves: ksolve_fields.moves,
        })
    }
}

fn one_indexed(
    orbit: &str,
    values: &[usize],
    orientation: &[u8],
) -> Result<Vec<(NonZeroU16, u8)>, KSolveError> {
    values
        .iter()
        .zip(orientation)
        .map(|(&value, &o)| {
            u16::try_from(value + 1)
                .ok()
                .and_then(NonZeroU16::new)
                .map(|value| (value, o))
                .ok_or_else(|| KSolveError::UnsupportedOrbit(orbit.to_owned()))
        })
        .collect()
}

impl TryFrom<&KPuzzleDefinition> for KSolve {
    type Error = KSolveError;

    fn try_from(definition: &KPuzzleDefinition) -> Result<Self, Self::Error> {
        let sets = definition
            .orbits()
            .iter()
            .map(|(name, orbit_def)| {
                let piece_count = u16::try_from(orbit_def.num_pieces)
                    .ok()
                    .and_then(NonZeroU16::new);
                let orientation_count = NonZeroU8::new(orbit_def.num_orientations);
                match (piece_count, orientation_count) {
                    (Some(piece_count), Some(orientation_count)) => Ok(KSolveSet {
                        name: name.clone(),
                        piece_count,
                        orientation_count,
                    }),
                    _ => Err(KSolveError::UnsupportedOrbit(name.clone())),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let solved = definition
            .start_pieces()
            .iter()
            .map(|(name, data)| one_indexed(name, &data.pieces, &data.orientation))
            .collect::<Result<Vec<_>, _>>()?;

        let moves = definition
            .turns()
            .iter()
            .map(|(name, transformation)| {
                Ok(KSolveMove {
                    name: name.clone(),
                    transformation: transformation
                        .iter()
                        .map(|(orbit, data)| {
                            one_indexed(orbit, &data.permutation, &data.orientation)
                        })
                        .collect::<Result<Vec<_>, _>>()?,
                })
            })
            .collect::<Result<Vec<_>, KSolveError>>()?;

        KSolve::try_from(KSolveFields {
            name: definition.name().to_owned(),
            sets,
            solved,
            moves,
        })
    }
}

impl TryFrom<&KSolve> for KPuzzleDefinition {
    type Error = KSolveError;

    fn try_from(ksolve: &KSolve) -> Result<Self, Self::Error> {
        let zero_indexed = |orbit: &[(NonZeroU16, u8)]| {
            orbit
                .iter()
                .map(|&(p, o)| (usize::from(p.get() - 1), o))
                .unzip::<_, _, Vec<_>, Vec<_>>()
        };

        let fields = KPuzzleDefinitionFields {
            name: ksolve.name.clone(),
            orbits: ksolve
                .sets
                .iter()
                .map(|set| {
                    (
                        set.name.clone(),
                        KPuzzleOrbitDefinition {
                            num_pieces: usize::from(set.piece_count.get()),
                            num_orientations: set.orientation_count.get(),
                        },
                    )
                })
                .collect(),
            start_pieces: ksolve
                .sets
                .iter()
                .zip(&ksolve.solved)
                .map(|(set, orbit)| {
                    let (pieces, orientation) = zero_indexed(orbit);
                    (
                        set.name.clone(),
                        KStateOrbitData {
                            pieces,
                            orientation,
                        },
                    )
                })
                .collect(),
            turns: ksolve
                .moves
                .iter()
                .map(|ksolve_move| {
                    let transformation = ksolve
                        .sets
                        .iter()
                        .zip(&ksolve_move.transformation)
                        .map(|(set, orbit)| {
                            let (permutation, orientation) = zero_indexed(orbit);
                            (
                                set.name.clone(),
                                KTransformationOrbitData {
                                    permutation,
                                    orientation,
                                },
                            )
                        })
                        .collect();
                    (ksolve_move.name.clone(), transformation)
                })
                .collect(),
        };

        Ok(KPuzzleDefinition::try_from(fields)?)
    }
}

fn write_block(
    f: &mut fmt::Formatter<'_>,
    sets: &[KSolveSet],
    transformation: &KSolveTransformation,
) -> fmt::Result {
    for (set, orbit) in sets.iter().zip(transformation) {
        writeln!(f, "{}", set.name)?;
        writeln!(f, "{}", orbit.iter().map(|(p, _)| p).join(" "))?;
        if set.orientation_count.get() > 1 {
            writeln!(f, "{}", orbit.iter().map(|(_, o)| o).join(" "))?;
        }
    }
    writeln!(f, "End")
}

impl fmt::Display for KSolve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Name {}", self.name)?;
        writeln!(f)?;
        for set in &self.sets {
            writeln!(
                f,
                "Set {} {} {}",
                set.name, set.piece_count, set.orientation_count
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Solved")?;
        write_block(f, &self.sets, &self.solved)?;
        for ksolve_move in &self.moves {
            writeln!(f)?;
            writeln!(f, "Move {}", ksolve_move.name)?;
            write_block(f, &self.sets, &ksolve_move.transformation)?;
        }
        Ok(())
    }
}

struct Lines<'a> {
    lines: std::iter::Peekable<Box<dyn Iterator<Item = (usize, Vec<&'a str>)> + 'a>>,
}

impl<'a> Lines<'a> {
    fn new(source: &'a str) -> Lines<'a> {
        let lines: Box<dyn Iterator<Item = (usize, Vec<&'a str>)> + 'a> = Box::new(
            source
                .lines()
                .enumerate()
                .map(|(i, line)| (i + 1, line.split('#').next().unwrap_or_default()))
                .map(|(i, line)| (i, line.split_whitespace().collect::<Vec<_>>()))
                .filter(|(_, tokens)| !tokens.is_empty()),
        );
        Lines {
            lines: lines.peekable(),
        }
    }
}

fn syntax(line: usize, message: impl Into<String>) -> KSolveError {
    KSolveError::Syntax {
        line,
        message: message.into(),
    }
}

fn parse_numbers<T: FromStr>(line: usize, tokens: &[&str]) -> Result<Vec<T>, KSolveError> {
    tokens
        .iter()
        .map(|token| {
            token
                .parse::<T>()
                .map_err(|_| syntax(line, format!("Expected a number but found {token}")))
        })
        .collect()
}

/// Reads set entries up to `End`. Sets that are left out do not move.
fn parse_block(
    lines: &mut Lines<'_>,
    sets: &[KSolveSet],
) -> Result<KSolveTransformation, KSolveError> {
    let mut transformation = sets
        .iter()
        .map(|set| {
            (1..=set.piece_count.get())
                .filter_map(NonZeroU16::new)
                .map(|p| (p, 0))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    loop {
        let Some((line, tokens)) = lines.lines.next() else {
            return Err(syntax(0, "Missing End"));
        };
        if tokens[0] == "End" {
            return Ok(transformation);
        }

        let Some(index) = sets.iter().position(|set| set.name == tokens[0]) else {
            return Err(KSolveError::UnknownSet(tokens[0].to_owned()));
        };
        let Some((perm_line, perm_tokens)) = lines.lines.next() else {
            return Err(syntax(line, "Missing permutation"));
        };
        let permutation = parse_numbers::<u16>(perm_line, &perm_tokens)?;

        let orientation = match lines.lines.peek() {
            Some((_, tokens)) if tokens[0].parse::<u8>().is_ok() => {
                let (ori_line, ori_tokens) = lines
                    .lines
                    .next()
                    .ok_or_else(|| syntax(perm_line, "Missing orientation"))?;
                parse_numbers::<u8>(ori_line, &ori_tokens)?
            }
            _ => vec![0; permutation.len()],
        };

        if orientation.len() != permutation.len() {
            return Err(syntax(
                perm_line,
                "The permutation and orientation have different lengths",
            ));
        }

        transformation[index] = permutation
            .into_iter()
            .zip(orientation)
            .map(|(p, o)| {
                NonZeroU16::new(p)
                    .map(|p| (p, o))
                    .ok_or_else(|| syntax(perm_line, "Permutations start at 1"))
            })
            .collect::<Result<Vec<_>, _>>()?;
    }
}

impl FromStr for KSolve {
    type Err = KSolveError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        let mut lines = Lines::new(source);
        let mut name = String::new();
        let mut sets = vec![];
        let mut solved = None;
        let mut moves = vec![];

        while let Some((line, tokens)) = lines.lines.next() {
            match tokens.as_slice() {
                ["Name", rest @ ..] => name = rest.join(" "),
                ["Set", set_name, piece_count, orientation_count] => {
                    let piece_count = piece_count
                        .parse::<NonZeroU16>()
                        .map_err(|_| syntax(line, "Invalid piece count"))?;
                    let orientation_count = orientation_count
                        .parse::<NonZeroU8>()
                        .map_err(|_| syntax(line, "Invalid orientation count"))?;
                    sets.push(KSolveSet {
                        name: (*set_name).to_owned(),
                        piece_count,
                        orientation_count,
                    });
                }
                ["Solved"] => solved = Some(parse_block(&mut lines, &sets)?),
                ["Move", move_name] => {
                    let transformation = parse_block(&mut lines, &sets)?;
                    moves.push(KSolveMove {
                        transformation,
                        name: (*move_name).to_owned(),
                    });
                }
                _ => return Err(syntax(line, format!("Unexpected {}", tokens.join(" ")))),
            }
        }

        let solved = match solved {
            Some(solved) => solved,
            None => sets
                .iter()
                .map(|set| {
                    (1..=set.piece_count.get())
                        .filter_map(NonZeroU16::new)
                        .map(|p| (p, 0))
                        .collect()
                })
                .collect(),
        };

        KSolve::try_from(KSolveFields {
            name,
            sets,
            solved,
            moves,
        })
    }
}
