use std::{fmt, sync::Arc};

use alg::{Alg, AlgTraversal, Commutator, Conjugate, Grouping, LineComment, Move};
use log::trace;

use crate::{
    KPuzzleError, KState, KTransformation,
    combine::identity_transformation_data,
    definition::{KPuzzleDefinition, KStateData, KTransformationData},
};

/// Puzzle-specific move syntax that the definition's turn table does not
/// spell out, such as slice prefixes or renamed grips
pub trait TurnNotation: Send + Sync {
    /// The full effect of `mv` including its amount, or `None` to fall back
    /// to looking the move up in the turn table
    fn lookup_move(&self, mv: &Move) -> Option<KTransformationData>;
}

/// A puzzle definition together with the notation used to resolve moves.
/// Cloning is cheap and clones share the definition.
#[derive(Clone)]
pub struct KPuzzle {
    definition: Arc<KPuzzleDefinition>,
    notation: Option<Arc<dyn TurnNotation>>,
}

impl fmt::Debug for KPuzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KPuzzle")
            .field("name", &self.definition.name())
            .field("notation", &self.notation.is_some())
            .finish_non_exhaustive()
    }
}

impl KPuzzle {
    #[must_use]
    pub fn new(definition: KPuzzleDefinition) -> KPuzzle {
        KPuzzle {
            definition: Arc::new(definition),
            notation: None,
        }
    }

    #[must_use]
    pub fn with_notation(self, notation: Arc<dyn TurnNotation>) -> KPuzzle {
        KPuzzle {
            definition: self.definition,
            notation: Some(notation),
        }
    }

    #[must_use]
    pub fn definition(&self) -> &KPuzzleDefinition {
        &self.definition
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.definition.name()
    }

    #[must_use]
    pub fn identity_transformation(&self) -> KTransformation {
        KTransformation::new(self.clone(), identity_transformation_data(&self.definition))
    }

    /// Resolves a move through the notation if there is one, and otherwise
    /// through the turn named by the move's quantum, repeated `amount` times
    ///
    /// # Errors
    ///
    /// Fails if neither the notation nor the turn table knows the move
    pub fn move_to_transformation(&self, mv: &Move) -> Result<KTransformation, KPuzzleError> {
        if let Some(data) = self
            .notation
            .as_ref()
            .and_then(|notation| notation.lookup_move(mv))
        {
            trace!("{mv} resolved through the notation of {}", self.name());
            return Ok(KTransformation::new(self.clone(), data));
        }

        let name = mv.quantum().to_string();
        let Some(turn) = self.definition.turns().get(&name) else {
            return Err(KPuzzleError::UnknownMove {
                puzzle: self.name().to_owned(),
                name: mv.to_string(),
            });
        };

        Ok(KTransformation::new(self.clone(), turn.clone()).self_multiply(mv.amount()))
    }

    /// # Errors
    ///
    /// Fails on the first move the puzzle does not know
    pub fn alg_to_transformation(&self, alg: &Alg) -> Result<KTransformation, KPuzzleError> {
        AlgToTransformation { kpuzzle: self }.traverse_alg(alg, ())
    }

    #[must_use]
    pub fn start_state(&self) -> KState {
        KState::new(self.clone(), self.definition.start_pieces().clone())
    }

    /// The solved pattern, which is the start state
    #[must_use]
    pub fn default_pattern(&self) -> KState {
        self.start_state()
    }

    /// Wraps raw state data, checking it against the definition
    ///
    /// # Errors
    ///
    /// Fails if an orbit is unknown, has the wrong number of pieces, holds a
    /// piece or orientation out of range, or repeats a piece in an orbit
    /// whose pieces start out distinct
    pub fn state_from_data(&self, data: KStateData) -> Result<KState, KPuzzleError> {
        for (orbit, orbit_data) in &data {
            let Some(orbit_def) = self.definition.orbit(orbit) else {
                return Err(KPuzzleError::UnknownOrbit {
                    puzzle: self.name().to_owned(),
                    orbit: orbit.clone(),
                });
            };
            let distinct_start = self
                .definition
                .start_pieces()
                .get(orbit)
                .is_some_and(|start| all_distinct(&start.pieces));
            if orbit_data.pieces.len() != orbit_def.num_pieces
                || orbit_data.orientation.len() != orbit_def.num_pieces
                || orbit_data
                    .orientation
                    .iter()
                    .any(|&o| o >= orbit_def.num_orientations)
                || orbit_data.pieces.iter().any(|&p| p >= orbit_def.num_pieces)
                || (distinct_start && !all_distinct(&orbit_data.pieces))
            {
                return Err(KPuzzleError::InvalidOrbitData {
                    puzzle: self.name().to_owned(),
                    orbit: orbit.clone(),
                });
            }
        }
        if let Some(orbit) = self
            .definition
            .orbits()
            .keys()
            .find(|orbit| !data.contains_key(*orbit))
        {
            return Err(KPuzzleError::UnknownOrbit {
                puzzle: self.name().to_owned(),
                orbit: orbit.clone(),
            });
        }
        Ok(KState::new(self.clone(), data))
    }

    /// Whether every state corresponds to exactly one transformation, which
    /// holds when no two pieces of an orbit start out indistinguishable
    #[must_use]
    pub fn can_convert_state_to_unique_transformation(&self) -> bool {
        self.definition
            .start_pieces()
            .values()
            .all(|orbit| all_distinct(&orbit.pieces))
    }
}

/// Whether the pieces are distinct values below their count
fn all_distinct(pieces: &[usize]) -> bool {
    let mut seen = vec![false; pieces.len()];
    pieces.iter().all(|&piece| match seen.get_mut(piece) {
        Some(slot) => !std::mem::replace(slot, true),
        None => false,
    })
}

struct AlgToTransformation<'a> {
    kpuzzle: &'a KPuzzle,
}

type TransformationResult = Result<KTransformation, KPuzzleError>;

impl AlgTraversal for AlgToTransformation<'_> {
    type Data = ();
    type Output = TransformationResult;

    fn traverse_alg(&mut self, alg: &Alg, (): ()) -> TransformationResult {
        let mut transformation = self.kpuzzle.identity_transformation();
        for unit in alg.units() {
            transformation = transformation.apply_transformation(&self.traverse_unit(unit, ())?);
        }
        Ok(transformation)
    }

    fn traverse_move(&mut self, mv: &Move, (): ()) -> TransformationResult {
        self.kpuzzle.move_to_transformation(mv)
    }

    fn traverse_grouping(&mut self, grouping: &Grouping, (): ()) -> TransformationResult {
        Ok(self
            .traverse_alg(grouping.alg(), ())?
            .self_multiply(grouping.amount()))
    }

    fn traverse_commutator(&mut self, commutator: &Commutator, (): ()) -> TransformationResult {
        let a = self.traverse_alg(commutator.a(), ())?;
        let b = self.traverse_alg(commutator.b(), ())?;
        Ok(a
            .apply_transformation(&b)
            .apply_transformation(&a.invert())
            .apply_transformation(&b.invert())
            .self_multiply(commutator.amount()))
    }

    fn traverse_conjugate(&mut self, conjugate: &Conjugate, (): ()) -> TransformationResult {
        let a = self.traverse_alg(conjugate.a(), ())?;
        let b = self.traverse_alg(conjugate.b(), ())?;
        Ok(a
            .apply_transformation(&b)
            .apply_transformation(&a.invert())
            .self_multiply(conjugate.amount()))
    }

    fn traverse_pause(&mut self, (): ()) -> TransformationResult {
        Ok(self.kpuzzle.identity_transformation())
    }

    fn traverse_newline(&mut self, (): ()) -> TransformationResult {
        Ok(self.kpuzzle.identity_transformation())
    }

    fn traverse_line_comment(&mut self, _: &LineComment, (): ()) -> TransformationResult {
        Ok(self.kpuzzle.identity_transformation())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use alg::Alg;

    use super::*;
    use crate::{
        KPuzzleDefinitionFields, KPuzzleOrbitDefinition, KStateOrbitData, cube3x3x3,
    };

    #[test]
    fn unknown_moves_are_rejected() {
        let kpuzzle = cube3x3x3();
        let error = kpuzzle
            .alg_to_transformation(&Alg::parse("R Q2").unwrap())
            .unwrap_err();
        assert_eq!(
            error,
            KPuzzleError::UnknownMove {
                puzzle: "3x3x3".to_owned(),
                name: "Q2".to_owned(),
            }
        );
    }

    #[test]
    fn containers_match_their_expansion() {
        let kpuzzle = cube3x3x3();
        for source in ["[R, U]", "[R U: F2]2'", "(R U' L)3 . F", "[[R: U], D]'"] {
            let alg = Alg::parse(source).unwrap();
            let direct = kpuzzle.alg_to_transformation(&alg).unwrap();
            let expanded = kpuzzle.alg_to_transformation(&alg.expand(None)).unwrap();
            assert!(direct.is_identical(&expanded), "{source}");
        }
    }

    struct Doubled;

    impl TurnNotation for Doubled {
        fn lookup_move(&self, mv: &Move) -> Option<KTransformationData> {
            if mv.family() != "T" {
                return None;
            }
            cube3x3x3()
                .move_to_transformation(&Move::new("R", 2 * mv.amount()))
                .ok()
                .map(|transformation| transformation.transformation_data().clone())
        }
    }

    #[test]
    fn notation_takes_precedence() {
        let kpuzzle = cube3x3x3().with_notation(Arc::new(Doubled));
        let t = kpuzzle.move_to_transformation(&Move::new("T", 1)).unwrap();
        let r2 = kpuzzle.move_to_transformation(&Move::new("R", 2)).unwrap();
        assert!(t.is_identical(&r2));
    }

    #[test]
    fn uniqueness() {
        assert!(cube3x3x3().can_convert_state_to_unique_transformation());
    }

    #[test]
    fn state_data_is_checked() {
        let kpuzzle = cube3x3x3();
        let data = kpuzzle.start_state().state_data().clone();
        assert!(kpuzzle.state_from_data(data.clone()).is_ok());

        let mut twisted = data.clone();
        twisted.get_mut("EDGES").unwrap().orientation[0] = 2;
        assert!(matches!(
            kpuzzle.state_from_data(twisted),
            Err(KPuzzleError::InvalidOrbitData { .. })
        ));

        let mut repeated = data.clone();
        repeated.get_mut("CENTERS").unwrap().pieces = vec![0, 1, 2, 3, 4, 0];
        assert!(matches!(
            kpuzzle.state_from_data(repeated),
            Err(KPuzzleError::InvalidOrbitData { orbit, .. }) if orbit == "CENTERS"
        ));

        let mut out_of_range = data;
        out_of_range.get_mut("CORNERS").unwrap().pieces[3] = 8;
        assert!(kpuzzle.state_from_data(out_of_range).is_err());
    }

    #[test]
    fn look_alike_pieces_may_repeat() {
        let definition = KPuzzleDefinition::try_from(KPuzzleDefinitionFields {
            name: "swap".to_owned(),
            orbits: [(
                "PIECES".to_owned(),
                KPuzzleOrbitDefinition {
                    num_pieces: 3,
                    num_orientations: 1,
                },
            )]
            .into_iter()
            .collect(),
            start_pieces: [(
                "PIECES".to_owned(),
                KStateOrbitData {
                    pieces: vec![0, 0, 1],
                    orientation: vec![0; 3],
                },
            )]
            .into_iter()
            .collect(),
            turns: BTreeMap::new(),
        })
        .unwrap();
        let kpuzzle = KPuzzle::new(definition);
        assert!(!kpuzzle.can_convert_state_to_unique_transformation());

        let state = |pieces: Vec<usize>| {
            kpuzzle.state_from_data(
                [(
                    "PIECES".to_owned(),
                    KStateOrbitData {
                        pieces,
                        orientation: vec![0; 3],
                    },
                )]
                .into_iter()
                .collect(),
            )
        };
        assert!(state(vec![1, 0, 0]).is_ok());
        assert!(state(vec![0, 3, 0]).is_err());
    }
}
