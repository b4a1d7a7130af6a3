use std::sync::Arc;

use alg::{Alg, Move};

use crate::{
    KPuzzle, KPuzzleError, KTransformation, PuzzleOrientationCache,
    combine::apply_transformation_data_to_state_data,
    definition::{KStateData, KTransformationData, KTransformationOrbitData},
};

/// An absolute configuration of a puzzle
#[derive(Clone, Debug)]
pub struct KState {
    kpuzzle: KPuzzle,
    data: Arc<KStateData>,
}

impl KState {
    pub(crate) fn new(kpuzzle: KPuzzle, data: KStateData) -> KState {
        KState {
            kpuzzle,
            data: Arc::new(data),
        }
    }

    #[must_use]
    pub fn from_transformation(transformation: &KTransformation) -> KState {
        transformation.to_kstate()
    }

    #[must_use]
    pub fn kpuzzle(&self) -> &KPuzzle {
        &self.kpuzzle
    }

    #[must_use]
    pub fn state_data(&self) -> &KStateData {
        &self.data
    }

    /// Applying the identity shares this state's data rather than copying it
    #[must_use]
    pub fn apply_transformation(&self, transformation: &KTransformation) -> KState {
        if transformation.is_identity_transformation() {
            return self.clone();
        }
        KState::new(
            self.kpuzzle.clone(),
            apply_transformation_data_to_state_data(
                self.kpuzzle.definition(),
                &self.data,
                transformation.transformation_data(),
            ),
        )
    }

    /// # Errors
    ///
    /// Fails if the puzzle does not know the move
    pub fn apply_move(&self, mv: &Move) -> Result<KState, KPuzzleError> {
        Ok(self.apply_transformation(&self.kpuzzle.move_to_transformation(mv)?))
    }

    /// # Errors
    ///
    /// Fails on the first move the puzzle does not know
    pub fn apply_alg(&self, alg: &Alg) -> Result<KState, KPuzzleError> {
        Ok(self.apply_transformation(&self.kpuzzle.alg_to_transformation(alg)?))
    }

    #[must_use]
    pub fn is_identical(&self, other: &KState) -> bool {
        Arc::ptr_eq(&self.data, &other.data) || self.data == other.data
    }

    /// The transformation that takes the start state to this state
    ///
    /// # Errors
    ///
    /// Fails if the puzzle has indistinguishable pieces, or if this state
    /// holds pieces that the start state does not
    pub fn experimental_to_transformation(&self) -> Result<KTransformation, KPuzzleError> {
        if !self.kpuzzle.can_convert_state_to_unique_transformation() {
            return Err(KPuzzleError::NonUniqueTransformation(
                self.kpuzzle.name().to_owned(),
            ));
        }

        let unreachable = || KPuzzleError::UnreachableState(self.kpuzzle.name().to_owned());
        let definition = self.kpuzzle.definition();
        let mut transformation = KTransformationData::new();
        for (orbit, start) in definition.start_pieces() {
            let state = self.data.get(orbit).ok_or_else(unreachable)?;
            let orientations = definition
                .orbit(orbit)
                .map_or(1, |orbit_def| orbit_def.num_orientations.max(1));

            let mut slot_of_piece = vec![None; start.pieces.len()];
            for (slot, &piece) in start.pieces.iter().enumerate() {
                slot_of_piece[piece] = Some(slot);
            }

            let mut used = vec![false; start.pieces.len()];
            let mut permutation = Vec::with_capacity(state.pieces.len());
            let mut orientation = Vec::with_capacity(state.pieces.len());
            for (&piece, &piece_orientation) in state.pieces.iter().zip(&state.orientation) {
                let source = slot_of_piece
                    .get(piece)
                    .copied()
                    .flatten()
                    .ok_or_else(unreachable)?;
                if std::mem::replace(&mut used[source], true) {
                    return Err(unreachable());
                }
                permutation.push(source);
                orientation.push(
                    (piece_orientation % orientations + orientations
                        - start.orientation[source] % orientations)
                        % orientations,
                );
            }

            transformation.insert(
                orbit.clone(),
                KTransformationOrbitData {
                    permutation,
                    orientation,
                },
            );
        }

        Ok(KTransformation::new(self.kpuzzle.clone(), transformation))
    }

    /// Whether this 3x3x3 state is solved, optionally up to whole-cube
    /// rotation and up to the twist of the centers
    ///
    /// # Errors
    ///
    /// Fails if the puzzle is not the 3x3x3
    pub fn experimental_is_3x3x3_solved(
        &self,
        ignore_puzzle_orientation: bool,
        ignore_center_orientation: bool,
    ) -> Result<bool, KPuzzleError> {
        let state = if ignore_puzzle_orientation {
            PuzzleOrientationCache::cube3x3x3().normalize(self)?
        } else {
            crate::puzzle_orientation::require_3x3x3(self, "experimental_is_3x3x3_solved")?;
            self.clone()
        };

        let start = self.kpuzzle.definition().start_pieces();
        Ok(state.data.iter().all(|(orbit, data)| {
            start.get(orbit).is_some_and(|start| {
                data.pieces == start.pieces
                    && ((ignore_center_orientation && orbit == "CENTERS")
                        || data.orientation == start.orientation)
            })
        }))
    }
}

#[cfg(test)]
mod tests {
    use alg::{Alg, parse_move};

    use super::*;
    use crate::cube3x3x3;

    #[test]
    fn u_then_inverse_returns_to_start() {
        let start = cube3x3x3().start_state();
        let u = start.apply_move(&parse_move("U").unwrap()).unwrap();
        assert_eq!(u.state_data()["EDGES"].pieces[0], 1);
        assert!(!u.is_identical(&start));

        let back = u.apply_move(&parse_move("U'").unwrap()).unwrap();
        assert_eq!(back.state_data(), start.state_data());
    }

    #[test]
    fn identity_shares_data() {
        let start = cube3x3x3().start_state();
        let same = start.apply_alg(&Alg::parse("R R'").unwrap()).unwrap();
        assert!(Arc::ptr_eq(&start.data, &same.data));
    }

    #[test]
    fn state_to_transformation() {
        let kpuzzle = cube3x3x3();
        let t = kpuzzle
            .alg_to_transformation(&Alg::parse("R U2 F' x M").unwrap())
            .unwrap();
        let recovered = t.to_kstate().experimental_to_transformation().unwrap();
        assert!(recovered.is_identical(&t));
    }

    #[test]
    fn solved_checks() {
        let kpuzzle = cube3x3x3();
        let start = kpuzzle.start_state();
        assert!(start.experimental_is_3x3x3_solved(false, false).unwrap());

        let rotated = start.apply_alg(&Alg::parse("x y2").unwrap()).unwrap();
        assert!(!rotated.experimental_is_3x3x3_solved(false, false).unwrap());
        assert!(rotated.experimental_is_3x3x3_solved(true, false).unwrap());

        let twisted = start.apply_alg(&Alg::parse("(R U R' U')6").unwrap()).unwrap();
        assert!(twisted.experimental_is_3x3x3_solved(false, false).unwrap());

        let mut data = start.state_data().clone();
        data.get_mut("CENTERS").unwrap().orientation[0] = 2;
        let centers = kpuzzle.state_from_data(data).unwrap();
        assert!(!centers.experimental_is_3x3x3_solved(false, false).unwrap());
        assert!(centers.experimental_is_3x3x3_solved(false, true).unwrap());

        let scrambled = start.apply_alg(&Alg::parse("R U").unwrap()).unwrap();
        assert!(!scrambled.experimental_is_3x3x3_solved(true, true).unwrap());
    }
}
