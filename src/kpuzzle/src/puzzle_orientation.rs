use std::sync::{LazyLock, OnceLock};

use alg::Move;
use log::debug;

use crate::{KPuzzle, KPuzzleError, KState, KTransformation, cube3x3x3};

pub(crate) fn require_3x3x3(state: &KState, operation: &'static str) -> Result<(), KPuzzleError> {
    if state.kpuzzle().name() == "3x3x3" {
        Ok(())
    } else {
        Err(KPuzzleError::Not3x3x3 {
            operation,
            puzzle: state.kpuzzle().name().to_owned(),
        })
    }
}

/// Identifies the orientation of a whole 3x3x3 by the center on U and the
/// center on L. The L index only counts the four centers that are neither on
/// U nor on D, so it is always below 4.
///
/// # Errors
///
/// Fails if the puzzle is not the 3x3x3, or if its U, D and L centers are
/// not three different centers
pub fn puzzle_orientation_index(state: &KState) -> Result<(usize, usize), KPuzzleError> {
    require_3x3x3(state, "puzzle_orientation_index")?;

    let center = |slot: usize| {
        state
            .state_data()
            .get("CENTERS")
            .and_then(|centers| centers.pieces.get(slot).copied())
            .ok_or_else(|| KPuzzleError::UnknownOrbit {
                puzzle: state.kpuzzle().name().to_owned(),
                orbit: "CENTERS".to_owned(),
            })
    };

    let u = center(0)?;
    let d = center(5)?;
    let unadjusted_l = center(1)?;
    let below = usize::from(u < unadjusted_l) + usize::from(d < unadjusted_l);
    unadjusted_l
        .checked_sub(below)
        .filter(|_| u != d && u != unadjusted_l && d != unadjusted_l)
        .map(|l| (u, l))
        .ok_or(KPuzzleError::InvalidOrientationIndex { u, l: unadjusted_l })
}

type OrientationTable = [[Option<KTransformation>; 4]; 6];

/// For every orientation index, the rotation that brings a 3x3x3 in that
/// orientation back to the standard one. Built on first use.
pub struct PuzzleOrientationCache {
    kpuzzle: KPuzzle,
    table: OnceLock<Result<OrientationTable, KPuzzleError>>,
}

static CUBE_3X3X3_ORIENTATIONS: LazyLock<PuzzleOrientationCache> =
    LazyLock::new(|| PuzzleOrientationCache::new(cube3x3x3()));

impl PuzzleOrientationCache {
    #[must_use]
    pub fn new(kpuzzle: KPuzzle) -> PuzzleOrientationCache {
        PuzzleOrientationCache {
            kpuzzle,
            table: OnceLock::new(),
        }
    }

    /// The shared cache for the built-in 3x3x3
    #[must_use]
    pub fn cube3x3x3() -> &'static PuzzleOrientationCache {
        &CUBE_3X3X3_ORIENTATIONS
    }

    fn build(&self) -> Result<OrientationTable, KPuzzleError> {
        let mut table = OrientationTable::default();
        let y = Move::new("y", 1);
        let setups = [
            None,
            Some(Move::new("z", 1)),
            Some(Move::new("x", 1)),
            Some(Move::new("z", -1)),
            Some(Move::new("x", -1)),
            Some(Move::new("x", 2)),
        ];
        for setup in setups {
            let mut transformation = match setup {
                Some(setup) => self.kpuzzle.move_to_transformation(&setup)?,
                None => self.kpuzzle.identity_transformation(),
            };
            for _ in 0..4 {
                transformation = transformation.apply_move(&y)?;
                let (u, l) = puzzle_orientation_index(&transformation.to_kstate())?;
                table[u][l] = Some(transformation.invert());
            }
        }
        debug!("Built the puzzle orientation table for {}", self.kpuzzle.name());
        Ok(table)
    }

    fn lookup(&self, u: usize, l: usize) -> Result<&KTransformation, KPuzzleError> {
        let table = self
            .table
            .get_or_init(|| self.build())
            .as_ref()
            .map_err(Clone::clone)?;
        table
            .get(u)
            .and_then(|row| row.get(l))
            .and_then(Option::as_ref)
            .ok_or(KPuzzleError::InvalidOrientationIndex { u, l })
    }

    /// Rotates the whole puzzle so that its centers are in the standard
    /// orientation
    ///
    /// # Errors
    ///
    /// Fails if the puzzle is not the 3x3x3
    pub fn normalize(&self, state: &KState) -> Result<KState, KPuzzleError> {
        let (u, l) = puzzle_orientation_index(state)?;
        Ok(state.apply_transformation(self.lookup(u, l)?))
    }

    /// Rotates a state in the standard orientation to the given orientation
    /// index
    ///
    /// # Errors
    ///
    /// Fails if the puzzle is not the 3x3x3 or if the index does not exist
    pub fn reorient(&self, state: &KState, u: usize, l: usize) -> Result<KState, KPuzzleError> {
        require_3x3x3(state, "reorient")?;
        Ok(state.apply_transformation(&self.lookup(u, l)?.invert()))
    }
}
