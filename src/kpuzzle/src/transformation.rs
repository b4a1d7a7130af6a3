use std::sync::Arc;

use alg::{Alg, Move};
use bnum::types::U512;

use crate::{
    KPuzzle, KPuzzleError, KState,
    combine::{
        combine_transformation_data, invert_transformation_data, is_identity_transformation_data,
        self_multiply_transformation_data,
    },
    definition::KTransformationData,
};

/// The effect of a move or alg on a puzzle, independent of any state
#[derive(Clone, Debug)]
pub struct KTransformation {
    kpuzzle: KPuzzle,
    data: Arc<KTransformationData>,
}

fn gcd(mut a: U512, mut b: U512) -> U512 {
    loop {
        if b == U512::ZERO {
            return a;
        }

        let rem = a.rem_euclid(b);
        a = b;
        b = rem;
    }
}

fn lcm(a: U512, b: U512) -> U512 {
    b / gcd(a, b) * a
}

impl KTransformation {
    pub(crate) fn new(kpuzzle: KPuzzle, data: KTransformationData) -> KTransformation {
        KTransformation {
            kpuzzle,
            data: Arc::new(data),
        }
    }

    #[must_use]
    pub fn kpuzzle(&self) -> &KPuzzle {
        &self.kpuzzle
    }

    #[must_use]
    pub fn transformation_data(&self) -> &KTransformationData {
        &self.data
    }

    /// This transformation followed by `other`
    #[must_use]
    pub fn apply_transformation(&self, other: &KTransformation) -> KTransformation {
        if other.is_identity_transformation() {
            return self.clone();
        }
        if self.is_identity_transformation() {
            return KTransformation {
                kpuzzle: self.kpuzzle.clone(),
                data: Arc::clone(&other.data),
            };
        }
        KTransformation::new(
            self.kpuzzle.clone(),
            combine_transformation_data(self.kpuzzle.definition(), &self.data, &other.data),
        )
    }

    /// # Errors
    ///
    /// Fails if the puzzle does not know the move
    pub fn apply_move(&self, mv: &Move) -> Result<KTransformation, KPuzzleError> {
        Ok(self.apply_transformation(&self.kpuzzle.move_to_transformation(mv)?))
    }

    /// # Errors
    ///
    /// Fails on the first move the puzzle does not know
    pub fn apply_alg(&self, alg: &Alg) -> Result<KTransformation, KPuzzleError> {
        Ok(self.apply_transformation(&self.kpuzzle.alg_to_transformation(alg)?))
    }

    #[must_use]
    pub fn invert(&self) -> KTransformation {
        KTransformation::new(
            self.kpuzzle.clone(),
            invert_transformation_data(self.kpuzzle.definition(), &self.data),
        )
    }

    #[must_use]
    pub fn is_identity_transformation(&self) -> bool {
        is_identity_transformation_data(&self.data)
    }

    #[must_use]
    pub fn is_identical(&self, other: &KTransformation) -> bool {
        Arc::ptr_eq(&self.data, &other.data) || self.data == other.data
    }

    #[must_use]
    pub fn self_multiply(&self, amount: i32) -> KTransformation {
        if amount == 1 {
            return self.clone();
        }
        KTransformation::new(
            self.kpuzzle.clone(),
            self_multiply_transformation_data(self.kpuzzle.definition(), &self.data, amount),
        )
    }

    /// The number of times this transformation must be repeated to return to
    /// the identity, counting orientation
    #[must_use]
    pub fn repetition_order(&self) -> U512 {
        let mut order = U512::ONE;
        for (orbit, data) in self.data.iter() {
            let orientations = self
                .kpuzzle
                .definition()
                .orbit(orbit)
                .map_or(1, |orbit_def| u64::from(orbit_def.num_orientations.max(1)));
            let orientations = U512::from_digit(orientations);

            let mut seen = vec![false; data.permutation.len()];
            for start in 0..data.permutation.len() {
                if seen[start] {
                    continue;
                }

                let mut length = 0;
                let mut twist = 0;
                let mut i = start;
                while !seen[i] {
                    seen[i] = true;
                    length += 1;
                    twist += u64::from(data.orientation[i]);
                    i = data.permutation[i];
                }

                let twist = U512::from_digit(twist).rem_euclid(orientations);
                let cycle_order =
                    U512::from_digit(length) * (orientations / gcd(twist, orientations));
                order = lcm(order, cycle_order);
            }
        }
        order
    }

    /// The state reached by applying this transformation to the start state
    #[must_use]
    pub fn to_kstate(&self) -> KState {
        self.kpuzzle.start_state().apply_transformation(self)
    }
}

#[cfg(test)]
mod tests {
    use alg::Alg;

    use super::*;
    use crate::cube3x3x3;

    fn transformation(source: &str) -> KTransformation {
        cube3x3x3()
            .alg_to_transformation(&Alg::parse(source).unwrap())
            .unwrap()
    }

    #[test]
    fn identity_is_neutral() {
        let t = transformation("R U F' D2");
        let identity = cube3x3x3().identity_transformation();
        assert!(t.apply_transformation(&identity).is_identical(&t));
        assert!(identity.apply_transformation(&t).is_identical(&t));
    }

    #[test]
    fn inverse_gives_identity() {
        for source in ["R", "R U R' U'", "M2 E S'", "x y' Rw2 b", "[F: [R, U]]"] {
            let t = transformation(source);
            assert!(
                t.apply_transformation(&t.invert()).is_identity_transformation(),
                "{source}"
            );
        }
    }

    #[test]
    fn associativity() {
        let a = transformation("R U");
        let b = transformation("F' L2");
        let c = transformation("D B'");
        let left = a.apply_transformation(&b).apply_transformation(&c);
        let right = a.apply_transformation(&b.apply_transformation(&c));
        assert!(left.is_identical(&right));
    }

    #[test]
    fn repetition_orders() {
        assert_eq!(transformation("").repetition_order(), U512::ONE);
        assert_eq!(transformation("R").repetition_order(), U512::from_digit(4));
        assert_eq!(transformation("R2").repetition_order(), U512::from_digit(2));
        assert_eq!(transformation("R U R' U'").repetition_order(), U512::from_digit(6));
        // 105 on the pieces, and the R and U centers each turn a quarter
        assert_eq!(transformation("R U").repetition_order(), U512::from_digit(420));
    }

    #[test]
    fn self_multiply_matches_repetition() {
        let t = transformation("R U");
        assert!(t.self_multiply(3).is_identical(&transformation("R U R U R U")));
        assert!(t.self_multiply(-2).is_identical(&transformation("U' R' U' R'")));
        assert!(t.self_multiply(0).is_identity_transformation());
        assert!(t.self_multiply(420).is_identity_transformation());
        assert!(!t.self_multiply(105).is_identity_transformation());
    }
}
