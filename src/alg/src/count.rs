use crate::{
    Alg,
    traversal::AlgTraversal,
    units::{Commutator, Conjugate, Grouping, LineComment, Move},
};

/// How much a single move contributes to a move count
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveMetric {
    /// Every move counts once regardless of amount
    Execution,
    /// A move counts once per quantum turn, so `R2` counts twice
    Quantum,
    /// Like `Execution`, but whole-puzzle rotations are free
    IgnoreRotations,
}

fn is_rotation(mv: &Move) -> bool {
    let family = mv.family();
    matches!(family, "x" | "y" | "z")
        || (family.ends_with('v') && family.starts_with(|c: char| c.is_ascii_uppercase()))
}

pub struct CountMoves {
    metric: MoveMetric,
}

impl CountMoves {
    #[must_use]
    pub fn new(metric: MoveMetric) -> CountMoves {
        CountMoves { metric }
    }

    pub fn count(&mut self, alg: &Alg) -> u64 {
        self.traverse_alg(alg, ())
    }
}

impl AlgTraversal for CountMoves {
    type Data = ();
    type Output = u64;

    fn traverse_alg(&mut self, alg: &Alg, (): ()) -> u64 {
        alg.units()
            .iter()
            .fold(0, |total, unit| total.saturating_add(self.traverse_unit(unit, ())))
    }

    fn traverse_move(&mut self, mv: &Move, (): ()) -> u64 {
        match self.metric {
            MoveMetric::Execution => 1,
            MoveMetric::Quantum => u64::from(mv.amount().unsigned_abs()),
            MoveMetric::IgnoreRotations => u64::from(!is_rotation(mv)),
        }
    }

    fn traverse_grouping(&mut self, grouping: &Grouping, (): ()) -> u64 {
        self.traverse_alg(grouping.alg(), ())
            .saturating_mul(u64::from(grouping.amount().unsigned_abs()))
    }

    fn traverse_commutator(&mut self, commutator: &Commutator, (): ()) -> u64 {
        let a = self.traverse_alg(commutator.a(), ());
        let b = self.traverse_alg(commutator.b(), ());
        a.saturating_add(b)
            .saturating_mul(2)
            .saturating_mul(u64::from(commutator.amount().unsigned_abs()))
    }

    fn traverse_conjugate(&mut self, conjugate: &Conjugate, (): ()) -> u64 {
        let a = self.traverse_alg(conjugate.a(), ());
        let b = self.traverse_alg(conjugate.b(), ());
        a.saturating_mul(2)
            .saturating_add(b)
            .saturating_mul(u64::from(conjugate.amount().unsigned_abs()))
    }

    fn traverse_pause(&mut self, (): ()) -> u64 {
        0
    }

    fn traverse_newline(&mut self, (): ()) -> u64 {
        0
    }

    fn traverse_line_comment(&mut self, _: &LineComment, (): ()) -> u64 {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_containers() {
        let alg = Alg::parse("[R, U] [R: U2] (F . D)2 // done").unwrap();
        assert_eq!(alg.count_moves(MoveMetric::Execution), 4 + 3 + 4);
        assert_eq!(alg.count_moves(MoveMetric::Quantum), 4 + 4 + 4);
    }

    #[test]
    fn huge_repetitions_saturate() {
        let alg = Alg::parse("[((R)2147483647)2147483647, U]2147483647").unwrap();
        assert_eq!(alg.count_moves(MoveMetric::Execution), u64::MAX);
        let fits = Alg::parse("((R)2147483647)2").unwrap();
        assert_eq!(fits.count_moves(MoveMetric::Quantum), 2 * 2_147_483_647);
    }

    #[test]
    fn rotations_are_free() {
        let alg = Alg::parse("x R y2 Uv' U").unwrap();
        assert_eq!(alg.count_moves(MoveMetric::IgnoreRotations), 2);
        assert_eq!(alg.count_moves(MoveMetric::Execution), 5);
    }
}
