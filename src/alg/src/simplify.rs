use std::{fmt, sync::Arc};

use crate::{
    Alg, Unit,
    traversal::AlgTraversal,
    units::{Commutator, Conjugate, Grouping, LineComment, Move, QuantumMove},
};

/// Which neighboring moves of the same quantum move may be combined
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CancelDirection {
    None,
    /// Only combine moves whose amounts have the same sign, e.g. `R R2`
    SameDirection,
    #[default]
    AnyDirection,
}

/// How to reduce a move amount once the order of its quantum move is known
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ModWrap {
    None,
    /// Into `(-order/2, order/2)`, keeping the original sign for a half turn
    Gravity,
    /// Into `(-order/2, order/2]`
    #[default]
    CanonicalCentered,
    /// Into `[0, order)`
    CanonicalPositive,
    /// Remainder with the sign of the original amount
    PreserveSign,
}

impl ModWrap {
    fn wrap(self, amount: i32, order: u32) -> i32 {
        let order = i64::from(order);
        let amount = i64::from(amount);
        let positive = amount.rem_euclid(order);
        let wrapped = match self {
            ModWrap::None => amount,
            ModWrap::CanonicalPositive => positive,
            ModWrap::CanonicalCentered => {
                if 2 * positive > order {
                    positive - order
                } else {
                    positive
                }
            }
            ModWrap::Gravity => {
                if 2 * positive > order || (2 * positive == order && amount < 0) {
                    positive - order
                } else {
                    positive
                }
            }
            ModWrap::PreserveSign => amount % order,
        };
        // Every branch stays within `-order..order`, which fits because the
        // original amount did
        i32::try_from(wrapped).unwrap_or(0)
    }
}

/// Gives the order of a quantum move on some puzzle, or `None` if unknown
pub type QuantumMoveOrder = Arc<dyn Fn(&QuantumMove) -> Option<u32> + Send + Sync>;

#[derive(Clone)]
pub struct SimplifyOptions {
    pub collapse_moves: bool,
    pub cancel: CancelDirection,
    pub mod_wrap: ModWrap,
    pub quantum_move_order: Option<QuantumMoveOrder>,
    /// How many levels of containers to descend into; `None` is unlimited
    pub depth: Option<usize>,
}

impl Default for SimplifyOptions {
    fn default() -> Self {
        SimplifyOptions {
            collapse_moves: true,
            cancel: CancelDirection::default(),
            mod_wrap: ModWrap::default(),
            quantum_move_order: None,
            depth: None,
        }
    }
}

impl fmt::Debug for SimplifyOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimplifyOptions")
            .field("collapse_moves", &self.collapse_moves)
            .field("cancel", &self.cancel)
            .field("mod_wrap", &self.mod_wrap)
            .field("quantum_move_order", &self.quantum_move_order.is_some())
            .field("depth", &self.depth)
            .finish()
    }
}

struct Simplify<'a> {
    options: &'a SimplifyOptions,
}

impl Simplify<'_> {
    fn can_merge(&self, previous: &Move, mv: &Move) -> bool {
        if !self.options.collapse_moves || previous.quantum() != mv.quantum() {
            return false;
        }
        match self.options.cancel {
            CancelDirection::None => false,
            CancelDirection::SameDirection => previous.amount().signum() == mv.amount().signum(),
            CancelDirection::AnyDirection => true,
        }
    }

    fn wrap(&self, mv: Move) -> Move {
        let order = self
            .options
            .quantum_move_order
            .as_ref()
            .and_then(|order| order(mv.quantum()));
        match order {
            Some(order) if order > 0 => {
                let amount = self.options.mod_wrap.wrap(mv.amount(), order);
                mv.modified(amount)
            }
            _ => mv,
        }
    }

    /// Appends a unit, combining it with the moves before it for as long as
    /// they share a quantum move and their amounts add without overflow. The
    /// output never holds two neighbors that could be combined, which keeps
    /// simplification idempotent.
    fn push(&self, units: &mut Vec<Unit>, unit: Unit) {
        let Unit::Move(mut mv) = unit else {
            units.push(unit);
            return;
        };

        loop {
            let mut overflowed = false;
            while let Some(Unit::Move(previous)) = units.last() {
                if !self.can_merge(previous, &mv) {
                    break;
                }
                let Some(combined) = previous.amount().checked_add(mv.amount()) else {
                    overflowed = true;
                    break;
                };
                mv = mv.modified(combined);
                units.pop();
            }

            mv = self.wrap(mv);
            if mv.amount() == 0 {
                return;
            }
            if overflowed {
                break;
            }

            match units.last() {
                Some(Unit::Move(previous)) if self.can_merge(previous, &mv) => {}
                _ => break,
            }
        }

        units.push(Unit::Move(mv));
    }

    fn inner(&mut self, alg: &Alg, depth: Option<usize>) -> Alg {
        if depth == Some(0) {
            alg.clone()
        } else {
            Alg::from(self.traverse_alg(alg, depth.map(|depth| depth - 1)))
        }
    }
}

impl AlgTraversal for Simplify<'_> {
    type Data = Option<usize>;
    type Output = Vec<Unit>;

    fn traverse_alg(&mut self, alg: &Alg, depth: Option<usize>) -> Vec<Unit> {
        let mut units = Vec::with_capacity(alg.units().len());
        for unit in alg.units() {
            for simplified in self.traverse_unit(unit, depth) {
                self.push(&mut units, simplified);
            }
        }
        units
    }

    fn traverse_move(&mut self, mv: &Move, _: Option<usize>) -> Vec<Unit> {
        vec![Unit::Move(mv.clone())]
    }

    fn traverse_grouping(&mut self, grouping: &Grouping, depth: Option<usize>) -> Vec<Unit> {
        if grouping.amount() == 0 {
            return vec![];
        }
        let alg = self.inner(grouping.alg(), depth);
        if alg.is_empty() {
            return vec![];
        }
        vec![Unit::Grouping(Grouping::new(alg, grouping.amount()))]
    }

    fn traverse_commutator(&mut self, commutator: &Commutator, depth: Option<usize>) -> Vec<Unit> {
        if commutator.amount() == 0 {
            return vec![];
        }
        let a = self.inner(commutator.a(), depth);
        let b = self.inner(commutator.b(), depth);
        if a.is_empty() || b.is_empty() {
            return vec![];
        }
        vec![Unit::Commutator(Commutator::new(a, b, commutator.amount()))]
    }

    fn traverse_conjugate(&mut self, conjugate: &Conjugate, depth: Option<usize>) -> Vec<Unit> {
        if conjugate.amount() == 0 {
            return vec![];
        }
        let a = self.inner(conjugate.a(), depth);
        let b = self.inner(conjugate.b(), depth);
        if b.is_empty() {
            return vec![];
        }
        if a.is_empty() {
            return vec![Unit::Grouping(Grouping::new(b, conjugate.amount()))];
        }
        vec![Unit::Conjugate(Conjugate::new(a, b, conjugate.amount()))]
    }

    fn traverse_pause(&mut self, _: Option<usize>) -> Vec<Unit> {
        vec![Unit::Pause]
    }

    fn traverse_newline(&mut self, _: Option<usize>) -> Vec<Unit> {
        vec![Unit::Newline]
    }

    fn traverse_line_comment(&mut self, comment: &LineComment, _: Option<usize>) -> Vec<Unit> {
        vec![Unit::LineComment(comment.clone())]
    }
}

pub(crate) fn simplify_alg(alg: &Alg, options: &SimplifyOptions) -> Alg {
    let mut simplify = Simplify { options };
    Alg::from(simplify.traverse_alg(alg, options.depth))
}
