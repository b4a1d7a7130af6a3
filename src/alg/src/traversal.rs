use crate::{
    Alg, Unit,
    units::{Commutator, Conjugate, Grouping, LineComment, Move},
};

/// A depth-first walk over an alg that dispatches on the kind of each unit.
/// `Data` is threaded down the walk (a direction, a remaining depth) and each
/// call produces an `Output`.
pub trait AlgTraversal {
    type Data: Clone;
    type Output;

    fn traverse_alg(&mut self, alg: &Alg, data: Self::Data) -> Self::Output;
    fn traverse_move(&mut self, mv: &Move, data: Self::Data) -> Self::Output;
    fn traverse_grouping(&mut self, grouping: &Grouping, data: Self::Data) -> Self::Output;
    fn traverse_commutator(&mut self, commutator: &Commutator, data: Self::Data) -> Self::Output;
    fn traverse_conjugate(&mut self, conjugate: &Conjugate, data: Self::Data) -> Self::Output;
    fn traverse_pause(&mut self, data: Self::Data) -> Self::Output;
    fn traverse_newline(&mut self, data: Self::Data) -> Self::Output;
    fn traverse_line_comment(&mut self, comment: &LineComment, data: Self::Data)
    -> Self::Output;

    fn traverse_unit(&mut self, unit: &Unit, data: Self::Data) -> Self::Output {
        match unit {
            Unit::Move(mv) => self.traverse_move(mv, data),
            Unit::Grouping(grouping) => self.traverse_grouping(grouping, data),
            Unit::Commutator(commutator) => self.traverse_commutator(commutator, data),
            Unit::Conjugate(conjugate) => self.traverse_conjugate(conjugate, data),
            Unit::Pause => self.traverse_pause(data),
            Unit::Newline => self.traverse_newline(data),
            Unit::LineComment(comment) => self.traverse_line_comment(comment, data),
        }
    }
}
