use std::fmt;

use internment::ArcIntern;

use crate::Alg;

/// Writes the repetition suffix used by moves and containers: nothing for 1,
/// a prime for -1, and the magnitude followed by a prime for other negative
/// amounts.
pub(crate) fn write_amount(f: &mut fmt::Formatter<'_>, amount: i32) -> fmt::Result {
    match amount {
        1 => Ok(()),
        -1 => write!(f, "'"),
        amount if amount < 0 => write!(f, "{}'", amount.unsigned_abs()),
        amount => write!(f, "{amount}"),
    }
}

/// The part of a move that names what turns, ignoring how far: a family plus
/// an optional slice range. `2-3Rw` has family `Rw`, outer layer 2, and inner
/// layer 3.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QuantumMove {
    family: ArcIntern<str>,
    inner_layer: Option<u32>,
    outer_layer: Option<u32>,
}

impl QuantumMove {
    #[must_use]
    pub fn new(family: &str) -> QuantumMove {
        QuantumMove {
            family: ArcIntern::from(family),
            inner_layer: None,
            outer_layer: None,
        }
    }

    #[must_use]
    pub fn with_inner_layer(family: &str, inner_layer: u32) -> QuantumMove {
        QuantumMove {
            family: ArcIntern::from(family),
            inner_layer: Some(inner_layer),
            outer_layer: None,
        }
    }

    /// A move spanning the layers `outer_layer..=inner_layer`. An outer layer
    /// is only ever present alongside an inner layer.
    #[must_use]
    pub fn with_layers(family: &str, outer_layer: u32, inner_layer: u32) -> QuantumMove {
        QuantumMove {
            family: ArcIntern::from(family),
            inner_layer: Some(inner_layer),
            outer_layer: Some(outer_layer),
        }
    }

    #[must_use]
    pub fn family(&self) -> &str {
        &self.family
    }

    #[must_use]
    pub fn interned_family(&self) -> ArcIntern<str> {
        ArcIntern::clone(&self.family)
    }

    #[must_use]
    pub fn inner_layer(&self) -> Option<u32> {
        self.inner_layer
    }

    #[must_use]
    pub fn outer_layer(&self) -> Option<u32> {
        self.outer_layer
    }

    /// Same layers, different family
    #[must_use]
    pub fn with_family(&self, family: &str) -> QuantumMove {
        QuantumMove {
            family: ArcIntern::from(family),
            inner_layer: self.inner_layer,
            outer_layer: self.outer_layer,
        }
    }

    #[must_use]
    pub fn has_layers(&self) -> bool {
        self.inner_layer.is_some() || self.outer_layer.is_some()
    }
}

impl fmt::Display for QuantumMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(outer_layer) = self.outer_layer {
            write!(f, "{outer_layer}-")?;
        }
        if let Some(inner_layer) = self.inner_layer {
            write!(f, "{inner_layer}")?;
        }
        write!(f, "{}", self.family)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    quantum: QuantumMove,
    amount: i32,
}

impl Move {
    #[must_use]
    pub fn new(family: &str, amount: i32) -> Move {
        Move {
            quantum: QuantumMove::new(family),
            amount,
        }
    }

    #[must_use]
    pub fn from_quantum(quantum: QuantumMove, amount: i32) -> Move {
        Move { quantum, amount }
    }

    #[must_use]
    pub fn quantum(&self) -> &QuantumMove {
        &self.quantum
    }

    #[must_use]
    pub fn family(&self) -> &str {
        self.quantum.family()
    }

    #[must_use]
    pub fn amount(&self) -> i32 {
        self.amount
    }

    #[must_use]
    pub fn inner_layer(&self) -> Option<u32> {
        self.quantum.inner_layer
    }

    #[must_use]
    pub fn outer_layer(&self) -> Option<u32> {
        self.quantum.outer_layer
    }

    #[must_use]
    pub fn invert(&self) -> Move {
        self.modified(-self.amount)
    }

    #[must_use]
    pub fn modified(&self, amount: i32) -> Move {
        Move {
            quantum: self.quantum.clone(),
            amount,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.quantum)?;
        write_amount(f, self.amount)
    }
}

/// A parenthesized alg repeated `amount` times
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grouping {
    alg: Alg,
    amount: i32,
}

impl Grouping {
    #[must_use]
    pub fn new(alg: Alg, amount: i32) -> Grouping {
        Grouping { alg, amount }
    }

    #[must_use]
    pub fn alg(&self) -> &Alg {
        &self.alg
    }

    #[must_use]
    pub fn amount(&self) -> i32 {
        self.amount
    }
}

impl fmt::Display for Grouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.alg)?;
        write_amount(f, self.amount)
    }
}

/// `[A, B]`, which is `A B A' B'`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Commutator {
    a: Alg,
    b: Alg,
    amount: i32,
}

impl Commutator {
    #[must_use]
    pub fn new(a: Alg, b: Alg, amount: i32) -> Commutator {
        Commutator { a, b, amount }
    }

    #[must_use]
    pub fn a(&self) -> &Alg {
        &self.a
    }

    #[must_use]
    pub fn b(&self) -> &Alg {
        &self.b
    }

    #[must_use]
    pub fn amount(&self) -> i32 {
        self.amount
    }
}

impl fmt::Display for Commutator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.a, self.b)?;
        write_amount(f, self.amount)
    }
}

/// `[A: B]`, which is `A B A'`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Conjugate {
    a: Alg,
    b: Alg,
    amount: i32,
}

impl Conjugate {
    #[must_use]
    pub fn new(a: Alg, b: Alg, amount: i32) -> Conjugate {
        Conjugate { a, b, amount }
    }

    #[must_use]
    pub fn a(&self) -> &Alg {
        &self.a
    }

    #[must_use]
    pub fn b(&self) -> &Alg {
        &self.b
    }

    #[must_use]
    pub fn amount(&self) -> i32 {
        self.amount
    }
}

impl fmt::Display for Conjugate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}: {}]", self.a, self.b)?;
        write_amount(f, self.amount)
    }
}

/// The text after `//` up to, but not including, the end of the line
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LineComment {
    text: String,
}

impl LineComment {
    #[must_use]
    pub fn new(text: &str) -> LineComment {
        LineComment {
            text: text.to_owned(),
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for LineComment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "//{}", self.text)
    }
}

/// One node of an alg
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Unit {
    Move(Move),
    Grouping(Grouping),
    Commutator(Commutator),
    Conjugate(Conjugate),
    Newline,
    LineComment(LineComment),
    Pause,
}

impl Unit {
    /// Moves negate their amount and containers negate their repetition;
    /// the nested algs stay as written because expansion already honors the
    /// direction of the repetition.
    #[must_use]
    pub fn invert(&self) -> Unit {
        match self {
            Unit::Move(mv) => Unit::Move(mv.invert()),
            Unit::Grouping(grouping) => {
                Unit::Grouping(Grouping::new(grouping.alg.clone(), -grouping.amount))
            }
            Unit::Commutator(commutator) => Unit::Commutator(Commutator::new(
                commutator.a.clone(),
                commutator.b.clone(),
                -commutator.amount,
            )),
            Unit::Conjugate(conjugate) => Unit::Conjugate(Conjugate::new(
                conjugate.a.clone(),
                conjugate.b.clone(),
                -conjugate.amount,
            )),
            Unit::Newline | Unit::LineComment(_) | Unit::Pause => self.clone(),
        }
    }

    #[must_use]
    pub fn as_move(&self) -> Option<&Move> {
        match self {
            Unit::Move(mv) => Some(mv),
            _ => None,
        }
    }

    /// Whether this is a move, the only kind of leaf that changes a puzzle
    #[must_use]
    pub fn is_move(&self) -> bool {
        matches!(self, Unit::Move(_))
    }
}

impl From<Move> for Unit {
    fn from(mv: Move) -> Unit {
        Unit::Move(mv)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Move(mv) => mv.fmt(f),
            Unit::Grouping(grouping) => grouping.fmt(f),
            Unit::Commutator(commutator) => commutator.fmt(f),
            Unit::Conjugate(conjugate) => conjugate.fmt(f),
            Unit::Newline => writeln!(f),
            Unit::LineComment(comment) => comment.fmt(f),
            Unit::Pause => write!(f, "."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_suffixes() {
        assert_eq!(Move::new("R", 1).to_string(), "R");
        assert_eq!(Move::new("R", -1).to_string(), "R'");
        assert_eq!(Move::new("R", 2).to_string(), "R2");
        assert_eq!(Move::new("R", -2).to_string(), "R2'");
        assert_eq!(Move::new("R", 0).to_string(), "R0");
    }

    #[test]
    fn layered_moves() {
        let mv = Move::from_quantum(QuantumMove::with_layers("Fw", 2, 3), -1);
        assert_eq!(mv.to_string(), "2-3Fw'");
        assert_eq!(mv.outer_layer(), Some(2));
        assert_eq!(mv.inner_layer(), Some(3));

        let mv = Move::from_quantum(QuantumMove::with_inner_layer("Rw", 3), 2);
        assert_eq!(mv.to_string(), "3Rw2");
        assert_eq!(mv.invert().to_string(), "3Rw2'");
    }

    #[test]
    fn container_inversion_negates_amount() {
        let a = Alg::from(vec![Unit::from(Move::new("R", 1))]);
        let b = Alg::from(vec![Unit::from(Move::new("U", 1))]);
        let commutator = Unit::Commutator(Commutator::new(a.clone(), b.clone(), 1));

        let inverted = commutator.invert();
        assert_eq!(inverted.to_string(), "[R, U]'");
        assert_eq!(inverted.invert(), commutator);

        let conjugate = Unit::Conjugate(Conjugate::new(a, b, 2));
        assert_eq!(conjugate.invert().to_string(), "[R: U]2'");
    }

    #[test]
    fn leaves_without_direction() {
        assert_eq!(Unit::Pause.invert(), Unit::Pause);
        let comment = Unit::LineComment(LineComment::new(" hi"));
        assert_eq!(comment.invert(), comment);
        assert_eq!(comment.to_string(), "// hi");
    }
}
