use std::{fmt, str::FromStr, sync::Arc};

use itertools::Itertools;

use crate::{
    AlgParseError, Unit,
    count::{CountMoves, MoveMetric},
    expand::{ExpansionDirection, Expansion, expand_alg},
    parser::parse_alg,
    simplify::{SimplifyOptions, simplify_alg},
    units::Move,
};

/// An immutable sequence of units. Every operation that changes an alg
/// returns a new one, so clones share their units.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Alg {
    units: Arc<[Unit]>,
}

impl Alg {
    #[must_use]
    pub fn new() -> Alg {
        Alg::default()
    }

    /// Parses alg notation such as `R U R' U'` or `[R: U]2`
    ///
    /// # Errors
    ///
    /// Returns the first syntax error along with the byte range where it
    /// occurred
    pub fn parse(source: &str) -> Result<Alg, AlgParseError> {
        parse_alg(source)
    }

    #[must_use]
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    #[must_use]
    pub fn experimental_num_units(&self) -> usize {
        self.units.len()
    }

    /// Structural equality, recursing into nested algs
    #[must_use]
    pub fn is_identical(&self, other: &Alg) -> bool {
        self == other
    }

    /// Reverses the units and inverts each one
    #[must_use]
    pub fn invert(&self) -> Alg {
        Alg {
            units: self.units.iter().rev().map(Unit::invert).collect(),
        }
    }

    #[must_use]
    pub fn concat(&self, other: &Alg) -> Alg {
        Alg {
            units: self.units.iter().chain(other.units.iter()).cloned().collect(),
        }
    }

    /// Unrolls groupings, commutators and conjugates into their leaves.
    /// `depth` limits how many levels of containers are unrolled; a container
    /// reached at depth zero is yielded as is (inverted when walking
    /// backwards).
    #[must_use]
    pub fn experimental_expand(
        &self,
        direction: ExpansionDirection,
        depth: Option<usize>,
    ) -> Expansion {
        expand_alg(self, direction, depth)
    }

    /// Fully expands the alg forwards and keeps only the moves
    #[must_use]
    pub fn experimental_leaf_moves(&self) -> Vec<Move> {
        self.experimental_expand(ExpansionDirection::Forward, None)
            .filter_map(|unit| match unit {
                Unit::Move(mv) => Some(mv),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn expand(&self, depth: Option<usize>) -> Alg {
        self.experimental_expand(ExpansionDirection::Forward, depth)
            .collect()
    }

    #[must_use]
    pub fn simplify(&self, options: &SimplifyOptions) -> Alg {
        simplify_alg(self, options)
    }

    #[must_use]
    pub fn count_moves(&self, metric: MoveMetric) -> u64 {
        CountMoves::new(metric).count(self)
    }
}

impl From<Vec<Unit>> for Alg {
    fn from(units: Vec<Unit>) -> Alg {
        Alg {
            units: units.into(),
        }
    }
}

impl FromIterator<Unit> for Alg {
    fn from_iter<T: IntoIterator<Item = Unit>>(iter: T) -> Alg {
        Alg {
            units: iter.into_iter().collect(),
        }
    }
}

impl FromIterator<Move> for Alg {
    fn from_iter<T: IntoIterator<Item = Move>>(iter: T) -> Alg {
        Alg {
            units: iter.into_iter().map(Unit::Move).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Alg {
    type Item = &'a Unit;
    type IntoIter = std::slice::Iter<'a, Unit>;

    fn into_iter(self) -> Self::IntoIter {
        self.units.iter()
    }
}

impl FromStr for Alg {
    type Err = AlgParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_alg(s)
    }
}

fn space_between(first: &Unit, second: &Unit) -> &'static str {
    match (first, second) {
        (Unit::Pause, Unit::Pause) | (Unit::Newline, _) | (_, Unit::Newline) => "",
        (Unit::LineComment(_), _) => "\n",
        _ => " ",
    }
}

impl fmt::Display for Alg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(first) = self.units.first() else {
            return Ok(());
        };
        write!(f, "{first}")?;
        for (previous, unit) in self.units.iter().tuple_windows() {
            write!(f, "{}{unit}", space_between(previous, unit))?;
        }
        Ok(())
    }
}
