#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod alg;
mod count;
mod expand;
mod parser;
mod simplify;
mod traversal;
mod units;

pub use alg::Alg;
pub use count::{CountMoves, MoveMetric};
pub use expand::{Expansion, ExpansionDirection};
pub use parser::{AlgParseError, parse_move};
pub use simplify::{CancelDirection, ModWrap, QuantumMoveOrder, SimplifyOptions};
pub use traversal::AlgTraversal;
pub use units::{Commutator, Conjugate, Grouping, LineComment, Move, QuantumMove, Unit};
