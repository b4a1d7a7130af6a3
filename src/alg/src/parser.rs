use std::ops::Range;

use chumsky::prelude::*;
use log::trace;
use thiserror::Error;

use crate::{
    Alg, Unit,
    units::{Commutator, Conjugate, Grouping, LineComment, Move, QuantumMove},
};

type Extra<'src> = extra::Err<Rich<'src, char>>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid alg at {}..{}: {message}", span.start, span.end)]
pub struct AlgParseError {
    pub span: Range<usize>,
    pub message: String,
}

/// Spaces and tabs. Line breaks are units of their own.
fn inline_whitespace<'src>() -> impl Parser<'src, &'src str, (), Extra<'src>> + Clone {
    one_of(" \t\r").repeated().ignored()
}

fn number<'src>() -> impl Parser<'src, &'src str, u32, Extra<'src>> + Clone {
    text::digits(10)
        .to_slice()
        .try_map(|digits: &str, span| {
            digits
                .parse::<u32>()
                .map_err(|_| Rich::custom(span, format!("The number {digits} is too large")))
        })
}

/// An optional count followed by an optional prime
fn amount<'src>() -> impl Parser<'src, &'src str, i32, Extra<'src>> + Clone {
    text::digits(10)
        .to_slice()
        .try_map(|digits: &str, span| {
            digits
                .parse::<i32>()
                .map_err(|_| Rich::custom(span, format!("The amount {digits} is too large")))
        })
        .or_not()
        .then(just('\'').or_not())
        .map(|(amount, prime)| {
            let amount = amount.unwrap_or(1);
            if prime.is_some() { -amount } else { amount }
        })
}

fn quantum_move<'src>() -> impl Parser<'src, &'src str, QuantumMove, Extra<'src>> + Clone {
    let layers = choice((
        number()
            .then_ignore(just('-'))
            .then(number())
            .map(|(outer, inner)| (Some(outer), Some(inner))),
        number().map(|inner| (None, Some(inner))),
    ))
    .or_not()
    .map(Option::unwrap_or_default);

    // Megaminx scrambles spell some families with a trailing `++` or `--`
    let family = any()
        .filter(|c: &char| c.is_ascii_alphabetic() || *c == '_')
        .repeated()
        .at_least(1)
        .then(choice((just("++"), just("--"))).or_not())
        .to_slice();

    layers
        .then(family)
        .map(|((outer, inner), family): (_, &str)| match (outer, inner) {
            (Some(outer), Some(inner)) => QuantumMove::with_layers(family, outer, inner),
            (None, Some(inner)) => QuantumMove::with_inner_layer(family, inner),
            _ => QuantumMove::new(family),
        })
}

fn move_unit<'src>() -> impl Parser<'src, &'src str, Unit, Extra<'src>> + Clone {
    quantum_move()
        .then(amount())
        .map(|(quantum, amount)| Unit::Move(Move::from_quantum(quantum, amount)))
}

/// Units that never contain other algs and may appear anywhere
fn leaf<'src>() -> impl Parser<'src, &'src str, Unit, Extra<'src>> + Clone {
    let pause = just('.').to(Unit::Pause);
    let comment = just("//")
        .ignore_then(any().and_is(just('\n').not()).repeated().to_slice())
        .map(|text: &str| Unit::LineComment(LineComment::new(text)));

    choice((comment, move_unit(), pause))
}

fn container<'src, P>(alg: P) -> impl Parser<'src, &'src str, Unit, Extra<'src>> + Clone
where
    P: Parser<'src, &'src str, Alg, Extra<'src>> + Clone,
{
    let grouping = alg
        .clone()
        .delimited_by(just('('), just(')'))
        .then(amount())
        .map(|(alg, amount)| Unit::Grouping(Grouping::new(alg, amount)));

    let bracketed = just('[')
        .ignore_then(alg.clone())
        .then(one_of(",:"))
        .then(alg)
        .then_ignore(just(']'))
        .then(amount())
        .map(|(((a, separator), b), amount)| {
            if separator == ',' {
                Unit::Commutator(Commutator::new(a, b, amount))
            } else {
                Unit::Conjugate(Conjugate::new(a, b, amount))
            }
        });

    choice((grouping, bracketed))
}

/// The alg inside a grouping, commutator or conjugate, where line breaks are
/// not allowed
fn nested_alg<'src>() -> impl Parser<'src, &'src str, Alg, Extra<'src>> + Clone {
    recursive(|alg| {
        inline_whitespace().ignore_then(
            choice((container(alg), leaf()))
                .then_ignore(inline_whitespace())
                .repeated()
                .collect::<Vec<_>>()
                .map(Alg::from),
        )
    })
}

fn top_level_alg<'src>() -> impl Parser<'src, &'src str, Alg, Extra<'src>> + Clone {
    let newline = just('\n').to(Unit::Newline);

    inline_whitespace()
        .ignore_then(
            choice((container(nested_alg()), leaf(), newline))
                .then_ignore(inline_whitespace())
                .repeated()
                .collect::<Vec<_>>()
                .map(Alg::from),
        )
        .then_ignore(end())
}

pub(crate) fn parse_alg(source: &str) -> Result<Alg, AlgParseError> {
    top_level_alg().parse(source).into_result().map_err(|errors| {
        trace!("Failed to parse {source:?}: {errors:?}");
        match errors.into_iter().next() {
            Some(error) => AlgParseError {
                span: error.span().start..error.span().end,
                message: error.to_string(),
            },
            None => AlgParseError {
                span: 0..source.len(),
                message: "Unknown parse failure".to_owned(),
            },
        }
    })
}

/// Parses a single move such as `2-3Rw2'`
///
/// # Errors
///
/// Fails if the text is not exactly one move
pub fn parse_move(source: &str) -> Result<Move, AlgParseError> {
    let alg = parse_alg(source)?;
    match alg.units() {
        [Unit::Move(mv)] => Ok(mv.clone()),
        _ => Err(AlgParseError {
            span: 0..source.len(),
            message: format!("Expected a single move but found {source:?}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(source: &str) {
        let alg = parse_alg(source).unwrap();
        assert_eq!(alg.to_string(), source);
    }

    #[test]
    fn canonical_round_trips() {
        for source in [
            "",
            "R",
            "R U R' U'",
            "R2 U2' F0",
            "3Rw2 2-3Fw' x M'",
            "(R U)2'",
            "[R, U]",
            "[R: U]2",
            "[[R: U], D]'",
            "R U .. F",
            "R ..",
            "R // trigger\nU",
            "R\nU\n",
            "R++ D-- y'",
            "(R [U: F] . L)3",
        ] {
            round_trip(source);
        }
    }

    #[test]
    fn whitespace_is_normalized() {
        let alg = parse_alg("  R   U'  ( F )2 [ R ,U ] ").unwrap();
        assert_eq!(alg.to_string(), "R U' (F)2 [R, U]");
    }

    #[test]
    fn move_structure() {
        let mv = parse_move("2-3Fw'").unwrap();
        assert_eq!(mv.family(), "Fw");
        assert_eq!(mv.outer_layer(), Some(2));
        assert_eq!(mv.inner_layer(), Some(3));
        assert_eq!(mv.amount(), -1);

        let mv = parse_move("R2'").unwrap();
        assert_eq!(mv.amount(), -2);
    }

    #[test]
    fn commutator_versus_conjugate() {
        let alg = parse_alg("[R, U] [R: U]").unwrap();
        assert!(matches!(alg.units()[0], Unit::Commutator(_)));
        assert!(matches!(alg.units()[1], Unit::Conjugate(_)));
    }

    #[test]
    fn rejects_malformed_text() {
        for source in [
            "(R U",
            "R U)",
            "[R U]",
            "[R, U",
            "R'2",
            "2",
            "R U &",
            "(R\nU)",
            "[R // comment\n, U]",
            "R99999999999",
        ] {
            assert!(parse_alg(source).is_err(), "{source:?} should not parse");
        }
    }

    #[test]
    fn error_span_points_at_problem() {
        let error = parse_alg("R U &").unwrap_err();
        assert_eq!(error.span.start, 4);
    }

    #[test]
    fn parse_move_requires_one_move() {
        assert!(parse_move("R U").is_err());
        assert!(parse_move("(R)").is_err());
    }
}
