use alg::{
    Alg, AlgTraversal, CancelDirection, Commutator, Conjugate, ExpansionDirection, Grouping,
    LineComment, ModWrap, Move, QuantumMove, SimplifyOptions, Unit,
};
use log::info;
use std::sync::Arc;

#[test_log::test]
fn sexy_move_leaves() {
    let alg = Alg::parse("R U R' U'").unwrap();
    let leaves = alg.experimental_leaf_moves();
    assert_eq!(leaves.len(), 4);

    let families = leaves.iter().map(Move::family).collect::<Vec<_>>();
    assert_eq!(families, ["R", "U", "R", "U"]);
    let amounts = leaves.iter().map(Move::amount).collect::<Vec<_>>();
    assert_eq!(amounts, [1, 1, -1, -1]);
}

#[test_log::test]
fn parse_print_round_trip() {
    for source in [
        "R U R' U'",
        "[R U R': D2]",
        "[[R: U], D]2'",
        "(3Rw 2-3Uw')4 ... x2",
        "F // sune\nR U R' U R U2' R'",
        "R U\nF\n\nB",
    ] {
        let alg = Alg::parse(source).unwrap();
        info!("{source:?} parses to {alg:?}");
        assert_eq!(alg.to_string(), source);
        assert_eq!(Alg::parse(&alg.to_string()).unwrap(), alg);
    }
}

#[test_log::test]
fn inversion_is_an_involution() {
    for source in ["R U R' U'", "[R, U]3 (F D')2 [L: B]", "R . U // hi\nF", ""] {
        let alg = Alg::parse(source).unwrap();
        assert!(alg.invert().invert().is_identical(&alg), "{source}");
    }
}

#[test_log::test]
fn expanded_inverse_matches_inverted_expansion() {
    let alg = Alg::parse("[R U: [F, D2]]2 (L B')3'").unwrap();
    let expanded_inverse = alg.invert().expand(None);
    let inverted_expansion = alg.expand(None).invert();
    assert_eq!(expanded_inverse, inverted_expansion);
}

#[test_log::test]
fn commutator_and_conjugate_laws() {
    let commutator = Alg::from(vec![Unit::Commutator(Commutator::new(
        Alg::parse("R").unwrap(),
        Alg::parse("U").unwrap(),
        1,
    ))]);
    assert_eq!(commutator.expand(None).to_string(), "R U R' U'");

    let conjugate = Alg::from(vec![Unit::Conjugate(Conjugate::new(
        Alg::parse("R").unwrap(),
        Alg::parse("U").unwrap(),
        1,
    ))]);
    assert_eq!(conjugate.expand(None).to_string(), "R U R'");
}

#[test_log::test]
fn grouping_of_nothing_expands_to_nothing() {
    let alg = Alg::from(vec![
        Unit::Grouping(Grouping::new(Alg::new(), 5)),
        Unit::LineComment(LineComment::new(" note")),
    ]);
    let moves = alg
        .experimental_expand(ExpansionDirection::Forward, None)
        .filter(Unit::is_move)
        .count();
    assert_eq!(moves, 0);
}

#[test_log::test]
fn simplify_is_idempotent() {
    let options = SimplifyOptions {
        cancel: CancelDirection::AnyDirection,
        mod_wrap: ModWrap::CanonicalCentered,
        quantum_move_order: Some(Arc::new(|quantum: &QuantumMove| {
            Some(if quantum.family().starts_with('U') { 4 } else { 5 })
        })),
        ..SimplifyOptions::default()
    };

    let alg = Alg::parse("U U U R R2 R2 [F F': D] (L L')2 U'").unwrap();
    let once = alg.simplify(&options);
    info!("{alg} simplifies to {once}");
    assert_eq!(once.to_string(), "U' (D) U'");
    assert_eq!(once.simplify(&options), once);
}

#[test_log::test]
fn simplified_leaves_are_equivalent() {
    let alg = Alg::parse("R R' U2 U2 F").unwrap();
    let simplified = alg.simplify(&SimplifyOptions::default());
    assert_eq!(simplified.to_string(), "U4 F");
}

struct MaxDepth;

impl AlgTraversal for MaxDepth {
    type Data = ();
    type Output = usize;

    fn traverse_alg(&mut self, alg: &Alg, (): ()) -> usize {
        alg.units()
            .iter()
            .map(|unit| self.traverse_unit(unit, ()))
            .max()
            .unwrap_or(0)
    }

    fn traverse_move(&mut self, _: &Move, (): ()) -> usize {
        0
    }

    fn traverse_grouping(&mut self, grouping: &Grouping, (): ()) -> usize {
        1 + self.traverse_alg(grouping.alg(), ())
    }

    fn traverse_commutator(&mut self, commutator: &Commutator, (): ()) -> usize {
        1 + self
            .traverse_alg(commutator.a(), ())
            .max(self.traverse_alg(commutator.b(), ()))
    }

    fn traverse_conjugate(&mut self, conjugate: &Conjugate, (): ()) -> usize {
        1 + self
            .traverse_alg(conjugate.a(), ())
            .max(self.traverse_alg(conjugate.b(), ()))
    }

    fn traverse_pause(&mut self, (): ()) -> usize {
        0
    }

    fn traverse_newline(&mut self, (): ()) -> usize {
        0
    }

    fn traverse_line_comment(&mut self, _: &LineComment, (): ()) -> usize {
        0
    }
}

#[test_log::test]
fn custom_traversal() {
    let alg = Alg::parse("R [U, (F [D: B])2] L").unwrap();
    assert_eq!(MaxDepth.traverse_alg(&alg, ()), 3);
}
