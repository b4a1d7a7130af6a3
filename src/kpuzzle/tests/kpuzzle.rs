use alg::{Alg, Move};
use kpuzzle::{KPuzzle, KPuzzleDefinition, KPuzzleError, cube2x2x2, cube3x3x3, ksolve::KSolve};

fn alg(s: &str) -> Alg {
    Alg::parse(s).unwrap()
}

#[test_log::test]
fn identity_does_nothing() {
    let kpuzzle = cube3x3x3();
    let identity = kpuzzle.identity_transformation();
    assert!(identity.is_identity_transformation());

    let r = kpuzzle.move_to_transformation(&Move::new("R", 1)).unwrap();
    assert!(identity.apply_transformation(&r).is_identical(&r));
    assert!(r.apply_transformation(&identity).is_identical(&r));
    assert!(
        kpuzzle
            .start_state()
            .apply_transformation(&identity)
            .is_identical(&kpuzzle.start_state())
    );
}

#[test_log::test]
fn inverse_cancels() {
    let kpuzzle = cube3x3x3();
    for scramble in ["R U R' U'", "[R, U]", "[F: R U2]3 M' E2 S", "x Rw' d2"] {
        let t = kpuzzle.alg_to_transformation(&alg(scramble)).unwrap();
        assert!(t.apply_transformation(&t.invert()).is_identity_transformation());
        assert!(t.invert().apply_transformation(&t).is_identity_transformation());

        let inverted = kpuzzle
            .alg_to_transformation(&alg(scramble).invert())
            .unwrap();
        assert!(inverted.is_identical(&t.invert()), "{scramble}");
    }
}

#[test_log::test]
fn states_are_deterministic() {
    let kpuzzle = cube3x3x3();
    let a = kpuzzle.start_state().apply_alg(&alg("R U F D2")).unwrap();
    let b = kpuzzle.start_state().apply_alg(&alg("R U F D2")).unwrap();
    assert!(a.is_identical(&b));

    let back = a.apply_alg(&alg("D2 F' U' R'")).unwrap();
    assert!(back.is_identical(&kpuzzle.start_state()));
}

#[test_log::test]
fn unknown_moves_are_errors() {
    let kpuzzle = cube2x2x2();
    assert!(matches!(
        kpuzzle.alg_to_transformation(&alg("R M")),
        Err(KPuzzleError::UnknownMove { .. })
    ));
}

#[test_log::test]
fn definitions_survive_json() {
    let json = cube2x2x2().definition().to_json().unwrap();
    assert!(json.contains("\"startPieces\""));
    let definition = KPuzzleDefinition::from_json(&json).unwrap();
    assert_eq!(&definition, cube2x2x2().definition());

    let kpuzzle = KPuzzle::new(definition);
    let order = kpuzzle
        .alg_to_transformation(&alg("R U"))
        .unwrap()
        .repetition_order();
    assert_eq!(order, bnum::types::U512::from_digit(15));
}

#[test_log::test]
fn definitions_survive_ksolve() {
    let ksolve = KSolve::try_from(cube3x3x3().definition()).unwrap();
    let parsed = ksolve.to_string().parse::<KSolve>().unwrap();
    let definition = KPuzzleDefinition::try_from(&parsed).unwrap();

    let kpuzzle = KPuzzle::new(definition);
    let t = kpuzzle.alg_to_transformation(&alg("R U R' U'")).unwrap();
    assert_eq!(t.repetition_order(), bnum::types::U512::from_digit(6));
}
