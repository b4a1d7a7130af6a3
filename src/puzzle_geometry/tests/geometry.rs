use std::sync::Arc;

use alg::{Alg, Move};
use kpuzzle::KPuzzleDefinition;
use puzzle_geometry::{
    PuzzleCutType, PuzzleGeometry, PuzzleGeometryError, PuzzleGeometryOptions,
    get_puzzle_geometry_by_name,
};

fn named(name: &str, options: PuzzleGeometryOptions) -> Arc<PuzzleGeometry> {
    get_puzzle_geometry_by_name(name, &options).unwrap()
}

fn definition(name: &str, options: PuzzleGeometryOptions) -> KPuzzleDefinition {
    named(name, options).to_kpuzzle_definition().unwrap()
}

fn orbits(definition: &KPuzzleDefinition) -> Vec<(&str, usize, u8)> {
    definition
        .orbits()
        .iter()
        .map(|(name, orbit)| (name.as_str(), orbit.num_pieces, orbit.num_orientations))
        .collect()
}

fn turns(definition: &KPuzzleDefinition) -> Vec<&str> {
    definition.turns().keys().map(String::as_str).collect()
}

fn alg(s: &str) -> Alg {
    Alg::parse(s).unwrap()
}

#[test_log::test]
fn two_by_two() {
    let def = definition("2x2x2", PuzzleGeometryOptions::default());
    assert_eq!(orbits(&def), [("CORNERS", 8, 3)]);
    assert_eq!(turns(&def), ["B", "D", "F", "L", "R", "U"]);
}

#[test_log::test]
fn fixed_corner_never_moves() {
    let def = definition(
        "2x2x2",
        PuzzleGeometryOptions {
            fix_piece: Some(PuzzleCutType::Vertex),
            ..PuzzleGeometryOptions::default()
        },
    );
    assert_eq!(def.turns().len(), 3);

    let fixed = (0..8).filter(|&slot| {
        def.turns().values().all(|turn| {
            let corners = &turn["CORNERS"];
            corners.permutation[slot] == slot && corners.orientation[slot] == 0
        })
    });
    assert_eq!(fixed.count(), 1);
}

#[test_log::test]
fn pyraminx() {
    let def = definition("pyraminx", PuzzleGeometryOptions::default());
    assert_eq!(
        orbits(&def),
        [("CORNERS", 4, 3), ("CORNERS2", 4, 3), ("EDGES", 6, 2)]
    );
    assert_eq!(
        turns(&def),
        ["D", "DRL", "F", "FDL", "FLR", "FRD", "L", "R"]
    );

    let by_vertex = definition(
        "pyraminx",
        PuzzleGeometryOptions {
            vertex_moves: true,
            ..PuzzleGeometryOptions::default()
        },
    );
    assert_eq!(
        turns(&by_vertex),
        ["2DRL", "2FDL", "2FLR", "2FRD", "DRL", "FDL", "FLR", "FRD"]
    );
}

#[test_log::test]
fn megaminx() {
    let geometry = named("megaminx", PuzzleGeometryOptions::default());
    let def = geometry.to_kpuzzle_definition().unwrap();
    assert_eq!(orbits(&def), [("CORNERS", 20, 3), ("EDGES", 30, 2)]);
    assert_eq!(
        turns(&def),
        ["A", "BF", "BL", "BR", "C", "D", "E", "F", "I", "L", "R", "U"]
    );

    let kpuzzle = geometry.to_kpuzzle().unwrap();
    for name in turns(&def) {
        let order = kpuzzle
            .move_to_transformation(&Move::new(name, 1))
            .unwrap()
            .repetition_order();
        assert_eq!(order.to_string(), "5", "{name}");
    }

    let corners_only = definition(
        "megaminx",
        PuzzleGeometryOptions {
            include_edge_orbits: false,
            include_center_orbits: false,
            ..PuzzleGeometryOptions::default()
        },
    );
    assert_eq!(orbits(&corners_only), [("CORNERS", 20, 3)]);
}

#[test_log::test]
fn skewb_and_fto() {
    let skewb = definition("skewb", PuzzleGeometryOptions::default());
    assert_eq!(
        orbits(&skewb),
        [("CENTERS", 6, 1), ("CORNERS", 4, 3), ("CORNERS2", 4, 3)]
    );
    assert_eq!(
        turns(&skewb),
        ["DBL", "DFR", "DLF", "DRB", "UBR", "UFL", "ULB", "URF"]
    );

    let fto = definition("FTO", PuzzleGeometryOptions::default());
    assert_eq!(
        orbits(&fto),
        [
            ("C4RNER", 6, 4),
            ("CENTERS", 12, 1),
            ("CENTERS2", 12, 1),
            ("EDGES", 12, 2)
        ]
    );
    assert_eq!(turns(&fto), ["BB", "BL", "BR", "D", "F", "L", "R", "U"]);
}

#[test_log::test]
fn big_cubes() {
    let four = definition("4x4x4", PuzzleGeometryOptions::default());
    assert_eq!(
        orbits(&four),
        [("CENTERS", 24, 1), ("CORNERS", 8, 3), ("EDGES", 24, 2)]
    );
    assert_eq!(
        turns(&four),
        ["2B", "2D", "2F", "2L", "2R", "2U", "B", "D", "F", "L", "R", "U"]
    );

    let five = definition(
        "5x5x5",
        PuzzleGeometryOptions {
            all_moves: true,
            ..PuzzleGeometryOptions::default()
        },
    );
    assert_eq!(
        orbits(&five),
        [
            ("CENTERS", 6, 1),
            ("CENTERS2", 24, 1),
            ("CENTERS3", 24, 1),
            ("CORNERS", 8, 3),
            ("EDGES", 12, 2),
            ("EDGES2", 24, 2)
        ]
    );
    assert_eq!(five.turns().len(), 15);
}

#[test_log::test]
fn edge_and_vertex_turning_cubes() {
    let helicopter = definition("helicopter", PuzzleGeometryOptions::default());
    assert_eq!(
        orbits(&helicopter),
        [("CENTERS", 24, 1), ("CORNERS", 8, 3)]
    );
    assert_eq!(
        turns(&helicopter),
        ["BL", "BR", "DB", "DF", "DL", "DR", "FL", "FR", "UB", "UF", "UL", "UR"]
    );

    let dino = definition("dino", PuzzleGeometryOptions::default());
    assert_eq!(orbits(&dino), [("EDGES", 12, 2)]);
    assert_eq!(dino.turns().len(), 8);
}

#[test_log::test]
fn three_by_three_orders() {
    let kpuzzle = named("3x3x3", PuzzleGeometryOptions::default())
        .to_kpuzzle()
        .unwrap();
    let order = |s: &str| {
        kpuzzle
            .alg_to_transformation(&alg(s))
            .unwrap()
            .repetition_order()
            .to_string()
    };
    assert_eq!(order("R"), "4");
    assert_eq!(order("R U"), "105");
    assert_eq!(order("R U R' U'"), "6");

    let solved = kpuzzle.start_state();
    assert!(solved.apply_alg(&alg("U U'")).unwrap().is_identical(&solved));
    assert!(!solved.apply_alg(&alg("U")).unwrap().is_identical(&solved));
}

#[test_log::test]
fn oriented_centers_spin_in_place() {
    let options = PuzzleGeometryOptions {
        all_moves: true,
        orient_centers: true,
        ..PuzzleGeometryOptions::default()
    };
    let def = definition("3x3x3", options.clone());
    assert_eq!(
        orbits(&def),
        [("CENTERS", 6, 4), ("CORNERS", 8, 3), ("EDGES", 12, 2)]
    );

    let kpuzzle = named("3x3x3", options).to_kpuzzle().unwrap();
    let t = |s: &str| kpuzzle.alg_to_transformation(&alg(s)).unwrap();
    let twisted_centers = |s: &str| {
        t(s).transformation_data()["CENTERS"]
            .orientation
            .iter()
            .filter(|&&o| o != 0)
            .count()
    };
    assert_eq!(twisted_centers("R"), 1);
    assert_eq!(twisted_centers("R2"), 1);
    assert_eq!(twisted_centers("R U R' U'"), 0);
    assert!(twisted_centers("x") >= 2);

    assert!(t("x4").is_identity_transformation());
    assert!(!t("x2").is_identity_transformation());
    assert_eq!(t("R").repetition_order().to_string(), "4");
    assert_eq!(t("R U").repetition_order().to_string(), "420");

    let plain = definition("3x3x3", PuzzleGeometryOptions::default());
    assert!(!plain.orbits().contains_key("CENTERS"));
}

#[test_log::test]
fn external_notation_resolves() {
    let kpuzzle = named("3x3x3", PuzzleGeometryOptions::default())
        .to_kpuzzle()
        .unwrap();
    let t = |s: &str| kpuzzle.alg_to_transformation(&alg(s)).unwrap();

    // Centers are not part of the default definition, so these compare on
    // corners and edges only
    assert!(t("Rw L'").is_identical(&t("x")));
    assert!(t("R M' L'").is_identical(&t("x")));
    assert!(t("2R").is_identical(&t("M'")));
    assert_eq!(t("x").repetition_order().to_string(), "4");
    assert!(t("x y z").apply_transformation(&t("z' y' x'")).is_identity_transformation());
}

#[test_log::test]
fn unknown_turns_fail() {
    let geometry = named("3x3x3", PuzzleGeometryOptions::default());
    let kpuzzle = geometry.to_kpuzzle().unwrap();
    assert!(kpuzzle.alg_to_transformation(&alg("Q")).is_err());
    assert!(kpuzzle.alg_to_transformation(&alg("4R")).is_err());

    assert!(matches!(
        get_puzzle_geometry_by_name("5x5x5x5", &PuzzleGeometryOptions::default()),
        Err(PuzzleGeometryError::UnknownPuzzle(_))
    ));
}

#[test_log::test]
fn ksolve_text_lists_every_turn() {
    let ksolve = named("2x2x2", PuzzleGeometryOptions::default())
        .to_ksolve()
        .unwrap();
    let text = ksolve.to_string();
    for name in ["B", "D", "F", "L", "R", "U"] {
        assert!(text.contains(&format!("Move {name}\n")), "{text}");
    }
    assert!(text.contains("Set CORNERS 8 3"), "{text}");
}

#[test_log::test]
fn three_by_three_orbits() {
    let geometry = named("3x3x3", PuzzleGeometryOptions::default());
    let mut names = geometry.orbit_names();
    names.sort_unstable();
    assert_eq!(names, ["CENTERS", "CORNERS", "EDGES"]);

    let solved = geometry.to_kpuzzle().unwrap().start_state();
    let back = solved.apply_alg(&alg("U")).unwrap().apply_alg(&alg("U'")).unwrap();
    assert_eq!(back.state_data(), solved.state_data());
}

#[test_log::test]
fn move_list_restricts_turns() {
    let def = definition(
        "3x3x3",
        PuzzleGeometryOptions {
            move_list: Some(vec!["R".to_owned(), "U2".to_owned()]),
            ..PuzzleGeometryOptions::default()
        },
    );
    assert_eq!(turns(&def), ["R", "U2"]);

    let repeated = named(
        "3x3x3",
        PuzzleGeometryOptions {
            move_list: Some(vec!["R".to_owned(), "R".to_owned()]),
            ..PuzzleGeometryOptions::default()
        },
    );
    assert!(matches!(
        repeated.to_kpuzzle_definition(),
        Err(PuzzleGeometryError::RedundantTurns(name)) if name == "R"
    ));
}
