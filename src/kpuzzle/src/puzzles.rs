use std::{collections::BTreeMap, sync::LazyLock};

use crate::{
    KPuzzle,
    combine::{combine_transformation_data, invert_transformation_data},
    definition::{
        KPuzzleDefinition, KPuzzleOrbitDefinition, KStateData, KStateOrbitData,
        KTransformationData, KTransformationOrbitData,
    },
};

// Slot orderings:
// EDGES   UF UR UB UL DF DR DB DL FR FL BR BL
// CORNERS UFR URB UBL ULF DRF DFL DLB DBR
// CENTERS U L F R B D

type Turn = (&'static str, &'static [(&'static str, &'static [usize], &'static [u8])]);

const NO_TWIST_12: &[u8] = &[0; 12];
const NO_TWIST_8: &[u8] = &[0; 8];
const NO_TWIST_6: &[u8] = &[0; 6];
const CENTERS_FIXED: &[usize] = &[0, 1, 2, 3, 4, 5];
const CORNERS_FIXED: &[usize] = &[0, 1, 2, 3, 4, 5, 6, 7];

const FACE_TURNS: &[Turn] = &[
    (
        "U",
        &[
            ("EDGES", &[1, 2, 3, 0, 4, 5, 6, 7, 8, 9, 10, 11], NO_TWIST_12),
            ("CORNERS", &[1, 2, 3, 0, 4, 5, 6, 7], NO_TWIST_8),
            ("CENTERS", CENTERS_FIXED, &[1, 0, 0, 0, 0, 0]),
        ],
    ),
    (
        "L",
        &[
            ("EDGES", &[0, 1, 2, 11, 4, 5, 6, 9, 8, 3, 10, 7], NO_TWIST_12),
            ("CORNERS", &[0, 1, 6, 2, 4, 3, 5, 7], &[0, 0, 2, 1, 0, 2, 1, 0]),
            ("CENTERS", CENTERS_FIXED, &[0, 1, 0, 0, 0, 0]),
        ],
    ),
    (
        "F",
        &[
            (
                "EDGES",
                &[9, 1, 2, 3, 8, 5, 6, 7, 0, 4, 10, 11],
                &[1, 0, 0, 0, 1, 0, 0, 0, 1, 1, 0, 0],
            ),
            ("CORNERS", &[3, 1, 2, 5, 0, 4, 6, 7], &[1, 0, 0, 2, 2, 1, 0, 0]),
            ("CENTERS", CENTERS_FIXED, &[0, 0, 1, 0, 0, 0]),
        ],
    ),
    (
        "R",
        &[
            ("EDGES", &[0, 8, 2, 3, 4, 10, 6, 7, 5, 9, 1, 11], NO_TWIST_12),
            ("CORNERS", &[4, 0, 2, 3, 7, 5, 6, 1], &[2, 1, 0, 0, 1, 0, 0, 2]),
            ("CENTERS", CENTERS_FIXED, &[0, 0, 0, 1, 0, 0]),
        ],
    ),
    (
        "B",
        &[
            (
                "EDGES",
                &[0, 1, 10, 3, 4, 5, 11, 7, 8, 9, 6, 2],
                &[0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 1, 1],
            ),
            ("CORNERS", &[0, 7, 1, 3, 4, 5, 2, 6], &[0, 2, 1, 0, 0, 0, 2, 1]),
            ("CENTERS", CENTERS_FIXED, &[0, 0, 0, 0, 1, 0]),
        ],
    ),
    (
        "D",
        &[
            ("EDGES", &[0, 1, 2, 3, 7, 4, 5, 6, 8, 9, 10, 11], NO_TWIST_12),
            ("CORNERS", &[0, 1, 2, 3, 5, 6, 7, 4], NO_TWIST_8),
            ("CENTERS", CENTERS_FIXED, &[0, 0, 0, 0, 0, 1]),
        ],
    ),
];

const SLICE_TURNS: &[Turn] = &[
    (
        "M",
        &[
            (
                "EDGES",
                &[2, 1, 6, 3, 0, 5, 4, 7, 8, 9, 10, 11],
                &[1, 0, 1, 0, 1, 0, 1, 0, 0, 0, 0, 0],
            ),
            ("CORNERS", CORNERS_FIXED, NO_TWIST_8),
            ("CENTERS", &[4, 1, 0, 3, 5, 2], &[2, 0, 0, 0, 2, 0]),
        ],
    ),
    (
        "E",
        &[
            (
                "EDGES",
                &[0, 1, 2, 3, 4, 5, 6, 7, 9, 11, 8, 10],
                &[0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1],
            ),
            ("CORNERS", CORNERS_FIXED, NO_TWIST_8),
            ("CENTERS", &[0, 4, 1, 2, 3, 5], NO_TWIST_6),
        ],
    ),
    (
        "S",
        &[
            (
                "EDGES",
                &[0, 3, 2, 7, 4, 1, 6, 5, 8, 9, 10, 11],
                &[0, 1, 0, 1, 0, 1, 0, 1, 0, 0, 0, 0],
            ),
            ("CORNERS", CORNERS_FIXED, NO_TWIST_8),
            ("CENTERS", &[1, 5, 2, 0, 4, 3], &[1, 1, 0, 1, 0, 1]),
        ],
    ),
];

/// Moves defined as a product of other moves, each with an amount of 1 or -1
const CUBE_3X3X3_DERIVED: &[(&str, &[(&str, bool)])] = &[
    ("x", &[("R", false), ("M", true), ("L", true)]),
    ("y", &[("U", false), ("E", true), ("D", true)]),
    ("z", &[("F", false), ("S", false), ("B", true)]),
    ("Rw", &[("R", false), ("M", true)]),
    ("Lw", &[("L", false), ("M", false)]),
    ("Uw", &[("U", false), ("E", true)]),
    ("Dw", &[("D", false), ("E", false)]),
    ("Fw", &[("F", false), ("S", false)]),
    ("Bw", &[("B", false), ("S", true)]),
    ("r", &[("R", false), ("M", true)]),
    ("l", &[("L", false), ("M", false)]),
    ("u", &[("U", false), ("E", true)]),
    ("d", &[("D", false), ("E", false)]),
    ("f", &[("F", false), ("S", false)]),
    ("b", &[("B", false), ("S", true)]),
];

const CUBE_2X2X2_DERIVED: &[(&str, &[(&str, bool)])] = &[
    ("x", &[("R", false), ("L", true)]),
    ("y", &[("U", false), ("D", true)]),
    ("z", &[("F", false), ("B", true)]),
];

fn turn_data(orbits: &[&str], turn: &Turn) -> KTransformationData {
    turn.1
        .iter()
        .filter(|(orbit, _, _)| orbits.contains(orbit))
        .map(|&(orbit, permutation, orientation)| {
            (
                orbit.to_owned(),
                KTransformationOrbitData {
                    permutation: permutation.to_vec(),
                    orientation: orientation.to_vec(),
                },
            )
        })
        .collect()
}

fn cube_definition(
    name: &str,
    orbits: &[(&str, usize, u8)],
    base_turns: &[&[Turn]],
    derived: &[(&str, &[(&str, bool)])],
) -> KPuzzleDefinition {
    let orbit_names = orbits.iter().map(|&(name, _, _)| name).collect::<Vec<_>>();
    let start_pieces: KStateData = orbits
        .iter()
        .map(|&(name, num_pieces, _)| {
            (
                name.to_owned(),
                KStateOrbitData {
                    pieces: (0..num_pieces).collect(),
                    orientation: vec![0; num_pieces],
                },
            )
        })
        .collect();

    let mut definition = KPuzzleDefinition::from_parts(
        name.to_owned(),
        orbits
            .iter()
            .map(|&(name, num_pieces, num_orientations)| {
                (
                    name.to_owned(),
                    KPuzzleOrbitDefinition {
                        num_pieces,
                        num_orientations,
                    },
                )
            })
            .collect(),
        start_pieces,
        base_turns
            .iter()
            .flat_map(|turns| turns.iter())
            .map(|turn| (turn.0.to_owned(), turn_data(&orbit_names, turn)))
            .collect(),
    );

    let mut derived_turns = BTreeMap::new();
    for &(name, parts) in derived {
        let transformation = parts
            .iter()
            .map(|&(part, inverted)| {
                let data = &definition.turns()[part];
                if inverted {
                    invert_transformation_data(&definition, data)
                } else {
                    data.clone()
                }
            })
            .reduce(|acc, next| combine_transformation_data(&definition, &acc, &next))
            .unwrap_or_default();
        derived_turns.insert(name.to_owned(), transformation);
    }
    definition.extend_turns(derived_turns);
    definition
}

static CUBE_3X3X3: LazyLock<KPuzzle> = LazyLock::new(|| {
    KPuzzle::new(cube_definition(
        "3x3x3",
        &[("EDGES", 12, 2), ("CORNERS", 8, 3), ("CENTERS", 6, 4)],
        &[FACE_TURNS, SLICE_TURNS],
        CUBE_3X3X3_DERIVED,
    ))
});

static CUBE_2X2X2: LazyLock<KPuzzle> = LazyLock::new(|| {
    KPuzzle::new(cube_definition(
        "2x2x2",
        &[("CORNERS", 8, 3)],
        &[FACE_TURNS],
        CUBE_2X2X2_DERIVED,
    ))
});

/// The 3x3x3 with face, slice, wide and rotation moves
#[must_use]
pub fn cube3x3x3() -> KPuzzle {
    CUBE_3X3X3.clone()
}

#[must_use]
pub fn cube2x2x2() -> KPuzzle {
    CUBE_2X2X2.clone()
}

#[cfg(test)]
mod tests {
    use alg::{Alg, Move};

    use super::*;
    use crate::definition::KPuzzleDefinitionFields;

    fn revalidate(definition: &KPuzzleDefinition) {
        let fields = KPuzzleDefinitionFields {
            name: definition.name().to_owned(),
            orbits: definition.orbits().clone(),
            start_pieces: definition.start_pieces().clone(),
            turns: definition.turns().clone(),
        };
        assert_eq!(&KPuzzleDefinition::try_from(fields).unwrap(), definition);
    }

    #[test]
    fn definitions_are_valid() {
        revalidate(cube3x3x3().definition());
        revalidate(cube2x2x2().definition());
        assert_eq!(cube3x3x3().definition().turns().len(), 24);
        assert_eq!(cube2x2x2().definition().orbits().len(), 1);
    }

    #[test]
    fn quarter_turns_have_order_four() {
        let kpuzzle = cube3x3x3();
        for name in kpuzzle.definition().turns().keys() {
            let t = kpuzzle.move_to_transformation(&Move::new(name, 4)).unwrap();
            assert!(t.is_identity_transformation(), "{name}");
            let t = kpuzzle.move_to_transformation(&Move::new(name, 2)).unwrap();
            assert!(!t.is_identity_transformation(), "{name}");
        }
    }

    #[test]
    fn rotations_are_consistent() {
        let kpuzzle = cube3x3x3();
        let check = |a: &str, b: &str| {
            let a = kpuzzle.alg_to_transformation(&Alg::parse(a).unwrap()).unwrap();
            let b = kpuzzle.alg_to_transformation(&Alg::parse(b).unwrap()).unwrap();
            assert!(a.is_identical(&b));
        };
        // After a rotation, each face slot holds a different face
        check("x U x'", "F");
        check("y R y'", "B");
        check("z U z'", "L");
        check("x' M x", "M");
        check("y F y'", "R");
        check("Rw", "L x");
    }

    #[test]
    fn cube2x2x2_rotations() {
        let kpuzzle = cube2x2x2();
        let x = kpuzzle
            .alg_to_transformation(&Alg::parse("x U x'").unwrap())
            .unwrap();
        let f = kpuzzle.move_to_transformation(&Move::new("F", 1)).unwrap();
        assert!(x.is_identical(&f));
    }
}
