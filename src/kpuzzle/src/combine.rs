//! The transformation algebra on raw orbit data. Slot `i` of a result takes
//! its piece from slot `permutation[i]` of whatever the transformation is
//! applied to, then adds `orientation[i]`. Composition follows the same rule
//! with the first transformation standing in for the state, so applying
//! `combine(a, b)` is the same as applying `a` and then `b`.

use crate::definition::{
    KPuzzleDefinition, KStateData, KStateOrbitData, KTransformationData, KTransformationOrbitData,
};

fn add_orientation(a: u8, b: u8, orientations: u8) -> u8 {
    // Sums of two u8 orientations exceed u8
    let sum = (u16::from(a) + u16::from(b)) % u16::from(orientations.max(1));
    sum as u8
}

fn orientations(definition: &KPuzzleDefinition, orbit: &str) -> u8 {
    definition
        .orbit(orbit)
        .map_or(1, |orbit_def| orbit_def.num_orientations)
}

#[must_use]
pub fn identity_transformation_data(definition: &KPuzzleDefinition) -> KTransformationData {
    definition
        .orbits()
        .iter()
        .map(|(name, orbit_def)| {
            (
                name.clone(),
                KTransformationOrbitData {
                    permutation: (0..orbit_def.num_pieces).collect(),
                    orientation: vec![0; orbit_def.num_pieces],
                },
            )
        })
        .collect()
}

#[must_use]
pub fn is_identity_transformation_data(transformation: &KTransformationData) -> bool {
    transformation.values().all(|orbit| {
        orbit.permutation.iter().enumerate().all(|(i, &p)| i == p)
            && orbit.orientation.iter().all(|&o| o == 0)
    })
}

#[must_use]
pub fn apply_transformation_data_to_state_data(
    definition: &KPuzzleDefinition,
    state: &KStateData,
    transformation: &KTransformationData,
) -> KStateData {
    state
        .iter()
        .map(|(name, state_orbit)| {
            let Some(orbit) = transformation.get(name) else {
                return (name.clone(), state_orbit.clone());
            };
            let orientations = orientations(definition, name);
            let (pieces, orientation) = orbit
                .permutation
                .iter()
                .zip(&orbit.orientation)
                .map(|(&source, &delta)| {
                    (
                        state_orbit.pieces[source],
                        add_orientation(state_orbit.orientation[source], delta, orientations),
                    )
                })
                .unzip();
            (
                name.clone(),
                KStateOrbitData {
                    pieces,
                    orientation,
                },
            )
        })
        .collect()
}

/// The transformation equivalent to applying `first` and then `second`
#[must_use]
pub fn combine_transformation_data(
    definition: &KPuzzleDefinition,
    first: &KTransformationData,
    second: &KTransformationData,
) -> KTransformationData {
    first
        .iter()
        .map(|(name, first_orbit)| {
            let Some(second_orbit) = second.get(name) else {
                return (name.clone(), first_orbit.clone());
            };
            let orientations = orientations(definition, name);
            let (permutation, orientation) = second_orbit
                .permutation
                .iter()
                .zip(&second_orbit.orientation)
                .map(|(&source, &delta)| {
                    (
                        first_orbit.permutation[source],
                        add_orientation(first_orbit.orientation[source], delta, orientations),
                    )
                })
                .unzip();
            (
                name.clone(),
                KTransformationOrbitData {
                    permutation,
                    orientation,
                },
            )
        })
        .collect()
}

#[must_use]
pub fn invert_transformation_data(
    definition: &KPuzzleDefinition,
    transformation: &KTransformationData,
) -> KTransformationData {
    transformation
        .iter()
        .map(|(name, orbit)| {
            let orientations = orientations(definition, name).max(1);
            let mut permutation = vec![0; orbit.permutation.len()];
            let mut orientation = vec![0; orbit.orientation.len()];
            for (i, (&p, &o)) in orbit.permutation.iter().zip(&orbit.orientation).enumerate() {
                permutation[p] = i;
                orientation[p] = (orientations - o % orientations) % orientations;
            }
            (
                name.clone(),
                KTransformationOrbitData {
                    permutation,
                    orientation,
                },
            )
        })
        .collect()
}

/// Composes a transformation with itself `amount` times, using the inverse
/// for negative amounts
#[must_use]
pub fn self_multiply_transformation_data(
    definition: &KPuzzleDefinition,
    transformation: &KTransformationData,
    amount: i32,
) -> KTransformationData {
    if amount == 0 {
        return identity_transformation_data(definition);
    }
    let mut base = if amount < 0 {
        invert_transformation_data(definition, transformation)
    } else {
        transformation.clone()
    };
    if amount.unsigned_abs() == 1 {
        return base;
    }

    // Powers of one transformation commute, so squaring order is irrelevant
    let mut remaining = amount.unsigned_abs();
    let mut result: Option<KTransformationData> = None;
    loop {
        if remaining & 1 == 1 {
            result = Some(match result {
                Some(result) => combine_transformation_data(definition, &result, &base),
                None => base.clone(),
            });
        }
        remaining >>= 1;
        if remaining == 0 {
            break;
        }
        base = combine_transformation_data(definition, &base, &base);
    }
    result.unwrap_or_else(|| identity_transformation_data(definition))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::definition::{KPuzzleDefinitionFields, KPuzzleOrbitDefinition};

    fn definition() -> KPuzzleDefinition {
        let turn = |permutation: Vec<usize>, orientation: Vec<u8>| {
            BTreeMap::from([(
                "PIECES".to_owned(),
                KTransformationOrbitData {
                    permutation,
                    orientation,
                },
            )])
        };
        KPuzzleDefinition::try_from(KPuzzleDefinitionFields {
            name: "four".to_owned(),
            orbits: BTreeMap::from([(
                "PIECES".to_owned(),
                KPuzzleOrbitDefinition {
                    num_pieces: 4,
                    num_orientations: 3,
                },
            )]),
            start_pieces: BTreeMap::from([(
                "PIECES".to_owned(),
                KStateOrbitData {
                    pieces: vec![0, 1, 2, 3],
                    orientation: vec![0; 4],
                },
            )]),
            turns: BTreeMap::from([
                ("A".to_owned(), turn(vec![1, 2, 3, 0], vec![1, 0, 2, 0])),
                ("B".to_owned(), turn(vec![0, 1, 3, 2], vec![0, 1, 1, 1])),
            ]),
        })
        .unwrap()
    }

    #[test]
    fn application_looks_up_sources() {
        let def = definition();
        let state = apply_transformation_data_to_state_data(
            &def,
            def.start_pieces(),
            &def.turns()["A"],
        );
        assert_eq!(state["PIECES"].pieces, vec![1, 2, 3, 0]);
        assert_eq!(state["PIECES"].orientation, vec![1, 0, 2, 0]);

        let again = apply_transformation_data_to_state_data(&def, &state, &def.turns()["A"]);
        assert_eq!(again["PIECES"].pieces, vec![2, 3, 0, 1]);
        assert_eq!(again["PIECES"].orientation, vec![1, 2, 2, 1]);
    }

    #[test]
    fn combination_matches_sequential_application() {
        let def = definition();
        let a = &def.turns()["A"];
        let b = &def.turns()["B"];

        let sequential = apply_transformation_data_to_state_data(
            &def,
            &apply_transformation_data_to_state_data(&def, def.start_pieces(), a),
            b,
        );
        let combined = apply_transformation_data_to_state_data(
            &def,
            def.start_pieces(),
            &combine_transformation_data(&def, a, b),
        );
        assert_eq!(sequential, combined);
    }

    #[test]
    fn inverse_cancels() {
        let def = definition();
        let a = &def.turns()["A"];
        let ab = combine_transformation_data(&def, a, &def.turns()["B"]);
        for t in [a, &ab] {
            let inverse = invert_transformation_data(&def, t);
            assert!(is_identity_transformation_data(&combine_transformation_data(
                &def, t, &inverse
            )));
            assert!(is_identity_transformation_data(&combine_transformation_data(
                &def, &inverse, t
            )));
        }
    }

    #[test]
    fn identity_is_neutral() {
        let def = definition();
        let identity = identity_transformation_data(&def);
        assert!(is_identity_transformation_data(&identity));
        let a = &def.turns()["A"];
        assert_eq!(&combine_transformation_data(&def, a, &identity), a);
        assert_eq!(&combine_transformation_data(&def, &identity, a), a);
    }

    #[test]
    fn self_multiplication() {
        let def = definition();
        let a = &def.turns()["A"];
        let mut naive = identity_transformation_data(&def);
        for amount in 1..=13 {
            naive = combine_transformation_data(&def, &naive, a);
            assert_eq!(self_multiply_transformation_data(&def, a, amount), naive);
        }
        assert!(is_identity_transformation_data(
            &self_multiply_transformation_data(&def, a, 0)
        ));
        assert_eq!(
            self_multiply_transformation_data(&def, a, -1),
            invert_transformation_data(&def, a)
        );
        // A cycles four pieces and twists by 1 + 2 = 0 mod 3 per cycle
        assert!(is_identity_transformation_data(
            &self_multiply_transformation_data(&def, a, 4)
        ));
    }
}
