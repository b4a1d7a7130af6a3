use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, Mutex, PoisonError},
};

use alg::Move;
use internment::ArcIntern;
use kpuzzle::{
    KPuzzle, KPuzzleDefinition, KPuzzleDefinitionFields, KPuzzleOrbitDefinition, KStateOrbitData,
    KTransformationData, KTransformationOrbitData, TurnNotation,
    combine::self_multiply_transformation_data, ksolve::KSolve,
};
use log::{debug, trace};

use crate::{
    PuzzleGeometryError,
    description::{PuzzleCutType, PuzzleDescription},
    generator::PuzzleGeometry,
    options::PuzzleGeometryOptions,
};

impl PuzzleGeometry {
    #[must_use]
    pub fn description(&self) -> &PuzzleDescription {
        &self.description
    }

    #[must_use]
    pub fn options(&self) -> &PuzzleGeometryOptions {
        &self.options
    }

    /// Every orbit the cuts produce, including ones the options leave out of
    /// the definition
    #[must_use]
    pub fn orbit_names(&self) -> Vec<&str> {
        self.orbits.iter().map(|orbit| orbit.name.as_str()).collect()
    }

    /// The turns the definition names, axis by axis
    #[must_use]
    pub fn move_names(&self) -> Vec<String> {
        self.named_turns()
            .into_iter()
            .map(|(name, _, _, _)| name)
            .collect()
    }

    #[must_use]
    pub fn face_names(&self) -> &[ArcIntern<str>] {
        &self.face_names
    }

    #[must_use]
    pub fn edge_names(&self) -> Vec<ArcIntern<str>> {
        self.feature_names(PuzzleCutType::Edge)
    }

    #[must_use]
    pub fn vertex_names(&self) -> Vec<ArcIntern<str>> {
        self.feature_names(PuzzleCutType::Vertex)
    }

    fn feature_names(&self, kind: PuzzleCutType) -> Vec<ArcIntern<str>> {
        self.features
            .iter()
            .filter(|feature| feature.kind == kind)
            .map(|feature| ArcIntern::clone(&feature.name))
            .collect()
    }

    /// The unit direction from the center towards a face, edge, or vertex,
    /// looked up by any spelling the swizzler accepts
    #[must_use]
    pub fn geo_normal(&self, name: &str) -> Option<[f64; 3]> {
        let grip = self.swizzler.unswizzle(name)?;
        self.features
            .iter()
            .find(|feature| feature.name == grip)
            .map(|feature| [feature.normal.b, feature.normal.c, feature.normal.d])
    }

    /// Translates a move to the notation people write, if it has a spelling
    /// there
    #[must_use]
    pub fn external_name(&self, mv: &Move) -> Option<Move> {
        self.notation.notation_to_external(mv)
    }

    fn skip_cubie(&self, cubie: usize) -> bool {
        match self.cubies[cubie].stickers.len() {
            1 => !self.options.include_center_orbits,
            2 => !self.options.include_edge_orbits,
            _ => !self.options.include_corner_orbits,
        }
    }

    /// Which orbits some emitted turn moves, among the kinds the options keep
    fn included_orbits(&self) -> Vec<bool> {
        let mut included = vec![false; self.orbits.len()];
        for (k, axis) in self.axes.iter().enumerate() {
            let all_bits = self
                .turn_sets(k)
                .iter()
                .fold(0, |acc, &(bits, _)| acc | bits);
            for (slice, cycles) in axis.slice_cycles.iter().enumerate() {
                if (all_bits >> slice) & 1 == 0 {
                    continue;
                }
                for cycle in cycles {
                    if !self.skip_cubie(cycle[0].0) {
                        included[self.cubies[cycle[0].0].orbit] = true;
                    }
                }
            }
        }
        included
    }

    /// `(name, axis, bits, amount)` for every emitted turn, with the amount
    /// already part of the name when it is not 1
    fn named_turns(&self) -> Vec<(String, usize, u64, i32)> {
        let mut turns = vec![];
        for (k, axis) in self.axes.iter().enumerate() {
            for (bits, amount) in self.turn_sets(k) {
                let (mut name, _) = PuzzleGeometry::turn_name(axis, bits);
                if amount != 1 {
                    name += &amount.to_string();
                }
                turns.push((name, k, bits, amount));
            }
        }
        turns
    }

    fn restrict(
        &self,
        included: &[bool],
        data: Vec<KTransformationOrbitData>,
    ) -> KTransformationData {
        data.into_iter()
            .zip(&self.orbits)
            .zip(included)
            .filter(|(_, included)| **included)
            .map(|((data, orbit), _)| (orbit.name.clone(), data))
            .collect()
    }

    /// The definition without any turns, which is enough to compose
    /// transformations of the included orbits
    fn base_definition(
        &self,
        included: &[bool],
    ) -> Result<KPuzzleDefinition, PuzzleGeometryError> {
        let mut orbits = BTreeMap::new();
        let mut start_pieces = BTreeMap::new();
        let kept = self
            .orbits
            .iter()
            .zip(included)
            .filter(|(_, included)| **included);
        for (orbit, _) in kept {
            let num_orientations = if self.options.kill_orientation {
                1
            } else {
                orbit.orientations
            };
            orbits.insert(
                orbit.name.clone(),
                KPuzzleOrbitDefinition {
                    num_pieces: orbit.cubies.len(),
                    num_orientations,
                },
            );
            let pieces = if self.options.distinguishable_pieces {
                (0..orbit.cubies.len()).collect()
            } else {
                orbit.cubies.iter().map(|&c| self.cubies[c].value).collect()
            };
            start_pieces.insert(
                orbit.name.clone(),
                KStateOrbitData {
                    pieces,
                    orientation: vec![0; orbit.cubies.len()],
                },
            );
        }
        Ok(KPuzzleDefinition::try_from(KPuzzleDefinitionFields {
            name: self.description.to_string(),
            orbits,
            start_pieces,
            turns: BTreeMap::new(),
        })?)
    }

    /// The combinatorial puzzle: the included orbits, their start state, and
    /// the effect of every emitted turn
    ///
    /// # Errors
    ///
    /// Fails if two emitted turns would share a name
    pub fn to_kpuzzle_definition(&self) -> Result<KPuzzleDefinition, PuzzleGeometryError> {
        let included = self.included_orbits();
        let base = self.base_definition(&included)?;

        let mut turns = BTreeMap::new();
        for (name, k, bits, amount) in self.named_turns() {
            let axis = &self.axes[k];
            let (_, inverted) = PuzzleGeometry::turn_name(axis, bits);
            let once = self.restrict(&included, self.turn_from_bits(axis, bits, inverted));
            let data = self_multiply_transformation_data(&base, &once, amount);
            trace!("Turn {name} moves slices {bits:b}");
            if turns.insert(name.clone(), data).is_some() {
                return Err(PuzzleGeometryError::RedundantTurns(name));
            }
        }
        debug!(
            "{} defines {} orbits and {} turns",
            self.description,
            base.orbits().len(),
            turns.len()
        );

        let fields = KPuzzleDefinitionFields {
            name: base.name().to_owned(),
            orbits: base.orbits().clone(),
            start_pieces: base.start_pieces().clone(),
            turns,
        };
        Ok(KPuzzleDefinition::try_from(fields)?)
    }

    /// The definition in the text format external search tools read
    ///
    /// # Errors
    ///
    /// Fails where `to_kpuzzle_definition` does, or if an orbit is too large
    /// for the format
    pub fn to_ksolve(&self) -> Result<KSolve, PuzzleGeometryError> {
        Ok(KSolve::try_from(&self.to_kpuzzle_definition()?)?)
    }

    /// A puzzle that resolves any move this geometry can parse, not only
    /// the emitted turns
    ///
    /// # Errors
    ///
    /// Fails where `to_kpuzzle_definition` does
    pub fn to_kpuzzle(self: &Arc<Self>) -> Result<KPuzzle, PuzzleGeometryError> {
        let definition = self.to_kpuzzle_definition()?;
        let notation = PgNotation {
            geometry: Arc::clone(self),
            included: self.included_orbits(),
            definition: definition.clone(),
            cache: Mutex::new(HashMap::new()),
        };
        Ok(KPuzzle::new(definition).with_notation(Arc::new(notation)))
    }
}

/// Resolves moves by parsing them against the geometry, so slice ranges and
/// notation aliases work without being emitted as turns
struct PgNotation {
    geometry: Arc<PuzzleGeometry>,
    definition: KPuzzleDefinition,
    included: Vec<bool>,
    cache: Mutex<HashMap<Move, KTransformationData>>,
}

impl TurnNotation for PgNotation {
    fn lookup_move(&self, mv: &Move) -> Option<KTransformationData> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(data) = cache.get(mv) {
            return Some(data.clone());
        }

        let geometry = &self.geometry;
        let turn = geometry.parse_turn(mv).ok()?;
        let axis = &geometry.axes[turn.axis];
        let once = geometry.restrict(
            &self.included,
            geometry.turn_from_bits(axis, turn.bits(axis.planes.len()), !turn.first_grip),
        );
        let data = self_multiply_transformation_data(&self.definition, &once, turn.amount);
        cache.insert(mv.clone(), data.clone());
        Some(data)
    }
}
