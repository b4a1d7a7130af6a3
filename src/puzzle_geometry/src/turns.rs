//! Turns as bit sets of slices: which sets an axis offers, what they are
//! called, how a move name picks one out, and how one permutes the pieces

use alg::{Move, parse_move};
use kpuzzle::KTransformationOrbitData;
use log::trace;

use crate::{
    PuzzleGeometryError,
    description::PuzzleCutType,
    generator::{Axis, PuzzleGeometry},
};

/// A move name resolved against the puzzle's axes. Slices are counted from
/// zero starting at the named grip, and `lo..=hi` are the ones that turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ParsedTurn {
    pub axis: usize,
    pub lo: usize,
    pub hi: usize,
    /// Whether the move names the grip the axis normal points at
    pub first_grip: bool,
    pub amount: i32,
}

impl ParsedTurn {
    /// The slices that turn, as bits counted from the axis's first grip
    pub fn bits(&self, planes: usize) -> u64 {
        if self.first_grip {
            (2 << self.hi) - (1 << self.lo)
        } else {
            (2 << (planes - self.lo)) - (1 << (planes - self.hi))
        }
    }
}

/// The whole axis: every slice turns
fn full_bits(planes: usize) -> u64 {
    (2 << planes) - 1
}

impl PuzzleGeometry {
    /// The slice sets, with amounts, emitted as turns for one axis
    pub(crate) fn turn_sets(&self, axis_index: usize) -> Vec<(u64, i32)> {
        let axis = &self.axes[axis_index];
        let slices = axis.planes.len();
        let options = &self.options;
        let outer = options.outer_block_moves;

        let mut sets = vec![];
        if let Some(turns) = &self.move_list {
            sets.extend(
                turns
                    .iter()
                    .filter(|turn| turn.axis == axis_index)
                    .map(|turn| (turn.bits(slices), turn.amount)),
            );
        } else if options.vertex_moves && !options.all_moves {
            if axis.positive.1 != axis.negative.1 {
                for i in 0..slices {
                    let bits = match (axis.positive.1 == PuzzleCutType::Vertex, outer) {
                        (false, true) => (2 << slices) - (2 << i),
                        (false, false) => 2 << i,
                        (true, true) => (2 << i) - 1,
                        (true, false) => 1 << i,
                    };
                    sets.push((bits, 1));
                }
            }
        } else {
            for i in 0..=slices {
                // The middle slice of an odd axis is left to the other turns
                if !options.all_moves && i + i == slices {
                    continue;
                }
                let bits = if !outer {
                    1 << i
                } else if i + i > slices {
                    (2 << slices) - (1 << i)
                } else {
                    (2 << i) - 1
                };
                sets.push((bits, 1));
            }
        }
        if options.add_rotations && !options.all_moves {
            sets.push((full_bits(slices), 1));
        }

        if let Some(fixed) = self.fixed_slice(axis) {
            let dependent = 1 << fixed;
            let mut kept: Vec<(u64, i32)> = vec![];
            for (bits, amount) in sets {
                let bits = if bits & dependent == 0 {
                    bits
                } else {
                    full_bits(slices) - bits
                };
                if bits != 0 && !kept.contains(&(bits, amount)) {
                    kept.push((bits, amount));
                }
            }
            sets = kept;
        }
        sets
    }

    /// The name of a slice set, and whether it is named from the grip
    /// opposite the axis normal, which turns it the other way
    pub(crate) fn turn_name(axis: &Axis, bits: u64) -> (String, bool) {
        let slices = axis.planes.len();
        let mirrored = (0..=slices)
            .filter(|i| (bits >> i) & 1 == 1)
            .fold(0, |acc, i| acc | (1 << (slices - i)));
        let (grip, bits, inverted) = if mirrored < bits {
            (&axis.negative.0, mirrored, true)
        } else {
            (&axis.positive.0, bits, false)
        };

        let hibit = bits.checked_ilog2().unwrap_or(0);
        let name = if bits == full_bits(slices) {
            format!("{grip}v")
        } else if bits == 1 << hibit {
            if hibit > 0 {
                format!("{}{grip}", hibit + 1)
            } else {
                grip.to_string()
            }
        } else if bits == (2 << hibit) - 1 {
            let grip = grip.to_lowercase();
            if hibit > 1 {
                format!("{}{grip}", hibit + 1)
            } else {
                grip
            }
        } else {
            format!("_{bits}_{grip}")
        };
        (name, inverted)
    }

    /// How turning a set of slices once moves the pieces of every orbit,
    /// indexed like the orbits
    pub(crate) fn turn_from_bits(
        &self,
        axis: &Axis,
        bits: u64,
        inverted: bool,
    ) -> Vec<KTransformationOrbitData> {
        let mut permutations = self
            .orbits
            .iter()
            .map(|orbit| (0..orbit.cubies.len()).collect::<Vec<_>>())
            .collect::<Vec<_>>();
        let mut twists = self
            .orbits
            .iter()
            .map(|orbit| vec![0_u8; orbit.cubies.len()])
            .collect::<Vec<_>>();
        let oriented =
            |orbit: usize| self.orbits[orbit].orientations > 1 && !self.options.kill_orientation;

        for (slice, cycles) in axis.slice_cycles.iter().enumerate() {
            if (bits >> slice) & 1 == 0 {
                continue;
            }
            for cycle in cycles {
                let orbit = self.cubies[cycle[0].0].orbit;
                let orientations = self.orbits[orbit].orientations;
                let step = if inverted { cycle.len() - 1 } else { 1 };
                for (i, &(cubie, facet)) in cycle.iter().enumerate() {
                    let (next_cubie, next_facet) = cycle[(i + step) % cycle.len()];
                    let here = self.cubies[cubie].ordinal;
                    permutations[orbit][self.cubies[next_cubie].ordinal] = here;
                    if oriented(orbit) {
                        twists[orbit][here] =
                            (next_facet + 2 * orientations - facet) % orientations;
                    }
                }
            }
        }

        permutations
            .into_iter()
            .zip(twists)
            .enumerate()
            .map(|(orbit, (permutation, twists))| {
                let orientation = if oriented(orbit) {
                    permutation.iter().map(|&source| twists[source]).collect()
                } else {
                    vec![0; permutation.len()]
                };
                KTransformationOrbitData {
                    permutation,
                    orientation,
                }
            })
            .collect()
    }

    /// # Errors
    ///
    /// Fails if the name is not a move, or names no turn of this puzzle
    pub(crate) fn parse_turn_name(&self, name: &str) -> Result<ParsedTurn, PuzzleGeometryError> {
        let mv = parse_move(name).map_err(|_| PuzzleGeometryError::BadTurn(name.to_owned()))?;
        self.parse_turn(&mv)
    }

    /// Finds the axis, slice range, and amount a move refers to, after
    /// translating it out of the puzzle's notation
    pub(crate) fn parse_turn(&self, mv: &Move) -> Result<ParsedTurn, PuzzleGeometryError> {
        let internal = self
            .notation
            .notation_to_internal(mv)
            .ok_or_else(|| PuzzleGeometryError::BadTurn(mv.to_string()))?;
        let mut grip = internal.family().to_owned();
        let capitalized = grip.chars().next().is_some_and(|c| c <= 'Z');
        let mut full_rotation = false;
        if capitalized && grip.ends_with('v') {
            if internal.quantum().has_layers() {
                return Err(PuzzleGeometryError::PrefixWithRotation(mv.to_string()));
            }
            grip.pop();
            full_rotation = true;
        }
        if capitalized && grip.ends_with('w') {
            grip.pop();
            grip = grip.to_lowercase();
        }

        let bad_grip = || PuzzleGeometryError::BadGrip(mv.to_string());
        let geo_name = self.swizzler.unswizzle(&grip).ok_or_else(bad_grip)?;
        let mut found = None;
        for (i, axis) in self.axes.iter().enumerate() {
            if axis.positive.0 == geo_name {
                found = Some((i, true));
            }
            if axis.negative.0 == geo_name {
                found = Some((i, false));
            }
        }
        let (axis, first_grip) = found.ok_or_else(bad_grip)?;
        let planes = i64::try_from(self.axes[axis].planes.len()).unwrap_or(i64::MAX);

        let mut lo = 1;
        let mut hi = if grip.to_uppercase() == grip { 1 } else { 2 };
        if let Some(outer) = internal.outer_layer() {
            lo = i64::from(outer);
        }
        if let Some(inner) = internal.inner_layer() {
            hi = i64::from(inner);
            if internal.outer_layer().is_none() {
                lo = if *geo_name == *grip { hi } else { 1 };
            }
        }
        lo -= 1;
        hi -= 1;
        if full_rotation {
            lo = 0;
            hi = planes;
        }

        let in_range = |slice: i64| (0..=planes).contains(&slice);
        let (Ok(lo_slice), Ok(hi_slice)) = (usize::try_from(lo), usize::try_from(hi)) else {
            return Err(PuzzleGeometryError::BadSliceSpec {
                turn: mv.to_string(),
                lo,
                hi,
            });
        };
        if !in_range(lo) || !in_range(hi) || lo > hi {
            return Err(PuzzleGeometryError::BadSliceSpec {
                turn: mv.to_string(),
                lo,
                hi,
            });
        }
        if !self.options.permissive_move_parsing && lo == 0 && hi == planes && !full_rotation {
            return Err(PuzzleGeometryError::FullPuzzleRotation(mv.to_string()));
        }

        trace!("{mv} turns slices {lo}..={hi} of the axis through {geo_name}");
        Ok(ParsedTurn {
            axis,
            lo: lo_slice,
            hi: hi_slice,
            first_grip,
            amount: internal.amount(),
        })
    }
}
