//! Conversions between the move names people write and the grip names the
//! generator derives

use std::fmt;

use alg::{Move, QuantumMove};
use internment::ArcIntern;

use crate::swizzler::FaceNameSwizzler;

pub trait NotationMapper: Send + Sync + fmt::Debug {
    /// The internal spelling of an external move, or `None` if the notation
    /// has no such move
    fn notation_to_internal(&self, mv: &Move) -> Option<Move>;

    fn notation_to_external(&self, mv: &Move) -> Option<Move>;
}

/// Leaves every move alone
#[derive(Debug, Default)]
pub struct NullMapper;

impl NotationMapper for NullMapper {
    fn notation_to_internal(&self, mv: &Move) -> Option<Move> {
        Some(mv.clone())
    }

    fn notation_to_external(&self, mv: &Move) -> Option<Move> {
        Some(mv.clone())
    }
}

/// Cube rotations and middle slices for an NxNxN cube with `slices` layers
#[derive(Debug)]
pub struct NxNxNCubeMapper {
    slices: u32,
}

impl NxNxNCubeMapper {
    #[must_use]
    pub fn new(slices: u32) -> NxNxNCubeMapper {
        NxNxNCubeMapper { slices }
    }
}

impl NotationMapper for NxNxNCubeMapper {
    fn notation_to_internal(&self, mv: &Move) -> Option<Move> {
        if mv.quantum().has_layers() {
            return Some(mv.clone());
        }
        let amount = mv.amount();
        let slices = self.slices;
        let family = mv.family();
        let internal = match family {
            "x" => Move::new("Rv", amount),
            "y" => Move::new("Uv", amount),
            "z" => Move::new("Fv", amount),
            "E" | "M" | "S" if slices % 2 == 1 => {
                let face = match family {
                    "E" => "D",
                    "M" => "L",
                    _ => "F",
                };
                Move::from_quantum(QuantumMove::with_inner_layer(face, slices.div_ceil(2)), amount)
            }
            "e" | "m" | "s" if slices > 2 => {
                let face = match family {
                    "e" => "D",
                    "m" => "L",
                    _ => "F",
                };
                Move::from_quantum(QuantumMove::with_layers(face, 2, slices - 1), amount)
            }
            _ => mv.clone(),
        };
        Some(internal)
    }

    fn notation_to_external(&self, mv: &Move) -> Option<Move> {
        if mv.quantum().has_layers() {
            return Some(mv.clone());
        }
        let amount = mv.amount();
        Some(match mv.family() {
            "Rv" => Move::new("x", amount),
            "Uv" => Move::new("y", amount),
            "Fv" => Move::new("z", amount),
            "Lv" => Move::new("x", -amount),
            "Dv" => Move::new("y", -amount),
            "Bv" => Move::new("z", -amount),
            _ => mv.clone(),
        })
    }
}

/// Renames faces one for one, as when a solid's derived face names differ
/// from the ones its solvers use
#[derive(Debug)]
pub struct FaceRenamingMapper {
    internal: FaceNameSwizzler,
    external: FaceNameSwizzler,
}

impl FaceRenamingMapper {
    /// `names` pairs each internal face name with its external one
    #[must_use]
    pub fn new(names: &[(&str, &str)]) -> FaceRenamingMapper {
        let (internal, external): (Vec<_>, Vec<_>) = names
            .iter()
            .map(|&(internal, external)| (ArcIntern::from(internal), ArcIntern::from(external)))
            .unzip();
        FaceRenamingMapper {
            internal: FaceNameSwizzler::new(internal),
            external: FaceNameSwizzler::new(external),
        }
    }

    fn convert(family: &str, from: &FaceNameSwizzler, to: &FaceNameSwizzler) -> Option<String> {
        let mut grip = family;
        let mut suffix = "";
        if grip.chars().next().is_some_and(|c| c <= 'Z')
            && (grip.ends_with('v') || grip.ends_with('w'))
        {
            suffix = &grip[grip.len() - 1..];
            grip = &grip[..grip.len() - 1];
        }
        let upper = grip.to_uppercase();
        let converted = to.join(&from.split(&upper)?);
        if upper == grip {
            Some(converted + suffix)
        } else {
            Some(converted.to_lowercase() + suffix)
        }
    }

    fn convert_move(mv: &Move, from: &FaceNameSwizzler, to: &FaceNameSwizzler) -> Option<Move> {
        let family = Self::convert(mv.family(), from, to)?;
        Some(Move::from_quantum(
            mv.quantum().with_family(&family),
            mv.amount(),
        ))
    }
}

impl NotationMapper for FaceRenamingMapper {
    fn notation_to_internal(&self, mv: &Move) -> Option<Move> {
        Self::convert_move(mv, &self.external, &self.internal)
    }

    fn notation_to_external(&self, mv: &Move) -> Option<Move> {
        Self::convert_move(mv, &self.internal, &self.external)
    }
}

/// The `R++`/`D--` moves and rotations found in megaminx scrambles, on top
/// of another mapper for everything else
#[derive(Debug)]
pub struct MegaminxScramblingNotationMapper {
    child: Box<dyn NotationMapper>,
}

impl MegaminxScramblingNotationMapper {
    #[must_use]
    pub fn new(child: Box<dyn NotationMapper>) -> MegaminxScramblingNotationMapper {
        MegaminxScramblingNotationMapper { child }
    }
}

impl NotationMapper for MegaminxScramblingNotationMapper {
    fn notation_to_internal(&self, mv: &Move) -> Option<Move> {
        if !mv.quantum().has_layers() {
            let amount = mv.amount();
            let wide = |face: &str, amount: i32| {
                Some(Move::from_quantum(QuantumMove::with_layers(face, 2, 3), amount))
            };
            if amount.abs() == 1 {
                match mv.family() {
                    "R++" => return wide("L", -2 * amount),
                    "R--" => return wide("L", 2 * amount),
                    "D++" => return wide("U", -2 * amount),
                    "D--" => return wide("U", 2 * amount),
                    "R_PLUSPLUS" => return wide("L", -amount),
                    "D_PLUSPLUS" => return wide("U", -amount),
                    _ => {}
                }
            }
            if mv.family() == "y" {
                return Some(Move::new("Uv", amount));
            }
            if mv.family() == "x" && amount.abs() == 2 {
                return Some(Move::new("ERv", amount / 2));
            }
        }
        self.child.notation_to_internal(mv)
    }

    fn notation_to_external(&self, mv: &Move) -> Option<Move> {
        let amount = mv.amount();
        match mv.family() {
            "ERv" if amount.abs() == 1 => {
                Some(Move::from_quantum(mv.quantum().with_family("x"), amount * 2))
            }
            "ILv" if amount.abs() == 1 => {
                Some(Move::from_quantum(mv.quantum().with_family("x"), -amount * 2))
            }
            "Uv" => Some(Move::from_quantum(mv.quantum().with_family("y"), amount)),
            "Dv" => Some(Move::from_quantum(mv.quantum().with_family("y"), -amount)),
            _ => self.child.notation_to_external(mv),
        }
    }
}
