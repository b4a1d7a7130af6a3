use serde::{Deserialize, Serialize};

use crate::description::PuzzleCutType;

/// Settings that change which orbits and turns a generated puzzle has
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct PuzzleGeometryOptions {
    /// Emit every slice, including the middle one of an odd-layered axis
    pub all_moves: bool,
    /// Turn blocks of layers from the outside in rather than single slices
    pub outer_block_moves: bool,
    /// Name tetrahedral turns by vertex rather than by face
    pub vertex_moves: bool,
    /// Also emit whole-puzzle rotations
    pub add_rotations: bool,
    /// Treat every orbit as having one orientation
    pub kill_orientation: bool,
    /// Give face centers an orientation per corner of their face, so turning
    /// a center in place changes the state
    pub orient_centers: bool,
    pub include_corner_orbits: bool,
    pub include_edge_orbits: bool,
    pub include_center_orbits: bool,
    /// Keep one piece of this kind still, choosing turns that never move it
    pub fix_piece: Option<PuzzleCutType>,
    /// Only emit these turns
    pub move_list: Option<Vec<String>>,
    /// When false, pieces that look the same share a start state value
    pub distinguishable_pieces: bool,
    /// Accept turns of every layer without the `v` marker
    pub permissive_move_parsing: bool,
}

impl Default for PuzzleGeometryOptions {
    fn default() -> Self {
        PuzzleGeometryOptions {
            all_moves: false,
            outer_block_moves: false,
            vertex_moves: false,
            add_rotations: false,
            kill_orientation: false,
            orient_centers: false,
            include_corner_orbits: true,
            include_edge_orbits: true,
            include_center_orbits: true,
            fix_piece: None,
            move_list: None,
            distinguishable_pieces: true,
            permissive_move_parsing: false,
        }
    }
}

impl PuzzleGeometryOptions {
    /// Reads options from TOML. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Fails if the TOML is malformed or a key has the wrong type
    pub fn from_toml(toml: &str) -> Result<PuzzleGeometryOptions, toml::de::Error> {
        toml::from_str(toml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_keys() {
        assert_eq!(
            PuzzleGeometryOptions::from_toml("").unwrap(),
            PuzzleGeometryOptions::default()
        );

        let options = PuzzleGeometryOptions::from_toml(
            r#"
            all_moves = true
            orient_centers = true
            include_center_orbits = false
            fix_piece = "v"
            move_list = ["R", "U"]
            "#,
        )
        .unwrap();
        assert!(options.all_moves);
        assert!(options.orient_centers);
        assert!(!options.include_center_orbits);
        assert!(options.include_edge_orbits);
        assert_eq!(options.fix_piece, Some(PuzzleCutType::Vertex));
        assert_eq!(options.move_list, Some(vec!["R".to_owned(), "U".to_owned()]));
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(PuzzleGeometryOptions::from_toml("all_moves = 3").is_err());
        assert!(PuzzleGeometryOptions::from_toml(r#"fix_piece = "x""#).is_err());
    }
}
