use std::{fs, path::PathBuf, sync::Arc};

use clap::{Args, ValueEnum};
use color_eyre::eyre::WrapErr;
use log::debug;
use puzzle_geometry::{
    PuzzleCutType, PuzzleGeometry, PuzzleGeometryOptions, get_puzzle_geometry_by_desc,
    puzzle_description,
};

#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum Piece {
    /// A face center
    F,
    /// An edge
    E,
    /// A corner
    V,
}

impl From<Piece> for PuzzleCutType {
    fn from(piece: Piece) -> PuzzleCutType {
        match piece {
            Piece::F => PuzzleCutType::Face,
            Piece::E => PuzzleCutType::Edge,
            Piece::V => PuzzleCutType::Vertex,
        }
    }
}

/// Generation settings. Flags given here override the options file.
#[derive(Debug, Args)]
pub struct OptionArgs {
    /// A TOML file of puzzle options
    #[arg(long, value_name = "FILE")]
    options: Option<PathBuf>,
    /// Emit every slice, including middle slices
    #[arg(long)]
    all_moves: bool,
    /// Turn outer blocks instead of single slices
    #[arg(long)]
    outer_block_moves: bool,
    /// Name tetrahedral turns by vertex
    #[arg(long)]
    vertex_moves: bool,
    /// Also emit whole-puzzle rotations
    #[arg(long)]
    add_rotations: bool,
    /// Give every orbit a single orientation
    #[arg(long)]
    kill_orientation: bool,
    /// Track which way each face center points
    #[arg(long)]
    orient_centers: bool,
    #[arg(long)]
    no_corners: bool,
    #[arg(long)]
    no_edges: bool,
    #[arg(long)]
    no_centers: bool,
    /// Hold one piece of this kind in place
    #[arg(long, value_enum)]
    fix_piece: Option<Piece>,
    /// Only emit these turns, separated by commas
    #[arg(long, value_delimiter = ',')]
    moves: Option<Vec<String>>,
    /// Let identical looking pieces share a start value
    #[arg(long)]
    indistinguishable: bool,
    /// Accept turns of every layer without `v`
    #[arg(long)]
    permissive: bool,
}

impl OptionArgs {
    pub fn options(&self) -> color_eyre::Result<PuzzleGeometryOptions> {
        let mut options = match &self.options {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .wrap_err_with(|| format!("Failed to read the options file {path:?}"))?;
                PuzzleGeometryOptions::from_toml(&text)
                    .wrap_err_with(|| format!("Failed to parse the options file {path:?}"))?
            }
            None => PuzzleGeometryOptions::default(),
        };

        options.all_moves |= self.all_moves;
        options.outer_block_moves |= self.outer_block_moves;
        options.vertex_moves |= self.vertex_moves;
        options.add_rotations |= self.add_rotations;
        options.kill_orientation |= self.kill_orientation;
        options.orient_centers |= self.orient_centers;
        options.include_corner_orbits &= !self.no_corners;
        options.include_edge_orbits &= !self.no_edges;
        options.include_center_orbits &= !self.no_centers;
        options.distinguishable_pieces &= !self.indistinguishable;
        options.permissive_move_parsing |= self.permissive;
        if let Some(piece) = self.fix_piece {
            options.fix_piece = Some(piece.into());
        }
        if let Some(moves) = &self.moves {
            options.move_list = Some(moves.clone());
        }

        debug!("Generating with {options:?}");
        Ok(options)
    }
}

/// Accepts a catalogue name such as `megaminx` or a description such as
/// `c f 0.5 f 0`
pub fn geometry(
    name_or_description: &str,
    options: &PuzzleGeometryOptions,
) -> color_eyre::Result<Arc<PuzzleGeometry>> {
    let description = puzzle_description(name_or_description).unwrap_or(name_or_description);
    Ok(get_puzzle_geometry_by_desc(description, options)?)
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        options: OptionArgs,
    }

    fn options(args: &[&str]) -> PuzzleGeometryOptions {
        let args = std::iter::once("twisty").chain(args.iter().copied());
        Wrapper::parse_from(args).options.options().unwrap()
    }

    #[test]
    fn flags_set_options() {
        assert_eq!(options(&[]), PuzzleGeometryOptions::default());

        let set = options(&[
            "--all-moves",
            "--orient-centers",
            "--no-centers",
            "--fix-piece",
            "v",
            "--moves",
            "R,U",
        ]);
        assert!(set.all_moves);
        assert!(set.orient_centers);
        assert!(!set.include_center_orbits);
        assert!(set.include_edge_orbits);
        assert_eq!(set.fix_piece, Some(PuzzleCutType::Vertex));
        assert_eq!(
            set.move_list,
            Some(vec!["R".to_owned(), "U".to_owned()])
        );
    }

    #[test]
    fn names_and_descriptions_both_resolve() {
        let options = PuzzleGeometryOptions::default();
        let by_name = geometry("2x2x2", &options).unwrap();
        let by_description = geometry("c f 0", &options).unwrap();
        assert!(Arc::ptr_eq(&by_name, &by_description));
        assert!(geometry("not a puzzle", &options).is_err());
    }
}
