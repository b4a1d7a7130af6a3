use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::PuzzleGeometryError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PuzzleBaseShape {
    Tetrahedron,
    Cube,
    Octahedron,
    Dodecahedron,
    Icosahedron,
}

/// A kind of cut, or the kind of feature a cut's normal passes through
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PuzzleCutType {
    #[serde(rename = "f")]
    Face,
    #[serde(rename = "v")]
    Vertex,
    #[serde(rename = "e")]
    Edge,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PuzzleCutDescription {
    pub cut_type: PuzzleCutType,
    pub distance: f64,
}

/// A solid and the cuts through it, as in `c f 0.333333333333333`. Cut
/// distances are measured from the center, with 1 being the distance to a
/// face.
#[derive(Clone, Debug, PartialEq)]
pub struct PuzzleDescription {
    pub shape: PuzzleBaseShape,
    pub cuts: Vec<PuzzleCutDescription>,
}

impl PuzzleBaseShape {
    fn token(self) -> char {
        match self {
            PuzzleBaseShape::Tetrahedron => 't',
            PuzzleBaseShape::Cube => 'c',
            PuzzleBaseShape::Octahedron => 'o',
            PuzzleBaseShape::Dodecahedron => 'd',
            PuzzleBaseShape::Icosahedron => 'i',
        }
    }
}

impl PuzzleCutType {
    fn token(self) -> char {
        match self {
            PuzzleCutType::Face => 'f',
            PuzzleCutType::Vertex => 'v',
            PuzzleCutType::Edge => 'e',
        }
    }
}

impl FromStr for PuzzleDescription {
    type Err = PuzzleGeometryError;

    fn from_str(puzzle_description_string: &str) -> Result<Self, Self::Err> {
        let args = puzzle_description_string
            .split_whitespace()
            .collect::<Vec<_>>();
        if args.len() % 2 == 0 {
            return Err(PuzzleGeometryError::BadArgumentCount(
                puzzle_description_string.to_owned(),
            ));
        }
        let shape = match args[0] {
            "o" => PuzzleBaseShape::Octahedron,
            "c" => PuzzleBaseShape::Cube,
            "i" => PuzzleBaseShape::Icosahedron,
            "d" => PuzzleBaseShape::Dodecahedron,
            "t" => PuzzleBaseShape::Tetrahedron,
            shape => return Err(PuzzleGeometryError::BadShape(shape.to_owned())),
        };
        let cuts = args[1..]
            .chunks(2)
            .map(|chunk| {
                let cut_type = match chunk[0] {
                    "f" => PuzzleCutType::Face,
                    "v" => PuzzleCutType::Vertex,
                    "e" => PuzzleCutType::Edge,
                    cut => return Err(PuzzleGeometryError::BadCut(cut.to_owned())),
                };
                let distance = chunk[1]
                    .parse::<f64>()
                    .ok()
                    .filter(|distance| distance.is_finite())
                    .ok_or_else(|| PuzzleGeometryError::BadCutDistance(chunk[1].to_owned()))?;
                Ok(PuzzleCutDescription { cut_type, distance })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { shape, cuts })
    }
}

impl fmt::Display for PuzzleDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.shape.token())?;
        for cut in &self.cuts {
            write!(f, " {} {}", cut.cut_type.token(), cut.distance)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_descriptions() {
        let description = "c f 0.333333333333333".parse::<PuzzleDescription>().unwrap();
        assert_eq!(description.shape, PuzzleBaseShape::Cube);
        assert_eq!(
            description.cuts,
            vec![PuzzleCutDescription {
                cut_type: PuzzleCutType::Face,
                distance: 0.333_333_333_333_333
            }]
        );

        let description = "t  v 0.333333333333333 v 1.66666666666667"
            .parse::<PuzzleDescription>()
            .unwrap();
        assert_eq!(description.cuts.len(), 2);
        assert_eq!(description.to_string(), "t v 0.333333333333333 v 1.66666666666667");

        assert_eq!("d".parse::<PuzzleDescription>().unwrap().cuts, vec![]);
    }

    #[test]
    fn reject_bad_descriptions() {
        assert!(matches!(
            "c f".parse::<PuzzleDescription>(),
            Err(PuzzleGeometryError::BadArgumentCount(_))
        ));
        assert!(matches!(
            "x f 0".parse::<PuzzleDescription>(),
            Err(PuzzleGeometryError::BadShape(shape)) if shape == "x"
        ));
        assert!(matches!(
            "c q 0".parse::<PuzzleDescription>(),
            Err(PuzzleGeometryError::BadCut(cut)) if cut == "q"
        ));
        assert!(matches!(
            "c f zero".parse::<PuzzleDescription>(),
            Err(PuzzleGeometryError::BadCutDistance(_))
        ));
    }
}
