//! Names for the faces, edges, and vertices of a solid. Faces are named by
//! walking a net from a fixed starting face; edges and vertices by joining
//! the names of the faces around them in precedence order.

use std::collections::HashMap;

use internment::ArcIntern;
use itertools::Itertools;
use log::trace;

use crate::{
    PuzzleGeometryError,
    description::PuzzleCutType,
    quat::{EPS, Quat},
    shapes,
    swizzler::FaceNameSwizzler,
};

/// A named face, edge, or vertex and the direction it lies in from the
/// center
#[derive(Clone, Debug)]
pub struct Feature {
    pub normal: Quat,
    pub name: ArcIntern<str>,
    pub kind: PuzzleCutType,
}

pub(crate) struct Naming {
    pub swizzler: FaceNameSwizzler,
    pub face_names: Vec<ArcIntern<str>>,
    pub face_precedence: Vec<usize>,
    pub edges: Vec<(Quat, ArcIntern<str>)>,
    pub vertices: Vec<(Quat, ArcIntern<str>)>,
}

fn find_point<T>(points: &[(Quat, T)], point: Quat) -> Option<usize> {
    points.iter().position(|(p, _)| p.dist(point) < EPS)
}

fn midpoint(a: Quat, b: Quat) -> Quat {
    (a + b) * 0.5
}

/// The faces on either side of each edge, and for every face the face
/// across each of its edges in winding order
fn adjacency(base_faces: &[Vec<Quat>]) -> Result<(Vec<(Quat, Vec<usize>)>, Vec<Vec<usize>>), PuzzleGeometryError> {
    let mut edges: Vec<(Quat, Vec<usize>)> = vec![];
    for (i, face) in base_faces.iter().enumerate() {
        for (&a, &b) in face.iter().circular_tuple_windows() {
            let mid = midpoint(a, b);
            match find_point(&edges, mid) {
                Some(edge) => edges[edge].1.push(i),
                None => edges.push((mid, vec![i])),
            }
        }
    }
    if edges.iter().any(|(_, faces)| faces.len() != 2) {
        return Err(PuzzleGeometryError::DegenerateGeometry(
            "an edge does not join exactly two faces".to_owned(),
        ));
    }

    let mut across = vec![];
    for (i, face) in base_faces.iter().enumerate() {
        let mut others = vec![];
        for (&a, &b) in face.iter().circular_tuple_windows() {
            let edge = find_point(&edges, midpoint(a, b)).ok_or_else(|| {
                PuzzleGeometryError::DegenerateGeometry("lost an edge".to_owned())
            })?;
            let faces = &edges[edge].1;
            others.push(if faces[0] == i { faces[1] } else { faces[0] });
        }
        across.push(others);
    }
    Ok((edges, across))
}

fn walk_net(
    across: &[Vec<usize>],
    net: &[&[&'static str]],
) -> Result<Vec<ArcIntern<str>>, PuzzleGeometryError> {
    let bad_net = |message: &str| PuzzleGeometryError::BadNet(message.to_owned());
    let face_count = across.len();
    let edges_per_face = across.first().map_or(0, Vec::len);
    let first_row = net.first().ok_or_else(|| bad_net("empty net"))?;

    let mut names: Vec<Option<&str>> = vec![None; face_count];
    let mut faces: HashMap<&str, usize> = HashMap::new();
    names[0] = Some(first_row[0]);
    faces.insert(first_row[0], 0);
    let second = *across[0].first().ok_or_else(|| bad_net("faces have no edges"))?;
    names[second] = Some(first_row[1]);
    faces.insert(first_row[1], second);

    for row in net {
        let &face = faces
            .get(row[0])
            .ok_or_else(|| bad_net(&format!("{} is named before it is reached", row[0])))?;
        let start = across[face]
            .iter()
            .position(|&other| names[other] == Some(row[1]))
            .ok_or_else(|| bad_net(&format!("{} does not touch {}", row[0], row[1])))?;
        for (j, &name) in row.iter().enumerate().skip(2) {
            if name.is_empty() {
                continue;
            }
            let other = across[face][(j + start - 1) % edges_per_face];
            if names[other].is_some_and(|existing| existing != name) {
                return Err(bad_net(&format!("two names for the face {name}")));
            }
            names[other] = Some(name);
            faces.insert(name, other);
        }
    }

    names
        .into_iter()
        .map(|name| name.map(ArcIntern::from).ok_or_else(|| bad_net("a face was never named")))
        .collect()
}

/// Names every feature of a solid from its faces, which must be listed in
/// the same order as the planes that bound it
pub(crate) fn name_features(base_faces: &[Vec<Quat>]) -> Result<Naming, PuzzleGeometryError> {
    let face_count = base_faces.len();
    let (net, order) = shapes::net(face_count)
        .zip(shapes::face_order(face_count))
        .ok_or_else(|| {
            PuzzleGeometryError::DegenerateGeometry(format!("no net for {face_count} faces"))
        })?;

    let (edge_faces, across) = adjacency(base_faces)?;
    let face_names = walk_net(&across, net)?;
    let face_precedence = face_names
        .iter()
        .map(|name| order.iter().position(|o| **o == **name).unwrap_or(usize::MAX))
        .collect::<Vec<_>>();
    trace!("Face names {}", face_names.iter().join(" "));
    let swizzler = FaceNameSwizzler::new(face_names.clone());
    let separator = swizzler.separator();

    let edges = edge_faces
        .iter()
        .map(|(mid, faces)| {
            let (a, b) = (faces[0], faces[1]);
            let (first, second) = if face_precedence[a] < face_precedence[b] {
                (a, b)
            } else {
                (b, a)
            };
            let name = format!("{}{separator}{}", face_names[first], face_names[second]);
            (*mid, ArcIntern::from(name.as_str()))
        })
        .collect::<Vec<_>>();

    // Each corner of each face contributes the face and the edges leaving
    // and entering the corner
    let mut corners: Vec<(Quat, Vec<(usize, usize, usize)>)> = vec![];
    for (i, face) in base_faces.iter().enumerate() {
        for (&a, &b, &c) in face.iter().circular_tuple_windows() {
            let edge_in = find_point(&edge_faces, midpoint(a, b));
            let edge_out = find_point(&edge_faces, midpoint(b, c));
            let (Some(edge_in), Some(edge_out)) = (edge_in, edge_out) else {
                return Err(PuzzleGeometryError::DegenerateGeometry(
                    "lost an edge".to_owned(),
                ));
            };
            match find_point(&corners, b) {
                Some(corner) => corners[corner].1.push((i, edge_out, edge_in)),
                None => corners.push((b, vec![(i, edge_out, edge_in)])),
            }
        }
    }

    let vertices = corners
        .iter()
        .map(|(point, around)| {
            let mut at = around
                .iter()
                .position_min_by_key(|(face, _, _)| face_precedence[*face])
                .unwrap_or(0);
            let mut parts = vec![];
            for _ in 0..around.len() {
                parts.push(&*face_names[around[at].0]);
                if let Some(next) = around
                    .iter()
                    .position(|(_, edge_out, _)| *edge_out == around[at].2)
                {
                    at = next;
                }
            }
            (*point, ArcIntern::from(parts.join(separator).as_str()))
        })
        .collect();

    Ok(Naming {
        swizzler,
        face_names,
        face_precedence,
        edges,
        vertices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{description::PuzzleBaseShape, platonic};

    fn base_faces(shape: PuzzleBaseShape) -> Vec<Vec<Quat>> {
        let generators = platonic::generators(shape);
        let rotations = platonic::closure(&generators);
        let plane_rotations = platonic::unique_planes(generators[0], &rotations);
        let normal = generators[0].make_normal();
        let boundary = Quat::new(1., normal.b, normal.c, normal.d);
        let planes = platonic::unique_planes(boundary, &rotations)
            .iter()
            .map(|&r| boundary.rotate_plane(r))
            .collect::<Vec<_>>();
        let face = platonic::get_face(&planes);
        plane_rotations.iter().map(|r| r.rotate_face(&face)).collect()
    }

    #[test]
    fn cube_features() {
        let naming = name_features(&base_faces(PuzzleBaseShape::Cube)).unwrap();
        let faces = naming.face_names.iter().map(|n| &**n).collect::<Vec<_>>();
        assert_eq!(faces, ["F", "R", "D", "B", "L", "U"]);
        let edges = naming.edges.iter().map(|(_, n)| &**n).collect::<Vec<_>>();
        assert_eq!(
            edges,
            ["DF", "FL", "UF", "FR", "DR", "UR", "BR", "DL", "DB", "UB", "BL", "UL"]
        );
        let vertices = naming.vertices.iter().map(|(_, n)| &**n).collect::<Vec<_>>();
        assert_eq!(
            vertices,
            ["DLF", "UFL", "URF", "DFR", "UBR", "DRB", "DBL", "ULB"]
        );
    }

    #[test]
    fn every_solid_has_a_net() {
        for (shape, edges, vertices) in [
            (PuzzleBaseShape::Tetrahedron, 6, 4),
            (PuzzleBaseShape::Octahedron, 12, 6),
            (PuzzleBaseShape::Dodecahedron, 30, 20),
            (PuzzleBaseShape::Icosahedron, 30, 12),
        ] {
            let naming = name_features(&base_faces(shape)).unwrap();
            assert_eq!(naming.edges.len(), edges);
            assert_eq!(naming.vertices.len(), vertices);
            assert!(naming.face_precedence.iter().all(|&p| p != usize::MAX));
        }
    }
}
