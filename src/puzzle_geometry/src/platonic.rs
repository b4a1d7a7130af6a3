use std::f64::consts::PI;

use itertools::Itertools;

use crate::{
    description::PuzzleBaseShape,
    quat::{EPS, Quat, center_of_mass},
};

/// Two rotations that generate the rotation group of the solid. The first is
/// also read as the plane of one of its faces.
#[must_use]
pub fn generators(shape: PuzzleBaseShape) -> [Quat; 2] {
    let s5 = 0.5f64.sqrt();
    match shape {
        PuzzleBaseShape::Cube => [Quat::new(s5, s5, 0., 0.), Quat::new(s5, 0., s5, 0.)],
        PuzzleBaseShape::Tetrahedron => [
            Quat::new(0.5, 0.5, 0.5, 0.5),
            Quat::new(0.5, 0.5, 0.5, -0.5),
        ],
        PuzzleBaseShape::Octahedron => [Quat::new(0.5, 0.5, 0.5, 0.5), Quat::new(s5, 0., 0., s5)],
        PuzzleBaseShape::Dodecahedron => {
            let d36 = 2. * PI / 10.;
            let mut dx = 0.5 + 0.3 * 5f64.sqrt();
            let mut dy = 0.5 + 0.1 * 5f64.sqrt();
            let dd = dx.hypot(dy);
            dx /= dd;
            dy /= dd;
            [
                Quat::new(d36.cos(), dx * d36.sin(), dy * d36.sin(), 0.),
                Quat::new(0.5, 0.5, 0.5, 0.5),
            ]
        }
        PuzzleBaseShape::Icosahedron => {
            let mut dx = 1. / 6. + 5f64.sqrt() / 6.;
            let mut dy = 2. / 3. + 5f64.sqrt() / 3.;
            let dd = dx.hypot(dy);
            dx /= dd;
            dy /= dd;
            let angle = 2. * PI / 6.;
            [
                Quat::new(angle.cos(), dx * angle.sin(), dy * angle.sin(), 0.),
                Quat::new(angle.cos(), -dx * angle.sin(), dy * angle.sin(), 0.),
            ]
        }
    }
}

/// Every rotation generated by `generators`. A rotation and its negation
/// are the same rotation, so only one of them is kept.
#[must_use]
pub fn closure(generators: &[Quat]) -> Vec<Quat> {
    let mut group = vec![Quat::IDENTITY];
    let mut i = 0;
    while i < group.len() {
        for &generator in generators {
            let next = generator * group[i];
            if !group
                .iter()
                .any(|&seen| next.dist(seen) < EPS || (-next).dist(seen) < EPS)
            {
                group.push(next);
            }
        }
        i += 1;
    }
    group
}

/// The rotations that take `plane` to each distinct plane it can reach, in
/// group order
#[must_use]
pub fn unique_planes(plane: Quat, rotations: &[Quat]) -> Vec<Quat> {
    let mut planes: Vec<Quat> = vec![];
    let mut plane_rotations = vec![];
    for &rotation in rotations {
        let rotated = plane.rotate_plane(rotation);
        if planes.iter().all(|&seen| rotated.dist(seen) >= EPS) {
            planes.push(rotated);
            plane_rotations.push(rotation);
        }
    }
    plane_rotations
}

/// The polygon in which the first plane meets the solid bounded by all of
/// the planes. Its points run counterclockwise about the first plane's
/// normal.
#[must_use]
pub fn get_face(planes: &[Quat]) -> Vec<Quat> {
    let mut face: Vec<Quat> = vec![];
    for (i, j) in (1..planes.len()).tuple_combinations() {
        let Some(point) = planes[0].intersect3(planes[i], planes[j]) else {
            continue;
        };
        if planes.iter().any(|plane| point.dot(*plane) > plane.a + EPS) {
            continue;
        }
        if face.iter().all(|&seen| point.dist(seen) >= EPS) {
            face.push(point);
        }
    }

    let Some(&first) = face.first() else {
        return face;
    };
    let center = center_of_mass(&face);
    let u = first - center;
    let w = planes[0].cross(u);
    let angle = |point: Quat| {
        let v = point - center;
        v.dot(w).atan2(v.dot(u)).rem_euclid(2. * PI)
    };
    face.sort_by(|&p, &q| angle(p).total_cmp(&angle(q)));
    face
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(shape: PuzzleBaseShape) -> (usize, usize, usize) {
        let generators = generators(shape);
        let rotations = closure(&generators);
        let plane_rotations = unique_planes(generators[0], &rotations);
        let planes = plane_rotations
            .iter()
            .map(|&rotation| generators[0].rotate_plane(rotation))
            .collect::<Vec<_>>();
        (rotations.len(), planes.len(), get_face(&planes).len())
    }

    #[test]
    fn rotation_groups() {
        assert_eq!(shape(PuzzleBaseShape::Tetrahedron), (12, 4, 3));
        assert_eq!(shape(PuzzleBaseShape::Cube), (24, 6, 4));
        assert_eq!(shape(PuzzleBaseShape::Octahedron), (24, 8, 3));
        assert_eq!(shape(PuzzleBaseShape::Dodecahedron), (60, 12, 5));
        assert_eq!(shape(PuzzleBaseShape::Icosahedron), (60, 20, 3));
    }

    #[test]
    fn faces_wind_counterclockwise() {
        let generators = generators(PuzzleBaseShape::Cube);
        let rotations = closure(&generators);
        let planes = unique_planes(generators[0], &rotations)
            .iter()
            .map(|&rotation| generators[0].rotate_plane(rotation))
            .collect::<Vec<_>>();
        let face = get_face(&planes);
        for (&p, &q) in face.iter().circular_tuple_windows() {
            assert!(planes[0].dot(p.cross(q)) > 0.);
        }
    }
}
