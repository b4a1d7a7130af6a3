use std::{fmt, ops::{Add, Mul, Neg, Sub}};

/// Distances below this are treated as zero
pub const EPS: f64 = 1e-9;

/// A quaternion. Depending on context it is a rotation, a point (with `a`
/// zero), or a plane: the normal is `(b, c, d)` and `a` is the distance of
/// the plane from the origin along that normal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quat {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl Quat {
    pub const ZERO: Quat = Quat::new(0., 0., 0., 0.);
    pub const IDENTITY: Quat = Quat::new(1., 0., 0., 0.);

    #[must_use]
    pub const fn new(a: f64, b: f64, c: f64, d: f64) -> Quat {
        Quat { a, b, c, d }
    }

    #[must_use]
    pub fn dist(self, other: Quat) -> f64 {
        (self - other).len()
    }

    #[must_use]
    pub fn len(self) -> f64 {
        (self.a * self.a + self.b * self.b + self.c * self.c + self.d * self.d).sqrt()
    }

    /// Cross product of the vector parts
    #[must_use]
    pub fn cross(self, other: Quat) -> Quat {
        Quat::new(
            0.,
            self.c * other.d - self.d * other.c,
            self.d * other.b - self.b * other.d,
            self.b * other.c - self.c * other.b,
        )
    }

    /// Dot product of the vector parts
    #[must_use]
    pub fn dot(self, other: Quat) -> f64 {
        self.b * other.b + self.c * other.c + self.d * other.d
    }

    /// Scales all four components so that the vector part has unit length
    #[must_use]
    pub fn normalize(self) -> Quat {
        self * (1. / self.dot(self).sqrt())
    }

    /// The unit vector along the vector part
    #[must_use]
    pub fn make_normal(self) -> Quat {
        Quat::new(0., self.b, self.c, self.d).normalize()
    }

    /// A plane at distance `distance` with this normal
    #[must_use]
    pub fn make_cut(self, distance: f64) -> Quat {
        Quat::new(distance, self.b, self.c, self.d)
    }

    /// Twice the rotation angle
    #[must_use]
    pub fn angle(self) -> f64 {
        2. * self.a.clamp(-1., 1.).acos()
    }

    #[must_use]
    pub fn inv_rot(self) -> Quat {
        Quat::new(self.a, -self.b, -self.c, -self.d)
    }

    #[must_use]
    pub fn rotate_point(self, rotation: Quat) -> Quat {
        rotation * self * rotation.inv_rot()
    }

    /// Rotates the normal of a plane, keeping its distance
    #[must_use]
    pub fn rotate_plane(self, rotation: Quat) -> Quat {
        let rotated = rotation * Quat::new(0., self.b, self.c, self.d) * rotation.inv_rot();
        Quat::new(self.a, rotated.b, rotated.c, rotated.d)
    }

    #[must_use]
    pub fn rotate_face(self, face: &[Quat]) -> Vec<Quat> {
        face.iter().map(|point| point.rotate_point(self)).collect()
    }

    /// The point where three planes meet, if they meet in a single point
    #[must_use]
    pub fn intersect3(self, p2: Quat, p3: Quat) -> Option<Quat> {
        let det = det3x3(
            [self.b, self.c, self.d],
            [p2.b, p2.c, p2.d],
            [p3.b, p3.c, p3.d],
        );
        if det.abs() < EPS {
            return None;
        }
        Some(Quat::new(
            0.,
            det3x3([self.a, self.c, self.d], [p2.a, p2.c, p2.d], [p3.a, p3.c, p3.d]) / det,
            det3x3([self.b, self.a, self.d], [p2.b, p2.a, p2.d], [p3.b, p3.a, p3.d]) / det,
            det3x3([self.b, self.c, self.a], [p2.b, p2.c, p2.a], [p3.b, p3.c, p3.a]) / det,
        ))
    }

    /// Which side of this plane a point lies on, or zero when it is on it
    #[must_use]
    pub fn side(self, point: Quat) -> i8 {
        let x = point.dot(self) - self.a;
        if x > EPS {
            1
        } else if x < -EPS {
            -1
        } else {
            0
        }
    }

    /// Which side of this plane a face lies on. A face never straddles a
    /// plane it has already been cut by, so the first point off the plane
    /// decides.
    #[must_use]
    pub fn face_side(self, face: &[Quat]) -> Option<i8> {
        face.iter()
            .map(|&point| self.side(point))
            .find(|&side| side != 0)
    }

    /// Splits every face that lies on both sides of this plane
    #[must_use]
    pub fn cut_faces(self, faces: Vec<Vec<Quat>>) -> Vec<Vec<Quat>> {
        let mut out = Vec::with_capacity(faces.len());
        for face in faces {
            let sides = face.iter().map(|&p| self.side(p)).collect::<Vec<_>>();
            if !(sides.contains(&-1) && sides.contains(&1)) {
                out.push(face);
                continue;
            }

            for s in [-1, 1] {
                let mut new_face = vec![];
                for k in 0..face.len() {
                    let kk = (k + 1) % face.len();
                    if sides[k] == s || sides[k] == 0 {
                        new_face.push(face[k]);
                    }
                    if sides[k] != 0 && sides[k] + sides[kk] == 0 {
                        let vk = face[k].dot(self) - self.a;
                        let vkk = face[kk].dot(self) - self.a;
                        let r = vk / (vk - vkk);
                        new_face.push(face[k] * (1. - r) + face[kk] * r);
                    }
                }
                out.push(new_face);
            }
        }
        out
    }

    /// Whether two planes through the same normal line coincide, in either
    /// direction
    #[must_use]
    pub fn same_plane(self, other: Quat) -> bool {
        let a = self.normalize();
        let b = other.normalize();
        a.dist(b) < EPS || a.dist(-b) < EPS
    }

    /// Scales a plane so its normal has unit length
    #[must_use]
    pub fn normalize_plane(self) -> Quat {
        let d = (self.b * self.b + self.c * self.c + self.d * self.d).sqrt();
        self * (1. / d)
    }
}

fn det3x3(r0: [f64; 3], r1: [f64; 3], r2: [f64; 3]) -> f64 {
    r0[0] * (r1[1] * r2[2] - r1[2] * r2[1]) + r0[1] * (r1[2] * r2[0] - r1[0] * r2[2])
        + r0[2] * (r1[0] * r2[1] - r1[1] * r2[0])
}

impl Mul for Quat {
    type Output = Quat;

    fn mul(self, q: Quat) -> Quat {
        Quat::new(
            self.a * q.a - self.b * q.b - self.c * q.c - self.d * q.d,
            self.a * q.b + self.b * q.a + self.c * q.d - self.d * q.c,
            self.a * q.c - self.b * q.d + self.c * q.a + self.d * q.b,
            self.a * q.d + self.b * q.c - self.c * q.b + self.d * q.a,
        )
    }
}

impl Mul<f64> for Quat {
    type Output = Quat;

    fn mul(self, m: f64) -> Quat {
        Quat::new(self.a * m, self.b * m, self.c * m, self.d * m)
    }
}

impl Add for Quat {
    type Output = Quat;

    fn add(self, q: Quat) -> Quat {
        Quat::new(self.a + q.a, self.b + q.b, self.c + q.c, self.d + q.d)
    }
}

impl Sub for Quat {
    type Output = Quat;

    fn sub(self, q: Quat) -> Quat {
        Quat::new(self.a - q.a, self.b - q.b, self.c - q.c, self.d - q.d)
    }
}

impl Neg for Quat {
    type Output = Quat;

    fn neg(self) -> Quat {
        self * -1.
    }
}

impl fmt::Display for Quat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q[{:.6},{:.6},{:.6},{:.6}]", self.a, self.b, self.c, self.d)
    }
}

/// The average of a face's points
#[must_use]
pub fn center_of_mass(face: &[Quat]) -> Quat {
    #[allow(clippy::cast_precision_loss)]
    let n = face.len() as f64;
    face.iter().fold(Quat::ZERO, |acc, &p| acc + p) * (1. / n)
}

/// Every face rotated by every rotation, rotation-major
#[must_use]
pub fn expand_faces(rotations: &[Quat], faces: &[Vec<Quat>]) -> Vec<Vec<Quat>> {
    rotations
        .iter()
        .flat_map(|rotation| faces.iter().map(|face| rotation.rotate_face(face)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Quat, b: Quat) -> bool {
        a.dist(b) < EPS
    }

    #[test]
    fn rotation_about_z() {
        let h = 0.5f64.sqrt();
        let quarter = Quat::new(h, 0., 0., h);
        let x = Quat::new(0., 1., 0., 0.);
        assert!(close(x.rotate_point(quarter), Quat::new(0., 0., 1., 0.)));
        assert!((quarter.angle() - std::f64::consts::FRAC_PI_2).abs() < EPS);
        assert!(close(quarter * quarter.inv_rot(), Quat::IDENTITY));
    }

    #[test]
    fn planes() {
        let x1 = Quat::new(1., 1., 0., 0.);
        assert!(x1.same_plane(Quat::new(-2., -2., 0., 0.)));
        assert!(!x1.same_plane(Quat::new(1., 0., 1., 0.)));
        assert_eq!(x1.side(Quat::new(0., 2., 0., 0.)), 1);
        assert_eq!(x1.side(Quat::new(0., 1., 5., 0.)), 0);

        let y = Quat::new(0., 0., 1., 0.);
        let z = Quat::new(0., 0., 0., 1.);
        let point = x1.intersect3(y.make_cut(2.), z.make_cut(3.)).unwrap();
        assert!(close(point, Quat::new(0., 1., 2., 3.)));
        assert!(x1.intersect3(x1.make_cut(2.), y).is_none());
    }

    #[test]
    fn cutting_a_square() {
        let square = vec![
            Quat::new(0., -1., -1., 1.),
            Quat::new(0., 1., -1., 1.),
            Quat::new(0., 1., 1., 1.),
            Quat::new(0., -1., 1., 1.),
        ];
        let cut = Quat::new(0., 1., 0., 0.).make_cut(0.);
        let halves = cut.cut_faces(vec![square.clone()]);
        assert_eq!(halves.len(), 2);
        assert!(halves.iter().all(|half| half.len() == 4));
        assert_eq!(cut.face_side(&halves[0]), Some(-1));
        assert_eq!(cut.face_side(&halves[1]), Some(1));

        let miss = cut.make_cut(5.);
        assert_eq!(miss.cut_faces(vec![square.clone()]), vec![square.clone()]);
        assert!(close(center_of_mass(&square), Quat::new(0., 0., 0., 1.)));
    }
}
