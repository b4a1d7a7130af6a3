use std::collections::{HashMap, HashSet};

use internment::ArcIntern;
use itertools::Itertools;
use log::{debug, trace};

use crate::{
    PuzzleGeometryError,
    description::{PuzzleBaseShape, PuzzleCutType, PuzzleDescription},
    naming::{Feature, name_features},
    notation::{
        FaceRenamingMapper, MegaminxScramblingNotationMapper, NotationMapper, NullMapper,
        NxNxNCubeMapper,
    },
    options::PuzzleGeometryOptions,
    platonic::{closure, generators, get_face, unique_planes},
    quat::{EPS, Quat, center_of_mass, expand_faces},
    shapes::{FTO_FACE_NAMES, MEGAMINX_FACE_NAMES},
    swizzler::FaceNameSwizzler,
    turns::ParsedTurn,
};

/// A set of parallel turn planes and the rotations about their shared
/// normal. Slice `i` of an axis holds the stickers lying beneath `i` of its
/// planes.
#[derive(Debug)]
pub(crate) struct Axis {
    pub normal: Quat,
    /// Sorted by distance along the normal
    pub planes: Vec<Quat>,
    /// Nontrivial rotations about the normal, smallest first
    pub rotations: Vec<Quat>,
    /// The grip the normal points at, and the one opposite it
    pub positive: (ArcIntern<str>, PuzzleCutType),
    pub negative: (ArcIntern<str>, PuzzleCutType),
    /// For each slice, the cycles of `(cubie, facet)` that the smallest
    /// rotation moves
    pub slice_cycles: Vec<Vec<Vec<(usize, u8)>>>,
}

impl Axis {
    pub fn order(&self) -> usize {
        self.rotations.len() + 1
    }

    /// Which slice a point belongs to
    fn slice_of(&self, point: Quat) -> usize {
        self.planes.len() - self.planes.iter().filter(|p| point.dot(**p) > p.a).count()
    }
}

/// A rigid piece: the stickers that always move together, in clockwise
/// order starting from the sticker on the highest-precedence face
#[derive(Clone, Debug, Default)]
pub(crate) struct Cubie {
    pub stickers: Vec<usize>,
    pub orbit: usize,
    /// Position within the orbit
    pub ordinal: usize,
    /// Pieces of an orbit that look alike share a value
    pub value: usize,
}

#[derive(Clone, Debug)]
pub(crate) struct Orbit {
    pub name: String,
    pub facets: u8,
    /// Equal to `facets` except for oriented face centers, which take the
    /// corner count of their sticker
    pub orientations: u8,
    pub cubies: Vec<usize>,
}

/// Finds stickers by position. Stickers are grouped by the slice they lie
/// in on every axis, and told apart within a group by their centers.
#[derive(Debug)]
pub(crate) struct StickerIndex {
    pub stickers: Vec<Vec<Quat>>,
    pub stickers_per_face: usize,
    plane_sets: Vec<Vec<Quat>>,
    groups: HashMap<String, Vec<usize>>,
}

impl StickerIndex {
    fn key(&self, center: Quat) -> String {
        self.plane_sets
            .iter()
            .filter(|planes| !planes.is_empty())
            .map(|planes| {
                let dv = center.dot(planes[0]);
                planes.iter().filter(|p| dv > p.a).count()
            })
            .join(" ")
    }

    pub fn find(&self, face: &[Quat]) -> Option<usize> {
        let center = center_of_mass(face);
        let group = self.groups.get(&self.key(center))?;
        if let [only] = group.as_slice() {
            return Some(*only);
        }
        group
            .iter()
            .copied()
            .find(|&sticker| center.dist(center_of_mass(&self.stickers[sticker])) < EPS)
            .or_else(|| group.last().copied())
    }

    pub fn face_of(&self, sticker: usize) -> usize {
        sticker / self.stickers_per_face
    }
}

/// A puzzle derived from cutting a solid: its pieces, how its turns move
/// them, and the names of its grips
#[derive(Debug)]
pub struct PuzzleGeometry {
    pub(crate) description: PuzzleDescription,
    pub(crate) options: PuzzleGeometryOptions,
    pub(crate) rotations: Vec<Quat>,
    pub(crate) face_names: Vec<ArcIntern<str>>,
    pub(crate) face_precedence: Vec<usize>,
    pub(crate) features: Vec<Feature>,
    pub(crate) swizzler: FaceNameSwizzler,
    pub(crate) notation: Box<dyn NotationMapper>,
    pub(crate) stickers: StickerIndex,
    pub(crate) axes: Vec<Axis>,
    pub(crate) cubies: Vec<Cubie>,
    pub(crate) sticker_cubies: Vec<(usize, u8)>,
    pub(crate) orbits: Vec<Orbit>,
    pub(crate) fixed_cubie: Option<usize>,
    pub(crate) move_list: Option<Vec<ParsedTurn>>,
}

fn degenerate(message: &str) -> PuzzleGeometryError {
    PuzzleGeometryError::DegenerateGeometry(message.to_owned())
}

impl PuzzleGeometry {
    /// Cuts the solid and works out the pieces and turns
    ///
    /// # Errors
    ///
    /// Fails if the cuts produce geometry that cannot be turned consistently,
    /// or if the options name turns or pieces the puzzle does not have
    pub fn new(
        description: PuzzleDescription,
        options: PuzzleGeometryOptions,
    ) -> Result<PuzzleGeometry, PuzzleGeometryError> {
        let shape = description.shape;
        let [g0, g1] = generators(shape);
        let rotations = closure(&[g0, g1]);
        debug!("{shape:?} has {} rotations", rotations.len());

        let base_plane_rotations = unique_planes(g0, &rotations);
        let base_planes = base_plane_rotations
            .iter()
            .map(|&r| g0.rotate_plane(r))
            .collect::<Vec<_>>();
        let base_face_count = base_planes.len();
        let base_face = get_face(&base_planes);
        if base_face.len() < 3 {
            return Err(degenerate("the base face has fewer than three corners"));
        }

        let face_normal = base_planes[0].make_normal();
        let edge_normal = (base_face[0] + base_face[1]).make_normal();
        let vertex_normal = base_face[0].make_normal();
        let boundary = Quat::new(1., face_normal.b, face_normal.c, face_normal.d);
        let boundary_planes = unique_planes(boundary, &rotations)
            .iter()
            .map(|&r| boundary.rotate_plane(r))
            .collect::<Vec<_>>();
        let face = get_face(&boundary_planes);
        let edge_distance = ((face[0] + face[1]) * 0.5).len();
        let vertex_distance = face[0].len();

        let mut cut_planes = vec![];
        for cut in &description.cuts {
            let (normal, reach) = match cut.cut_type {
                PuzzleCutType::Face => (face_normal, 1.),
                PuzzleCutType::Edge => (edge_normal, edge_distance),
                PuzzleCutType::Vertex => (vertex_normal, vertex_distance),
            };
            cut_planes.push((normal.make_cut(cut.distance), cut.distance < reach));
        }
        let saw = |cut_type| description.cuts.iter().any(|cut| cut.cut_type == cut_type);
        let (saw_face, saw_edge, saw_vertex) = (
            saw(PuzzleCutType::Face),
            saw(PuzzleCutType::Edge),
            saw(PuzzleCutType::Vertex),
        );
        if options.add_rotations {
            // Planes outside the puzzle give every axis a whole-puzzle turn
            for (seen, normal) in [
                (saw_face, face_normal),
                (saw_vertex, vertex_normal),
                (saw_edge, edge_normal),
            ] {
                if !seen {
                    cut_planes.push((normal.make_cut(10.), false));
                }
            }
        }

        let base_faces = base_plane_rotations
            .iter()
            .map(|r| r.rotate_face(&face))
            .collect::<Vec<_>>();
        let naming = name_features(&base_faces)?;
        let mut swizzler = naming.swizzler;

        let mut features = base_plane_rotations
            .iter()
            .zip(&naming.face_names)
            .map(|(&r, name)| Feature {
                normal: boundary.rotate_plane(r).make_normal(),
                name: ArcIntern::clone(name),
                kind: PuzzleCutType::Face,
            })
            .collect::<Vec<_>>();
        for (points, kind) in [
            (&naming.edges, PuzzleCutType::Edge),
            (&naming.vertices, PuzzleCutType::Vertex),
        ] {
            features.extend(points.iter().map(|(point, name)| Feature {
                normal: point.make_normal(),
                name: ArcIntern::clone(name),
                kind,
            }));
        }
        swizzler.set_grip_names(features.iter().map(|f| ArcIntern::clone(&f.name)).collect());

        let mut faces = vec![face];
        let mut turn_planes: Vec<Quat> = vec![];
        let mut intersecting = vec![];
        for &(cut, intersects) in &cut_planes {
            for &r in &rotations {
                let plane = cut.rotate_plane(r);
                if turn_planes.iter().any(|&seen| plane.same_plane(seen)) {
                    continue;
                }
                turn_planes.push(plane);
                faces = plane.cut_faces(faces);
                if intersects {
                    intersecting.push(plane);
                }
            }
        }
        debug!(
            "{} turn planes cut each face into {} stickers",
            turn_planes.len(),
            faces.len()
        );

        let axes = build_axes(&turn_planes, &intersecting, &rotations, &features)?;
        // Turns are bit sets of slices
        if let Some(axis) = axes.iter().find(|axis| axis.planes.len() > 62) {
            return Err(PuzzleGeometryError::TooManySlices(axis.planes.len() + 1));
        }

        let notation: Box<dyn NotationMapper> = if saw_face {
            notation_for(shape, &axes, !saw_edge && !saw_vertex)
        } else {
            Box::new(NullMapper)
        };

        let stickers = StickerIndex {
            stickers: expand_faces(&base_plane_rotations, &faces),
            stickers_per_face: faces.len(),
            plane_sets: axes.iter().map(|axis| axis.planes.clone()).collect(),
            groups: HashMap::new(),
        };

        let mut geometry = PuzzleGeometry {
            description,
            options,
            rotations,
            face_names: naming.face_names,
            face_precedence: naming.face_precedence,
            features,
            swizzler,
            notation,
            stickers,
            axes,
            cubies: vec![],
            sticker_cubies: vec![],
            orbits: vec![],
            fixed_cubie: None,
            move_list: None,
        };
        geometry.assemble_cubies(base_face_count);
        geometry.find_orbits(base_face_count)?;
        for i in 0..geometry.axes.len() {
            let cycles = geometry.slice_cycles(&geometry.axes[i])?;
            geometry.axes[i].slice_cycles = cycles;
        }

        if let Some(kind) = geometry.options.fix_piece {
            let fixed = geometry
                .cubies
                .iter()
                .position(|cubie| match kind {
                    PuzzleCutType::Vertex => cubie.stickers.len() > 2,
                    PuzzleCutType::Edge => cubie.stickers.len() == 2,
                    PuzzleCutType::Face => cubie.stickers.len() == 1,
                })
                .ok_or(PuzzleGeometryError::NoPieceToFix(kind))?;
            geometry.fixed_cubie = Some(fixed);
        }
        if let Some(moves) = geometry.options.move_list.clone() {
            geometry.move_list = Some(
                moves
                    .iter()
                    .map(|name| geometry.parse_turn_name(name))
                    .collect::<Result<_, _>>()?,
            );
        }

        debug!(
            "{} has {} cubies in {} orbits",
            geometry.description,
            geometry
                .cubies
                .iter()
                .filter(|c| !c.stickers.is_empty())
                .count(),
            geometry.orbits.len()
        );
        Ok(geometry)
    }

    /// Groups stickers into cubies. A cubie touching every face is the
    /// puzzle's core, which does not turn as one piece, so its stickers
    /// become separate cubies.
    fn assemble_cubies(&mut self, base_face_count: usize) {
        let mut cubies: Vec<Vec<usize>> = vec![];
        let mut by_key: HashMap<String, usize> = HashMap::new();
        let mut groups: HashMap<String, Vec<usize>> = HashMap::new();
        for (sticker, face) in self.stickers.stickers.iter().enumerate() {
            let key = self.stickers.key(center_of_mass(face));
            let cubie = *by_key.entry(key.clone()).or_insert_with(|| {
                cubies.push(vec![]);
                cubies.len() - 1
            });
            cubies[cubie].push(sticker);
            let group = groups.entry(key).or_default();
            group.push(sticker);
            if group.len() == base_face_count {
                let core = std::mem::take(&mut cubies[cubie]);
                cubies.extend(core.into_iter().map(|sticker| vec![sticker]));
            }
        }
        self.stickers.groups = groups;

        for cubie in &mut cubies {
            if cubie.len() < 2 || cubie.len() == base_face_count {
                continue;
            }
            let mut centers = cubie
                .iter()
                .map(|&s| center_of_mass(&self.stickers.stickers[s]))
                .collect::<Vec<_>>();
            let middle = center_of_mass(&centers);
            if cubie.len() > 2 {
                for _ in 0..1000 {
                    let mut changed = false;
                    for i in 0..cubie.len() {
                        let j = (i + 1) % cubie.len();
                        if middle.dot(centers[i].cross(centers[j])) < 0. {
                            cubie.swap(i, j);
                            centers.swap(i, j);
                            changed = true;
                        }
                    }
                    if !changed {
                        break;
                    }
                }
            }
            let first = cubie
                .iter()
                .position_min_by_key(|&&s| self.face_precedence[self.stickers.face_of(s)])
                .unwrap_or(0);
            cubie.rotate_left(first);
        }

        self.sticker_cubies = vec![(0, 0); self.stickers.stickers.len()];
        for (i, cubie) in cubies.iter().enumerate() {
            for (facet, &sticker) in cubie.iter().enumerate() {
                self.sticker_cubies[sticker] = (i, facet_index(facet));
            }
        }
        self.cubies = cubies
            .into_iter()
            .map(|stickers| Cubie {
                stickers,
                ..Cubie::default()
            })
            .collect();
    }

    fn find_cubie(&self, face: &[Quat]) -> Result<usize, PuzzleGeometryError> {
        self.stickers
            .find(face)
            .map(|sticker| self.sticker_cubies[sticker].0)
            .ok_or_else(|| degenerate("a rotated sticker landed on no sticker"))
    }

    /// Splits the cubies into orbits: the sets that turns can carry into one
    /// another
    fn find_orbits(&mut self, base_face_count: usize) -> Result<(), PuzzleGeometryError> {
        const TYPE_NAMES: [&str; 6] = ["?", "CENTERS", "EDGES", "CORNERS", "C4RNER", "C5RNER"];
        let generators = self
            .axes
            .iter()
            .map(|axis| axis.rotations[0])
            .collect::<Vec<_>>();

        let mut type_counts: HashMap<usize, usize> = HashMap::new();
        let mut seen = vec![false; self.cubies.len()];
        for start in 0..self.cubies.len() {
            if seen[start] || self.cubies[start].stickers.is_empty() {
                continue;
            }
            let facets = self.cubies[start].stickers.len();
            let type_count = type_counts.entry(facets).or_default();
            let mut name = match TYPE_NAMES.get(facets) {
                Some(name) if facets != base_face_count => (*name).to_owned(),
                _ => "CORE".to_owned(),
            };
            if *type_count > 0 {
                name += &(*type_count + 1).to_string();
            }
            *type_count += 1;

            let orbit = self.orbits.len();
            let mut members = vec![];
            let mut values: HashMap<String, usize> = HashMap::new();
            let mut next_value = 0;
            let mut queue = vec![start];
            seen[start] = true;
            let mut next = 0;
            while next < queue.len() {
                let cubie = queue[next];
                next += 1;

                let colors = self.cubies[cubie]
                    .stickers
                    .iter()
                    .map(|&s| self.stickers.face_of(s))
                    .join(" ");
                if facets > 1 || !values.contains_key(&colors) {
                    values.insert(colors.clone(), next_value);
                    next_value += 1;
                }
                let value = values[&colors];
                self.cubies[cubie].orbit = orbit;
                self.cubies[cubie].ordinal = members.len();
                self.cubies[cubie].value = value;
                members.push(cubie);

                let first_sticker = &self.stickers.stickers[self.cubies[cubie].stickers[0]];
                for rotation in &generators {
                    let target = self.find_cubie(&rotation.rotate_face(first_sticker))?;
                    if !seen[target] {
                        seen[target] = true;
                        queue.push(target);
                    }
                }
            }
            let orientations = self
                .center_orientations(start)
                .unwrap_or(facet_index(facets));
            trace!(
                "Orbit {name} has {} pieces with {orientations} orientations",
                members.len()
            );
            self.orbits.push(Orbit {
                name,
                facets: facet_index(facets),
                orientations,
                cubies: members,
            });
        }
        Ok(())
    }

    /// The orientation count of a cubie that is a lone sticker sitting at
    /// the middle of its face, when centers are oriented
    fn center_orientations(&self, cubie: usize) -> Option<u8> {
        if !self.options.orient_centers {
            return None;
        }
        let &[sticker] = self.cubies[cubie].stickers.as_slice() else {
            return None;
        };
        let face = &self.stickers.stickers[sticker];
        let middle = self.features.get(self.stickers.face_of(sticker))?.normal;
        (face.len() > 2 && center_of_mass(face).dist(middle) < EPS)
            .then(|| facet_index(face.len()))
    }

    fn is_oriented_center(&self, cubie: usize) -> bool {
        let orbit = &self.orbits[self.cubies[cubie].orbit];
        orbit.facets == 1 && orbit.orientations > 1
    }

    /// How the smallest rotation of an axis moves the pieces of each slice.
    /// An oriented center records, in place of a facet, which corner of its
    /// slot the first center's leading corner has been carried to, and one
    /// spinning in place is repeated once per step of the axis.
    fn slice_cycles(
        &self,
        axis: &Axis,
    ) -> Result<Vec<Vec<Vec<(usize, u8)>>>, PuzzleGeometryError> {
        let rotation = axis.rotations[0];
        let mut slice_of = self
            .stickers
            .stickers
            .iter()
            .map(|face| {
                let mut slice = 0;
                for plane in &axis.planes {
                    match plane.face_side(face) {
                        Some(-1) => slice += 1,
                        Some(_) => {}
                        None => return Err(degenerate("a sticker lies in a turn plane")),
                    }
                }
                Ok(Some(slice))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut slices = vec![];
        for slice in 0..=axis.planes.len() {
            let mut cycles = vec![];
            let mut done = HashSet::new();
            for start in 0..slice_of.len() {
                if slice_of[start] != Some(slice) {
                    continue;
                }
                let mut cycle = vec![self.sticker_cubies[start]];
                let mut members = vec![start];
                let mut face = self.stickers.stickers[start].clone();
                let mut sticker = start;
                loop {
                    slice_of[sticker] = None;
                    face = rotation.rotate_face(&face);
                    sticker = self
                        .stickers
                        .find(&face)
                        .ok_or_else(|| degenerate("a rotated sticker landed on no sticker"))?;
                    match slice_of[sticker] {
                        None => break,
                        Some(s) if s == slice => {
                            cycle.push(self.sticker_cubies[sticker]);
                            members.push(sticker);
                        }
                        Some(_) => return Err(degenerate("a turn moves a sticker between slices")),
                    }
                }
                if self.is_oriented_center(cycle[0].0) {
                    if cycle.len() == 1 {
                        cycle = vec![cycle[0]; axis.order()];
                        members = vec![start; axis.order()];
                    }
                    let mut leading = self.stickers.stickers[start][0];
                    for (entry, &member) in cycle.iter_mut().zip(&members) {
                        let corner = self.stickers.stickers[member]
                            .iter()
                            .position(|point| point.dist(leading) < EPS)
                            .ok_or_else(|| degenerate("a turned center lands askew"))?;
                        entry.1 = facet_index(corner);
                        leading = leading.rotate_point(rotation);
                    }
                }
                let fresh = cycle.len() > 1 && !done.contains(&cycle[0].0);
                done.extend(cycle.iter().map(|&(cubie, _)| cubie));
                if fresh {
                    if cycle.len() != axis.order() {
                        return Err(degenerate("a piece cycle does not match its axis"));
                    }
                    cycles.push(cycle);
                }
            }
            slices.push(cycles);
        }
        Ok(slices)
    }

    pub(crate) fn fixed_slice(&self, axis: &Axis) -> Option<usize> {
        let cubie = &self.cubies[self.fixed_cubie?];
        let center = center_of_mass(&self.stickers.stickers[*cubie.stickers.first()?]);
        Some(axis.slice_of(center))
    }
}

/// How people name the turns of a face-turning puzzle of this shape
fn notation_for(
    shape: PuzzleBaseShape,
    axes: &[Axis],
    only_face_cuts: bool,
) -> Box<dyn NotationMapper> {
    let face_slices = axes
        .iter()
        .find(|axis| axis.positive.1 == PuzzleCutType::Face)
        .map_or(1, |axis| axis.planes.len() + 1);
    match shape {
        PuzzleBaseShape::Cube if only_face_cuts => match u32::try_from(face_slices) {
            Ok(slices) => Box::new(NxNxNCubeMapper::new(slices)),
            Err(_) => Box::new(NullMapper),
        },
        PuzzleBaseShape::Octahedron => Box::new(FaceRenamingMapper::new(FTO_FACE_NAMES)),
        PuzzleBaseShape::Dodecahedron => {
            let renaming: Box<dyn NotationMapper> =
                Box::new(FaceRenamingMapper::new(MEGAMINX_FACE_NAMES));
            if face_slices == 3 {
                Box::new(MegaminxScramblingNotationMapper::new(renaming))
            } else {
                renaming
            }
        }
        _ => Box::new(NullMapper),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn facet_index(facet: usize) -> u8 {
    facet as u8
}

fn build_axes(
    turn_planes: &[Quat],
    intersecting: &[Quat],
    rotations: &[Quat],
    features: &[Feature],
) -> Result<Vec<Axis>, PuzzleGeometryError> {
    let mut normals: Vec<Quat> = vec![];
    for plane in turn_planes {
        let normal = plane.make_normal();
        if !normals.iter().any(|n| normal.same_plane(n.make_normal())) {
            normals.push(normal);
        }
    }

    let mut plane_sets = vec![vec![]; normals.len()];
    for plane in intersecting {
        let normal = plane.make_normal();
        if let Some(axis) = normals.iter().position(|&n| normal.same_plane(n)) {
            plane_sets[axis].push(*plane);
        }
    }
    for (planes, normal) in plane_sets.iter_mut().zip(&normals) {
        for plane in planes.iter_mut() {
            *plane = plane.normalize_plane();
            if plane.make_normal().dist(*normal) > EPS {
                *plane = -*plane;
            }
        }
        planes.sort_by(|p, q| p.a.total_cmp(&q.a));
    }

    let mut rotation_sets = vec![vec![]; normals.len()];
    for &rotation in rotations {
        if (rotation.a.abs() - 1.).abs() < EPS {
            continue;
        }
        let normal = rotation.make_normal();
        if let Some(axis) = normals.iter().position(|&n| normal.same_plane(n)) {
            rotation_sets[axis].push(rotation);
        }
    }
    for (rotations, normal) in rotation_sets.iter_mut().zip(&normals) {
        let Some(first) = rotations.first() else {
            return Err(degenerate("a turn plane is not perpendicular to a symmetry axis"));
        };
        let good = first.make_normal();
        for rotation in rotations.iter_mut() {
            if good.dist(rotation.make_normal()) > EPS {
                *rotation = -*rotation;
            }
        }
        rotations.sort_by(|p, q| p.angle().total_cmp(&q.angle()));
        if rotations[0].dot(*normal) < 0. {
            rotations.reverse();
        }
    }

    let grip = |normal: Quat, sign: f64| {
        features
            .iter()
            .rev()
            .find(|feature| (normal.dot(feature.normal) - sign).abs() < EPS)
            .map(|feature| (ArcIntern::clone(&feature.name), feature.kind))
            .ok_or_else(|| degenerate("a turn axis points at no face, edge, or vertex"))
    };

    normals
        .into_iter()
        .zip(plane_sets)
        .zip(rotation_sets)
        .map(|((normal, planes), rotations)| {
            Ok(Axis {
                normal,
                planes,
                rotations,
                positive: grip(normal, 1.)?,
                negative: grip(normal, -1.)?,
                slice_cycles: vec![],
            })
        })
        .collect()
}
