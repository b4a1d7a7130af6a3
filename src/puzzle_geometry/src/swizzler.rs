use internment::ArcIntern;
use itertools::Itertools;

/// Splits grip names like `DFR` or `B_R` into the faces they touch, and maps
/// the many spellings of a grip back to the one name the generator uses.
#[derive(Clone, Debug)]
pub struct FaceNameSwizzler {
    face_names: Vec<ArcIntern<str>>,
    grip_names: Vec<ArcIntern<str>>,
    prefix_free: bool,
}

impl FaceNameSwizzler {
    #[must_use]
    pub fn new(face_names: Vec<ArcIntern<str>>) -> FaceNameSwizzler {
        let prefix_free = !face_names
            .iter()
            .enumerate()
            .cartesian_product(face_names.iter().enumerate())
            .any(|((i, a), (j, b))| i != j && a.starts_with(&**b));
        FaceNameSwizzler {
            face_names,
            grip_names: vec![],
            prefix_free,
        }
    }

    pub fn set_grip_names(&mut self, grip_names: Vec<ArcIntern<str>>) {
        self.grip_names = grip_names;
    }

    #[must_use]
    pub fn face_names(&self) -> &[ArcIntern<str>] {
        &self.face_names
    }

    /// Whether no face name starts with another, so names can be joined
    /// without a separator
    #[must_use]
    pub fn prefix_free(&self) -> bool {
        self.prefix_free
    }

    #[must_use]
    pub fn separator(&self) -> &'static str {
        if self.prefix_free { "" } else { "_" }
    }

    /// Splits a string into face indices, taking the longest face name that
    /// matches at each point and skipping `_` between names
    #[must_use]
    pub fn split(&self, s: &str) -> Option<Vec<usize>> {
        let mut faces = vec![];
        let mut at = 0;
        while at < s.len() {
            if at > 0 && s.as_bytes()[at] == b'_' {
                at += 1;
                if at == s.len() {
                    break;
                }
            }
            let rest = &s[at..];
            let (face, name) = self
                .face_names
                .iter()
                .enumerate()
                .filter(|(_, name)| rest.starts_with(&***name))
                .max_by_key(|(i, name)| (name.len(), std::cmp::Reverse(*i)))?;
            faces.push(face);
            at += name.len();
        }
        Some(faces)
    }

    #[must_use]
    pub fn join(&self, faces: &[usize]) -> String {
        faces
            .iter()
            .map(|&face| &*self.face_names[face])
            .join(self.separator())
    }

    /// Whether `input` names the same grip as `grip`: the same faces in any
    /// rotation, none repeated
    #[must_use]
    pub fn spin_match(&self, input: &str, grip: &str) -> bool {
        if input == grip {
            return true;
        }
        let (Some(a), Some(b)) = (self.split(input), self.split(grip)) else {
            return false;
        };
        a.len() == b.len() && a.iter().all_unique() && a.iter().all(|face| b.contains(face))
    }

    /// The grip that `name` refers to. Trailing `v` or `w` markers are
    /// ignored, and case does not matter. An exact match of faces wins; a
    /// name listing only some of a grip's faces is accepted when exactly one
    /// grip contains them all.
    #[must_use]
    pub fn unswizzle(&self, name: &str) -> Option<ArcIntern<str>> {
        let mut name = name;
        if name.chars().next().is_some_and(|c| c <= 'Z')
            && (name.ends_with('v') || name.ends_with('w'))
        {
            name = &name[..name.len() - 1];
        }
        let upper = name.to_uppercase();
        if let Some(grip) = self.grip_names.iter().find(|grip| ***grip == *upper) {
            return Some(ArcIntern::clone(grip));
        }

        let faces = self.split(&upper)?;
        if faces.is_empty() || !faces.iter().all_unique() {
            return None;
        }
        let mut partial = vec![];
        for grip in &self.grip_names {
            let Some(grip_faces) = self.split(grip) else {
                continue;
            };
            let contained = faces.iter().all(|face| grip_faces.contains(face));
            if contained && grip_faces.len() == faces.len() {
                return Some(ArcIntern::clone(grip));
            }
            if contained && faces.len() >= 2 {
                partial.push(grip);
            }
        }
        match partial.as_slice() {
            [grip] => Some(ArcIntern::clone(grip)),
            _ => None,
        }
    }
}
