use std::{
    collections::HashMap,
    sync::{Arc, LazyLock, Mutex, OnceLock, PoisonError},
};

use log::info;

use crate::{
    PuzzleGeometryError, description::PuzzleDescription, generator::PuzzleGeometry,
    options::PuzzleGeometryOptions, shapes::puzzle_description,
};

type Entry = Arc<OnceLock<Result<Arc<PuzzleGeometry>, PuzzleGeometryError>>>;

/// Derived puzzles, keyed by description and options. Each key is derived at
/// most once; callers asking for a key that is being derived wait for it.
#[derive(Debug, Default)]
pub struct PuzzleGeometryCache {
    entries: Mutex<HashMap<(String, PuzzleGeometryOptions), Entry>>,
}

static DEFAULT_CACHE: LazyLock<PuzzleGeometryCache> = LazyLock::new(PuzzleGeometryCache::new);

impl PuzzleGeometryCache {
    #[must_use]
    pub fn new() -> PuzzleGeometryCache {
        PuzzleGeometryCache::default()
    }

    /// The cache shared by the whole process
    #[must_use]
    pub fn global() -> &'static PuzzleGeometryCache {
        &DEFAULT_CACHE
    }

    /// # Errors
    ///
    /// Fails if the description does not parse or the derivation fails. A
    /// failure is remembered like a success.
    pub fn get(
        &self,
        description: &str,
        options: &PuzzleGeometryOptions,
    ) -> Result<Arc<PuzzleGeometry>, PuzzleGeometryError> {
        let parsed = description.parse::<PuzzleDescription>()?;
        let key = (parsed.to_string(), options.clone());
        // The map lock is only held to find the slot, not while deriving
        let entry = Arc::clone(
            self.entries
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .entry(key)
                .or_default(),
        );
        entry
            .get_or_init(|| {
                info!("Deriving the puzzle {parsed}");
                PuzzleGeometry::new(parsed, options.clone()).map(Arc::new)
            })
            .clone()
    }

    /// Number of keys that have been requested
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Derives a puzzle from its description through the process-wide cache
///
/// # Errors
///
/// Fails if the description does not parse or the derivation fails
pub fn get_puzzle_geometry_by_desc(
    description: &str,
    options: &PuzzleGeometryOptions,
) -> Result<Arc<PuzzleGeometry>, PuzzleGeometryError> {
    PuzzleGeometryCache::global().get(description, options)
}

/// Derives a named puzzle from the catalogue, such as `megaminx`
///
/// # Errors
///
/// Fails if the catalogue has no puzzle by that name, or if its derivation
/// fails
pub fn get_puzzle_geometry_by_name(
    name: &str,
    options: &PuzzleGeometryOptions,
) -> Result<Arc<PuzzleGeometry>, PuzzleGeometryError> {
    let description = puzzle_description(name)
        .ok_or_else(|| PuzzleGeometryError::UnknownPuzzle(name.to_owned()))?;
    get_puzzle_geometry_by_desc(description, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_once_per_key() {
        let cache = PuzzleGeometryCache::new();
        let options = PuzzleGeometryOptions::default();
        let first = cache.get("c f 0", &options).unwrap();
        let second = cache.get("c  f 0", &options).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);

        let killed = PuzzleGeometryOptions {
            kill_orientation: true,
            ..PuzzleGeometryOptions::default()
        };
        let third = cache.get("c f 0", &killed).unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn concurrent_callers_share_one_derivation() {
        let cache = Arc::new(PuzzleGeometryCache::new());
        let handles = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    cache
                        .get("c f 0.333333333333333", &PuzzleGeometryOptions::default())
                        .unwrap()
                })
            })
            .collect::<Vec<_>>();
        let geometries = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect::<Vec<_>>();
        assert!(geometries.iter().all(|g| Arc::ptr_eq(g, &geometries[0])));
    }

    #[test]
    fn failures_are_reported() {
        let cache = PuzzleGeometryCache::new();
        assert!(matches!(
            cache.get("q f 0", &PuzzleGeometryOptions::default()),
            Err(PuzzleGeometryError::BadShape(_))
        ));
        assert!(matches!(
            get_puzzle_geometry_by_name("no such puzzle", &PuzzleGeometryOptions::default()),
            Err(PuzzleGeometryError::UnknownPuzzle(_))
        ));
    }
}
