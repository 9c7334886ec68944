//! Wall patterns and the pattern cache
//!
//! A pattern is a named list of walls, each sitting in one lane at some
//! radial distance from the pattern's start. Walls are kept sorted by
//! distance; nearest/furthest threat lookups rely on that order.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::lenient_flag;
use crate::error::{Result, SimError};
use crate::persistence::{DocumentKind, DocumentLoader};

/// A single obstacle segment template
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    /// Lane index in [0, lanes)
    pub side: u32,
    /// Inner radius relative to the pattern start
    pub distance: f32,
    /// Radial thickness
    pub height: f32,
    /// Non-lethal marker for a safe gap
    #[serde(default, deserialize_with = "lenient_flag")]
    pub is_trigger: bool,
}

/// Named, distance-sorted collection of walls
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pattern {
    #[serde(skip)]
    name: String,
    walls: Vec<Wall>,
}

#[derive(Deserialize)]
struct PatternDocument {
    walls: Vec<Wall>,
}

impl Pattern {
    /// Build a pattern from walls in any order
    pub fn new(name: impl Into<String>, mut walls: Vec<Wall>) -> Self {
        // Stable: walls at equal distance keep document order
        walls.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        Self {
            name: name.into(),
            walls,
        }
    }

    /// Parse a pattern document
    pub fn parse(name: &str, text: &str, lanes: u32) -> Result<Self> {
        let doc: PatternDocument =
            serde_json::from_str(text).map_err(|e| SimError::malformed(name, e.to_string()))?;

        if doc.walls.is_empty() {
            return Err(SimError::malformed(name, "pattern has no walls"));
        }
        for wall in &doc.walls {
            if wall.side >= lanes {
                return Err(SimError::malformed(
                    name,
                    format!("wall side {} outside {} lanes", wall.side, lanes),
                ));
            }
            if !wall.distance.is_finite() || !wall.height.is_finite() {
                return Err(SimError::malformed(name, "wall distance/height must be finite"));
            }
        }

        Ok(Self::new(name, doc.walls))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Walls, ascending by distance
    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    /// Serialize back into the document format
    pub fn to_document(&self) -> String {
        // Plain data with string keys; serialization cannot fail
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Loads patterns by name and caches them for the rest of the run.
///
/// Repeated loads return the same `Arc`, so callers may compare by identity.
pub struct PatternStore {
    loader: Box<dyn DocumentLoader>,
    lanes: u32,
    cache: HashMap<String, Arc<Pattern>>,
}

impl PatternStore {
    pub fn new(loader: Box<dyn DocumentLoader>, lanes: u32) -> Self {
        Self {
            loader,
            lanes,
            cache: HashMap::new(),
        }
    }

    /// Load a pattern, hitting the loader only on first reference
    pub fn load(&mut self, name: &str) -> Result<Arc<Pattern>> {
        if let Some(pattern) = self.cache.get(name) {
            return Ok(Arc::clone(pattern));
        }

        let text = self.loader.load_document(DocumentKind::Pattern, name)?;
        let pattern = Arc::new(Pattern::parse(name, &text, self.lanes)?);
        log::debug!("Loaded pattern {} ({} walls)", name, pattern.walls().len());
        self.cache.insert(name.to_string(), Arc::clone(&pattern));
        Ok(pattern)
    }

    /// Document loader backing this store
    pub fn loader(&self) -> &dyn DocumentLoader {
        self.loader.as_ref()
    }

    pub fn lanes(&self) -> u32 {
        self.lanes
    }

    /// Number of cached patterns
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryLoader;

    const UNSORTED: &str = r#"{ "walls": [
        { "side": 2, "distance": 30, "height": 5 },
        { "side": 0, "distance": 0, "height": 5, "is_trigger": true },
        { "side": 1, "distance": 10, "height": 5, "is_trigger": "maybe" }
    ] }"#;

    #[test]
    fn test_parse_sorts_by_distance() {
        let pattern = Pattern::parse("p", UNSORTED, 6).unwrap();
        let distances: Vec<f32> = pattern.walls().iter().map(|w| w.distance).collect();
        assert_eq!(distances, vec![0.0, 10.0, 30.0]);
        assert!(pattern.walls()[0].is_trigger);
        // Malformed trigger flag reads as false
        assert!(!pattern.walls()[1].is_trigger);
        assert!(!pattern.walls()[2].is_trigger);
    }

    #[test]
    fn test_missing_required_field_is_malformed() {
        let err = Pattern::parse("p", r#"{ "walls": [ { "side": 0, "height": 5 } ] }"#, 6)
            .unwrap_err();
        assert!(matches!(err, SimError::MalformedDocument { .. }));
    }

    #[test]
    fn test_side_outside_lanes_is_malformed() {
        let err = Pattern::parse("p", r#"{ "walls": [ { "side": 6, "distance": 0, "height": 5 } ] }"#, 6)
            .unwrap_err();
        assert!(matches!(err, SimError::MalformedDocument { .. }));
    }

    #[test]
    fn test_empty_pattern_is_malformed() {
        assert!(Pattern::parse("p", r#"{ "walls": [] }"#, 6).is_err());
    }

    #[test]
    fn test_store_caches_by_identity() {
        let loader = MemoryLoader::new().with_pattern("p", UNSORTED);
        let mut store = PatternStore::new(Box::new(loader), 6);

        let first = store.load("p").unwrap();
        let second = store.load("p").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_not_found() {
        let mut store = PatternStore::new(Box::new(MemoryLoader::new()), 6);
        assert!(matches!(store.load("nope"), Err(SimError::NotFound { .. })));
        assert!(store.is_empty());
    }

    #[test]
    fn test_to_document_reparses() {
        let pattern = Pattern::parse("p", UNSORTED, 6).unwrap();
        let reparsed = Pattern::parse("p", &pattern.to_document(), 6).unwrap();
        assert_eq!(pattern, reparsed);
    }
}
