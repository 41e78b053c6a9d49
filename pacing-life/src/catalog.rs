//! Content catalog: controlled events, the general pool and arcs, loaded
//! from one JSON document.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use pacing_core::content::{ArcDefinition, ControlledEvent, PoolEvent};
use pacing_core::{Director, EventPools, PacingConfig};

use crate::error::Result;

/// Every piece of authored content a playthrough draws from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    /// Hand-authored single-shot events.
    pub controlled: Vec<ControlledEvent>,
    /// General data-driven single-shot events.
    pub pool: Vec<PoolEvent>,
    /// Multi-stage story arcs.
    pub arcs: Vec<ArcDefinition>,
}

/// Counts of what a catalog holds and how much of it is usable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogReport {
    /// Controlled events.
    pub controlled: usize,
    /// Pool events.
    pub pool: usize,
    /// Arcs.
    pub arcs: usize,
    /// Definitions the engine will skip as malformed.
    pub malformed: usize,
}

impl Catalog {
    /// Parse a catalog from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not match the catalog shape.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let catalog: Self = serde_json::from_str(json)?;
        let report = catalog.report();
        info!(
            controlled = report.controlled,
            pool = report.pool,
            arcs = report.arcs,
            malformed = report.malformed,
            "Catalog loaded"
        );
        Ok(catalog)
    }

    /// Load a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Validate every definition and count the results. Malformed
    /// definitions are logged; the engine excludes them at runtime.
    #[must_use]
    pub fn report(&self) -> CatalogReport {
        let mut malformed = 0;
        let checks = self
            .controlled
            .iter()
            .map(|e| (e.id.as_str(), e.validate()))
            .chain(self.pool.iter().map(|e| (e.id.as_str(), e.validate())))
            .chain(self.arcs.iter().map(|a| (a.id.as_str(), a.validate())));
        for (id, result) in checks {
            if let Err(err) = result {
                warn!(id, error = %err, "Malformed catalog entry");
                malformed += 1;
            }
        }
        CatalogReport {
            controlled: self.controlled.len(),
            pool: self.pool.len(),
            arcs: self.arcs.len(),
            malformed,
        }
    }

    /// Look up the title of an event or arc by ID.
    #[must_use]
    pub fn title_of(&self, id: &str) -> Option<&str> {
        self.controlled
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.title.as_str())
            .or_else(|| self.pool.iter().find(|e| e.id == id).map(|e| e.title.as_str()))
            .or_else(|| self.arcs.iter().find(|a| a.id == id).map(|a| a.title.as_str()))
    }

    /// Build a director over this catalog's content.
    #[must_use]
    pub fn director(&self, config: PacingConfig) -> Director {
        Director::new(
            config,
            EventPools::new(self.controlled.clone(), self.pool.clone()),
            self.arcs.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "controlled": [
            {"id": "layoff", "title": "Laid off", "tag": "major_negative",
             "age": {"min": 20, "max": 64}, "requires": {"job": true},
             "choices": [{"text": "Look for work", "effects": {"stress": 10}}]}
        ],
        "pool": [
            {"id": "picnic", "title": "Picnic", "tag": "minor_positive",
             "choices": [{"text": "Enjoy it", "effects": {"happiness": 3}}]},
            {"id": "broken", "title": "No choices", "tag": "misc"}
        ],
        "arcs": [
            {"id": "startup", "title": "The Startup", "base_chance": 0.3,
             "stages": [{"id": "idea", "choices": [{"text": "Go"}]}]}
        ]
    }"#;

    #[test]
    fn parses_and_reports() {
        let catalog = Catalog::from_json_str(SAMPLE).expect("valid catalog");
        let report = catalog.report();
        assert_eq!(report.controlled, 1);
        assert_eq!(report.pool, 2);
        assert_eq!(report.arcs, 1);
        assert_eq!(report.malformed, 1);
        assert_eq!(catalog.title_of("startup"), Some("The Startup"));
        assert_eq!(catalog.title_of("nope"), None);
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let catalog = Catalog::from_json_str("{}").expect("empty catalog");
        assert_eq!(catalog, Catalog::default());
    }

    #[test]
    fn rejects_garbage() {
        assert!(Catalog::from_json_str("[1, 2]").is_err());
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, SAMPLE).expect("write catalog");
        let catalog = Catalog::from_file(&path).expect("load catalog");
        assert_eq!(catalog.pool.len(), 2);
    }
}
