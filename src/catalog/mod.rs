//! Case Catalog: the ordered, read-only deck of scenarios
//!
//! # Components
//! - `case.rs`: `Case` record and the `Decision` enum
//!
//! A catalog is loaded once per run from a JSON array and validated:
//! ids are non-empty and unique, and cases that happened carry a
//! protection note. Order in the file is presentation order.

pub mod case;

pub use case::{Case, Decision};

use rustc_hash::FxHashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading or validating a catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog file could not be read
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog file is not a JSON array of cases
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// A case has an empty id
    #[error("case #{0} has an empty id")]
    EmptyId(usize),

    /// Two cases share an id
    #[error("duplicate case id: {0}")]
    DuplicateId(String),

    /// A case that happened has no protection note
    #[error("case {0} happened but has no protection note")]
    MissingProtectionNote(String),
}

/// Immutable ordered list of cases
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    cases: Vec<Case>,
}

impl Catalog {
    /// Build a catalog from cases, validating ids and notes
    pub fn from_cases(cases: Vec<Case>) -> Result<Self, CatalogError> {
        let mut seen = FxHashSet::default();

        for (idx, case) in cases.iter().enumerate() {
            if case.id.trim().is_empty() {
                return Err(CatalogError::EmptyId(idx));
            }
            if !seen.insert(case.id.as_str()) {
                return Err(CatalogError::DuplicateId(case.id.clone()));
            }
            if case.was_real && case.protection_note.is_none() {
                return Err(CatalogError::MissingProtectionNote(case.id.clone()));
            }
        }

        Ok(Catalog { cases })
    }

    /// Parse a catalog from a JSON array
    pub fn from_json(content: &str) -> Result<Self, CatalogError> {
        let cases: Vec<Case> = serde_json::from_str(content)?;
        Self::from_cases(cases)
    }

    /// Load a catalog file
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path)?;
        let catalog = Self::from_json(&content)?;

        if catalog.is_empty() {
            tracing::warn!(path = %path.display(), "catalog is empty; session starts complete");
        } else {
            tracing::info!(path = %path.display(), cases = catalog.len(), "catalog loaded");
        }

        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Case> {
        self.cases.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Case> {
        self.cases.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(id: &str, was_real: bool) -> Case {
        Case {
            id: id.into(),
            title: format!("Case {}", id),
            prompt: format!("Prompt {}", id),
            was_real,
            verdict_summary: if was_real { "Happened" } else { "Did not happen" }.into(),
            handling_note: "Handled".into(),
            protection_note: was_real.then(|| "Protected".to_string()),
        }
    }

    #[test]
    fn test_valid_catalog_keeps_order() {
        let catalog = Catalog::from_cases(vec![case("b", true), case("a", false)]).unwrap();
        let ids: Vec<&str> = catalog.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(1).unwrap().id, "a");
        assert!(catalog.get(2).is_none());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let err = Catalog::from_cases(vec![case("a", true), case("a", false)]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(id) if id == "a"));
    }

    #[test]
    fn test_empty_id_rejected() {
        let err = Catalog::from_cases(vec![case("a", false), case(" ", false)]).unwrap_err();
        assert!(matches!(err, CatalogError::EmptyId(1)));
    }

    #[test]
    fn test_real_case_needs_protection_note() {
        let mut c = case("a", true);
        c.protection_note = None;
        let err = Catalog::from_cases(vec![c]).unwrap_err();
        assert!(matches!(err, CatalogError::MissingProtectionNote(_)));
    }

    #[test]
    fn test_empty_catalog_allowed() {
        let catalog = Catalog::from_json("[]").unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            Catalog::from_json("{\"id\": 1}"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_bundled_deck_is_valid() {
        let content = include_str!("../../data/cases.json");
        let catalog = Catalog::from_json(content).unwrap();
        assert_eq!(catalog.len(), 9);
    }
}
