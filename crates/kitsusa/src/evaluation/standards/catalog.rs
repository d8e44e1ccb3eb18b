use std::fs;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;

use super::{Standards, StandardsError};

const EMBEDDED_STANDARDS: &str = include_str!("../../../data/standards.json");

#[derive(Deserialize)]
struct CatalogFile {
    versions: Vec<Standards>,
}

/// Effective-dated standards versions, oldest first.
#[derive(Debug, Clone)]
pub struct StandardsCatalog {
    versions: Vec<Arc<Standards>>,
}

impl StandardsCatalog {
    pub fn new(versions: Vec<Standards>) -> Result<Self, StandardsError> {
        if versions.is_empty() {
            return Err(StandardsError::Empty);
        }
        for standards in &versions {
            standards.validate()?;
        }

        let mut versions: Vec<Arc<Standards>> = versions.into_iter().map(Arc::new).collect();
        versions.sort_by_key(|standards| standards.effective_date);
        Ok(Self { versions })
    }

    /// Reference data compiled into the crate.
    pub fn embedded() -> Result<Self, StandardsError> {
        Self::from_json(EMBEDDED_STANDARDS)
    }

    pub fn from_json(json: &str) -> Result<Self, StandardsError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::new(file.versions)
    }

    pub fn from_path(path: &Path) -> Result<Self, StandardsError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn versions(&self) -> impl Iterator<Item = &Standards> {
        self.versions.iter().map(|standards| standards.as_ref())
    }

    pub fn latest(&self) -> &Standards {
        // `new` rejects empty catalogs.
        &self.versions[self.versions.len() - 1]
    }

    /// Newest version whose effective date is on or before `date`.
    pub fn effective_on(&self, date: NaiveDate) -> Result<Arc<Standards>, StandardsError> {
        self.versions
            .iter()
            .rev()
            .find(|standards| standards.effective_date <= date)
            .cloned()
            .ok_or(StandardsError::NoneEffective(date))
    }

    /// `effective_on` when a date is given, otherwise the latest version.
    pub fn select(&self, as_of: Option<NaiveDate>) -> Result<Arc<Standards>, StandardsError> {
        match as_of {
            Some(date) => self.effective_on(date),
            None => Ok(Arc::clone(&self.versions[self.versions.len() - 1])),
        }
    }
}
