// src/models/catalog.rs
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;
use std::fs;

const BUILTIN_CATALOG: &str = include_str!("../../data/maps.json");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapCatalogEntry {
    pub id: String,
    pub name: String,
}

impl MapCatalogEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug)]
pub enum CatalogError {
    Io(String, std::io::Error),
    Parse(serde_json::Error),
    InvalidCategory(String, serde_json::Error),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(path, e) => write!(f, "Failed to read map catalog {}: {}", path, e),
            Self::Parse(e) => write!(f, "Map catalog is not a JSON object: {}", e),
            Self::InvalidCategory(category, e) => {
                write!(f, "Invalid map list for category {}: {}", category, e)
            }
        }
    }
}

impl std::error::Error for CatalogError {}

/// Ordered map lists per quick-filter category. Category order follows the
/// source document, and so does the map order inside each category.
#[derive(Debug, Clone, Default)]
pub struct MapCatalog {
    categories: Vec<(String, Vec<MapCatalogEntry>)>,
}

impl MapCatalog {
    pub fn new(categories: Vec<(String, Vec<MapCatalogEntry>)>) -> Self {
        Self { categories }
    }

    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Reads the catalog from `path`, or the bundled one when no path is set.
    pub fn load(path: Option<&str>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .map_err(|e| CatalogError::Io(path.to_string(), e))?;
                Self::from_json(&text)
            }
            None => Self::builtin(),
        }
    }

    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        let document: Map<String, Value> =
            serde_json::from_str(text).map_err(CatalogError::Parse)?;

        let mut categories = Vec::with_capacity(document.len());
        for (category, maps) in document {
            let entries: Vec<MapCatalogEntry> = serde_json::from_value(maps)
                .map_err(|e| CatalogError::InvalidCategory(category.clone(), e))?;
            categories.push((category, entries));
        }
        Ok(Self { categories })
    }

    pub fn maps_for(&self, category: &str) -> Option<&[MapCatalogEntry]> {
        self.categories
            .iter()
            .find(|(id, _)| id == category)
            .map(|(_, maps)| maps.as_slice())
    }

    pub fn categories(&self) -> impl Iterator<Item = (&str, &[MapCatalogEntry])> {
        self.categories
            .iter()
            .map(|(id, maps)| (id.as_str(), maps.as_slice()))
    }

    /// Union of the given categories' maps, de-duplicated by id with the
    /// first occurrence winning. An empty selection means every category.
    pub fn union<S: AsRef<str>>(&self, selected: &[S]) -> Vec<MapCatalogEntry> {
        let lists: Vec<&[MapCatalogEntry]> = if selected.is_empty() {
            self.categories.iter().map(|(_, maps)| maps.as_slice()).collect()
        } else {
            selected
                .iter()
                .filter_map(|category| self.maps_for(category.as_ref()))
                .collect()
        };

        let mut seen = HashSet::new();
        lists
            .into_iter()
            .flatten()
            .filter(|entry| seen.insert(entry.id.clone()))
            .cloned()
            .collect()
    }
}
