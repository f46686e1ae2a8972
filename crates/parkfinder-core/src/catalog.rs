//! Park and facet catalog loaded from YAML.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::directory::{normalize_name, Location, LocationDirectory};
use crate::facets::{CategoryFacet, FacetCatalog};
use crate::geo::Coordinate;
use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParkConfig {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub name: String,
    #[serde(default)]
    pub group: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogFile {
    pub parks: Vec<ParkConfig>,
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
    #[serde(default)]
    pub age_groups: Vec<String>,
}

impl CatalogFile {
    /// Parks in file order. Name collisions are kept; the directory
    /// resolves them to the first entry.
    #[must_use]
    pub fn directory(&self) -> LocationDirectory {
        LocationDirectory::new(
            self.parks
                .iter()
                .map(|p| Location::new(p.name.clone(), p.latitude, p.longitude))
                .collect(),
        )
    }

    #[must_use]
    pub fn facets(&self) -> FacetCatalog {
        FacetCatalog::new(
            self.categories
                .iter()
                .map(|c| CategoryFacet {
                    name: c.name.clone(),
                    group: c.group.clone(),
                })
                .collect(),
            self.age_groups.clone(),
        )
    }
}

/// Load and validate the catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_catalog(path: &Path) -> Result<CatalogFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    let catalog = parse_catalog(&content)?;
    tracing::debug!(
        path = %path.display(),
        parks = catalog.parks.len(),
        categories = catalog.categories.len(),
        age_groups = catalog.age_groups.len(),
        "loaded catalog"
    );
    Ok(catalog)
}

/// Parse and validate catalog YAML.
///
/// # Errors
///
/// Returns `ConfigError::CatalogFileParse` for malformed YAML and
/// `ConfigError::Validation` for blank names, out-of-range coordinates or
/// duplicate facet values.
pub fn parse_catalog(content: &str) -> Result<CatalogFile, ConfigError> {
    let catalog: CatalogFile =
        serde_yaml::from_str(content).map_err(ConfigError::CatalogFileParse)?;
    validate_catalog(&catalog)?;
    Ok(catalog)
}

fn validate_catalog(catalog: &CatalogFile) -> Result<(), ConfigError> {
    let mut seen_parks = HashSet::new();
    for park in &catalog.parks {
        if park.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "park name must be non-empty".to_string(),
            ));
        }
        if !Coordinate::new(park.latitude, park.longitude).is_in_range() {
            return Err(ConfigError::Validation(format!(
                "park '{}' has out-of-range coordinates ({}, {})",
                park.name, park.latitude, park.longitude
            )));
        }
        if !seen_parks.insert(normalize_name(&park.name)) {
            // Kept; lookups resolve to the first entry.
            tracing::warn!(name = %park.name, "duplicate park name in catalog");
        }
    }

    let mut seen_categories = HashSet::new();
    for category in &catalog.categories {
        if category.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "category name must be non-empty".to_string(),
            ));
        }
        if category
            .group
            .as_deref()
            .is_some_and(|g| g.trim().is_empty())
        {
            return Err(ConfigError::Validation(format!(
                "category '{}' has a blank group",
                category.name
            )));
        }
        if !seen_categories.insert(category.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate category: '{}'",
                category.name
            )));
        }
    }

    let mut seen_ages = HashSet::new();
    for age_group in &catalog.age_groups {
        if age_group.trim().is_empty() {
            return Err(ConfigError::Validation(
                "age group must be non-empty".to_string(),
            ));
        }
        if !seen_ages.insert(age_group.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate age group: '{age_group}'"
            )));
        }
    }

    Ok(())
}
