//! Which parks and facets the user has chosen.
//!
//! Every facet group carries an implicit "Any" state that is true exactly
//! when no explicit facet in the group is selected. "Any" is derived from
//! the explicit set rather than stored beside it, so the two can never
//! disagree no matter how checkbox events interleave.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use thiserror::Error;

use crate::directory::{normalize_name, LocationDirectory};
use crate::facets::{CheckState, FacetCatalog, FacetGroup};
use crate::geo::Coordinate;

const ANY_LABEL: &str = "Any";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("Please enter a distance or select at least one park before submitting.")]
    NothingSelected,
}

/// Human-readable projection of the current filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionSummary {
    pub activities_label: String,
    pub age_group_label: String,
    pub is_any_activities: bool,
    pub is_any_age_group: bool,
    pub locations_selected: usize,
}

impl std::fmt::Display for SelectionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Activities: {}", self.activities_label)?;
        writeln!(f, "Age Groups: {}", self.age_group_label)?;
        write!(f, "Parks/Facilities: {}", self.locations_selected)
    }
}

/// The effective query a search submission carries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchQuery {
    pub parks: Vec<String>,
    pub categories: Vec<String>,
    pub age_groups: Vec<String>,
    pub distance_miles: Option<f64>,
    pub reference_point: Option<Coordinate>,
}

#[derive(Debug, Clone)]
pub struct SelectionState {
    catalog: FacetCatalog,
    selected_locations: BTreeSet<String>,
    facets: BTreeMap<FacetGroup, BTreeSet<String>>,
    radius_miles: Option<f64>,
    reference_point: Option<Coordinate>,
}

impl SelectionState {
    #[must_use]
    pub fn new(catalog: FacetCatalog) -> Self {
        Self {
            catalog,
            selected_locations: BTreeSet::new(),
            facets: BTreeMap::new(),
            radius_miles: None,
            reference_point: None,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &FacetCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn reference_point(&self) -> Option<Coordinate> {
        self.reference_point
    }

    pub fn set_reference_point(&mut self, reference: Option<Coordinate>) {
        self.reference_point = reference;
    }

    #[must_use]
    pub fn radius_miles(&self) -> Option<f64> {
        self.radius_miles
    }

    pub fn set_radius(&mut self, radius_miles: Option<f64>) {
        self.radius_miles = radius_miles;
    }

    /// Normalized names of the selected locations.
    #[must_use]
    pub fn selected_locations(&self) -> &BTreeSet<String> {
        &self.selected_locations
    }

    #[must_use]
    pub fn is_location_selected(&self, name: &str) -> bool {
        self.selected_locations.contains(&normalize_name(name))
    }

    /// Flips membership of `name`. Returns the new membership, or `None`
    /// when the name is not in the directory (a stale checkbox).
    pub fn toggle_location(&mut self, directory: &LocationDirectory, name: &str) -> Option<bool> {
        let selected = !self.is_location_selected(name);
        self.set_location(directory, name, selected)
    }

    /// Sets membership of `name` explicitly; `None` for unknown names.
    pub fn set_location(
        &mut self,
        directory: &LocationDirectory,
        name: &str,
        selected: bool,
    ) -> Option<bool> {
        if directory.find(name).is_none() {
            tracing::debug!(name, "ignoring selection of unknown location");
            return None;
        }
        let key = normalize_name(name);
        if selected {
            self.selected_locations.insert(key);
        } else {
            self.selected_locations.remove(&key);
        }
        Some(selected)
    }

    pub fn clear_locations(&mut self) {
        self.selected_locations.clear();
    }

    /// Replaces the location selection with every location within
    /// `radius_miles` of `reference`. Not additive: previous picks are
    /// dropped. Without a reference point nothing changes and `false` is
    /// returned.
    pub fn apply_radius(
        &mut self,
        directory: &LocationDirectory,
        radius_miles: f64,
        reference: Option<Coordinate>,
    ) -> bool {
        let Some(reference) = reference else {
            tracing::debug!(radius_miles, "no reference point; radius not applied");
            return false;
        };
        self.selected_locations = directory.within_radius(reference, radius_miles);
        self.radius_miles = Some(radius_miles);
        self.reference_point = Some(reference);
        tracing::debug!(
            radius_miles,
            selected = self.selected_locations.len(),
            "applied radius selection"
        );
        true
    }

    /// Selects or deselects one explicit facet value. Returns `false` when
    /// the value is not offered by the catalog.
    pub fn set_facet(&mut self, group: FacetGroup, value: &str, selected: bool) -> bool {
        if !self.catalog.contains(group, value) {
            tracing::debug!(%group, value, "ignoring unknown facet value");
            return false;
        }
        let set = self.facets.entry(group).or_default();
        if selected {
            set.insert(value.to_owned());
        } else {
            set.remove(value);
        }
        true
    }

    /// The group's "Any" checkbox. Selecting it clears every explicit facet
    /// of the group, including any category group toggles. Deselecting it
    /// has no effect of its own: "Any" stays true until an explicit facet
    /// is chosen.
    pub fn set_any(&mut self, group: FacetGroup, selected: bool) {
        if selected {
            self.facets.remove(&group);
        }
    }

    /// A category group toggle: selects or deselects every child category.
    pub fn set_category_group(&mut self, group: &str, selected: bool) {
        let children: Vec<String> = self
            .catalog
            .children_of(group)
            .into_iter()
            .map(str::to_owned)
            .collect();
        if children.is_empty() {
            tracing::debug!(group, "ignoring toggle for unknown category group");
            return;
        }
        let set = self.facets.entry(FacetGroup::Categories).or_default();
        for child in children {
            if selected {
                set.insert(child);
            } else {
                set.remove(&child);
            }
        }
    }

    #[must_use]
    pub fn is_any(&self, group: FacetGroup) -> bool {
        self.facets.get(&group).is_none_or(BTreeSet::is_empty)
    }

    #[must_use]
    pub fn is_facet_selected(&self, group: FacetGroup, value: &str) -> bool {
        self.facets.get(&group).is_some_and(|s| s.contains(value))
    }

    /// Selected values of `group` in catalog display order.
    #[must_use]
    pub fn selected_facets(&self, group: FacetGroup) -> Vec<&str> {
        self.catalog
            .values(group)
            .into_iter()
            .filter(|v| self.is_facet_selected(group, v))
            .collect()
    }

    /// Tri-state of a category group toggle.
    #[must_use]
    pub fn group_toggle_state(&self, group: &str) -> CheckState {
        let children = self.catalog.children_of(group);
        let selected = children
            .iter()
            .filter(|c| self.is_facet_selected(FacetGroup::Categories, c))
            .count();
        CheckState::from_counts(selected, children.len())
    }

    #[must_use]
    pub fn summary(&self) -> SelectionSummary {
        let label = |group: FacetGroup| {
            let selected = self.selected_facets(group);
            if selected.is_empty() {
                ANY_LABEL.to_owned()
            } else {
                selected.join(", ")
            }
        };
        SelectionSummary {
            activities_label: label(FacetGroup::Categories),
            age_group_label: label(FacetGroup::AgeGroups),
            is_any_activities: self.is_any(FacetGroup::Categories),
            is_any_age_group: self.is_any(FacetGroup::AgeGroups),
            locations_selected: self.selected_locations.len(),
        }
    }

    /// The effective query. Parks are reported with their directory
    /// spelling, in checklist order.
    #[must_use]
    pub fn query(&self, directory: &LocationDirectory) -> SearchQuery {
        let parks = directory
            .rank(self.reference_point)
            .into_iter()
            .filter(|r| self.is_location_selected(&r.location.name))
            .map(|r| r.location.name.clone())
            .collect();
        SearchQuery {
            parks,
            categories: owned(self.selected_facets(FacetGroup::Categories)),
            age_groups: owned(self.selected_facets(FacetGroup::AgeGroups)),
            distance_miles: self.radius_miles,
            reference_point: self.reference_point,
        }
    }

    /// A search needs either a distance or at least one selected park.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionError::NothingSelected`] when neither is set.
    pub fn validate_submission(
        &self,
        directory: &LocationDirectory,
    ) -> Result<SearchQuery, SubmissionError> {
        if self.radius_miles.is_none() && self.selected_locations.is_empty() {
            return Err(SubmissionError::NothingSelected);
        }
        Ok(self.query(directory))
    }
}

fn owned(values: Vec<&str>) -> Vec<String> {
    values.into_iter().map(str::to_owned).collect()
}

#[cfg(test)]
#[path = "selection_test.rs"]
mod tests;
