//! Read-only directory of known parks and facilities.
//!
//! Names are the only key. Lookups normalize both sides with
//! [`normalize_name`], so two locations that differ only by case or
//! surrounding whitespace cannot be told apart. The first one loaded wins
//! lookups; construction logs a warning when that happens.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::geo::{format_miles, haversine_miles, Coordinate};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub coordinate: Coordinate,
}

impl Location {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            coordinate: Coordinate::new(latitude, longitude),
        }
    }
}

/// Matching key for a location name: trimmed and lowercased.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// A location in checklist order, with its distance from the reference
/// point when one is known.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedLocation<'a> {
    pub location: &'a Location,
    pub distance_miles: Option<f64>,
}

impl RankedLocation<'_> {
    /// Checklist label: `"Name"` or `"Name (1.3 mi)"`.
    #[must_use]
    pub fn label(&self) -> String {
        match self.distance_miles {
            Some(d) => format!("{} {}", self.location.name, format_miles(d)),
            None => self.location.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LocationDirectory {
    locations: Vec<Location>,
    by_key: HashMap<String, usize>,
}

impl LocationDirectory {
    pub fn new(locations: Vec<Location>) -> Self {
        let mut by_key = HashMap::with_capacity(locations.len());
        for (idx, loc) in locations.iter().enumerate() {
            let key = normalize_name(&loc.name);
            if let Some(&first) = by_key.get(&key) {
                let first: &Location = &locations[first];
                tracing::warn!(
                    name = %loc.name,
                    shadowed_by = %first.name,
                    "location name collides with an earlier entry after normalization"
                );
                continue;
            }
            by_key.insert(key, idx);
        }
        Self { locations, by_key }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.locations.iter()
    }

    /// Case-insensitive, whitespace-trimmed lookup.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Location> {
        self.by_key
            .get(&normalize_name(name))
            .map(|&idx| &self.locations[idx])
    }

    /// Orders every location for the checklist.
    ///
    /// With a reference point: ascending distance, ties broken by name.
    /// Without one: ascending by name. Names compare byte-wise, so
    /// uppercase sorts before lowercase and accents after ASCII.
    #[must_use]
    pub fn rank(&self, reference: Option<Coordinate>) -> Vec<RankedLocation<'_>> {
        let mut ranked: Vec<RankedLocation<'_>> = self
            .locations
            .iter()
            .map(|location| RankedLocation {
                location,
                distance_miles: reference.map(|r| haversine_miles(r, location.coordinate)),
            })
            .collect();

        ranked.sort_by(|a, b| {
            let by_distance = match (a.distance_miles, b.distance_miles) {
                (Some(da), Some(db)) => da.total_cmp(&db),
                _ => std::cmp::Ordering::Equal,
            };
            by_distance.then_with(|| a.location.name.cmp(&b.location.name))
        });
        ranked
    }

    /// Normalized names of every location at most `radius_miles` away.
    #[must_use]
    pub fn within_radius(&self, reference: Coordinate, radius_miles: f64) -> BTreeSet<String> {
        self.locations
            .iter()
            .filter(|loc| haversine_miles(reference, loc.coordinate) <= radius_miles)
            .map(|loc| normalize_name(&loc.name))
            .collect()
    }

    /// Checklist search box: ranked entries whose label contains `query`,
    /// compared case-insensitively. An empty query matches everything.
    #[must_use]
    pub fn filter_labels(
        &self,
        query: &str,
        reference: Option<Coordinate>,
    ) -> Vec<RankedLocation<'_>> {
        let needle = query.trim().to_lowercase();
        self.rank(reference)
            .into_iter()
            .filter(|r| needle.is_empty() || r.label().to_lowercase().contains(&needle))
            .collect()
    }
}

#[cfg(test)]
#[path = "directory_test.rs"]
mod tests;
