//! Incremental "load more" results.
//!
//! Pages are appended in arrival order with no per-activity dedup: the
//! upstream search can return the same activity on two pages and both
//! cards are kept. Deduplication happens only at the marker level, keyed by
//! normalized location name, so a park appears on the map once no matter
//! how many pages mention it.
//!
//! Only one page request may be in flight. [`ResultsAggregator::begin_fetch`]
//! moves `Idle → Fetching`; the request settles through
//! [`ResultsAggregator::append_page`] or [`ResultsAggregator::fail_fetch`].

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::directory::normalize_name;
use crate::geo::{Bounds, Coordinate};

/// One scheduled session of an activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    pub date: String,
    pub time: String,
    pub registration_link: Option<String>,
    pub detail_link: Option<String>,
    pub days: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub name: String,
    /// Foreign key into the location directory, by name.
    pub location_name: String,
    pub category: String,
    pub age_description: String,
    pub occurrences: Vec<Occurrence>,
    pub description: Option<String>,
}

/// A park mentioned by a results page, with the activities held there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityPark {
    pub name: String,
    pub coordinate: Coordinate,
    pub activity_names: Vec<String>,
}

impl ActivityPark {
    /// Activity names with repeats removed, first occurrence kept.
    #[must_use]
    pub fn unique_activities(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.activity_names
            .iter()
            .map(String::as_str)
            .filter(|a| seen.insert(*a))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsPage {
    /// Cursor the page was requested with.
    pub page_cursor: u32,
    pub activities: Vec<ActivityRecord>,
    pub activity_parks: Vec<ActivityPark>,
    pub has_more: bool,
}

/// Cursor arithmetic for "load more". The first request after the initial
/// results uses `initial_cursor`; each appended page moves the cursor
/// `page_size` past the page's own cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationPolicy {
    pub initial_cursor: u32,
    pub page_size: u32,
}

impl Default for PaginationPolicy {
    fn default() -> Self {
        Self {
            initial_cursor: 6,
            page_size: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchState {
    Idle,
    Fetching { cursor: u32 },
    Exhausted,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregatorError {
    #[error("a page request for cursor {cursor} is already in flight")]
    FetchInFlight { cursor: u32 },

    #[error("no more results for the current query")]
    Exhausted,
}

/// What one `append_page` call changed.
#[derive(Debug, Clone, PartialEq)]
pub struct AppendOutcome {
    /// Index of the first appended activity in [`ResultsAggregator::activities`].
    pub first_index: usize,
    pub appended: usize,
    /// Parks that need a marker, in first-mention order.
    pub new_markers: Vec<ActivityPark>,
    pub exhausted: bool,
}

#[derive(Debug, Clone)]
pub struct ResultsAggregator {
    policy: PaginationPolicy,
    activities: Vec<ActivityRecord>,
    markers: Vec<ActivityPark>,
    seen_locations: HashSet<String>,
    latest_card: HashMap<String, usize>,
    cursor: u32,
    state: FetchState,
}

impl Default for ResultsAggregator {
    fn default() -> Self {
        Self::new(PaginationPolicy::default())
    }
}

impl ResultsAggregator {
    #[must_use]
    pub fn new(policy: PaginationPolicy) -> Self {
        Self {
            policy,
            activities: Vec::new(),
            markers: Vec::new(),
            seen_locations: HashSet::new(),
            latest_card: HashMap::new(),
            cursor: policy.initial_cursor,
            state: FetchState::Idle,
        }
    }

    #[must_use]
    pub fn policy(&self) -> PaginationPolicy {
        self.policy
    }

    #[must_use]
    pub fn state(&self) -> FetchState {
        self.state
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.state == FetchState::Exhausted
    }

    /// Cursor the next page request should use.
    #[must_use]
    pub fn next_cursor(&self) -> u32 {
        self.cursor
    }

    #[must_use]
    pub fn activities(&self) -> &[ActivityRecord] {
        &self.activities
    }

    /// Every marker rendered so far, in the order they were first seen.
    #[must_use]
    pub fn markers(&self) -> &[ActivityPark] {
        &self.markers
    }

    #[must_use]
    pub fn has_marker(&self, location_name: &str) -> bool {
        self.seen_locations.contains(&normalize_name(location_name))
    }

    #[must_use]
    pub fn marker(&self, location_name: &str) -> Option<&ActivityPark> {
        let key = normalize_name(location_name);
        self.markers.iter().find(|m| normalize_name(&m.name) == key)
    }

    /// Index of the most recently appended card for a location.
    #[must_use]
    pub fn card_for_location(&self, location_name: &str) -> Option<usize> {
        self.latest_card.get(&normalize_name(location_name)).copied()
    }

    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.markers.iter().map(|m| m.coordinate))
    }

    /// Starts a page request and returns the cursor to send.
    ///
    /// # Errors
    ///
    /// - [`AggregatorError::FetchInFlight`] while another request is pending.
    /// - [`AggregatorError::Exhausted`] once the last page has been appended.
    pub fn begin_fetch(&mut self) -> Result<u32, AggregatorError> {
        match self.state {
            FetchState::Fetching { cursor } => Err(AggregatorError::FetchInFlight { cursor }),
            FetchState::Exhausted => Err(AggregatorError::Exhausted),
            FetchState::Idle => {
                self.state = FetchState::Fetching {
                    cursor: self.cursor,
                };
                tracing::debug!(cursor = self.cursor, "page fetch started");
                Ok(self.cursor)
            }
        }
    }

    /// Settles a failed request. Activities and cursor are untouched so the
    /// same page can be requested again.
    pub fn fail_fetch(&mut self) {
        if let FetchState::Fetching { cursor } = self.state {
            tracing::debug!(cursor, "page fetch failed; back to idle");
            self.state = FetchState::Idle;
        }
    }

    /// Appends a page of results.
    ///
    /// Accepted while idle (the initial results rendered with the page) or
    /// while the matching request is in flight. A response whose cursor
    /// differs from the in-flight one is still applied.
    ///
    /// # Errors
    ///
    /// Returns [`AggregatorError::Exhausted`] if a previous page already
    /// reported that no more results exist.
    pub fn append_page(&mut self, page: ResultsPage) -> Result<AppendOutcome, AggregatorError> {
        if let FetchState::Fetching { cursor } = self.state {
            if cursor != page.page_cursor {
                tracing::warn!(
                    requested = cursor,
                    received = page.page_cursor,
                    "page cursor differs from in-flight request; applying anyway"
                );
            }
        } else if self.state == FetchState::Exhausted {
            return Err(AggregatorError::Exhausted);
        }

        let ResultsPage {
            page_cursor,
            activities,
            activity_parks,
            has_more,
        } = page;

        let first_index = self.activities.len();
        let appended = activities.len();
        let mut new_markers = Vec::new();

        for activity in &activities {
            let key = normalize_name(&activity.location_name);
            if self.seen_locations.contains(&key) {
                continue;
            }
            match activity_parks
                .iter()
                .find(|p| normalize_name(&p.name) == key)
            {
                Some(park) => {
                    self.seen_locations.insert(key);
                    new_markers.push(park.clone());
                }
                None => tracing::debug!(
                    location = %activity.location_name,
                    "activity location has no coordinates on this page; marker deferred"
                ),
            }
        }
        for park in &activity_parks {
            if self.seen_locations.insert(normalize_name(&park.name)) {
                new_markers.push(park.clone());
            }
        }

        for (offset, activity) in activities.iter().enumerate() {
            self.latest_card
                .insert(normalize_name(&activity.location_name), first_index + offset);
        }
        self.activities.extend(activities);
        self.markers.extend(new_markers.iter().cloned());

        self.cursor = page_cursor.saturating_add(self.policy.page_size);
        self.state = if has_more {
            FetchState::Idle
        } else {
            FetchState::Exhausted
        };

        tracing::debug!(
            page_cursor,
            appended,
            new_markers = new_markers.len(),
            next_cursor = self.cursor,
            exhausted = !has_more,
            "appended results page"
        );

        Ok(AppendOutcome {
            first_index,
            appended,
            new_markers,
            exhausted: !has_more,
        })
    }

    /// Starts over for a new query. A request still in flight stays
    /// pending until `append_page` or `fail_fetch` settles it, so a second
    /// fetch cannot start alongside it.
    pub fn reset(&mut self) {
        self.activities.clear();
        self.markers.clear();
        self.seen_locations.clear();
        self.latest_card.clear();
        self.cursor = self.policy.initial_cursor;
        if !matches!(self.state, FetchState::Fetching { .. }) {
            self.state = FetchState::Idle;
        }
    }
}

#[cfg(test)]
#[path = "results_test.rs"]
mod tests;
