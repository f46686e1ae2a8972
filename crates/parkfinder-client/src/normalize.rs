//! Normalization from raw `load_more` wire types to [`parkfinder_core::ResultsPage`].

use parkfinder_core::{ActivityPark, ActivityRecord, Coordinate, Occurrence, ResultsPage};

use crate::types::{LoadMoreResponse, RawActivity, RawActivityPark};

/// Abbreviations the activity registry uses in facility labels.
const ABBREVIATIONS: [(&str, &str); 4] = [
    ("Ctr", "Center"),
    ("Pk", "Park"),
    ("Fld", "Field"),
    ("Cmty", "Community"),
];

/// Expands whole-word facility abbreviations so result locations line up
/// with directory names: `"Kelly Pk Fld"` becomes `"Kelly Park Field"`.
///
/// Whitespace runs collapse to a single space.
#[must_use]
pub fn expand_abbreviations(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            ABBREVIATIONS
                .iter()
                .find(|(short, _)| *short == word)
                .map_or(word, |(_, long)| *long)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Converts one response into a [`ResultsPage`] tagged with the cursor it
/// was requested with.
///
/// Parks with unusable coordinates are dropped with a warning; their
/// activities still become cards.
#[must_use]
pub fn normalize_page(cursor: u32, response: LoadMoreResponse) -> ResultsPage {
    let activities = response
        .activities
        .into_iter()
        .map(normalize_activity)
        .collect();
    let activity_parks = response
        .activity_parks
        .into_iter()
        .filter_map(normalize_park)
        .collect();

    ResultsPage {
        page_cursor: cursor,
        activities,
        activity_parks,
        has_more: response.more_results_to_fetch,
    }
}

fn normalize_activity(raw: RawActivity) -> ActivityRecord {
    let location_name = raw
        .location
        .as_deref()
        .map(expand_abbreviations)
        .unwrap_or_default();
    if location_name.is_empty() {
        tracing::debug!(activity = %raw.name, "activity has no location");
    }
    let occurrences = zip_occurrences(&raw);

    ActivityRecord {
        name: raw.name.trim().to_owned(),
        location_name,
        category: raw.category.unwrap_or_default(),
        age_description: raw.age_description.unwrap_or_default(),
        occurrences,
        description: non_blank(raw.desc),
    }
}

/// Folds the parallel per-session arrays into one [`Occurrence`] each.
/// Ragged arrays are padded with blanks rather than truncated.
fn zip_occurrences(raw: &RawActivity) -> Vec<Occurrence> {
    let len = [
        raw.date_ranges.len(),
        raw.time_ranges.len(),
        raw.action_links.len(),
        raw.detail_links.len(),
        raw.days.len(),
    ]
    .into_iter()
    .max()
    .unwrap_or(0);

    if raw.date_ranges.len() != len || raw.time_ranges.len() != len {
        tracing::debug!(
            activity = %raw.name,
            dates = raw.date_ranges.len(),
            times = raw.time_ranges.len(),
            sessions = len,
            "ragged session arrays"
        );
    }

    let link = |links: &[Option<String>], i: usize| non_blank(links.get(i).cloned().flatten());

    (0..len)
        .map(|i| Occurrence {
            date: raw.date_ranges.get(i).cloned().unwrap_or_default(),
            time: raw.time_ranges.get(i).cloned().unwrap_or_default(),
            registration_link: link(&raw.action_links, i),
            detail_link: link(&raw.detail_links, i),
            days: link(&raw.days, i),
        })
        .collect()
}

fn normalize_park(raw: RawActivityPark) -> Option<ActivityPark> {
    let RawActivityPark(name, latitude, longitude, activity_names) = raw;
    let coordinate = Coordinate::new(latitude, longitude);
    if !coordinate.is_in_range() {
        tracing::warn!(park = %name, latitude, longitude, "dropping park with unusable coordinates");
        return None;
    }
    Some(ActivityPark {
        name: expand_abbreviations(&name),
        coordinate,
        activity_names,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
