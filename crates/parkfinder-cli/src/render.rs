//! Plain-text rendering of presenter state.

use std::fmt::Write as _;

use parkfinder_core::{ActivityPark, ActivityRecord, CheckState, ChecklistEntry};

pub(crate) fn checklist(entries: &[ChecklistEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        let mark = if entry.checked { 'x' } else { ' ' };
        let _ = writeln!(out, "[{mark}] {}", entry.label);
    }
    out
}

pub(crate) fn group_toggles(toggles: &[(String, CheckState)]) -> String {
    let mut out = String::new();
    for (group, state) in toggles {
        let mark = match state {
            CheckState::Selected => 'x',
            CheckState::Indeterminate => '-',
            CheckState::Unselected => ' ',
        };
        let _ = writeln!(out, "[{mark}] {group}");
    }
    out
}

/// One activity card: title line, location and audience, then one line per
/// session.
pub(crate) fn card(index: usize, activity: &ActivityRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}. {}", index + 1, activity.name);
    let _ = writeln!(out, "   Location: {}", activity.location_name);
    let _ = writeln!(out, "   Category: {}", activity.category);
    let _ = writeln!(out, "   Ages: {}", activity.age_description);
    for occ in &activity.occurrences {
        let _ = write!(out, "   - {} | {}", occ.date, occ.time);
        if let Some(days) = &occ.days {
            let _ = write!(out, " ({days})");
        }
        if let Some(link) = &occ.registration_link {
            let _ = write!(out, " register: {link}");
        }
        out.push('\n');
    }
    if let Some(desc) = &activity.description {
        let _ = writeln!(out, "   {desc}");
    }
    out
}

pub(crate) fn result_marker(park: &ActivityPark) -> String {
    format!(
        "{} @ {}: {}",
        park.name,
        park.coordinate,
        park.unique_activities().join(", ")
    )
}
