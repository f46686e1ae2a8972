//! Wire types for the `POST /load_more` endpoint.
//!
//! ## Observed shape
//!
//! ### Envelope
//! `{"success": true, "activities": [...], "activity_parks": [...],
//! "more_results_to_fetch": false}` on success. Rejections come back as HTTP
//! 400 with `{"success": false, "error": "Page number is missing"}`.
//!
//! ### Activities
//! Each activity is already grouped by name/location/category/age: one record
//! carries parallel arrays (`date_ranges`, `time_ranges`, `action_links`,
//! `detail_links`, `days`), one entry per session, sorted by start date.
//! Links are `null` when a session has none; `days` entries may be `""`.
//!
//! ### Activity parks
//! A JSON array of 4-element arrays: `[name, latitude, longitude,
//! [activity names...]]`. Only parks the server could geocode are listed, so
//! an activity's location may be missing here.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadMoreRequest {
    pub page: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoadMoreResponse {
    /// Absent on older deployments; treated as success.
    #[serde(default)]
    pub success: Option<bool>,

    #[serde(default)]
    pub error: Option<String>,

    #[serde(default)]
    pub activities: Vec<RawActivity>,

    #[serde(default)]
    pub activity_parks: Vec<RawActivityPark>,

    #[serde(default)]
    pub more_results_to_fetch: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawActivity {
    pub name: String,

    /// Location label, possibly abbreviated (`"Kelly Pk"`).
    #[serde(default)]
    pub location: Option<String>,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub age_description: Option<String>,

    #[serde(default)]
    pub desc: Option<String>,

    #[serde(default)]
    pub date_ranges: Vec<String>,

    #[serde(default)]
    pub time_ranges: Vec<String>,

    #[serde(default)]
    pub action_links: Vec<Option<String>>,

    #[serde(default)]
    pub detail_links: Vec<Option<String>>,

    #[serde(default)]
    pub days: Vec<Option<String>>,
}

/// `[name, latitude, longitude, [activity names]]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawActivityPark(pub String, pub f64, pub f64, pub Vec<String>);

/// Body of a 4xx rejection.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_envelope() {
        let json = r#"{
            "success": true,
            "activities": [{
                "name": "Learn to Swim",
                "location": "Kelly Pk",
                "category": "Swimming",
                "age_description": "6 yrs - 12 yrs",
                "desc": "Beginner lessons",
                "date_ranges": ["June 3, 2025 to August 5, 2025"],
                "time_ranges": ["4:00 PM - 5:00 PM"],
                "action_links": [null],
                "detail_links": ["https://example.com/detail/1"],
                "days": ["Tue"]
            }],
            "activity_parks": [["Kelly Park", 41.8149, -87.693, ["Learn to Swim"]]],
            "more_results_to_fetch": true
        }"#;
        let resp: LoadMoreResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.success, Some(true));
        assert!(resp.more_results_to_fetch);
        assert_eq!(resp.activities[0].action_links, [None]);
        assert_eq!(resp.activity_parks[0].0, "Kelly Park");
        assert_eq!(resp.activity_parks[0].3, ["Learn to Swim"]);
    }

    #[test]
    fn missing_fields_default() {
        let resp: LoadMoreResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(resp.success, None);
        assert!(resp.activities.is_empty());
        assert!(!resp.more_results_to_fetch);

        let act: RawActivity = serde_json::from_str(r#"{"name": "Chess"}"#).unwrap();
        assert!(act.location.is_none());
        assert!(act.date_ranges.is_empty());
    }

    #[test]
    fn request_serializes_page() {
        let body = serde_json::to_value(LoadMoreRequest { page: 11 }).unwrap();
        assert_eq!(body, serde_json::json!({"page": 11}));
    }
}
