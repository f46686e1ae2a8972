use super::*;

fn activity(name: &str, location: &str) -> ActivityRecord {
    ActivityRecord {
        name: name.to_owned(),
        location_name: location.to_owned(),
        category: "Aquatics".to_owned(),
        age_description: "6 yrs - 12 yrs".to_owned(),
        occurrences: vec![Occurrence {
            date: "June 3, 2025 to August 5, 2025 (Tuesdays)".to_owned(),
            time: "4:00 PM - 5:00 PM".to_owned(),
            registration_link: Some("https://example.com/enroll/1".to_owned()),
            detail_link: None,
            days: Some("Tue".to_owned()),
        }],
        description: None,
    }
}

fn park(name: &str, lat: f64, lon: f64, activities: &[&str]) -> ActivityPark {
    ActivityPark {
        name: name.to_owned(),
        coordinate: Coordinate::new(lat, lon),
        activity_names: activities.iter().map(|a| (*a).to_owned()).collect(),
    }
}

fn page(cursor: u32, activities: Vec<ActivityRecord>, parks: Vec<ActivityPark>, more: bool) -> ResultsPage {
    ResultsPage {
        page_cursor: cursor,
        activities,
        activity_parks: parks,
        has_more: more,
    }
}

fn names(agg: &ResultsAggregator) -> Vec<&str> {
    agg.activities().iter().map(|a| a.name.as_str()).collect()
}

#[test]
fn starts_idle_at_initial_cursor() {
    let agg = ResultsAggregator::default();
    assert_eq!(agg.state(), FetchState::Idle);
    assert_eq!(agg.next_cursor(), 6);
    assert!(agg.activities().is_empty());
}

#[test]
fn append_advances_cursor_by_page_size() {
    let mut agg = ResultsAggregator::default();
    let cursor = agg.begin_fetch().unwrap();
    assert_eq!(cursor, 6);
    agg.append_page(page(cursor, vec![], vec![], true)).unwrap();
    assert_eq!(agg.next_cursor(), 11);
    assert_eq!(agg.state(), FetchState::Idle);

    let cursor = agg.begin_fetch().unwrap();
    agg.append_page(page(cursor, vec![], vec![], true)).unwrap();
    assert_eq!(agg.next_cursor(), 16);
}

#[test]
fn initial_page_lands_on_initial_cursor() {
    let mut agg = ResultsAggregator::default();
    agg.append_page(page(1, vec![activity("Swim", "Kelly Park")], vec![], true))
        .unwrap();
    assert_eq!(agg.next_cursor(), 6);
}

#[test]
fn policy_constants_are_configurable() {
    let mut agg = ResultsAggregator::new(PaginationPolicy {
        initial_cursor: 2,
        page_size: 1,
    });
    assert_eq!(agg.begin_fetch().unwrap(), 2);
    agg.append_page(page(2, vec![], vec![], true)).unwrap();
    assert_eq!(agg.next_cursor(), 3);
}

#[test]
fn append_preserves_order_and_duplicates() {
    let mut agg = ResultsAggregator::default();
    agg.append_page(page(
        1,
        vec![activity("Swim", "Kelly Park"), activity("Chess", "Gage Park")],
        vec![],
        true,
    ))
    .unwrap();
    let c = agg.begin_fetch().unwrap();
    agg.append_page(page(
        c,
        vec![activity("Swim", "Kelly Park"), activity("Tennis", "Kelly Park")],
        vec![],
        true,
    ))
    .unwrap();
    assert_eq!(names(&agg), ["Swim", "Chess", "Swim", "Tennis"]);
}

#[test]
fn overlapping_parks_get_one_marker() {
    let mut agg = ResultsAggregator::default();
    let first = agg
        .append_page(page(
            1,
            vec![activity("Swim", "Kelly Park")],
            vec![park("Kelly Park", 41.81, -87.69, &["Swim"])],
            true,
        ))
        .unwrap();
    assert_eq!(first.new_markers.len(), 1);

    let c = agg.begin_fetch().unwrap();
    let second = agg
        .append_page(page(
            c,
            vec![activity("Tennis", "kelly park "), activity("Chess", "Gage Park")],
            vec![
                park("Kelly Park", 41.81, -87.69, &["Tennis"]),
                park("Gage Park", 41.80, -87.69, &["Chess"]),
            ],
            true,
        ))
        .unwrap();

    let new: Vec<&str> = second.new_markers.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(new, ["Gage Park"]);
    assert_eq!(agg.markers().len(), 2);
    assert!(agg.has_marker("KELLY PARK"));
}

#[test]
fn marker_waits_for_coordinates() {
    let mut agg = ResultsAggregator::default();
    let out = agg
        .append_page(page(1, vec![activity("Swim", "Kelly Park")], vec![], true))
        .unwrap();
    assert!(out.new_markers.is_empty());
    assert!(!agg.has_marker("Kelly Park"));

    let c = agg.begin_fetch().unwrap();
    let out = agg
        .append_page(page(
            c,
            vec![],
            vec![park("Kelly Park", 41.81, -87.69, &["Swim"])],
            true,
        ))
        .unwrap();
    assert_eq!(out.new_markers.len(), 1);
}

#[test]
fn last_page_exhausts_and_rejects_further_fetches() {
    let mut agg = ResultsAggregator::default();
    let c = agg.begin_fetch().unwrap();
    let out = agg.append_page(page(c, vec![], vec![], false)).unwrap();
    assert!(out.exhausted);
    assert!(agg.is_exhausted());
    assert_eq!(agg.begin_fetch(), Err(AggregatorError::Exhausted));
    assert_eq!(
        agg.append_page(page(11, vec![], vec![], true)),
        Err(AggregatorError::Exhausted)
    );
}

#[test]
fn second_fetch_while_in_flight_is_rejected() {
    let mut agg = ResultsAggregator::default();
    let c = agg.begin_fetch().unwrap();
    assert_eq!(
        agg.begin_fetch(),
        Err(AggregatorError::FetchInFlight { cursor: c })
    );
}

#[test]
fn failed_fetch_allows_retry_at_same_cursor() {
    let mut agg = ResultsAggregator::default();
    let c = agg.begin_fetch().unwrap();
    agg.fail_fetch();
    assert_eq!(agg.state(), FetchState::Idle);
    assert_eq!(agg.begin_fetch().unwrap(), c);
}

#[test]
fn mismatched_cursor_is_still_applied() {
    let mut agg = ResultsAggregator::default();
    agg.begin_fetch().unwrap();
    agg.append_page(page(21, vec![activity("Swim", "Kelly Park")], vec![], true))
        .unwrap();
    assert_eq!(agg.activities().len(), 1);
    assert_eq!(agg.next_cursor(), 26);
}

#[test]
fn reset_returns_to_initial_state() {
    let mut agg = ResultsAggregator::default();
    agg.append_page(page(
        1,
        vec![activity("Swim", "Kelly Park")],
        vec![park("Kelly Park", 41.81, -87.69, &["Swim"])],
        false,
    ))
    .unwrap();
    assert!(agg.is_exhausted());

    agg.reset();

    assert_eq!(agg.state(), FetchState::Idle);
    assert_eq!(agg.next_cursor(), 6);
    assert!(agg.activities().is_empty());
    assert!(agg.markers().is_empty());
    assert!(!agg.has_marker("Kelly Park"));
    assert!(agg.card_for_location("Kelly Park").is_none());
}

#[test]
fn reset_keeps_in_flight_request_pending() {
    let mut agg = ResultsAggregator::default();
    assert_eq!(agg.begin_fetch(), Ok(6));

    agg.reset();

    assert_eq!(agg.state(), FetchState::Fetching { cursor: 6 });
    assert_eq!(
        agg.begin_fetch(),
        Err(AggregatorError::FetchInFlight { cursor: 6 })
    );

    agg.append_page(page(
        6,
        vec![activity("Swim", "Kelly Park")],
        vec![park("Kelly Park", 41.81, -87.69, &["Swim"])],
        true,
    ))
    .unwrap();
    assert_eq!(agg.state(), FetchState::Idle);
    assert_eq!(agg.begin_fetch(), Ok(11));
}

#[test]
fn reset_after_failed_fetch_is_idle() {
    let mut agg = ResultsAggregator::default();
    agg.begin_fetch().unwrap();
    agg.fail_fetch();
    agg.reset();
    assert_eq!(agg.state(), FetchState::Idle);
}

#[test]
fn card_for_location_points_at_latest_card() {
    let mut agg = ResultsAggregator::default();
    agg.append_page(page(
        1,
        vec![
            activity("Swim", "Kelly Park"),
            activity("Chess", "Gage Park"),
            activity("Tennis", "Kelly Park"),
        ],
        vec![],
        true,
    ))
    .unwrap();
    assert_eq!(agg.card_for_location("kelly park"), Some(2));
    assert_eq!(agg.card_for_location("Gage Park"), Some(1));
    assert_eq!(agg.card_for_location("Ogden Park"), None);
}

#[test]
fn unique_activities_drops_repeats() {
    let p = park("Kelly Park", 41.81, -87.69, &["Swim", "Chess", "Swim"]);
    assert_eq!(p.unique_activities(), ["Swim", "Chess"]);
}

#[test]
fn bounds_cover_markers() {
    let mut agg = ResultsAggregator::default();
    assert!(agg.bounds().is_none());
    agg.append_page(page(
        1,
        vec![],
        vec![
            park("Kelly Park", 41.81, -87.69, &[]),
            park("Gage Park", 41.80, -87.70, &[]),
        ],
        true,
    ))
    .unwrap();
    let b = agg.bounds().unwrap();
    assert_eq!(b.south_west, Coordinate::new(41.80, -87.70));
    assert_eq!(b.north_east, Coordinate::new(41.81, -87.69));
}


#[test]
fn marker_lookup_ignores_case_and_padding() {
    let mut agg = ResultsAggregator::default();
    agg.append_page(page(
        1,
        vec![activity("Swim", "Kelly Park")],
        vec![park("Kelly Park", 41.81, -87.69, &["Swim"])],
        true,
    ))
    .unwrap();
    let marker = agg.marker("  kelly park ").expect("marker for Kelly Park");
    assert_eq!(marker.activity_names, ["Swim"]);
    assert!(agg.marker("Gage Park").is_none());
}
