use super::*;

fn two_parks() -> LocationDirectory {
    LocationDirectory::new(vec![
        Location::new("A", 41.9, -87.6),
        Location::new("B", 41.0, -87.0),
    ])
}

fn names(ranked: &[RankedLocation<'_>]) -> Vec<String> {
    ranked.iter().map(|r| r.location.name.clone()).collect()
}

#[test]
fn within_radius_50_selects_only_nearby_park() {
    let dir = two_parks();
    let got = dir.within_radius(Coordinate::new(41.9, -87.6), 50.0);
    assert_eq!(got, BTreeSet::from(["a".to_string()]));
}

#[test]
fn within_radius_200_selects_both_parks() {
    let dir = two_parks();
    let got = dir.within_radius(Coordinate::new(41.9, -87.6), 200.0);
    assert_eq!(got, BTreeSet::from(["a".to_string(), "b".to_string()]));
}

#[test]
fn within_radius_boundary_is_inclusive() {
    let dir = two_parks();
    let reference = Coordinate::new(41.9, -87.6);
    let exact = haversine_miles(reference, Coordinate::new(41.0, -87.0));
    let got = dir.within_radius(reference, exact);
    assert!(got.contains("b"), "park exactly at the radius must be included");
}

#[test]
fn rank_without_reference_is_alphabetical() {
    let dir = LocationDirectory::new(vec![
        Location::new("Washington Park", 41.79, -87.61),
        Location::new("Austin Town Hall", 41.88, -87.76),
        Location::new("Kelly Park", 41.81, -87.69),
    ]);
    let ranked = dir.rank(None);
    assert_eq!(
        names(&ranked),
        ["Austin Town Hall", "Kelly Park", "Washington Park"]
    );
    assert!(ranked.iter().all(|r| r.distance_miles.is_none()));
}

#[test]
fn rank_with_reference_is_by_distance() {
    let dir = LocationDirectory::new(vec![
        Location::new("Far", 42.5, -87.6),
        Location::new("Near", 41.91, -87.6),
        Location::new("Middle", 42.1, -87.6),
    ]);
    let ranked = dir.rank(Some(Coordinate::new(41.9, -87.6)));
    assert_eq!(names(&ranked), ["Near", "Middle", "Far"]);
    let distances: Vec<f64> = ranked.iter().filter_map(|r| r.distance_miles).collect();
    assert!(distances.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn rank_breaks_distance_ties_by_name() {
    let dir = LocationDirectory::new(vec![
        Location::new("Zeta", 42.0, -87.6),
        Location::new("Alpha", 42.0, -87.6),
        Location::new("Mu", 42.0, -87.6),
    ]);
    let ranked = dir.rank(Some(Coordinate::new(41.9, -87.6)));
    assert_eq!(names(&ranked), ["Alpha", "Mu", "Zeta"]);
}

#[test]
fn rank_is_a_permutation_of_the_input() {
    let dir = LocationDirectory::new(vec![
        Location::new("C", 40.0, -88.0),
        Location::new("A", 41.0, -87.0),
        Location::new("B", 42.0, -86.0),
        Location::new("D", 41.5, -87.5),
    ]);
    let mut ranked = names(&dir.rank(Some(Coordinate::new(41.4, -87.4))));
    ranked.sort();
    assert_eq!(ranked, ["A", "B", "C", "D"]);
}

#[test]
fn find_trims_and_ignores_case() {
    let dir = LocationDirectory::new(vec![Location::new("  Humboldt Park ", 41.9, -87.7)]);
    let found = dir.find("humboldt PARK").expect("should match after normalization");
    assert_eq!(found.name, "  Humboldt Park ");
    assert!(dir.find("Humboldt").is_none());
}

#[test]
fn find_returns_first_loaded_on_normalized_collision() {
    let dir = LocationDirectory::new(vec![
        Location::new("Ogden Park", 41.77, -87.65),
        Location::new("OGDEN PARK ", 41.0, -87.0),
    ]);
    let found = dir.find("ogden park").unwrap();
    assert_eq!(found.name, "Ogden Park");
    assert_eq!(dir.len(), 2);
}

#[test]
fn label_includes_distance_when_known() {
    let dir = LocationDirectory::new(vec![Location::new("A", 41.9, -87.6)]);
    let ranked = dir.rank(Some(Coordinate::new(41.9, -87.6)));
    assert_eq!(ranked[0].label(), "A (0.0 mi)");
    assert_eq!(dir.rank(None)[0].label(), "A");
}

#[test]
fn filter_labels_matches_substring_case_insensitively() {
    let dir = LocationDirectory::new(vec![
        Location::new("Garfield Park", 41.88, -87.72),
        Location::new("Gage Park", 41.80, -87.69),
        Location::new("Lincoln Park", 41.92, -87.63),
    ]);
    let hits = dir.filter_labels("GA", None);
    assert_eq!(names(&hits), ["Gage Park", "Garfield Park"]);
    assert_eq!(dir.filter_labels("  ", None).len(), 3);
}

#[test]
fn rank_compares_names_byte_wise() {
    let dir = LocationDirectory::new(vec![
        Location::new("eckersall Stadium", 41.73, -87.55),
        Location::new("Ping Tom Park", 41.85, -87.63),
        Location::new("Ëlla Flagg Young Park", 41.91, -87.79),
    ]);
    assert_eq!(
        names(&dir.rank(None)),
        ["Ping Tom Park", "eckersall Stadium", "Ëlla Flagg Young Park"]
    );
}
