//! Command handlers. Each one builds a [`PageSession`], replays the
//! command-line arguments as UI events, and prints what the presenter ends
//! up holding.

use std::path::Path;

use anyhow::{bail, Context};
use parkfinder_client::ActivityClient;
use parkfinder_core::{
    AppConfig, CatalogFile, Coordinate, FacetGroup, LoadMoreState, PageSession, Presenter,
    UiEvent,
};

use crate::presenter::TerminalPresenter;
use crate::render;
use crate::LocationArgs;

/// Search selections given on the command line.
#[derive(Debug, Clone, Default)]
pub(crate) struct SearchRequest {
    pub radius: Option<String>,
    pub parks: Vec<String>,
    pub categories: Vec<String>,
    pub category_groups: Vec<String>,
    pub age_groups: Vec<String>,
}

pub(crate) fn load_catalog(path: &Path) -> anyhow::Result<CatalogFile> {
    parkfinder_core::load_catalog(path)
        .with_context(|| format!("failed to load catalog from {}", path.display()))
}

fn new_session(config: &AppConfig, catalog: &CatalogFile) -> (PageSession, TerminalPresenter) {
    let session = PageSession::new(
        catalog.directory(),
        catalog.facets(),
        config.session_settings(),
    );
    let mut view = TerminalPresenter::default();
    for intent in session.initial_render() {
        view.present(&intent);
    }
    (session, view)
}

/// Feeds the user's position (or its absence) to the session.
fn locate(
    session: &mut PageSession,
    view: &mut TerminalPresenter,
    location: &LocationArgs,
) -> anyhow::Result<()> {
    let (Some(lat), Some(lon)) = (location.lat, location.lon) else {
        session.dispatch(
            UiEvent::GeolocationUnavailable("no coordinates given".to_owned()),
            view,
        );
        return Ok(());
    };

    let coordinate = Coordinate::new(lat, lon);
    if !coordinate.is_in_range() {
        bail!("coordinate out of range: {lat},{lon}");
    }
    let event = match &location.place {
        Some(label) => UiEvent::ManualLocationChosen {
            label: label.clone(),
            coordinate,
        },
        None => UiEvent::GeolocationFixed(coordinate),
    };
    session.dispatch(event, view);
    if let Some(prompt) = view.prompt.take() {
        bail!(prompt);
    }
    Ok(())
}

fn apply_radius(session: &mut PageSession, view: &mut TerminalPresenter, radius: Option<String>) {
    if let Some(text) = radius {
        session.dispatch(UiEvent::RadiusChanged(text), view);
        session.dispatch(UiEvent::LoadNearbyRequested, view);
    }
}

pub(crate) fn run_parks(
    config: &AppConfig,
    catalog: &CatalogFile,
    location: &LocationArgs,
    radius: Option<String>,
    filter: Option<String>,
) -> anyhow::Result<()> {
    let (mut session, mut view) = new_session(config, catalog);
    locate(&mut session, &mut view, location)?;
    apply_radius(&mut session, &mut view, radius);
    if let Some(query) = filter {
        session.dispatch(UiEvent::ChecklistFiltered(query), &mut view);
    }

    if location.lat.is_some() && view.manual_search {
        println!(
            "Location is more than {} mi from the {} service area; pass --place to pick one.",
            config.manual_search_threshold_miles, config.region_name
        );
    }
    if let Some(user) = view.user_marker {
        println!("You are at {user}");
    }
    print!("{}", render::checklist(&view.checklist));
    if view.clear_button_visible {
        println!("[Clear Selection]");
    }
    println!("[{}]", view.button_label);

    if !view.selection_markers.is_empty() {
        println!("\nOn the map:");
        for location in &view.selection_markers {
            println!("  {} @ {}", location.name, location.coordinate);
        }
        if let Some(bounds) = view.view {
            println!("  view: {} to {}", bounds.south_west, bounds.north_east);
        }
    }
    if let Some(summary) = &view.summary {
        println!("\n{summary}");
    }
    Ok(())
}

pub(crate) fn run_search(
    config: &AppConfig,
    catalog: &CatalogFile,
    location: &LocationArgs,
    request: SearchRequest,
    json: bool,
) -> anyhow::Result<()> {
    let (mut session, mut view) = new_session(config, catalog);
    locate(&mut session, &mut view, location)?;
    apply_radius(&mut session, &mut view, request.radius);

    for park in request.parks {
        if session.directory().find(&park).is_none() {
            bail!("unknown park '{park}'");
        }
        if !session.selection().is_location_selected(&park) {
            session.dispatch(UiEvent::LocationToggled(park), &mut view);
        }
    }
    for group in request.category_groups {
        if session.selection().catalog().children_of(&group).is_empty() {
            bail!("unknown category group '{group}'");
        }
        session.dispatch(
            UiEvent::CategoryGroupToggled {
                group,
                selected: true,
            },
            &mut view,
        );
    }
    for (group, values) in [
        (FacetGroup::Categories, request.categories),
        (FacetGroup::AgeGroups, request.age_groups),
    ] {
        for value in values {
            if !session.selection().catalog().contains(group, &value) {
                bail!("unknown {group} value '{value}'");
            }
            session.dispatch(
                UiEvent::FacetChanged {
                    group,
                    value,
                    selected: true,
                },
                &mut view,
            );
        }
    }

    session.dispatch(UiEvent::SubmitRequested, &mut view);
    if let Some(error) = view.form_error.take() {
        bail!(error);
    }
    let query = view
        .submitted
        .take()
        .context("search was not submitted")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&query)?);
        return Ok(());
    }
    if let Some(summary) = &view.summary {
        println!("{summary}");
    }
    if !view.group_toggles.is_empty() {
        print!("{}", render::group_toggles(&view.group_toggles));
    }
    if let Some(miles) = query.distance_miles {
        println!("Within: {miles} mi");
    }
    for park in &query.parks {
        println!("  {park}");
    }
    Ok(())
}

pub(crate) async fn run_results(
    config: &AppConfig,
    catalog: &CatalogFile,
    pages: u32,
    highlight: Option<String>,
) -> anyhow::Result<()> {
    let client = ActivityClient::from_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build activity client: {e}"))?;
    let (mut session, mut view) = new_session(config, catalog);

    for _ in 0..pages {
        session.dispatch(UiEvent::LoadMoreClicked, &mut view);
        let Some(cursor) = view.take_pending_fetch() else {
            break;
        };
        match client.load_more(cursor).await {
            Ok(page) => {
                session.dispatch(UiEvent::PageLoaded(page), &mut view);
            }
            Err(e) => {
                session.dispatch(UiEvent::PageFailed(e.to_string()), &mut view);
                return Err(e)
                    .with_context(|| format!("failed to load activities at page {cursor}"));
            }
        }
        if view.load_more == LoadMoreState::Hidden {
            break;
        }
    }

    if let Some(name) = highlight {
        session.dispatch(UiEvent::MarkerClicked(name.clone()), &mut view);
        match &view.highlight {
            Some(h) => {
                println!("Highlighting {}", h.location_name);
                if let Some(park) = session.results().marker(&h.location_name) {
                    println!("  {}", render::result_marker(park));
                }
            }
            None => tracing::warn!(park = %name, "no loaded activity at that park"),
        }
    }

    for (idx, activity) in view.cards.iter().enumerate() {
        let marker = view
            .highlight
            .as_ref()
            .is_some_and(|h| h.card_index == Some(idx));
        if marker {
            print!("> ");
        }
        print!("{}", render::card(idx, activity));
    }
    if !view.result_markers.is_empty() {
        println!("\nMap:");
        for park in &view.result_markers {
            println!("  {}", render::result_marker(park));
        }
    }
    match view.load_more {
        LoadMoreState::Hidden => println!("\nNo more activities."),
        LoadMoreState::Ready | LoadMoreState::Loading => {
            println!(
                "\n{} (next page {})",
                view.load_more.label(),
                session.results().next_cursor()
            );
        }
    }
    Ok(())
}
