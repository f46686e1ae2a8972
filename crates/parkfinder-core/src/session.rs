//! Page controller.
//!
//! [`PageSession`] owns the directory, the selection and the results feed
//! for one page session. The host feeds it [`UiEvent`]s and renders the
//! [`Intent`]s it returns. Each call to [`PageSession::handle`] runs to
//! completion and leaves the state consistent before returning, so the host
//! can queue events from any handler without locking.

use serde::Serialize;

use crate::directory::{Location, LocationDirectory, RankedLocation};
use crate::facets::{CheckState, FacetCatalog, FacetGroup};
use crate::geo::{haversine_miles, Bounds, Coordinate};
use crate::results::{
    ActivityPark, ActivityRecord, AggregatorError, FetchState, PaginationPolicy,
    ResultsAggregator, ResultsPage,
};
use crate::selection::{SearchQuery, SelectionState, SelectionSummary};

const GET_LOCATIONS_LABEL: &str = "Get Locations";

/// Tunables for one session. Defaults match the Chicago deployment.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub pagination: PaginationPolicy,
    /// Radius used by "load nearby" when the distance box is empty.
    pub default_radius_miles: f64,
    /// A manually searched location is accepted only if its label
    /// mentions this region, compared case-insensitively.
    pub region_name: String,
    pub region_center: Coordinate,
    /// A geolocation fix farther than this from `region_center` still
    /// offers the manual location search.
    pub manual_search_threshold_miles: f64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            pagination: PaginationPolicy::default(),
            default_radius_miles: 2.0,
            region_name: "Illinois".to_owned(),
            region_center: Coordinate::new(41.8781, -87.6298),
            manual_search_threshold_miles: 75.0,
        }
    }
}

/// Raw events from the presentation surface.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    GeolocationFixed(Coordinate),
    GeolocationUnavailable(String),
    ManualLocationChosen { label: String, coordinate: Coordinate },
    LocationToggled(String),
    LocationsCleared,
    ChecklistFiltered(String),
    FacetChanged {
        group: FacetGroup,
        value: String,
        selected: bool,
    },
    AnyChanged { group: FacetGroup, selected: bool },
    CategoryGroupToggled { group: String, selected: bool },
    RadiusChanged(String),
    LoadNearbyRequested,
    SubmitRequested,
    LoadMoreClicked,
    PageLoaded(ResultsPage),
    PageFailed(String),
    MarkerClicked(String),
    CardClicked(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoadMoreState {
    Ready,
    Loading,
    Hidden,
}

impl LoadMoreState {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            LoadMoreState::Ready | LoadMoreState::Hidden => "Load More Activities",
            LoadMoreState::Loading => "Loading...",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChecklistEntry {
    pub name: String,
    pub label: String,
    pub checked: bool,
    pub distance_miles: Option<f64>,
}

/// What the presentation surface should do next.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Intent {
    ShowManualSearch(bool),
    RenderChecklist(Vec<ChecklistEntry>),
    RenderUserMarker(Coordinate),
    /// Replace the selection markers.
    RenderMarkers(Vec<Location>),
    /// Add result markers next to those already shown.
    AddMarkers(Vec<ActivityPark>),
    /// `None` resets to the default view.
    CenterOn(Option<Bounds>),
    SetClearButtonVisible(bool),
    SetGroupToggles(Vec<(String, CheckState)>),
    SetSummaryText(SelectionSummary),
    SetButtonLabel(String),
    ShowFormError(String),
    /// Blocking prompt; the triggering change was not applied.
    Prompt(String),
    Submit(SearchQuery),
    FetchPage { cursor: u32 },
    SetLoadMoreState(LoadMoreState),
    RenderActivityCards(Vec<ActivityRecord>),
    ClearResults,
    Highlight {
        location_name: String,
        card_index: Option<usize>,
    },
}

/// Adapter seam: the map widget and form implement this.
pub trait Presenter {
    fn present(&mut self, intent: &Intent);
}

#[derive(Debug, Clone)]
pub struct PageSession {
    directory: LocationDirectory,
    selection: SelectionState,
    results: ResultsAggregator,
    settings: SessionSettings,
    radius_text: String,
}

impl PageSession {
    #[must_use]
    pub fn new(
        directory: LocationDirectory,
        catalog: FacetCatalog,
        settings: SessionSettings,
    ) -> Self {
        Self {
            directory,
            selection: SelectionState::new(catalog),
            results: ResultsAggregator::new(settings.pagination),
            settings,
            radius_text: String::new(),
        }
    }

    #[must_use]
    pub fn directory(&self) -> &LocationDirectory {
        &self.directory
    }

    #[must_use]
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    #[must_use]
    pub fn results(&self) -> &ResultsAggregator {
        &self.results
    }

    #[must_use]
    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// True when there is no fix, or the fix is too far from the region
    /// to be a useful reference point.
    #[must_use]
    pub fn needs_manual_search(&self, reference: Option<Coordinate>) -> bool {
        reference.is_none_or(|r| {
            haversine_miles(r, self.settings.region_center)
                > self.settings.manual_search_threshold_miles
        })
    }

    /// Intents that paint the page before any event arrives.
    #[must_use]
    pub fn initial_render(&self) -> Vec<Intent> {
        vec![
            Intent::RenderChecklist(self.checklist(None)),
            Intent::SetGroupToggles(self.group_toggles()),
            Intent::SetSummaryText(self.selection.summary()),
            Intent::SetButtonLabel(self.button_label()),
        ]
    }

    /// Handles `event` and hands every resulting intent to `presenter`.
    pub fn dispatch<P>(&mut self, event: UiEvent, presenter: &mut P) -> Vec<Intent>
    where
        P: Presenter + ?Sized,
    {
        let intents = self.handle(event);
        for intent in &intents {
            presenter.present(intent);
        }
        intents
    }

    pub fn handle(&mut self, event: UiEvent) -> Vec<Intent> {
        match event {
            UiEvent::GeolocationFixed(coordinate) => self.on_reference_point(coordinate),
            UiEvent::GeolocationUnavailable(reason) => {
                tracing::warn!(%reason, "geolocation unavailable; falling back to alphabetical park list");
                self.selection.set_reference_point(None);
                vec![
                    Intent::ShowManualSearch(true),
                    Intent::RenderChecklist(self.checklist(None)),
                    Intent::SetSummaryText(self.selection.summary()),
                ]
            }
            UiEvent::ManualLocationChosen { label, coordinate } => {
                let region = self.settings.region_name.to_lowercase();
                if !label.to_lowercase().contains(&region) {
                    tracing::info!(%label, region = %self.settings.region_name, "rejected manual location outside region");
                    return vec![Intent::Prompt(format!(
                        "Please select a location within {}.",
                        self.settings.region_name
                    ))];
                }
                self.on_reference_point(coordinate)
            }
            UiEvent::LocationToggled(name) => {
                if self.selection.toggle_location(&self.directory, &name).is_none() {
                    return Vec::new();
                }
                self.selection_changed()
            }
            UiEvent::LocationsCleared => {
                self.selection.clear_locations();
                vec![
                    Intent::RenderMarkers(Vec::new()),
                    Intent::SetClearButtonVisible(false),
                    Intent::SetSummaryText(self.selection.summary()),
                ]
            }
            UiEvent::ChecklistFiltered(query) => {
                vec![Intent::RenderChecklist(self.checklist(Some(&query)))]
            }
            UiEvent::FacetChanged {
                group,
                value,
                selected,
            } => {
                if !self.selection.set_facet(group, &value, selected) {
                    return Vec::new();
                }
                self.facets_changed()
            }
            UiEvent::AnyChanged { group, selected } => {
                self.selection.set_any(group, selected);
                self.facets_changed()
            }
            UiEvent::CategoryGroupToggled { group, selected } => {
                self.selection.set_category_group(&group, selected);
                self.facets_changed()
            }
            UiEvent::RadiusChanged(text) => {
                self.radius_text = text.trim().to_owned();
                let radius = self.radius_text.parse::<f64>().ok().filter(|r| *r >= 0.0);
                if radius.is_none() && !self.radius_text.is_empty() {
                    tracing::debug!(text = %self.radius_text, "distance is not a usable number");
                }
                self.selection.set_radius(radius);
                vec![
                    Intent::SetButtonLabel(self.button_label()),
                    Intent::SetSummaryText(self.selection.summary()),
                    Intent::SetGroupToggles(self.group_toggles()),
                ]
            }
            UiEvent::LoadNearbyRequested => self.load_nearby(),
            UiEvent::SubmitRequested => match self.selection.validate_submission(&self.directory) {
                Ok(query) => {
                    self.results.reset();
                    let mut intents = vec![Intent::ClearResults];
                    if let FetchState::Fetching { .. } = self.results.state() {
                        intents.push(Intent::SetLoadMoreState(LoadMoreState::Loading));
                    }
                    intents.push(Intent::Submit(query));
                    intents
                }
                Err(e) => vec![Intent::ShowFormError(e.to_string())],
            },
            UiEvent::LoadMoreClicked => match self.results.begin_fetch() {
                Ok(cursor) => vec![
                    Intent::SetLoadMoreState(LoadMoreState::Loading),
                    Intent::FetchPage { cursor },
                ],
                Err(AggregatorError::FetchInFlight { cursor }) => {
                    tracing::debug!(cursor, "ignoring load-more click while a page is in flight");
                    Vec::new()
                }
                Err(AggregatorError::Exhausted) => {
                    vec![Intent::SetLoadMoreState(LoadMoreState::Hidden)]
                }
            },
            UiEvent::PageLoaded(page) => self.page_loaded(page),
            UiEvent::PageFailed(reason) => {
                tracing::error!(%reason, cursor = self.results.next_cursor(), "failed to load more activities");
                self.results.fail_fetch();
                vec![Intent::SetLoadMoreState(LoadMoreState::Ready)]
            }
            UiEvent::MarkerClicked(name) => match self.results.card_for_location(&name) {
                Some(idx) if self.results.has_marker(&name) => vec![Intent::Highlight {
                    location_name: name,
                    card_index: Some(idx),
                }],
                _ => Vec::new(),
            },
            UiEvent::CardClicked(name) => {
                if self.results.has_marker(&name) {
                    let card_index = self.results.card_for_location(&name);
                    vec![Intent::Highlight {
                        location_name: name,
                        card_index,
                    }]
                } else {
                    Vec::new()
                }
            }
        }
    }

    fn on_reference_point(&mut self, coordinate: Coordinate) -> Vec<Intent> {
        self.selection.set_reference_point(Some(coordinate));
        let mut intents = vec![
            Intent::ShowManualSearch(self.needs_manual_search(Some(coordinate))),
            Intent::RenderChecklist(self.checklist(None)),
        ];
        intents.extend(self.load_nearby());
        intents
    }

    /// Checks every location within the typed radius (or the default)
    /// of the reference point, replacing the previous checks.
    fn load_nearby(&mut self) -> Vec<Intent> {
        let Some(reference) = self.selection.reference_point() else {
            return Vec::new();
        };
        if self.radius_text.is_empty() {
            self.selection.apply_radius(
                &self.directory,
                self.settings.default_radius_miles,
                Some(reference),
            );
            // The default radius is not something the user typed.
            self.selection.set_radius(None);
        } else if let Some(radius) = self.selection.radius_miles() {
            self.selection
                .apply_radius(&self.directory, radius, Some(reference));
        } else {
            // Unparseable distance matches nothing.
            self.selection.clear_locations();
        }

        let mut intents = vec![
            Intent::RenderUserMarker(reference),
            Intent::RenderChecklist(self.checklist(None)),
        ];
        intents.extend(self.selection_changed());
        intents
    }

    fn selection_changed(&self) -> Vec<Intent> {
        let matched = self.selected_locations();
        let mut points: Vec<Coordinate> = matched.iter().map(|l| l.coordinate).collect();
        if let Some(user) = self.selection.reference_point() {
            points.push(user);
        }
        vec![
            Intent::SetClearButtonVisible(!matched.is_empty()),
            Intent::CenterOn(Bounds::from_points(points)),
            Intent::RenderMarkers(matched),
            Intent::SetSummaryText(self.selection.summary()),
        ]
    }

    fn facets_changed(&self) -> Vec<Intent> {
        vec![
            Intent::SetGroupToggles(self.group_toggles()),
            Intent::SetSummaryText(self.selection.summary()),
        ]
    }

    fn page_loaded(&mut self, page: ResultsPage) -> Vec<Intent> {
        let outcome = match self.results.append_page(page) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(error = %e, "dropping results page");
                return Vec::new();
            }
        };
        let cards = self.results.activities()[outcome.first_index..].to_vec();
        let bounds = Bounds::from_points(outcome.new_markers.iter().map(|m| m.coordinate));
        let mut intents = vec![Intent::RenderActivityCards(cards)];
        if !outcome.new_markers.is_empty() {
            intents.push(Intent::AddMarkers(outcome.new_markers));
            intents.push(Intent::CenterOn(bounds));
        }
        intents.push(Intent::SetLoadMoreState(if outcome.exhausted {
            LoadMoreState::Hidden
        } else {
            LoadMoreState::Ready
        }));
        intents
    }

    fn selected_locations(&self) -> Vec<Location> {
        self.directory
            .iter()
            .filter(|l| self.selection.is_location_selected(&l.name))
            .cloned()
            .collect()
    }

    fn checklist(&self, filter: Option<&str>) -> Vec<ChecklistEntry> {
        let reference = self.selection.reference_point();
        let ranked = match filter {
            Some(query) => self.directory.filter_labels(query, reference),
            None => self.directory.rank(reference),
        };
        ranked
            .into_iter()
            .map(|r: RankedLocation<'_>| ChecklistEntry {
                name: r.location.name.clone(),
                label: r.label(),
                checked: self.selection.is_location_selected(&r.location.name),
                distance_miles: r.distance_miles,
            })
            .collect()
    }

    fn group_toggles(&self) -> Vec<(String, CheckState)> {
        self.selection
            .catalog()
            .category_groups()
            .into_iter()
            .map(|g| (g.to_owned(), self.selection.group_toggle_state(g)))
            .collect()
    }

    fn button_label(&self) -> String {
        if self.radius_text.is_empty() {
            GET_LOCATIONS_LABEL.to_owned()
        } else {
            format!("Look For Locations Within {} Miles", self.radius_text)
        }
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
