//! Terminal stand-in for the map widget and search form.
//!
//! [`TerminalPresenter`] keeps the latest state each intent describes so a
//! command can print the final picture once, instead of echoing every
//! intermediate repaint.

use parkfinder_core::{
    ActivityPark, ActivityRecord, Bounds, CheckState, ChecklistEntry, Coordinate, Intent,
    LoadMoreState, Location, Presenter, SearchQuery, SelectionSummary,
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Highlight {
    pub location_name: String,
    pub card_index: Option<usize>,
}

#[derive(Debug)]
pub(crate) struct TerminalPresenter {
    pub manual_search: bool,
    pub checklist: Vec<ChecklistEntry>,
    pub user_marker: Option<Coordinate>,
    pub selection_markers: Vec<Location>,
    pub result_markers: Vec<ActivityPark>,
    pub view: Option<Bounds>,
    pub clear_button_visible: bool,
    pub group_toggles: Vec<(String, CheckState)>,
    pub summary: Option<SelectionSummary>,
    pub button_label: String,
    pub form_error: Option<String>,
    pub prompt: Option<String>,
    pub submitted: Option<SearchQuery>,
    pub load_more: LoadMoreState,
    pub cards: Vec<ActivityRecord>,
    pub highlight: Option<Highlight>,
    pending_fetch: Option<u32>,
}

impl Default for TerminalPresenter {
    fn default() -> Self {
        Self {
            manual_search: false,
            checklist: Vec::new(),
            user_marker: None,
            selection_markers: Vec::new(),
            result_markers: Vec::new(),
            view: None,
            clear_button_visible: false,
            group_toggles: Vec::new(),
            summary: None,
            button_label: String::new(),
            form_error: None,
            prompt: None,
            submitted: None,
            load_more: LoadMoreState::Ready,
            cards: Vec::new(),
            highlight: None,
            pending_fetch: None,
        }
    }
}

impl TerminalPresenter {
    /// Cursor of the page the session asked for, if any. Taking it marks
    /// the request as handed to the client.
    pub(crate) fn take_pending_fetch(&mut self) -> Option<u32> {
        self.pending_fetch.take()
    }
}

impl Presenter for TerminalPresenter {
    fn present(&mut self, intent: &Intent) {
        tracing::trace!(?intent, "presenting");
        match intent {
            Intent::ShowManualSearch(show) => self.manual_search = *show,
            Intent::RenderChecklist(entries) => self.checklist.clone_from(entries),
            Intent::RenderUserMarker(coordinate) => self.user_marker = Some(*coordinate),
            Intent::RenderMarkers(locations) => self.selection_markers.clone_from(locations),
            Intent::AddMarkers(parks) => self.result_markers.extend(parks.iter().cloned()),
            Intent::CenterOn(bounds) => self.view = *bounds,
            Intent::SetClearButtonVisible(visible) => self.clear_button_visible = *visible,
            Intent::SetGroupToggles(toggles) => self.group_toggles.clone_from(toggles),
            Intent::SetSummaryText(summary) => self.summary = Some(summary.clone()),
            Intent::SetButtonLabel(label) => self.button_label.clone_from(label),
            Intent::ShowFormError(message) => self.form_error = Some(message.clone()),
            Intent::Prompt(message) => self.prompt = Some(message.clone()),
            Intent::Submit(query) => {
                self.form_error = None;
                self.submitted = Some(query.clone());
            }
            Intent::FetchPage { cursor } => self.pending_fetch = Some(*cursor),
            Intent::SetLoadMoreState(state) => self.load_more = *state,
            Intent::RenderActivityCards(cards) => self.cards.extend(cards.iter().cloned()),
            Intent::ClearResults => {
                self.cards.clear();
                self.result_markers.clear();
                self.highlight = None;
                self.load_more = LoadMoreState::Ready;
            }
            Intent::Highlight {
                location_name,
                card_index,
            } => {
                self.highlight = Some(Highlight {
                    location_name: location_name.clone(),
                    card_index: *card_index,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use parkfinder_core::ResultsPage;

    use super::*;

    fn card(name: &str) -> ActivityRecord {
        ActivityRecord {
            name: name.to_owned(),
            location_name: "Kelly Park".to_owned(),
            category: "Swimming".to_owned(),
            age_description: "Youth".to_owned(),
            occurrences: Vec::new(),
            description: None,
        }
    }

    #[test]
    fn cards_and_markers_accumulate_until_cleared() {
        let mut p = TerminalPresenter::default();
        p.present(&Intent::RenderActivityCards(vec![card("Swim")]));
        p.present(&Intent::RenderActivityCards(vec![card("Chess")]));
        p.present(&Intent::AddMarkers(vec![ActivityPark {
            name: "Kelly Park".to_owned(),
            coordinate: Coordinate::new(41.81, -87.69),
            activity_names: vec!["Swim".to_owned()],
        }]));
        assert_eq!(p.cards.len(), 2);
        assert_eq!(p.result_markers.len(), 1);

        p.present(&Intent::ClearResults);
        assert!(p.cards.is_empty());
        assert!(p.result_markers.is_empty());
    }

    #[test]
    fn pending_fetch_is_taken_once() {
        let mut p = TerminalPresenter::default();
        p.present(&Intent::FetchPage { cursor: 6 });
        assert_eq!(p.take_pending_fetch(), Some(6));
        assert_eq!(p.take_pending_fetch(), None);
    }

    #[test]
    fn selection_markers_are_replaced() {
        let mut p = TerminalPresenter::default();
        p.present(&Intent::RenderMarkers(vec![Location::new("A", 41.9, -87.6)]));
        p.present(&Intent::RenderMarkers(Vec::new()));
        assert!(p.selection_markers.is_empty());
    }

    #[test]
    fn drives_a_session_through_the_presenter_seam() {
        use parkfinder_core::{
            FacetCatalog, LocationDirectory, PageSession, SessionSettings, UiEvent,
        };

        let mut session = PageSession::new(
            LocationDirectory::new(vec![Location::new("Kelly Park", 41.8149, -87.693)]),
            FacetCatalog::default(),
            SessionSettings::default(),
        );
        let mut p = TerminalPresenter::default();

        session.dispatch(UiEvent::LoadMoreClicked, &mut p);
        assert_eq!(p.load_more, LoadMoreState::Loading);
        let cursor = p.take_pending_fetch().unwrap();
        session.dispatch(
            UiEvent::PageLoaded(ResultsPage {
                page_cursor: cursor,
                activities: vec![card("Swim")],
                activity_parks: Vec::new(),
                has_more: false,
            }),
            &mut p,
        );
        assert_eq!(p.load_more, LoadMoreState::Hidden);
        assert_eq!(p.cards.len(), 1);
    }
}
