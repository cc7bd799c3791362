//! Application state management and view model computation.
//!
//! This module defines [`AppState`], the central state container for the plugin.
//! It owns the listing store, the search session, the current page and the
//! diagnostics log, and it is the only place where store events are routed
//! to the parts of the UI that asked for them.
//!
//! # State Components
//!
//! - **Store**: cached, retrying access to the listings endpoint
//! - **Search**: text, query state, cursor and focus flags of the search box
//! - **Screen**: search page or a listing detail page
//! - **Diagnostics**: recent query events for the status line
//!
//! # View Model Computation
//!
//! The `compute_viewmodel` method transforms state into a renderable UI
//! representation, handling windowing of the result list and fuzzy match
//! highlighting of result titles.

use super::actions::Action;
use super::detail::{DetailStatus, DetailView, Route};
use super::diagnostics::{Diagnostics, Severity};
use super::search::{QueryState, SearchSession, SearchSettings};
use crate::domain::{Listing, ListingsError};
use crate::runtime::TimerToken;
use crate::store::{ListingStore, Settlement, StoreEffect, StoreEvent};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{
    visible_results, Body, DetailInfo, DisplayItem, EmptyState, FooterInfo, HeaderInfo, Panel, SearchBarInfo,
    StatusLine, UIViewModel, ITEM_HEIGHT, RESULTS_TOP_ROW,
};
use fuzzy_matcher::skim::SkimMatcherV2;

/// Page currently shown.
#[derive(Debug, Clone)]
pub enum Screen {
    Search,
    Detail(DetailView),
}

/// Central application state container.
///
/// Mutated by the event handler in response to user input, HTTP completions
/// and timers. View models are computed on demand from state snapshots.
#[derive(Debug)]
pub struct AppState {
    /// Listing cache and fetch engine shared by every page.
    pub store: ListingStore,

    /// Search box and result panel.
    pub search: SearchSession,

    pub screen: Screen,

    /// Recent notable events, newest last.
    pub diagnostics: Diagnostics,

    /// Color scheme for UI rendering.
    pub theme: Theme,

    /// Whether Zellij granted web access. Requests fail until it does.
    pub web_access: bool,

    /// Terminal height at the last render, used to map clicks to rows.
    viewport_rows: usize,
}

impl AppState {
    /// Creates the initial state: search page, empty focused input.
    #[must_use]
    pub fn new(store: ListingStore, settings: SearchSettings, theme: Theme) -> Self {
        Self {
            store,
            search: SearchSession::new(settings),
            screen: Screen::Search,
            diagnostics: Diagnostics::default(),
            theme,
            web_access: false,
            viewport_rows: 0,
        }
    }

    /// The page currently shown, as a navigation target.
    #[must_use]
    pub const fn route(&self) -> Route {
        match &self.screen {
            Screen::Search => Route::Search,
            Screen::Detail(view) => Route::Detail(view.id()),
        }
    }

    /// Switches to `route`, starting whatever fetch it needs.
    pub fn open(&mut self, route: Route, now_ms: i64) -> Vec<Action> {
        match route {
            Route::Search => {
                tracing::debug!("returning to search page");
                self.screen = Screen::Search;
                self.search.focus();
                vec![]
            }
            Route::Detail(id) => {
                let (view, effects) = DetailView::open(id, &mut self.store, now_ms);
                self.diagnostics.record(now_ms, Severity::Info, format!("opened listing {id}"));
                self.screen = Screen::Detail(view);
                effects.into_iter().map(Action::from).collect()
            }
        }
    }

    /// Routes a store event to the pages waiting on it.
    ///
    /// Returns whether anything visible changed, plus follow-up actions.
    pub fn apply_store_event(&mut self, event: StoreEvent, now_ms: i64) -> (bool, Vec<Action>) {
        match event {
            StoreEvent::Ignored => (false, vec![]),
            StoreEvent::Retrying { effects } => {
                for effect in &effects {
                    if let StoreEffect::Schedule { token: TimerToken::Retry(_), delay_ms } = effect {
                        self.diagnostics.record(
                            now_ms,
                            Severity::Warn,
                            format!("request failed, retrying in {delay_ms}ms"),
                        );
                    }
                }
                (true, effects.into_iter().map(Action::from).collect())
            }
            StoreEvent::Settled(settlement) => (self.apply_settlement(&settlement, now_ms), vec![]),
        }
    }

    fn apply_settlement(&mut self, settlement: &Settlement, now_ms: i64) -> bool {
        let search_changed = self.search.on_settlement(settlement);
        let detail_changed = match &mut self.screen {
            Screen::Detail(view) => view.on_settlement(settlement),
            Screen::Search => false,
        };
        let changed = search_changed || detail_changed;

        if !changed && !settlement.waiters.is_empty() {
            tracing::debug!(key = %settlement.key, "settlement had no live waiter");
        }
        if changed {
            if let Err(err) = &settlement.outcome {
                self.diagnostics.record(now_ms, Severity::Error, err.to_string());
            }
        }
        changed
    }

    /// Records the terminal height used by the last render.
    pub fn set_viewport(&mut self, rows: usize) {
        self.viewport_rows = rows;
    }

    /// Maps a 0-indexed pane line to the index of the result drawn there.
    #[must_use]
    pub fn result_at_line(&self, line: usize) -> Option<usize> {
        if !matches!(self.screen, Screen::Search) || self.search.navigable_len() == 0 {
            return None;
        }

        let row = line + 1;
        let offset = row.checked_sub(RESULTS_TOP_ROW)? / ITEM_HEIGHT;
        let capacity = visible_results(self.viewport_rows);
        if offset >= capacity {
            return None;
        }

        let start = self.window_start(capacity);
        let index = start + offset;
        (index < self.search.navigable_len()).then_some(index)
    }

    /// Returns `true` if the 0-indexed pane line is part of the search box.
    #[must_use]
    pub const fn is_search_box_line(line: usize) -> bool {
        matches!(line + 1, 4..=6)
    }

    /// Computes a renderable UI view model from current state and terminal dimensions.
    ///
    /// # Windowing Algorithm
    ///
    /// 1. Calculate how many results fit between the search box and the status line
    /// 2. Center the window around the cursor
    /// 3. Shift the window back if it would run past the end of the list
    #[must_use]
    pub fn compute_viewmodel(&self, rows: usize, _cols: usize) -> UIViewModel {
        let body = match &self.screen {
            Screen::Search => Body::Search {
                bar: SearchBarInfo {
                    query: self.search.text().to_string(),
                    focus_ring: self.search.has_focus_ring(),
                    caret: self.search.is_input_focused(),
                },
                panel: self.compute_panel(visible_results(rows)),
            },
            Screen::Detail(view) => Body::Detail(Self::compute_detail(view)),
        };

        UIViewModel {
            header: self.compute_header(),
            body,
            status: self.diagnostics.latest().map(|d| StatusLine {
                severity: d.severity,
                message: d.message.clone(),
            }),
            footer: self.compute_footer(),
        }
    }

    fn compute_panel(&self, capacity: usize) -> Panel {
        if !self.search.is_panel_open() {
            return Panel::Closed;
        }

        match self.search.state() {
            QueryState::Idle => Panel::Closed,
            QueryState::Failed(err) => Panel::Error(EmptyState {
                message: format!("Error loading results ({})", err.label()),
                subtitle: err.to_string(),
            }),
            QueryState::Pending => Panel::Loading,
            QueryState::Settled(page) if page.is_empty() => Panel::Empty(EmptyState {
                message: "No results found".to_string(),
                subtitle: format!("Nothing matches \"{}\"", self.search.text()),
            }),
            QueryState::Settled(page) => {
                let start = self.window_start(capacity);
                let end = (start + capacity.max(1)).min(page.len());
                let selected = self.search.cursor().index();
                let matcher = SkimMatcherV2::default();

                let items = page.data[start..end]
                    .iter()
                    .enumerate()
                    .map(|(offset, listing)| self.compute_display_item(listing, selected == Some(start + offset), &matcher))
                    .collect();
                Panel::Results(items)
            }
        }
    }

    fn window_start(&self, capacity: usize) -> usize {
        let len = self.search.navigable_len();
        if capacity == 0 || len <= capacity {
            return 0;
        }
        let selected = self.search.cursor().index().unwrap_or(0);
        selected.saturating_sub(capacity / 2).min(len - capacity)
    }

    fn compute_display_item(&self, listing: &Listing, is_selected: bool, matcher: &SkimMatcherV2) -> DisplayItem {
        DisplayItem {
            title: listing.title.clone(),
            subtitle: listing.locality(),
            is_selected,
            highlight_ranges: self.compute_highlight_ranges(&listing.title, matcher),
        }
    }

    /// Computes character index ranges of `text` matched by the search text.
    ///
    /// Uses the Skim fuzzy matcher to find matching character positions, then
    /// coalesces consecutive indices into `(start, end)` ranges, end exclusive.
    fn compute_highlight_ranges(&self, text: &str, matcher: &SkimMatcherV2) -> Vec<(usize, usize)> {
        use fuzzy_matcher::FuzzyMatcher;

        let Some((_score, indices)) = matcher.fuzzy_indices(text, self.search.text()) else {
            return vec![];
        };

        let mut ranges: Vec<(usize, usize)> = Vec::new();
        for idx in indices {
            match ranges.last_mut() {
                Some((_, end)) if *end == idx => *end = idx + 1,
                _ => ranges.push((idx, idx + 1)),
            }
        }
        ranges
    }

    fn compute_detail(view: &DetailView) -> DetailInfo {
        match view.status() {
            DetailStatus::Loading => DetailInfo::Loading,
            DetailStatus::Failed(ListingsError::NotFound(id)) => DetailInfo::Error(EmptyState {
                message: "Listing not found".to_string(),
                subtitle: format!("No listing with id {id}. Press Esc to go back."),
            }),
            DetailStatus::Failed(err) => DetailInfo::Error(EmptyState {
                message: "Error loading listing details".to_string(),
                subtitle: format!("{err}. Press Esc to go back."),
            }),
            DetailStatus::Loaded(listing) => {
                let postal = format!("{} {}", listing.locality(), listing.zip).trim().to_string();
                let fields = [
                    ("Address", listing.address1.clone()),
                    ("City", postal),
                    ("Phone", listing.phone.clone()),
                    ("Website", listing.weburl.clone()),
                    ("Category", listing.category_line()),
                ]
                .into_iter()
                .filter(|(_, value)| !value.is_empty())
                .collect();

                DetailInfo::Listing {
                    title: listing.title.clone(),
                    fields,
                }
            }
        }
    }

    fn compute_header(&self) -> HeaderInfo {
        let title = match (&self.screen, self.search.state()) {
            (Screen::Detail(view), _) => format!(" Listing #{} ", view.id()),
            (Screen::Search, QueryState::Settled(page)) if self.search.is_panel_open() => {
                format!(" Listings ({} of {}) ", page.len(), page.metadata.total)
            }
            (Screen::Search, _) => " Listings ".to_string(),
        };
        HeaderInfo { title }
    }

    fn compute_footer(&self) -> FooterInfo {
        let keybindings = match &self.screen {
            Screen::Detail(_) => "Esc/b: back  q: hide",
            Screen::Search if self.search.is_input_focused() => {
                "Type to search  ↑/↓: navigate  Enter: open  Esc: close  Tab: unfocus"
            }
            Screen::Search => "Tab: focus search  Type to search  Esc: hide",
        };
        FooterInfo {
            keybindings: keybindings.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::listing::fixtures::{body, listing};
    use crate::store::{QueryCache, RetryPolicy};
    use url::Url;

    fn state() -> AppState {
        let store = ListingStore::new(
            Url::parse("http://localhost:3000").unwrap(),
            RetryPolicy::default(),
            QueryCache::default(),
        );
        AppState::new(store, SearchSettings::default(), Theme::default())
    }

    fn search_with_results(state: &mut AppState, text: &str, count: i64) {
        let effects = state.search.set_text(text.to_string(), &mut state.store, 0);
        let request = effects
            .iter()
            .find_map(|e| match e {
                StoreEffect::Fetch { request, .. } => Some(*request),
                StoreEffect::Schedule { .. } => None,
            })
            .unwrap();
        let items = (1..=count).map(|id| listing(id, &format!("Cafe {id}"))).collect();
        let event = state.store.on_response(request, 200, &body(items), 0);
        state.apply_store_event(event, 0);
    }

    fn panel(vm: &UIViewModel) -> &Panel {
        match &vm.body {
            Body::Search { panel, .. } => panel,
            Body::Detail(_) => panic!("expected search page"),
        }
    }

    #[test]
    fn closed_panel_before_typing() {
        let state = state();
        assert_eq!(*panel(&state.compute_viewmodel(24, 80)), Panel::Closed);
    }

    #[test]
    fn loading_then_results() {
        let mut state = state();
        state.search.set_text("ca".into(), &mut state.store, 0);
        assert_eq!(*panel(&state.compute_viewmodel(24, 80)), Panel::Loading);

        let mut state = self::state();
        search_with_results(&mut state, "ca", 2);
        let vm = state.compute_viewmodel(24, 80);
        let Panel::Results(items) = panel(&vm) else {
            panic!("expected results");
        };
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].subtitle, "Austin, TX");
        assert_eq!(items[0].highlight_ranges, vec![(0, 2)]);
        assert_eq!(vm.header.title, " Listings (2 of 2) ");
    }

    #[test]
    fn empty_results_show_message() {
        let mut state = state();
        search_with_results(&mut state, "zz", 0);
        let vm = state.compute_viewmodel(24, 80);
        assert!(matches!(panel(&vm), Panel::Empty(e) if e.message == "No results found"));
    }

    #[test]
    fn window_follows_cursor() {
        let mut state = state();
        search_with_results(&mut state, "ca", 10);
        for _ in 0..10 {
            state.search.move_down();
        }

        // 20 rows leave room for 5 results.
        let vm = state.compute_viewmodel(20, 80);
        let Panel::Results(items) = panel(&vm) else {
            panic!("expected results");
        };
        assert_eq!(items.len(), 5);
        assert_eq!(items[4].title, "Cafe 10");
        assert!(items[4].is_selected);
    }

    #[test]
    fn clicks_map_to_result_rows() {
        let mut state = state();
        search_with_results(&mut state, "ca", 3);
        state.set_viewport(24);

        assert_eq!(state.result_at_line(6), Some(0));
        assert_eq!(state.result_at_line(7), Some(0));
        assert_eq!(state.result_at_line(8), Some(1));
        assert_eq!(state.result_at_line(12), None);
        assert_eq!(state.result_at_line(2), None);
        assert!(AppState::is_search_box_line(4));
    }

    #[test]
    fn detail_not_found_message() {
        let mut state = state();
        let actions = state.open(Route::Detail(42), 0);
        let Some(Action::HttpGet { request, .. }) = actions.first().cloned() else {
            panic!("expected request");
        };
        let event = state.store.on_response(request, 200, &body(vec![]), 0);
        assert!(state.apply_store_event(event, 0).0);

        let vm = state.compute_viewmodel(24, 80);
        assert!(matches!(vm.body, Body::Detail(DetailInfo::Error(ref e)) if e.message == "Listing not found"));
        assert_eq!(state.route(), Route::Detail(42));
    }
}
