//! Search-as-you-type controller.
//!
//! [`SearchSession`] owns everything the search box shows: the typed text,
//! the query state, the result cursor and the focus flags. Text edits turn
//! into store queries once the text is long enough. Settlements are applied
//! only when they answer the most recently issued query, so a slow response
//! for an older text can never overwrite the results of a newer one.
//!
//! # Focus
//!
//! Two flags track focus. `input_focused` follows focus changes immediately
//! and gates keyboard navigation. `focus_ring` is what the search box draws
//! and is only cleared by the delayed blur reset, so that a click on a
//! result row, which blurs the input first, still lands on an open panel.

use super::modes::BlurResetPolicy;
use super::navigation::Cursor;
use crate::domain::{Listing, ListingsError, PaginatedResult, QueryParams};
use crate::runtime::TimerToken;
use crate::store::{ListingStore, Lookup, Settlement, StoreEffect, Ticket};
use std::sync::Arc;

/// Default number of characters before a query is issued.
pub const DEFAULT_MIN_QUERY_LEN: usize = 2;

/// Default delay between a blur and the reset it triggers.
pub const DEFAULT_BLUR_RESET_DELAY_MS: u64 = 200;

/// Tunables of the search box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSettings {
    pub min_query_len: usize,
    pub limit: u32,
    pub blur_reset_delay_ms: u64,
    pub blur_policy: BlurResetPolicy,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            min_query_len: DEFAULT_MIN_QUERY_LEN,
            limit: crate::domain::query::DEFAULT_LIMIT,
            blur_reset_delay_ms: DEFAULT_BLUR_RESET_DELAY_MS,
            blur_policy: BlurResetPolicy::default(),
        }
    }
}

/// Where the current query stands.
#[derive(Debug, Clone, Default)]
pub enum QueryState {
    /// Text too short; nothing was asked.
    #[default]
    Idle,
    /// Waiting for the store to settle the latest ticket.
    Pending,
    Settled(Arc<PaginatedResult>),
    Failed(ListingsError),
}

impl QueryState {
    /// Results of a settled query, if any.
    #[must_use]
    pub fn results(&self) -> Option<&Arc<PaginatedResult>> {
        match self {
            Self::Settled(page) => Some(page),
            _ => None,
        }
    }
}

/// State of the search box and its result panel.
#[derive(Debug, Clone)]
pub struct SearchSession {
    settings: SearchSettings,
    text: String,
    cursor: Cursor,
    state: QueryState,
    params: Option<QueryParams>,
    latest: Option<Ticket>,
    panel_open: bool,
    input_focused: bool,
    focus_ring: bool,
    blur_generation: u64,
    pending_blur: Option<u64>,
}

impl SearchSession {
    /// Creates an empty, focused search box.
    #[must_use]
    pub fn new(settings: SearchSettings) -> Self {
        Self {
            settings,
            text: String::new(),
            cursor: Cursor::default(),
            state: QueryState::Idle,
            params: None,
            latest: None,
            panel_open: false,
            input_focused: true,
            focus_ring: true,
            blur_generation: 0,
            pending_blur: None,
        }
    }

    /// Replaces the search text and issues the matching query.
    ///
    /// Text shorter than `min_query_len` characters closes the panel and
    /// forgets the latest ticket, so responses still in flight are dropped
    /// when they settle. Longer text issues exactly one store query for the
    /// first page, opens the panel and resets the cursor.
    pub fn set_text(&mut self, text: String, store: &mut ListingStore, now_ms: i64) -> Vec<StoreEffect> {
        self.text = text;
        self.cursor.reset();

        if self.text.chars().count() < self.settings.min_query_len {
            tracing::debug!(len = self.text.len(), "query text too short, closing panel");
            self.state = QueryState::Idle;
            self.params = None;
            self.latest = None;
            self.panel_open = false;
            return Vec::new();
        }

        let params = QueryParams::title_search(self.text.clone()).with_limit(self.settings.limit);
        let handle = store.query(&params, now_ms);
        tracing::debug!(ticket = %handle.ticket, title = %self.text, "query issued");

        self.state = match handle.lookup {
            Lookup::Ready(page) => QueryState::Settled(page),
            Lookup::Pending => QueryState::Pending,
            Lookup::Rejected(err) => QueryState::Failed(err),
        };
        self.params = Some(params);
        self.latest = Some(handle.ticket);
        self.panel_open = true;
        handle.effects
    }

    /// Applies a settlement if it answers the latest ticket.
    ///
    /// Returns `true` if the state changed.
    pub fn on_settlement(&mut self, settlement: &Settlement) -> bool {
        let Some(latest) = self.latest else {
            return false;
        };
        if !settlement.answers(latest) || !matches!(self.state, QueryState::Pending) {
            tracing::debug!(latest = %latest, key = %settlement.key, "discarding stale settlement");
            return false;
        }

        self.state = match &settlement.outcome {
            Ok(page) => QueryState::Settled(Arc::clone(page)),
            Err(err) => QueryState::Failed(err.clone()),
        };
        self.cursor.reset();
        true
    }

    /// Number of rows the cursor can address. Zero unless the panel shows
    /// settled results.
    #[must_use]
    pub fn navigable_len(&self) -> usize {
        if !self.panel_open {
            return 0;
        }
        self.state.results().map_or(0, |page| page.len())
    }

    pub fn move_down(&mut self) {
        let len = self.navigable_len();
        self.cursor.down(len);
    }

    pub fn move_up(&mut self) {
        self.cursor.up();
    }

    /// Commits the highlighted result, if any, and resets the session.
    ///
    /// Returns the id of the chosen listing.
    pub fn commit(&mut self) -> Option<i64> {
        let index = self.cursor.within(self.navigable_len())?;
        self.commit_row(index)
    }

    /// Commits the result at `row` (a click), if the panel shows one there.
    pub fn commit_row(&mut self, row: usize) -> Option<i64> {
        if row >= self.navigable_len() {
            return None;
        }
        let id = self.state.results()?.data.get(row)?.id;
        tracing::debug!(id, row, "result committed");
        self.reset();
        Some(id)
    }

    /// Clears text, cursor and results and closes the panel.
    pub fn reset(&mut self) {
        self.text.clear();
        self.cursor.reset();
        self.state = QueryState::Idle;
        self.params = None;
        self.latest = None;
        self.panel_open = false;
    }

    /// Closes the panel and blurs the input. The cursor is left alone.
    pub fn escape(&mut self) -> Option<(TimerToken, u64)> {
        self.panel_open = false;
        self.blur()
    }

    /// Marks the input focused. Under [`BlurResetPolicy::CancelOnFocus`] a
    /// pending blur reset is cancelled.
    pub fn focus(&mut self) {
        self.input_focused = true;
        self.focus_ring = true;
        if self.settings.blur_policy == BlurResetPolicy::CancelOnFocus && self.pending_blur.take().is_some() {
            tracing::debug!("pending blur reset cancelled by focus");
        }
    }

    /// Marks the input blurred and returns the timer for the delayed reset.
    ///
    /// Returns `None` if the input was not focused.
    pub fn blur(&mut self) -> Option<(TimerToken, u64)> {
        if !self.input_focused {
            return None;
        }
        self.input_focused = false;
        self.blur_generation += 1;
        self.pending_blur = Some(self.blur_generation);
        Some((TimerToken::BlurReset(self.blur_generation), self.settings.blur_reset_delay_ms))
    }

    /// Runs the delayed blur reset for `generation` if it still applies.
    ///
    /// Returns `true` if the reset ran.
    pub fn on_blur_timer(&mut self, generation: u64) -> bool {
        let applies = match self.settings.blur_policy {
            BlurResetPolicy::CancelOnFocus => self.pending_blur == Some(generation),
            BlurResetPolicy::Unconditional => generation <= self.blur_generation,
        };
        if !applies {
            return false;
        }

        self.pending_blur = None;
        self.panel_open = false;
        self.cursor.reset();
        self.focus_ring = false;
        true
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    #[must_use]
    pub const fn state(&self) -> &QueryState {
        &self.state
    }

    /// Parameters of the query the panel currently reflects.
    #[must_use]
    pub const fn params(&self) -> Option<&QueryParams> {
        self.params.as_ref()
    }

    #[must_use]
    pub const fn latest_ticket(&self) -> Option<Ticket> {
        self.latest
    }

    #[must_use]
    pub const fn is_panel_open(&self) -> bool {
        self.panel_open
    }

    #[must_use]
    pub const fn is_input_focused(&self) -> bool {
        self.input_focused
    }

    #[must_use]
    pub const fn has_focus_ring(&self) -> bool {
        self.focus_ring
    }

    #[must_use]
    pub const fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    /// The highlighted listing, if the cursor is on a visible row.
    #[must_use]
    pub fn highlighted(&self) -> Option<&Listing> {
        let index = self.cursor.within(self.navigable_len())?;
        self.state.results()?.data.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::listing::fixtures::{body, listing};
    use crate::store::{QueryCache, RetryPolicy, StoreEvent};
    use url::Url;

    fn store() -> ListingStore {
        ListingStore::new(
            Url::parse("http://localhost:3000").unwrap(),
            RetryPolicy::default(),
            QueryCache::default(),
        )
    }

    fn request_of(effects: &[StoreEffect]) -> u64 {
        effects
            .iter()
            .find_map(|e| match e {
                StoreEffect::Fetch { request, .. } => Some(*request),
                StoreEffect::Schedule { .. } => None,
            })
            .unwrap()
    }

    fn settle(store: &mut ListingStore, effects: &[StoreEffect], titles: &[&str]) -> Settlement {
        let items = titles
            .iter()
            .zip(1..)
            .map(|(title, id)| listing(id, title))
            .collect();
        match store.on_response(request_of(effects), 200, &body(items), 0) {
            StoreEvent::Settled(s) => s,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn short_text_issues_nothing() {
        let mut store = store();
        let mut session = SearchSession::new(SearchSettings::default());

        assert!(session.set_text("c".into(), &mut store, 0).is_empty());
        assert!(!session.is_panel_open());
        assert!(matches!(session.state(), QueryState::Idle));
        assert_eq!(store.in_flight(), 0);
    }

    #[test]
    fn long_text_opens_panel_and_goes_pending() {
        let mut store = store();
        let mut session = SearchSession::new(SearchSettings::default());

        let effects = session.set_text("ca".into(), &mut store, 0);
        assert_eq!(effects.iter().filter(|e| matches!(e, StoreEffect::Fetch { .. })).count(), 1);
        assert!(session.is_panel_open());
        assert!(matches!(session.state(), QueryState::Pending));
        assert_eq!(session.params().and_then(|p| p.title.as_deref()), Some("ca"));
    }

    #[test]
    fn min_length_counts_characters_not_bytes() {
        let mut store = store();
        let mut session = SearchSession::new(SearchSettings::default());
        session.set_text("é".into(), &mut store, 0);
        assert!(!session.is_panel_open());
    }

    #[test]
    fn older_settlement_is_discarded() {
        let mut store = store();
        let mut session = SearchSession::new(SearchSettings::default());

        let a = session.set_text("ca".into(), &mut store, 0);
        let b = session.set_text("cat".into(), &mut store, 10);

        let settled_b = settle(&mut store, &b, &["Cat Cafe"]);
        assert!(session.on_settlement(&settled_b));

        let settled_a = settle(&mut store, &a, &["Carwash", "Cabinets"]);
        assert!(!session.on_settlement(&settled_a));
        assert_eq!(session.state().results().unwrap().data[0].title, "Cat Cafe");
    }

    #[test]
    fn late_response_after_shortening_does_not_reopen() {
        let mut store = store();
        let mut session = SearchSession::new(SearchSettings::default());

        let cat = session.set_text("cat".into(), &mut store, 0);
        session.set_text("c".into(), &mut store, 5);

        let settled = settle(&mut store, &cat, &["Cat Cafe"]);
        assert!(!session.on_settlement(&settled));
        assert!(!session.is_panel_open());
        assert!(matches!(session.state(), QueryState::Idle));
    }

    #[test]
    fn enter_without_highlight_commits_nothing() {
        let mut store = store();
        let mut session = SearchSession::new(SearchSettings::default());
        let effects = session.set_text("ca".into(), &mut store, 0);
        session.on_settlement(&settle(&mut store, &effects, &["Cafe"]));

        assert_eq!(session.commit(), None);
        assert_eq!(session.text(), "ca");
        assert!(session.is_panel_open());
    }

    #[test]
    fn commit_resets_session() {
        let mut store = store();
        let mut session = SearchSession::new(SearchSettings::default());
        let effects = session.set_text("ca".into(), &mut store, 0);
        session.on_settlement(&settle(&mut store, &effects, &["Cafe", "Cabinets"]));

        session.move_down();
        session.move_down();
        assert_eq!(session.highlighted().map(|l| l.id), Some(2));
        assert_eq!(session.commit(), Some(2));
        assert_eq!(session.text(), "");
        assert!(!session.is_panel_open());
        assert!(matches!(session.state(), QueryState::Idle));
        assert_eq!(session.cursor().index(), None);
    }

    #[test]
    fn failure_keeps_text_and_shows_error() {
        let mut store = store();
        let mut session = SearchSession::new(SearchSettings::default());
        let effects = session.set_text("ca".into(), &mut store, 0);
        let StoreEvent::Settled(settlement) = store.on_response(request_of(&effects), 400, b"", 0) else {
            panic!("400 should settle");
        };

        assert!(session.on_settlement(&settlement));
        assert!(matches!(session.state(), QueryState::Failed(ListingsError::Malformed(_))));
        assert_eq!(session.text(), "ca");
        assert_eq!(session.navigable_len(), 0);
    }

    #[test]
    fn focus_cancels_blur_reset() {
        let mut store = store();
        let mut session = SearchSession::new(SearchSettings::default());
        let effects = session.set_text("ca".into(), &mut store, 0);
        session.on_settlement(&settle(&mut store, &effects, &["Cafe"]));
        session.move_down();

        let (token, delay) = session.blur().unwrap();
        assert_eq!(delay, 200);
        session.focus();

        let TimerToken::BlurReset(generation) = token else { unreachable!() };
        assert!(!session.on_blur_timer(generation));
        assert!(session.is_panel_open());
        assert_eq!(session.cursor().index(), Some(0));
    }

    #[test]
    fn unconditional_reset_fires_after_refocus() {
        let mut store = store();
        let mut session = SearchSession::new(SearchSettings {
            blur_policy: BlurResetPolicy::Unconditional,
            ..SearchSettings::default()
        });
        let effects = session.set_text("ca".into(), &mut store, 0);
        session.on_settlement(&settle(&mut store, &effects, &["Cafe"]));

        let (TimerToken::BlurReset(generation), _) = session.blur().unwrap() else { unreachable!() };
        session.focus();

        assert!(session.on_blur_timer(generation));
        assert!(!session.is_panel_open());
        assert!(!session.has_focus_ring());
    }

    #[test]
    fn escape_closes_panel_and_blurs() {
        let mut store = store();
        let mut session = SearchSession::new(SearchSettings::default());
        let effects = session.set_text("ca".into(), &mut store, 0);
        session.on_settlement(&settle(&mut store, &effects, &["Cafe"]));
        session.move_down();

        assert!(session.escape().is_some());
        assert!(!session.is_panel_open());
        assert!(!session.is_input_focused());
        assert!(session.has_focus_ring());
        assert_eq!(session.cursor().index(), Some(0));
        assert!(session.escape().is_none());
    }
}
