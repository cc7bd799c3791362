//! Event handling and state transition logic.
//!
//! This module implements the core event handler that processes user input,
//! HTTP completions and timer ticks, translating them into state changes and
//! action sequences.
//!
//! # Architecture
//!
//! The handler follows a unidirectional data flow pattern:
//! 1. The plugin shim turns Zellij events into [`Event`]s stamped with the
//!    current time
//! 2. [`handle_event`] routes the event by kind and by current page
//! 3. State mutations occur via `AppState`, `SearchSession` and `ListingStore`
//! 4. Actions are collected and returned for execution
//!
//! # Event Types
//!
//! - **Keys**: `Char`, `Backspace`, `KeyDown`, `KeyUp`, `Enter`, `Escape`, `ToggleFocus`
//! - **Pointer and focus**: `Click`, `Focus`, `Blur`, `Visible`
//! - **Runtime**: `HttpResponse`, `TimerFired`, `PermissionsResult`
//! - **Navigation**: `Open`, `CloseFocus`
//!
//! # Example
//!
//! ```rust
//! use zlistings::{handle_event, initialize, Action, Config, Event};
//!
//! let mut state = initialize(&Config::default())?;
//! handle_event(&mut state, &Event::Char('c'), 0)?;
//! let (render, actions) = handle_event(&mut state, &Event::Char('a'), 1)?;
//! assert!(render);
//! assert!(matches!(actions[0], Action::HttpGet { .. }));
//! # Ok::<(), zlistings::ListingsError>(())
//! ```

use super::detail::Route;
use super::diagnostics::Severity;
use super::state::Screen;
use crate::app::{Action, AppState};
use crate::domain::error::Result;
use crate::runtime::{RequestId, TimerToken};

/// Events triggered by user input or by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Types a character into the search box (or a shortcut on the detail page).
    Char(char),
    Backspace,
    KeyDown,
    KeyUp,
    Enter,
    Escape,
    /// Tab: focus or unfocus the search box.
    ToggleFocus,
    Focus,
    Blur,

    /// Left click on a 0-indexed pane line.
    Click { line: usize },

    /// Shows a page. Emitted back by the shim for [`Action::Navigate`].
    Open(Route),

    /// Completion of an [`Action::HttpGet`].
    HttpResponse {
        request: RequestId,
        /// HTTP status, `0` if the request never reached a server.
        status: u16,
        body: Vec<u8>,
    },

    /// A timer scheduled with [`Action::ScheduleTimer`] fired.
    TimerFired(TimerToken),

    /// The plugin pane was shown or hidden.
    Visible(bool),

    /// Answer to the web access permission request.
    PermissionsResult { granted: bool },

    /// Hides the plugin pane.
    CloseFocus,
}

impl Event {
    /// Short name used in trace spans; response bodies stay out of the trace.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Char(_) => "char",
            Self::Backspace => "backspace",
            Self::KeyDown => "key_down",
            Self::KeyUp => "key_up",
            Self::Enter => "enter",
            Self::Escape => "escape",
            Self::ToggleFocus => "toggle_focus",
            Self::Focus => "focus",
            Self::Blur => "blur",
            Self::Click { .. } => "click",
            Self::Open(_) => "open",
            Self::HttpResponse { .. } => "http_response",
            Self::TimerFired(_) => "timer_fired",
            Self::Visible(_) => "visible",
            Self::PermissionsResult { .. } => "permissions_result",
            Self::CloseFocus => "close_focus",
        }
    }
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// `now_ms` is the plugin clock in milliseconds; it drives cache freshness
/// and is recorded with diagnostics.
///
/// # Returns
///
/// `(should_render, actions)`. Actions must be executed in order.
///
/// # Errors
///
/// Currently every event is handled in-state; failures of individual
/// queries are reported through the query state, not as errors.
///
/// # Tracing
///
/// Each call creates a debug-level span with the event name.
pub fn handle_event(state: &mut AppState, event: &Event, now_ms: i64) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = event.name(), now_ms).entered();

    match event {
        Event::HttpResponse { request, status, body } => {
            let store_event = state.store.on_response(*request, *status, body, now_ms);
            Ok(state.apply_store_event(store_event, now_ms))
        }
        Event::TimerFired(TimerToken::BlurReset(generation)) => {
            let reset = state.search.on_blur_timer(*generation);
            tracing::debug!(generation, reset, "blur reset timer fired");
            Ok((reset, vec![]))
        }
        Event::TimerFired(token) => {
            let store_event = state.store.on_timer(*token, now_ms);
            Ok(state.apply_store_event(store_event, now_ms))
        }
        Event::Open(route) => Ok((true, state.open(*route, now_ms))),
        Event::Visible(visible) => {
            if *visible {
                Ok((false, vec![]))
            } else {
                Ok((true, blur(state)))
            }
        }
        Event::PermissionsResult { granted } => {
            state.web_access = *granted;
            if !*granted {
                state
                    .diagnostics
                    .record(now_ms, Severity::Error, "web access denied, searches will fail");
            }
            Ok((true, vec![]))
        }
        Event::CloseFocus => Ok((false, vec![Action::CloseFocus])),
        _ if matches!(state.screen, Screen::Detail(_)) => Ok(handle_detail_input(event)),
        _ => handle_search_input(state, event, now_ms),
    }
}

fn handle_search_input(state: &mut AppState, event: &Event, now_ms: i64) -> Result<(bool, Vec<Action>)> {
    let focused = state.search.is_input_focused();

    match event {
        Event::Char(c) => {
            if !focused {
                state.search.focus();
            }
            let mut text = state.search.text().to_string();
            text.push(*c);
            tracing::trace!(query = %text, "search text updated");
            Ok((true, set_text(state, text, now_ms)))
        }
        Event::Backspace => {
            if !focused {
                return Ok((false, vec![]));
            }
            let mut text = state.search.text().to_string();
            if text.pop().is_none() {
                return Ok((false, vec![]));
            }
            Ok((true, set_text(state, text, now_ms)))
        }
        Event::KeyDown if focused => {
            state.search.move_down();
            Ok((true, vec![]))
        }
        Event::KeyUp if focused => {
            state.search.move_up();
            Ok((true, vec![]))
        }
        Event::Enter if focused => {
            let row = state.search.cursor().index();
            Ok(commit(state, row))
        }
        Event::Escape if focused => {
            let actions = state.search.escape().map(schedule_blur_reset).into_iter().collect();
            Ok((true, actions))
        }
        Event::Escape => Ok((false, vec![Action::CloseFocus])),
        Event::ToggleFocus if focused => Ok((true, blur(state))),
        Event::ToggleFocus | Event::Focus => {
            state.search.focus();
            Ok((true, vec![]))
        }
        Event::Blur => Ok((true, blur(state))),
        Event::Click { line } => {
            if let Some(row) = state.result_at_line(*line) {
                return Ok(commit(state, Some(row)));
            }
            if AppState::is_search_box_line(*line) {
                state.search.focus();
                return Ok((true, vec![]));
            }
            Ok((true, blur(state)))
        }
        _ => Ok((false, vec![])),
    }
}

fn handle_detail_input(event: &Event) -> (bool, Vec<Action>) {
    match event {
        Event::Escape | Event::Backspace | Event::Char('b') => (false, vec![Action::Navigate(Route::Search)]),
        Event::Char('q') => (false, vec![Action::CloseFocus]),
        _ => (false, vec![]),
    }
}

fn set_text(state: &mut AppState, text: String, now_ms: i64) -> Vec<Action> {
    state
        .search
        .set_text(text, &mut state.store, now_ms)
        .into_iter()
        .map(Action::from)
        .collect()
}

/// Commits the result at `row` (the cursor for Enter, the clicked row for
/// a click). Nothing happens without a valid row.
fn commit(state: &mut AppState, row: Option<usize>) -> (bool, Vec<Action>) {
    let Some(id) = row.and_then(|row| state.search.commit_row(row)) else {
        tracing::debug!("nothing to commit");
        return (false, vec![]);
    };
    (true, vec![Action::Navigate(Route::Detail(id))])
}

fn blur(state: &mut AppState) -> Vec<Action> {
    state.search.blur().map(schedule_blur_reset).into_iter().collect()
}

const fn schedule_blur_reset((token, delay_ms): (TimerToken, u64)) -> Action {
    Action::ScheduleTimer { token, delay_ms }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::SearchSettings;
    use crate::domain::listing::fixtures::{body, listing};
    use crate::store::{ListingStore, QueryCache, RetryPolicy};
    use crate::ui::Theme;
    use url::Url;

    fn state() -> AppState {
        let store = ListingStore::new(
            Url::parse("http://localhost:3000").unwrap(),
            RetryPolicy::default(),
            QueryCache::default(),
        );
        AppState::new(store, SearchSettings::default(), Theme::default())
    }

    fn type_text(state: &mut AppState, text: &str) -> Vec<Action> {
        let mut actions = Vec::new();
        for c in text.chars() {
            actions = handle_event(state, &Event::Char(c), 0).unwrap().1;
        }
        actions
    }

    #[test]
    fn single_character_issues_no_request() {
        let mut state = state();
        assert!(type_text(&mut state, "c").is_empty());
        assert!(!state.search.is_panel_open());
    }

    #[test]
    fn second_character_issues_request_with_timeout() {
        let mut state = state();
        let actions = type_text(&mut state, "ca");
        assert!(matches!(
            actions.as_slice(),
            [Action::HttpGet { .. }, Action::ScheduleTimer { token: TimerToken::RequestTimeout(_), .. }]
        ));
    }

    #[test]
    fn escape_schedules_blur_reset_then_hides() {
        let mut state = state();
        let (_, actions) = handle_event(&mut state, &Event::Escape, 0).unwrap();
        assert_eq!(
            actions,
            vec![Action::ScheduleTimer { token: TimerToken::BlurReset(1), delay_ms: 200 }]
        );

        let (_, actions) = handle_event(&mut state, &Event::Escape, 10).unwrap();
        assert_eq!(actions, vec![Action::CloseFocus]);
    }

    #[test]
    fn hiding_the_pane_schedules_blur_reset() {
        let mut state = state();
        assert!(state.search.is_input_focused());

        let (render, actions) = handle_event(&mut state, &Event::Visible(false), 0).unwrap();
        assert!(render);
        assert_eq!(
            actions,
            vec![Action::ScheduleTimer { token: TimerToken::BlurReset(1), delay_ms: 200 }]
        );
        assert!(!state.search.is_input_focused());
    }

    #[test]
    fn clicking_a_result_opens_its_detail_page() {
        let mut state = state();
        let request = type_text(&mut state, "ca")
            .into_iter()
            .find_map(|action| match action {
                Action::HttpGet { request, .. } => Some(request),
                _ => None,
            })
            .unwrap();
        let response = Event::HttpResponse {
            request,
            status: 200,
            body: body(vec![listing(1, "Cat Cafe"), listing(2, "Catering")]),
        };
        handle_event(&mut state, &response, 0).unwrap();
        assert!(state.search.is_panel_open());

        // First result is drawn on the first line below the search box.
        state.set_viewport(24);
        let (render, actions) = handle_event(&mut state, &Event::Click { line: 6 }, 0).unwrap();
        assert!(render);
        assert_eq!(actions, vec![Action::Navigate(Route::Detail(1))]);
        assert_eq!(state.search.text(), "");
        assert!(!state.search.is_panel_open());
    }

    #[test]
    fn enter_without_cursor_does_nothing() {
        let mut state = state();
        type_text(&mut state, "ca");
        let (render, actions) = handle_event(&mut state, &Event::Enter, 0).unwrap();
        assert!(!render);
        assert!(actions.is_empty());
        assert_eq!(state.search.text(), "ca");
    }

    #[test]
    fn navigation_keys_ignored_while_blurred() {
        let mut state = state();
        handle_event(&mut state, &Event::Blur, 0).unwrap();
        let (render, _) = handle_event(&mut state, &Event::KeyDown, 0).unwrap();
        assert!(!render);
    }

    #[test]
    fn detail_page_keys_go_back() {
        let mut state = state();
        handle_event(&mut state, &Event::Open(Route::Detail(3)), 0).unwrap();

        for event in [Event::Escape, Event::Backspace, Event::Char('b')] {
            let (_, actions) = handle_event(&mut state, &event, 0).unwrap();
            assert_eq!(actions, vec![Action::Navigate(Route::Search)]);
        }

        handle_event(&mut state, &Event::Open(Route::Search), 0).unwrap();
        assert_eq!(state.route(), Route::Search);
        assert!(state.search.is_input_focused());
    }

    #[test]
    fn denied_permission_is_reported() {
        let mut state = state();
        handle_event(&mut state, &Event::PermissionsResult { granted: false }, 5).unwrap();
        assert!(!state.web_access);
        assert_eq!(state.diagnostics.latest().map(|d| d.severity), Some(Severity::Error));
    }
}
