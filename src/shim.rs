//! Zellij plugin wrapper.
//!
//! The thin layer between the zlistings library and the Zellij plugin API:
//! it turns Zellij events into library events, and library actions into
//! `web_request`, `set_timeout` and `hide_self` calls.
//!
//! # Event Mapping
//!
//! - `Key(Down)`/`Ctrl+n` → `Event::KeyDown`, `Key(Up)`/`Ctrl+p` → `Event::KeyUp`
//! - `Key(Tab)` → `Event::ToggleFocus`
//! - `Mouse(LeftClick)` → `Event::Click { line }`
//! - `Timer` → `Event::TimerFired` for the earliest token in the [`TimerQueue`]
//! - `WebRequestResult` → `Event::HttpResponse`, matched through the request context
//! - `Visible` → `Event::Visible`
//! - `PermissionRequestResult` → `Event::PermissionsResult`

use std::collections::{BTreeMap, VecDeque};
use zellij_tile::prelude::*;

use zlistings::runtime::{json_headers, request_context, request_id_from_context, TimerQueue};
use zlistings::{handle_event, Action, AppState, Config, Event, Route};

/// Plugin state wrapper.
#[derive(Default)]
pub struct State {
    /// Core application state; `None` if the configuration was rejected.
    app: Option<AppState>,

    /// Why `app` is missing, shown in place of the UI.
    startup_error: Option<String>,

    /// Logical timers multiplexed onto Zellij's `set_timeout`.
    timers: TimerQueue,
}

impl ZellijPlugin for State {
    /// Parses configuration, initializes tracing and application state,
    /// requests web access and subscribes to events.
    fn load(&mut self, configuration: BTreeMap<String, String>) {
        let config = Config::from_zellij(&configuration);
        zlistings::observability::init_tracing(&config);

        let span = tracing::debug_span!("plugin_load");
        let _guard = span.entered();

        match zlistings::initialize(&config) {
            Ok(app) => self.app = Some(app),
            Err(e) => {
                tracing::error!(error = %e, "invalid plugin configuration");
                self.startup_error = Some(e.to_string());
            }
        }

        request_permission(&[PermissionType::WebAccess]);
        subscribe(&[
            EventType::Key,
            EventType::Mouse,
            EventType::Timer,
            EventType::WebRequestResult,
            EventType::Visible,
            EventType::PermissionRequestResult,
        ]);

        tracing::debug!("plugin load complete - waiting for permissions");
    }

    /// Handles an incoming Zellij event. Returns `true` if the UI should
    /// re-render.
    fn update(&mut self, event: zellij_tile::prelude::Event) -> bool {
        let now_ms = chrono::Utc::now().timestamp_millis();
        let span = tracing::debug_span!("plugin_update", event_type = %Self::event_name(&event));
        let _guard = span.entered();

        let events = self.map_event(event);
        if events.is_empty() {
            return false;
        }
        self.dispatch(events, now_ms)
    }

    fn render(&mut self, rows: usize, cols: usize) {
        match &mut self.app {
            Some(app) => {
                app.set_viewport(rows);
                print!("{}", zlistings::ui::render(app, rows, cols));
            }
            None => {
                let message = self.startup_error.as_deref().unwrap_or("zlistings failed to start");
                println!();
                println!("  zlistings: {message}");
            }
        }
    }
}

impl State {
    fn event_name(event: &zellij_tile::prelude::Event) -> String {
        match event {
            zellij_tile::prelude::Event::Key(key) => format!("Key({:?})", key.bare_key),
            zellij_tile::prelude::Event::Mouse(_) => "Mouse".to_string(),
            zellij_tile::prelude::Event::Timer(_) => "Timer".to_string(),
            zellij_tile::prelude::Event::WebRequestResult(status, ..) => format!("WebRequestResult({status})"),
            zellij_tile::prelude::Event::Visible(visible) => format!("Visible({visible})"),
            zellij_tile::prelude::Event::PermissionRequestResult(..) => "PermissionRequestResult".to_string(),
            _ => "Other".to_string(),
        }
    }

    fn map_event(&mut self, event: zellij_tile::prelude::Event) -> Vec<Event> {
        match event {
            zellij_tile::prelude::Event::Key(key) => Self::map_key_event(&key).into_iter().collect(),
            zellij_tile::prelude::Event::Mouse(Mouse::LeftClick(line, _col)) => usize::try_from(line)
                .ok()
                .map(|line| Event::Click { line })
                .into_iter()
                .collect(),
            zellij_tile::prelude::Event::Timer(_elapsed) => {
                self.timers.fire().map(Event::TimerFired).into_iter().collect()
            }
            zellij_tile::prelude::Event::WebRequestResult(status, _headers, body, context) => {
                match request_id_from_context(&context) {
                    Some(request) => vec![Event::HttpResponse { request, status, body }],
                    None => {
                        tracing::debug!(status, "ignoring web response without request id");
                        vec![]
                    }
                }
            }
            zellij_tile::prelude::Event::Visible(visible) => vec![Event::Visible(visible)],
            zellij_tile::prelude::Event::PermissionRequestResult(status) => {
                let granted = matches!(status, PermissionStatus::Granted);
                tracing::debug!(granted, "web access permission result");
                vec![Event::PermissionsResult { granted }]
            }
            _ => vec![],
        }
    }

    fn map_key_event(key: &KeyWithModifier) -> Option<Event> {
        if key.has_modifiers(&[KeyModifier::Ctrl]) {
            return match key.bare_key {
                BareKey::Char('n') => Some(Event::KeyDown),
                BareKey::Char('p') => Some(Event::KeyUp),
                _ => None,
            };
        }

        Some(match key.bare_key {
            BareKey::Down => Event::KeyDown,
            BareKey::Up => Event::KeyUp,
            BareKey::Enter => Event::Enter,
            BareKey::Esc => Event::Escape,
            BareKey::Tab => Event::ToggleFocus,
            BareKey::Backspace => Event::Backspace,
            BareKey::Char(c) => Event::Char(c),
            _ => return None,
        })
    }

    /// Runs events through the handler. `Action::Navigate` comes back as
    /// `Event::Open` and is handled in the same update.
    fn dispatch(&mut self, events: Vec<Event>, now_ms: i64) -> bool {
        let Some(app) = self.app.as_mut() else {
            return false;
        };

        let mut queue: VecDeque<Event> = events.into();
        let mut should_render = false;

        while let Some(event) = queue.pop_front() {
            match handle_event(app, &event, now_ms) {
                Ok((render, actions)) => {
                    tracing::debug!(action_count = actions.len(), render, "event handled");
                    should_render |= render;
                    for action in actions {
                        if let Some(route) = execute_action(&mut self.timers, action, now_ms) {
                            queue.push_back(Event::Open(route));
                        }
                    }
                }
                Err(e) => tracing::warn!(error = %e, "error handling event"),
            }
        }

        should_render
    }
}

/// Executes one action against the Zellij API. Returns the route to open
/// for `Action::Navigate`.
fn execute_action(timers: &mut TimerQueue, action: Action, now_ms: i64) -> Option<Route> {
    match action {
        Action::CloseFocus => {
            tracing::debug!("hiding plugin");
            hide_self();
            None
        }
        Action::HttpGet { request, url } => {
            tracing::debug!(request, url = %url, "web request");
            web_request(url, HttpVerb::Get, json_headers(), vec![], request_context(request));
            None
        }
        Action::ScheduleTimer { token, delay_ms } => {
            set_timeout(timers.schedule(token, delay_ms, now_ms));
            None
        }
        Action::Navigate(route) => Some(route),
    }
}
