//! Actions representing side effects to be executed by the plugin runtime.
//!
//! The event handler never performs I/O. It returns a `Vec<Action>` after
//! each event and the plugin shim executes them in order: HTTP requests go
//! through Zellij's `web_request`, timers through `set_timeout`, and
//! navigation is fed back into the handler as [`crate::app::Event::Open`].
//!
//! # Example
//!
//! ```rust
//! use zlistings::app::{Action, Route};
//!
//! let actions = vec![Action::Navigate(Route::Detail(42))];
//! assert_eq!(actions[0], Action::Navigate(Route::Detail(42)));
//! ```

use super::detail::Route;
use crate::runtime::{RequestId, TimerToken};
use crate::store::StoreEffect;

/// Commands representing side effects to be executed by the plugin runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Hides the plugin pane.
    CloseFocus,

    /// Performs `GET url`; the completion must come back as
    /// [`crate::app::Event::HttpResponse`] carrying the same `request`.
    HttpGet {
        request: RequestId,
        url: String,
    },

    /// Delivers [`crate::app::Event::TimerFired`] with `token` after
    /// `delay_ms` milliseconds.
    ScheduleTimer {
        token: TimerToken,
        delay_ms: u64,
    },

    /// Switches the plugin to another page.
    Navigate(Route),
}

impl From<StoreEffect> for Action {
    fn from(effect: StoreEffect) -> Self {
        match effect {
            StoreEffect::Fetch { request, url } => Self::HttpGet { request, url },
            StoreEffect::Schedule { token, delay_ms } => Self::ScheduleTimer { token, delay_ms },
        }
    }
}
