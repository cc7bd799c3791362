//! Application layer coordinating state, events, and actions.
//!
//! This module sits between the plugin shim (main.rs) and the domain and
//! store layers. It implements the event-driven architecture that powers the
//! interactive UI.
//!
//! # Architecture
//!
//! The application layer follows a unidirectional data flow pattern:
//!
//! ```text
//! User Input → Events → Event Handler → State Mutations → Actions → Side Effects
//!                           ↑                                  ↓
//!                           └──── HTTP completions, timers ────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing logic and state transition coordinator
//! - [`search`]: Search box controller with stale-response protection
//! - [`navigation`]: Result cursor
//! - [`detail`]: Routes and the listing detail page
//! - [`diagnostics`]: Bounded log of notable query events
//! - [`modes`]: Blur reset policy
//! - [`state`]: Central application state container and view model computation

pub mod actions;
pub mod detail;
pub mod diagnostics;
pub mod handler;
pub mod modes;
pub mod navigation;
pub mod search;
pub mod state;

pub use actions::Action;
pub use detail::{DetailStatus, DetailView, Route};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use handler::{handle_event, Event};
pub use modes::BlurResetPolicy;
pub use navigation::Cursor;
pub use search::{QueryState, SearchSession, SearchSettings};
pub use state::{AppState, Screen};
