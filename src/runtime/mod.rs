//! Runtime plumbing shared by the core and the Zellij shim.
//!
//! Zellij delivers network completions and timer ticks as plugin events. The
//! types here let the sans-IO core describe those operations and let the shim
//! route the completions back without touching core state.
//!
//! - [`timers`]: timer tokens and the pending-timer queue
//! - [`context`]: web request context and header maps
//! - [`paths`]: sandbox filesystem locations

pub mod context;
pub mod paths;
pub mod timers;

pub use context::{json_headers, request_context, request_id_from_context, RequestId};
pub use timers::{TimerQueue, TimerToken};
