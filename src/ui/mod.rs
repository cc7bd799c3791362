//! User interface rendering layer with component-based architecture.
//!
//! This module turns application state into ANSI-styled text through
//! composable rendering components. It provides theme support, result
//! windowing and fuzzy match highlighting.
//!
//! # Architecture
//!
//! The UI layer follows a declarative rendering model:
//!
//! ```text
//! AppState → compute_viewmodel → UIViewModel → render → Frame → String
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: View model types and the screen layout constants
//! - [`renderer`]: Top-level rendering coordinator
//! - [`components`]: Composable UI component renderers
//! - [`helpers`]: Output buffer, truncation and highlighting
//! - [`theme`]: Color scheme definitions and ANSI escape sequence generation

pub mod components;
pub mod helpers;
pub mod renderer;
pub mod theme;
pub mod viewmodel;

pub use helpers::Frame;
pub use renderer::{render, render_viewmodel};
pub use theme::Theme;
pub use viewmodel::{
    visible_results, Body, DetailInfo, DisplayItem, EmptyState, FooterInfo, HeaderInfo, Panel, SearchBarInfo, StatusLine,
    UIViewModel,
};
