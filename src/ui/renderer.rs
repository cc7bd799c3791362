//! Top-level rendering coordinator.
//!
//! The renderer follows a two-step process:
//!
//! 1. **View Model Computation**: Transform `AppState` into `UIViewModel`
//! 2. **Component Rendering**: Delegate to the page layout for the current screen
//!
//! The result is a single string of text and ANSI escape sequences; the
//! plugin shim prints it.
//!
//! # Example
//!
//! ```rust
//! use zlistings::{initialize, ui, Config};
//!
//! let state = initialize(&Config::default())?;
//! let frame = ui::render(&state, 24, 80);
//! assert!(frame.contains("Listings"));
//! # Ok::<(), zlistings::ListingsError>(())
//! ```

use crate::app::AppState;
use crate::ui::components;
use crate::ui::helpers::Frame;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{Body, UIViewModel};

/// Renders the plugin UI for a pane of `rows` x `cols`.
#[must_use]
pub fn render(state: &AppState, rows: usize, cols: usize) -> String {
    let viewmodel = state.compute_viewmodel(rows, cols);
    render_viewmodel(&viewmodel, &state.theme, rows, cols)
}

/// Renders a pre-computed view model with the layout of its page.
#[must_use]
pub fn render_viewmodel(vm: &UIViewModel, theme: &Theme, rows: usize, cols: usize) -> String {
    let mut frame = Frame::new();

    match &vm.body {
        Body::Search { bar, panel } => components::render_search_page(&mut frame, vm, bar, panel, theme, cols, rows),
        Body::Detail(detail) => components::render_detail_page(&mut frame, vm, detail, theme, cols, rows),
    }

    frame.into_string()
}
