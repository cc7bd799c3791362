//! Composable UI component renderers.
//!
//! Each component draws one part of the interface into a [`Frame`] and
//! returns the next free row.
//!
//! # Components
//!
//! - [`header`]: Title bar
//! - [`search`]: Search input box (border, query text, caret)
//! - [`results`]: Result panel, two rows per listing
//! - [`detail`]: Listing detail page
//! - [`empty`]: Centered message for no results and failures
//! - [`footer`]: Keybinding hints and the status line
//!
//! # Layouts
//!
//! - [`render_search_page`]: Header + `SearchBar` + Panel + Status + Footer
//! - [`render_detail_page`]: Header + Detail + Status + Footer

mod detail;
mod empty;
mod footer;
mod header;
mod results;
mod search;

use crate::ui::helpers::Frame;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{DetailInfo, Panel, SearchBarInfo, UIViewModel};

use detail::render_detail;
use footer::{render_footer, render_status};
use header::render_header;
use results::render_panel;
use search::render_search_bar;

/// Renders a horizontal border line at the specified row.
///
/// # Returns
///
/// The next available row position (row + 1)
fn render_border(frame: &mut Frame, row: usize, color: &str, cols: usize) -> usize {
    frame.move_to(row, 1);
    frame.push(Theme::fg(color));
    frame.push("─".repeat(cols));
    frame.push(Theme::reset());
    row + 1
}

/// Renders the search page.
///
/// Layout structure:
/// ```text
/// [blank line]
/// [Header]
/// [Border]
/// [Search Bar - 3 lines]
/// [Result Panel - 2 lines per result]
/// [Blank padding]
/// [Status]
/// [Border]
/// [Footer]
/// ```
pub fn render_search_page(
    frame: &mut Frame,
    vm: &UIViewModel,
    bar: &SearchBarInfo,
    panel: &Panel,
    theme: &Theme,
    cols: usize,
    rows: usize,
) {
    let mut current_row = 2;

    current_row = render_header(frame, current_row, &vm.header, theme, cols);
    current_row = render_border(frame, current_row, &theme.colors.border, cols);
    current_row = render_search_bar(frame, current_row, bar, theme, cols);
    let _current_row = render_panel(frame, current_row, panel, theme, cols);

    render_bottom(frame, vm, theme, cols, rows);
}

/// Renders the detail page.
///
/// Layout structure:
/// ```text
/// [blank line]
/// [Header]
/// [Border]
/// [Listing title and fields]
/// [Blank padding]
/// [Status]
/// [Border]
/// [Footer]
/// ```
pub fn render_detail_page(frame: &mut Frame, vm: &UIViewModel, detail: &DetailInfo, theme: &Theme, cols: usize, rows: usize) {
    let mut current_row = 2;

    current_row = render_header(frame, current_row, &vm.header, theme, cols);
    current_row = render_border(frame, current_row, &theme.colors.border, cols);
    let _current_row = render_detail(frame, current_row, detail, theme, cols);

    render_bottom(frame, vm, theme, cols, rows);
}

/// Status line, border and footer, anchored to the bottom of the pane.
fn render_bottom(frame: &mut Frame, vm: &UIViewModel, theme: &Theme, cols: usize, rows: usize) {
    let footer_start = rows.saturating_sub(1);
    let border_row = footer_start.saturating_sub(1);
    let status_row = border_row.saturating_sub(1);

    if let Some(status) = &vm.status {
        render_status(frame, status_row, status, theme, cols);
    }
    render_border(frame, border_row, &theme.colors.border, cols);
    render_footer(frame, footer_start, &vm.footer, theme, cols);
}
