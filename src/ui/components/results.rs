//! Result panel renderer.
//!
//! Each result takes two rows: the title, with fuzzy match highlighting and
//! selection background, and a dimmed locality line. Non-result states
//! (loading, error, no results) render as a short message instead.

use super::empty::render_message;
use crate::ui::helpers::{self, truncate, width, Frame};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{DisplayItem, Panel};

/// Indent of result text inside the panel.
const ITEM_INDENT: usize = 2;

/// Renders the result panel starting at `row`.
///
/// # Returns
///
/// The next available row position.
pub fn render_panel(frame: &mut Frame, row: usize, panel: &Panel, theme: &Theme, cols: usize) -> usize {
    match panel {
        Panel::Closed => row,
        Panel::Loading => {
            frame.move_to(row + 1, 1);
            frame.push(Theme::fg(&theme.colors.loading_fg));
            frame.pad(ITEM_INDENT);
            frame.push("Loading...");
            frame.push(Theme::reset());
            row + 2
        }
        Panel::Error(message) => render_message(frame, row + 1, message, &theme.colors.error_fg, theme, cols),
        Panel::Empty(message) => render_message(frame, row + 1, message, &theme.colors.empty_state_fg, theme, cols),
        Panel::Results(items) => items
            .iter()
            .fold(row, |current_row, item| render_item(frame, current_row, item, theme, cols)),
    }
}

/// Renders one result: title row then locality row.
///
/// # Styling Precedence
///
/// 1. Selection background (if `is_selected`)
/// 2. Fuzzy match highlights
/// 3. Normal text color
///
/// Both rows are padded to the full terminal width so the selection
/// background spans the whole item.
fn render_item(frame: &mut Frame, row: usize, item: &DisplayItem, theme: &Theme, cols: usize) -> usize {
    let text_width = cols.saturating_sub(ITEM_INDENT);
    let title = truncate(&item.title, text_width);
    let subtitle = truncate(&item.subtitle, text_width);

    let base = |frame: &mut Frame| {
        if item.is_selected {
            frame.push(Theme::fg(&theme.colors.selection_fg));
            frame.push(Theme::bg(&theme.colors.selection_bg));
        } else {
            frame.push(Theme::fg(&theme.colors.text_normal));
        }
    };

    frame.move_to(row, 1);
    base(frame);
    frame.push(if item.is_selected { "▌ " } else { "  " });
    helpers::render_highlighted_text(frame, &title, &item.highlight_ranges, theme, item.is_selected);
    frame.pad(cols.saturating_sub(ITEM_INDENT + width(&title)));
    frame.push(Theme::reset());

    frame.move_to(row + 1, 1);
    base(frame);
    if !item.is_selected {
        frame.push(Theme::fg(&theme.colors.text_dim));
    }
    frame.pad(ITEM_INDENT);
    frame.push(&subtitle);
    frame.pad(cols.saturating_sub(ITEM_INDENT + width(&subtitle)));
    frame.push(Theme::reset());

    row + 2
}
