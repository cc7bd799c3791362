//! Search bar component renderer.
//!
//! This module renders the search input box with a bordered frame, the query
//! text and a caret while the input has focus.

use crate::ui::helpers::{truncate, width, Frame};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::SearchBarInfo;

/// Horizontal margin for the search box (spaces on left and right).
const SEARCH_BOX_MARGIN: usize = 5;

const PROMPT: &str = " Search: ";
const CARET: &str = "▏";

/// Renders the search input box at the specified row.
///
/// # Returns
///
/// The next available row position (row + 3, since search box uses 3 lines)
///
/// # Layout
///
/// ```text
/// [margin] ┌─────────────┐ [margin]
/// [margin] │ Search: ca▏ │ [margin]
/// [margin] └─────────────┘ [margin]
/// ```
///
/// The border uses `search_bar_focus` while the box holds the focus ring and
/// `search_bar_border` otherwise. A query too long for the box keeps its end
/// visible.
pub fn render_search_bar(frame: &mut Frame, row: usize, search: &SearchBarInfo, theme: &Theme, cols: usize) -> usize {
    let box_width = cols.saturating_sub(SEARCH_BOX_MARGIN * 2);
    let inner_width = box_width.saturating_sub(2);
    let border = if search.focus_ring {
        &theme.colors.search_bar_focus
    } else {
        &theme.colors.search_bar_border
    };

    frame.move_to(row, 1);
    frame.pad(SEARCH_BOX_MARGIN);
    frame.push(Theme::fg(border));
    frame.push(format!("┌{}┐", "─".repeat(inner_width)));
    frame.push(Theme::reset());

    let caret = if search.caret { CARET } else { "" };
    let room = inner_width.saturating_sub(width(PROMPT) + width(caret));
    let query_len = width(&search.query);
    let query: String = if query_len > room {
        search.query.chars().skip(query_len - room).collect()
    } else {
        search.query.clone()
    };
    let search_text = truncate(&format!("{PROMPT}{query}{caret}"), inner_width);

    frame.move_to(row + 1, 1);
    frame.pad(SEARCH_BOX_MARGIN);
    frame.push(Theme::fg(border));
    frame.push("│");
    frame.push(Theme::fg(&theme.colors.text_normal));
    frame.push(&search_text);
    frame.pad(inner_width.saturating_sub(width(&search_text)));
    frame.push(Theme::fg(border));
    frame.push("│");
    frame.push(Theme::reset());

    frame.move_to(row + 2, 1);
    frame.pad(SEARCH_BOX_MARGIN);
    frame.push(Theme::fg(border));
    frame.push(format!("└{}┘", "─".repeat(inner_width)));
    frame.push(Theme::reset());

    row + 3
}
