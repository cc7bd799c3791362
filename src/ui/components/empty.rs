//! Centered message renderer.
//!
//! Used for "No results found" in the result panel and for the error and
//! not-found pages of the detail view.

use crate::ui::helpers::{truncate, width, Frame};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::EmptyState;

/// Renders a two-line centered message starting at `row`.
///
/// The message uses `color`; the subtitle uses `text_dim` with dim styling.
///
/// # Returns
///
/// The next available row position (row + 2)
pub fn render_message(frame: &mut Frame, row: usize, empty: &EmptyState, color: &str, theme: &Theme, cols: usize) -> usize {
    let message = truncate(&empty.message, cols);
    let msg_len = width(&message);
    let msg_padding = (cols.saturating_sub(msg_len)) / 2;

    frame.move_to(row, 1);
    frame.push(Theme::fg(color));
    frame.pad(msg_padding);
    frame.push(&message);
    frame.pad(cols.saturating_sub(msg_padding + msg_len));
    frame.push(Theme::reset());

    let subtitle = truncate(&empty.subtitle, cols);
    let sub_len = width(&subtitle);
    let sub_padding = (cols.saturating_sub(sub_len)) / 2;

    frame.move_to(row + 1, 1);
    frame.push(Theme::dim());
    frame.push(Theme::fg(&theme.colors.text_dim));
    frame.pad(sub_padding);
    frame.push(&subtitle);
    frame.pad(cols.saturating_sub(sub_padding + sub_len));
    frame.push(Theme::reset());

    row + 2
}
