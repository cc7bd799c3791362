//! Header component renderer.
//!
//! This module renders the plugin title bar with centered text, theme-aware
//! colors, and optional background styling.

use crate::ui::helpers::{truncate, width, Frame};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::HeaderInfo;

/// Renders the header title bar at the specified row.
///
/// Displays the title centered horizontally with bold styling and theme colors.
/// Pads the line to fill the entire terminal width.
///
/// # Returns
///
/// The next available row position (row + 1)
pub fn render_header(frame: &mut Frame, row: usize, header: &HeaderInfo, theme: &Theme, cols: usize) -> usize {
    let title = truncate(&header.title, cols);
    let title_len = width(&title);
    let padding = (cols.saturating_sub(title_len)) / 2;

    frame.move_to(row, 1);
    frame.push(Theme::bold());
    frame.push(Theme::fg(&theme.colors.header_fg));
    if let Some(bg) = &theme.colors.header_bg {
        frame.push(Theme::bg(bg));
    }

    frame.pad(padding);
    frame.push(&title);
    frame.pad(cols.saturating_sub(padding + title_len));

    frame.push(Theme::reset());
    row + 1
}
