//! Footer and status line renderers.
//!
//! The footer shows keybinding hints; the status line above it shows the
//! latest diagnostic, colored by severity.

use crate::app::Severity;
use crate::ui::helpers::{truncate, width, Frame};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{FooterInfo, StatusLine};

/// Renders the footer help bar at the specified row.
///
/// Displays keybinding hints centered horizontally with dimmed styling.
/// Text wider than the terminal is truncated so the layout never wraps.
pub fn render_footer(frame: &mut Frame, row: usize, footer: &FooterInfo, theme: &Theme, cols: usize) -> usize {
    let help_text = truncate(&footer.keybindings, cols);
    let text_len = width(&help_text);
    let padding = (cols.saturating_sub(text_len)) / 2;

    frame.move_to(row, 1);
    frame.push(Theme::fg(&theme.colors.text_dim));
    frame.pad(padding);
    frame.push(&help_text);
    frame.pad(cols.saturating_sub(padding + text_len));
    frame.push(Theme::reset());
    row + 1
}

/// Renders the latest diagnostic, left-aligned.
pub fn render_status(frame: &mut Frame, row: usize, status: &StatusLine, theme: &Theme, cols: usize) -> usize {
    let color = match status.severity {
        Severity::Info => &theme.colors.text_dim,
        Severity::Warn => &theme.colors.warn_fg,
        Severity::Error => &theme.colors.error_fg,
    };
    let text = truncate(&format!(" [{}] {}", status.severity, status.message), cols);

    frame.move_to(row, 1);
    frame.push(Theme::fg(color));
    frame.push(&text);
    frame.pad(cols.saturating_sub(width(&text)));
    frame.push(Theme::reset());
    row + 1
}
