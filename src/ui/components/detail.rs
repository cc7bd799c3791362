//! Listing detail page renderer.

use super::empty::render_message;
use crate::ui::helpers::{truncate, Frame};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::DetailInfo;

/// Width of the field label column.
const LABEL_WIDTH: usize = 10;

/// Renders the detail page body starting at `row`.
///
/// # Layout
///
/// ```text
///   Cat Cafe
///
///   Address   1 Main St
///   City      Austin, TX 78701
///   Phone     555-0100
///   ...
/// ```
pub fn render_detail(frame: &mut Frame, row: usize, detail: &DetailInfo, theme: &Theme, cols: usize) -> usize {
    match detail {
        DetailInfo::Loading => {
            frame.move_to(row + 1, 1);
            frame.push(Theme::fg(&theme.colors.loading_fg));
            frame.push("  Loading listing...");
            frame.push(Theme::reset());
            row + 2
        }
        DetailInfo::Error(message) => render_message(frame, row + 2, message, &theme.colors.error_fg, theme, cols),
        DetailInfo::Listing { title, fields } => {
            frame.move_to(row + 1, 1);
            frame.push(Theme::bold());
            frame.push(Theme::fg(&theme.colors.header_fg));
            frame.push("  ");
            frame.push(truncate(title, cols.saturating_sub(2)));
            frame.push(Theme::reset());

            let mut current_row = row + 3;
            for (label, value) in fields {
                frame.move_to(current_row, 1);
                frame.push(Theme::fg(&theme.colors.text_dim));
                frame.push(format!("  {label:<LABEL_WIDTH$}"));
                frame.push(Theme::fg(&theme.colors.text_normal));
                frame.push(truncate(value, cols.saturating_sub(LABEL_WIDTH + 2)));
                frame.push(Theme::reset());
                current_row += 1;
            }
            current_row
        }
    }
}
