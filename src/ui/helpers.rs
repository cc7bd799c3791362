//! Shared rendering utilities and helpers.
//!
//! Components draw into a [`Frame`], a string buffer of text and ANSI escape
//! sequences, instead of printing directly. The shim prints the finished
//! frame in one go, and tests can inspect it.
//!
//! # Features
//!
//! - **Cursor addressing**: 1-indexed `row;col` positioning
//! - **Fuzzy Match Highlighting**: Renders text with highlighted character ranges
//! - **UTF-8 Safe**: Truncation and highlighting operate on characters, not bytes

use crate::ui::theme::Theme;

/// Output buffer for one render pass.
#[derive(Debug, Default, Clone)]
pub struct Frame {
    buf: String,
}

impl Frame {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Positions the cursor at a specific row and column (both 1-indexed).
    pub fn move_to(&mut self, row: usize, col: usize) {
        self.buf.push_str(&format!("\u{1b}[{row};{col}H"));
    }

    pub fn push(&mut self, text: impl AsRef<str>) {
        self.buf.push_str(text.as_ref());
    }

    /// Appends `count` spaces.
    pub fn pad(&mut self, count: usize) {
        self.buf.extend(std::iter::repeat(' ').take(count));
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.buf
    }
}

/// Number of characters in `text`.
#[must_use]
pub fn width(text: &str) -> usize {
    text.chars().count()
}

/// Cuts `text` to at most `max` characters, marking the cut with `...`.
#[must_use]
pub fn truncate(text: &str, max: usize) -> String {
    if width(text) <= max {
        return text.to_string();
    }
    if max <= 3 {
        return text.chars().take(max).collect();
    }
    let kept: String = text.chars().take(max - 3).collect();
    format!("{kept}...")
}

/// Renders text with highlighted character ranges for fuzzy matches.
///
/// Ranges are `(start, end)` character indices, end exclusive. After each
/// highlighted section the base style is restored: selection colors for a
/// selected row, normal text color otherwise. Ranges beyond the end of
/// `text` are clipped.
pub fn render_highlighted_text(frame: &mut Frame, text: &str, ranges: &[(usize, usize)], theme: &Theme, is_selected: bool) {
    if ranges.is_empty() {
        frame.push(text);
        return;
    }

    let chars: Vec<char> = text.chars().collect();
    let mut current_pos = 0;

    for &(start, end) in ranges {
        let start = start.min(chars.len()).max(current_pos);
        let end = end.min(chars.len());
        if start >= end {
            continue;
        }

        frame.push(chars[current_pos..start].iter().collect::<String>());

        frame.push(Theme::fg(&theme.colors.match_highlight_fg));
        frame.push(Theme::bg(&theme.colors.match_highlight_bg));
        frame.push(chars[start..end].iter().collect::<String>());
        frame.push(Theme::reset());

        if is_selected {
            frame.push(Theme::fg(&theme.colors.selection_fg));
            frame.push(Theme::bg(&theme.colors.selection_bg));
        } else {
            frame.push(Theme::fg(&theme.colors.text_normal));
        }

        current_pos = end;
    }

    frame.push(chars[current_pos..].iter().collect::<String>());
}

/// Removes ANSI escape sequences, leaving the visible text.
#[cfg(test)]
pub(crate) fn strip_ansi(raw: &str) -> String {
    let mut out = String::new();
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\u{1b}' {
            for next in chars.by_ref() {
                if next.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_on_character_boundaries() {
        assert_eq!(truncate("Café Olé", 20), "Café Olé");
        assert_eq!(truncate("Café Olé Bistro", 8), "Café ...");
        assert_eq!(truncate("abcdef", 2), "ab");
    }

    #[test]
    fn highlights_keep_visible_text_intact() {
        let theme = Theme::default();
        let mut frame = Frame::new();
        render_highlighted_text(&mut frame, "Cat Café", &[(0, 2), (6, 20)], &theme, false);
        assert_eq!(strip_ansi(frame.as_str()), "Cat Café");
        assert!(frame.as_str().contains(&Theme::bg(&theme.colors.match_highlight_bg)));
    }

    #[test]
    fn frame_positions_cursor() {
        let mut frame = Frame::new();
        frame.move_to(3, 1);
        frame.push("x");
        frame.pad(2);
        assert_eq!(frame.into_string(), "\u{1b}[3;1Hx  ");
    }
}
