//! Color palettes and the ANSI sequences the components draw with.
//!
//! Two palettes ship with the plugin (`catppuccin-mocha`, the default, and
//! `catppuccin-latte`); any other palette is read from a TOML file with a
//! top-level `name` and a `[colors]` table of `#rrggbb` strings, laid out
//! like the files under `themes/`.
//!
//! ```rust
//! use zlistings::ui::theme::Theme;
//!
//! let theme = Theme::from_name("catppuccin-latte").unwrap();
//! let title = format!("{}Listings{}", Theme::fg(&theme.colors.header_fg), Theme::reset());
//! assert!(title.starts_with("\u{1b}[38;2;"));
//! ```

use crate::domain::{ListingsError, Result};
use serde::Deserialize;
use std::path::Path;

/// Palette used when the configuration names none.
pub const DEFAULT_THEME: &str = "catppuccin-mocha";

const BUILTIN: &[(&str, &str)] = &[
    ("catppuccin-mocha", include_str!("../../themes/catppuccin-mocha.toml")),
    ("catppuccin-latte", include_str!("../../themes/catppuccin-latte.toml")),
];

#[derive(Debug, Clone, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

/// One `#rrggbb` string per UI role.
#[derive(Debug, Clone, Deserialize)]
pub struct ThemeColors {
    pub header_fg: String,
    /// Header band background; the terminal background when absent.
    #[serde(default)]
    pub header_bg: Option<String>,

    pub selection_fg: String,
    pub selection_bg: String,

    pub text_normal: String,
    /// Secondary lines: category, footer, hints.
    pub text_dim: String,
    pub border: String,

    pub search_bar_border: String,
    /// Search box border while it holds the focus ring.
    pub search_bar_focus: String,
    pub match_highlight_fg: String,
    pub match_highlight_bg: String,

    pub empty_state_fg: String,
    pub loading_fg: String,
    pub warn_fg: String,
    pub error_fg: String,
}

impl Theme {
    /// Looks up a palette shipped with the plugin.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let (_, source) = BUILTIN.iter().find(|(builtin, _)| *builtin == name)?;
        Self::from_toml(source).ok()
    }

    /// Reads a palette from a TOML file.
    ///
    /// # Errors
    ///
    /// [`ListingsError::Io`] if the file is unreadable, otherwise whatever
    /// [`Theme::from_toml`] reports.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_toml(&std::fs::read_to_string(path)?)
    }

    /// # Errors
    ///
    /// [`ListingsError::Theme`] if the text is not TOML or a color is missing.
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| ListingsError::Theme(format!("failed to parse theme TOML: {e}")))
    }

    /// 24-bit foreground sequence for `hex`. Empty if `hex` is not `#rrggbb`,
    /// which leaves the terminal's own color in place.
    #[must_use]
    pub fn fg(hex: &str) -> String {
        rgb(hex).map_or_else(String::new, |(r, g, b)| format!("\u{1b}[38;2;{r};{g};{b}m"))
    }

    /// Background counterpart of [`Theme::fg`].
    #[must_use]
    pub fn bg(hex: &str) -> String {
        rgb(hex).map_or_else(String::new, |(r, g, b)| format!("\u{1b}[48;2;{r};{g};{b}m"))
    }

    #[must_use]
    pub const fn bold() -> &'static str {
        "\u{1b}[1m"
    }

    #[must_use]
    pub const fn dim() -> &'static str {
        "\u{1b}[2m"
    }

    /// Clears every color and attribute set so far.
    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{1b}[0m"
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_name(DEFAULT_THEME).expect("bundled default theme is valid TOML")
    }
}

fn rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.trim().strip_prefix('#').unwrap_or(hex.trim());
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |at: usize| u8::from_str_radix(&digits[at..at + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_themes_parse() {
        for (name, _) in BUILTIN {
            assert_eq!(Theme::from_name(name).map(|t| t.name), Some((*name).to_string()));
        }
        assert_eq!(Theme::default().name, DEFAULT_THEME);
        assert!(Theme::from_name("neon").is_none());
    }

    #[test]
    fn loads_theme_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(include_str!("../../themes/catppuccin-latte.toml").as_bytes())
            .unwrap();
        assert_eq!(Theme::from_file(file.path()).unwrap().name, "catppuccin-latte");
    }

    #[test]
    fn reports_bad_theme_files() {
        assert!(matches!(Theme::from_file("/nonexistent/theme.toml"), Err(ListingsError::Io(_))));
        assert!(matches!(Theme::from_toml("name = 1"), Err(ListingsError::Theme(_))));
    }

    #[test]
    fn converts_hex_colors() {
        assert_eq!(Theme::fg("#ff8000"), "\u{1b}[38;2;255;128;0m");
        assert_eq!(Theme::bg("1e1e2e"), "\u{1b}[48;2;30;30;46m");
    }

    #[test]
    fn malformed_colors_emit_nothing() {
        for bad in ["bogus", "#12345", "#gg0000", "#ééé"] {
            assert_eq!(Theme::fg(bad), "", "{bad}");
        }
    }
}
