//! View model types representing renderable UI state.
//!
//! View models are computed by [`crate::app::AppState::compute_viewmodel`]
//! and consumed by the renderer. They contain no business logic, only
//! display-ready data: which panel variant to draw, which row is selected,
//! which title characters matched the query.
//!
//! # Screen layout
//!
//! Rows are 1-indexed, as in ANSI cursor addressing.
//!
//! ```text
//! row 1          blank
//! row 2          header
//! row 3          border
//! rows 4-6       search box
//! rows 7..       result panel, two rows per result
//! rows-3         status line (latest diagnostic)
//! rows-2         border
//! rows-1         footer
//! ```

use crate::app::Severity;

/// First row of the result panel.
pub const RESULTS_TOP_ROW: usize = 7;

/// Rows taken by one result (title line and locality line).
pub const ITEM_HEIGHT: usize = 2;

/// Rows not available to the result panel.
pub const CHROME_ROWS: usize = 10;

/// Number of results that fit on a screen of `rows` rows.
#[must_use]
pub const fn visible_results(rows: usize) -> usize {
    rows.saturating_sub(CHROME_ROWS) / ITEM_HEIGHT
}

/// Complete UI view model for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct UIViewModel {
    pub header: HeaderInfo,
    pub body: Body,
    pub status: Option<StatusLine>,
    pub footer: FooterInfo,
}

/// Page-specific content between header and status line.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Search {
        bar: SearchBarInfo,
        panel: Panel,
    },
    Detail(DetailInfo),
}

/// Search input box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBarInfo {
    pub query: String,
    /// Draw the box in the focus color.
    pub focus_ring: bool,
    /// Draw a caret after the query.
    pub caret: bool,
}

/// Result panel under the search box.
///
/// Precedence when open: error, then loading, then results, then the
/// no-results message.
#[derive(Debug, Clone, PartialEq)]
pub enum Panel {
    Closed,
    Loading,
    Error(EmptyState),
    Empty(EmptyState),
    Results(Vec<DisplayItem>),
}

/// One result row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayItem {
    pub title: String,
    /// "City, ST" line under the title.
    pub subtitle: String,
    pub is_selected: bool,
    /// Character ranges of `title` matched by the query, end exclusive.
    pub highlight_ranges: Vec<(usize, usize)>,
}

/// Detail page content.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailInfo {
    Loading,
    Error(EmptyState),
    Listing {
        title: String,
        /// `(label, value)` pairs, empty values already dropped.
        fields: Vec<(&'static str, String)>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterInfo {
    pub keybindings: String,
}

/// Message shown in place of content: no results, or a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub message: String,
    pub subtitle: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub severity: Severity,
    pub message: String,
}
