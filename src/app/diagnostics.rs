//! Bounded log of notable query events shown in the status line.
//!
//! Every entry is also emitted as a `tracing` event, so the same history ends
//! up in the trace file when tracing is enabled.

use std::collections::VecDeque;
use std::fmt;

/// Number of entries kept when no capacity is configured.
pub const DEFAULT_CAPACITY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warn,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub at_ms: i64,
    pub severity: Severity,
    pub message: String,
}

/// Ring buffer of the most recent [`Diagnostic`]s.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    entries: VecDeque<Diagnostic>,
    capacity: usize,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl Diagnostics {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends an entry, dropping the oldest one when full.
    pub fn record(&mut self, at_ms: i64, severity: Severity, message: impl Into<String>) {
        let message = message.into();
        match severity {
            Severity::Info => tracing::info!(at_ms, "{message}"),
            Severity::Warn => tracing::warn!(at_ms, "{message}"),
            Severity::Error => tracing::error!(at_ms, "{message}"),
        }

        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(Diagnostic { at_ms, severity, message });
    }

    #[must_use]
    pub fn latest(&self) -> Option<&Diagnostic> {
        self.entries.back()
    }

    /// Entries from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_oldest_when_full() {
        let mut diagnostics = Diagnostics::new(2);
        diagnostics.record(1, Severity::Info, "one");
        diagnostics.record(2, Severity::Warn, "two");
        diagnostics.record(3, Severity::Error, "three");

        let messages: Vec<&str> = diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["two", "three"]);
        assert_eq!(diagnostics.latest().map(|d| d.severity), Some(Severity::Error));
    }
}
