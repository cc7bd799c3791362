//! Focus policy types for the search input.
//!
//! When the search input loses focus, a delayed reset closes the result panel,
//! clears the cursor and drops the focus ring. [`BlurResetPolicy`] decides
//! whether regaining focus before the delay elapses cancels that reset.

use std::fmt;
use std::str::FromStr;

/// Behavior of the delayed reset scheduled on blur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlurResetPolicy {
    /// A focus event before the delay elapses cancels the pending reset.
    #[default]
    CancelOnFocus,

    /// The reset always fires, even if focus came back in the meantime.
    Unconditional,
}

impl FromStr for BlurResetPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cancel_on_focus" | "cancel-on-focus" | "cancel" => Ok(Self::CancelOnFocus),
            "unconditional" | "always" => Ok(Self::Unconditional),
            other => Err(format!("unknown blur_reset policy {other:?}")),
        }
    }
}

impl fmt::Display for BlurResetPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CancelOnFocus => f.write_str("cancel_on_focus"),
            Self::Unconditional => f.write_str("unconditional"),
        }
    }
}
