//! Filesystem locations inside the Zellij plugin sandbox.
//!
//! Zellij mounts the host filesystem under `/host`, rooted at the cwd of the
//! last focused terminal (or where Zellij was started). In practice that is
//! usually the user's home directory.

use std::path::PathBuf;

/// Directory holding the plugin's trace files.
///
/// # Examples
///
/// ```
/// use zlistings::runtime::paths::data_dir;
///
/// assert_eq!(data_dir().to_str(), Some("/host/.local/share/zellij/zlistings"));
/// ```
#[must_use]
pub fn data_dir() -> PathBuf {
    PathBuf::from("/host/.local/share/zellij").join("zlistings")
}

/// Maps a `~`-prefixed path from the plugin configuration into the sandbox.
///
/// # Examples
///
/// ```
/// use zlistings::runtime::paths::expand_tilde;
///
/// assert_eq!(expand_tilde("~/themes/dark.toml"), "/host/themes/dark.toml");
/// assert_eq!(expand_tilde("~"), "/host");
/// assert_eq!(expand_tilde("/etc/theme.toml"), "/etc/theme.toml");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    match path.strip_prefix('~') {
        Some("") => "/host".to_string(),
        Some(rest) if rest.starts_with('/') => format!("/host{rest}"),
        _ => path.to_string(),
    }
}
