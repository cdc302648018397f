//! Filesystem locations used by cord-search.
//!
//! Uses the [`dirs`] crate for platform-appropriate resolution.
//!
//! | Purpose | macOS | Linux |
//! |---------|-------|-------|
//! | Config | `~/Library/Application Support/cord-search/` | `~/.config/cord-search/` |
//!
//! Set `CORD_SEARCH_CONFIG_DIR` to point somewhere else (tests, portable
//! installs).

use std::path::PathBuf;

/// Directory name under the platform config root.
pub const APP_DIR_NAME: &str = "cord-search";

/// Environment variable overriding [`config_dir`].
pub const CONFIG_DIR_ENV: &str = "CORD_SEARCH_CONFIG_DIR";

/// Application config directory.
///
/// Resolves to `dirs::config_dir()/cord-search/` by default.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os(CONFIG_DIR_ENV) {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join(APP_DIR_NAME))
        .unwrap_or_else(|| std::env::temp_dir().join("cord-search-config"))
}

/// Path of the main config file (`config_dir()/config.toml`).
#[must_use]
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_dir_is_nonempty() {
        assert!(!config_dir().as_os_str().is_empty());
    }

    #[test]
    fn config_file_lives_in_config_dir() {
        let file = config_file();
        assert_eq!(file.parent(), Some(config_dir().as_path()));
        assert!(file.to_string_lossy().ends_with("config.toml"));
    }
}
