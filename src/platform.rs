//! Host platform detection and per-user configuration locations

use std::env;
use std::path::PathBuf;

/// Application directory name used on Windows and macOS
pub const APP_NAME: &str = "ClaimFiler";

/// Application directory name used under XDG-style config homes
pub const APP_NAME_XDG: &str = "claimfiler";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Unix,
}

impl Platform {
    /// Platform of the running process
    pub fn current() -> Self {
        Self::from_os_name(env::consts::OS)
    }

    /// Maps an OS name (`std::env::consts::OS` or a descriptive name such as
    /// "Windows 10" or "Mac OS X") to a platform class
    pub fn from_os_name(name: &str) -> Self {
        let name = name.trim().to_lowercase();
        if name.starts_with("windows") {
            Platform::Windows
        } else if name.starts_with("mac") || name.starts_with("darwin") {
            Platform::MacOs
        } else {
            Platform::Unix
        }
    }

    /// Directory holding this application's per-user configuration.
    ///
    /// Returns `None` when the environment lacks the base directory the
    /// platform needs (no roaming app data on Windows, no home directory
    /// elsewhere).
    pub fn config_dir(&self, env: &HostEnv) -> Option<PathBuf> {
        match self {
            Platform::Windows => env.config_base.as_ref().map(|dir| dir.join(APP_NAME)),
            Platform::MacOs => env
                .config_base
                .clone()
                .or_else(|| {
                    env.home
                        .as_ref()
                        .map(|home| home.join("Library").join("Application Support"))
                })
                .map(|dir| dir.join(APP_NAME)),
            Platform::Unix => env
                .config_base
                .clone()
                .or_else(|| env.home.as_ref().map(|home| home.join(".config")))
                .map(|dir| dir.join(APP_NAME_XDG)),
        }
    }
}

/// Snapshot of the directories the configuration location depends on
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostEnv {
    pub home: Option<PathBuf>,
    /// Per-user config base: `%APPDATA%`, `~/Library/Application Support`
    /// or `$XDG_CONFIG_HOME`
    pub config_base: Option<PathBuf>,
}

impl HostEnv {
    /// Reads the values from the running process
    pub fn from_host() -> Self {
        Self {
            home: dirs::home_dir(),
            config_base: dirs::config_dir(),
        }
    }
}
