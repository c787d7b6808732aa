//! Persisted configuration: the claim root directory and user preferences

use crate::error::{ClaimFilerError, Result};
use crate::pickers::DirectoryPicker;
use crate::platform::{HostEnv, Platform};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File holding the claim root path, one line of plain text
pub const ROOT_FILE_NAME: &str = "rootdir.txt";

/// JSON user preferences, stored next to the root file
pub const PREFERENCES_FILE_NAME: &str = "preferences.json";

/// The configured directory under which claim directories are created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootConfig {
    pub root_path: PathBuf,
}

impl RootConfig {
    pub fn new(root_path: impl Into<PathBuf>) -> Self {
        Self {
            root_path: root_path.into(),
        }
    }

    /// Checks that the root still exists as a directory.
    ///
    /// Called on every use; a root that was valid at startup may have been
    /// removed or unmounted since.
    pub fn validate(&self) -> Result<&Path> {
        if self.root_path.is_dir() {
            Ok(&self.root_path)
        } else {
            Err(ClaimFilerError::RootMissing(self.root_path.clone()))
        }
    }
}

/// Reads and writes the root path file
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the per-user location for `platform`
    pub fn for_host(platform: Platform, env: &HostEnv) -> Result<Self> {
        let dir = platform.config_dir(env).ok_or_else(|| {
            ClaimFilerError::Config("Could not determine config directory".to_string())
        })?;
        Ok(Self::new(dir.join(ROOT_FILE_NAME)))
    }

    /// Location of the root path file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding every configuration file of this store
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    /// Reads the configured root.
    ///
    /// Missing file, missing directory, an unreadable file or a blank first
    /// line all mean `NotConfigured`.
    pub fn load(&self) -> Result<RootConfig> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "root config not readable");
                return Err(ClaimFilerError::NotConfigured);
            }
        };

        let first_line = contents.lines().next().unwrap_or("").trim_end_matches('\r');
        if first_line.trim().is_empty() {
            return Err(ClaimFilerError::NotConfigured);
        }

        Ok(RootConfig::new(first_line))
    }

    /// Persists `root` as the sole content of the root file.
    ///
    /// Paths that would not read back unchanged (not valid UTF-8, or holding
    /// a line break) are rejected before anything is written.
    pub fn save(&self, root: &Path) -> Result<()> {
        let text = root
            .to_str()
            .filter(|text| !text.contains(['\n', '\r']))
            .ok_or_else(|| {
                ClaimFilerError::Config(format!(
                    "claim root {} cannot be stored: path must be UTF-8 on a single line",
                    root.display()
                ))
            })?;

        let dir = self.dir();
        fs::create_dir_all(dir)
            .map_err(|e| ClaimFilerError::io("create config directory", dir, e))?;

        fs::write(&self.path, text)
            .map_err(|e| ClaimFilerError::io("write config file", &self.path, e))?;

        info!(root = %root.display(), "claim root saved");
        Ok(())
    }

    /// Loads the root, asking `picker` for one on first run.
    ///
    /// A cancelled pick leaves the store unconfigured and reports
    /// `NotConfigured`; there is no default root.
    pub fn bootstrap(&self, picker: &mut dyn DirectoryPicker) -> Result<RootConfig> {
        match self.load() {
            Err(ClaimFilerError::NotConfigured) => {
                info!("no claim root configured, asking the user");
                self.choose(picker)?
                    .ok_or(ClaimFilerError::NotConfigured)
            }
            other => other,
        }
    }

    /// Replaces the configured root with one picked by the user.
    ///
    /// Returns the previous root when the user cancels, `NotConfigured` if
    /// there was none.
    pub fn reassign(&self, picker: &mut dyn DirectoryPicker) -> Result<RootConfig> {
        match self.choose(picker)? {
            Some(root) => Ok(root),
            None => self.load(),
        }
    }

    /// Validates and saves an explicit root directory.
    ///
    /// Relative paths are resolved against the current directory so the
    /// saved root means the same thing from any later working directory.
    pub fn set_root(&self, root: &Path) -> Result<RootConfig> {
        let absolute = std::path::absolute(root)
            .map_err(|e| ClaimFilerError::io("resolve claim root", root, e))?;
        let root = RootConfig::new(absolute);
        root.validate()?;
        self.save(&root.root_path)?;
        Ok(root)
    }

    fn choose(&self, picker: &mut dyn DirectoryPicker) -> Result<Option<RootConfig>> {
        match picker.pick_directory("Directory to create claim folders in") {
            Some(dir) => self.set_root(&dir).map(Some),
            None => Ok(None),
        }
    }
}

/// Preferences that are not part of the claim workflow itself
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UserPreferences {
    /// Whether the welcome dialog has been shown
    #[serde(default)]
    pub welcome_shown: bool,
    /// Replaces the built-in picture extensions when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_extensions: Option<Vec<String>>,
}

impl UserPreferences {
    pub fn path_in(config_dir: &Path) -> PathBuf {
        config_dir.join(PREFERENCES_FILE_NAME)
    }

    /// Load preferences, or defaults if the file doesn't exist
    pub fn load(config_dir: &Path) -> Result<Self> {
        let path = Self::path_in(config_dir);

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(ClaimFilerError::io("read preferences", path, e)),
        };

        serde_json::from_str(&contents).map_err(|e| {
            ClaimFilerError::Config(format!(
                "Failed to parse preferences file {}: {}",
                path.display(),
                e
            ))
        })
    }

    pub fn save(&self, config_dir: &Path) -> Result<()> {
        fs::create_dir_all(config_dir)
            .map_err(|e| ClaimFilerError::io("create config directory", config_dir, e))?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            ClaimFilerError::Config(format!("Failed to serialize preferences: {}", e))
        })?;

        let path = Self::path_in(config_dir);
        fs::write(&path, contents).map_err(|e| ClaimFilerError::io("write preferences", path, e))
    }
}
