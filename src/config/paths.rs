//! Path management for tagtunes
//!
//! This module resolves the config directory and the files kept in it.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Filesystem locations used by the server
#[derive(Debug, Clone)]
pub struct Paths {
    /// Config directory path
    config_dir: PathBuf,
}

impl Paths {
    /// Resolve the config directory and create it if missing.
    ///
    /// The parent is the explicit override, else the executable's directory,
    /// else the platform config directory.
    pub fn new(config_override: Option<PathBuf>) -> Result<Self> {
        let config_parent = if let Some(path) = config_override {
            path
        } else if let Some(dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            dir
        } else {
            directories::ProjectDirs::from("", "", "tagtunes")
                .map(|dirs| dirs.config_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."))
        };

        // hidden folder when living directly in a home directory
        let config_dir_name = if is_home_dir(&config_parent) {
            ".tagtunes"
        } else {
            "tagtunes"
        };
        let config_dir = config_parent.join(config_dir_name);

        std::fs::create_dir_all(&config_dir)
            .with_context(|| format!("Failed to create config directory {:?}", config_dir))?;

        Ok(Self { config_dir })
    }

    /// Get the config directory
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Get the settings file path
    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }

    /// Get the library database path
    pub fn database_path(&self) -> PathBuf {
        self.config_dir.join("tagtunes.db")
    }

    /// SQLite url of the library database
    pub fn database_url(&self) -> String {
        format!("sqlite://{}", self.database_path().display())
    }
}

/// Check if a path is in the user's home directory
fn is_home_dir(path: &Path) -> bool {
    directories::UserDirs::new()
        .map(|dirs| path == dirs.home_dir())
        .unwrap_or(false)
}
