//! User configuration for tagtunes
//!
//! This module handles user-configurable settings stored in settings.json.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

use crate::utils::auth::generate_random_string;

const JWT_SECRET_LEN: usize = 64;

/// User configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserConfig {
    /// Secret used to sign session tokens, generated on first run
    #[serde(default)]
    pub jwt_secret: String,

    /// Lifetime of session tokens in days
    #[serde(default = "default_token_max_age_days")]
    pub token_max_age_days: i64,

    /// Keep the library in memory instead of SQLite
    #[serde(default)]
    pub use_mock_data: bool,

    /// SQLite url; defaults to the database in the config directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,

    /// Seed the demo library when running in memory
    #[serde(default = "default_true")]
    pub seed_demo_data: bool,

    /// Page size used when a listing does not ask for one
    #[serde(default = "default_page_size")]
    pub default_page_size: i64,

    /// Upper bound for requested page sizes
    #[serde(default = "default_max_page_size")]
    pub max_page_size: i64,

    /// Port taken from the environment; never persisted
    #[serde(skip)]
    pub port: Option<u16>,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_max_age_days: default_token_max_age_days(),
            use_mock_data: false,
            database_url: None,
            seed_demo_data: true,
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            port: None,
        }
    }
}

impl UserConfig {
    /// Load configuration from `settings_path`, writing defaults when the file
    /// is missing and generating the token secret when it is empty
    pub fn load(settings_path: &Path) -> Result<Self> {
        let exists = settings_path.exists();
        let mut config = if exists {
            let content =
                std::fs::read_to_string(settings_path).context("Failed to read settings file")?;
            serde_json::from_str::<UserConfig>(&content).context("Failed to parse settings file")?
        } else {
            info!("Creating settings file at {:?}", settings_path);
            Self::default()
        };

        let mut dirty = !exists;
        if config.jwt_secret.is_empty() {
            config.jwt_secret = generate_random_string(JWT_SECRET_LEN);
            dirty = true;
        }
        if dirty {
            config.save(settings_path)?;
        }

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, settings_path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(settings_path, content).context("Failed to write settings file")?;

        Ok(())
    }

    /// Apply `USE_MOCK_DATA`, `DATABASE_URL`, `JWT_SECRET` and `PORT` from the
    /// process environment
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("USE_MOCK_DATA") {
            self.use_mock_data = val.trim().eq_ignore_ascii_case("true");
        }

        if let Some(url) = lookup("DATABASE_URL").filter(|u| !u.trim().is_empty()) {
            self.database_url = Some(url.trim().to_string());
        }

        if let Some(secret) = lookup("JWT_SECRET").filter(|s| !s.is_empty()) {
            self.jwt_secret = secret;
        }

        if let Some(port) = lookup("PORT") {
            match port.trim().parse::<u16>() {
                Ok(port) => self.port = Some(port),
                Err(_) => warn!("Ignoring invalid PORT value '{}'", port),
            }
        }
    }

    /// Token lifetime in seconds
    pub fn token_max_age_secs(&self) -> i64 {
        self.token_max_age_days.max(1) * 24 * 60 * 60
    }
}

// Default value functions for serde

fn default_true() -> bool {
    true
}

fn default_token_max_age_days() -> i64 {
    30
}

fn default_page_size() -> i64 {
    50
}

fn default_max_page_size() -> i64 {
    500
}
