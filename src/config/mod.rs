//! Configuration module for tagtunes
//!
//! This module contains the settings file and path management.

mod paths;
mod user_config;

pub use paths::Paths;
pub use user_config::UserConfig;
