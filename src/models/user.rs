//! User model

use serde::{Deserialize, Serialize};

/// Display name given to users that log in without one
pub const DEFAULT_DISPLAY_NAME: &str = "User";

/// A library owner, anchored on the id issued by the external music provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Database ID
    pub id: i64,
    /// External provider id (unique)
    pub provider_id: String,
    /// Email address, empty when the provider did not share one
    #[serde(default)]
    pub email: String,
    /// Display name
    #[serde(default)]
    pub display_name: String,
    /// Creation timestamp (unix seconds)
    pub created_at: i64,
}

impl User {
    /// Serialize the fields clients are allowed to see
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            email: self.email.clone(),
            display_name: self.display_name.clone(),
        }
    }
}

/// Profile supplied on first login
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub provider_id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

impl NewUser {
    pub fn new(provider_id: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            ..Default::default()
        }
    }

    /// Email to persist, empty when absent
    pub fn email_or_default(&self) -> String {
        self.email.clone().unwrap_or_default()
    }

    /// Display name to persist, falling back to [`DEFAULT_DISPLAY_NAME`]
    pub fn display_name_or_default(&self) -> String {
        match self.display_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => DEFAULT_DISPLAY_NAME.to_string(),
        }
    }
}

/// Public user info returned by the login endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: i64,
    pub email: String,
    pub display_name: String,
}
