// File: streamwatch-common/src/models/account.rs

use std::fmt;
use serde::{Deserialize, Serialize};
use crate::models::platform::Platform;

/// A watched channel. Defined once in configuration and never mutated.
#[derive(Debug, Serialize, Deserialize, Clone, Eq, PartialEq)]
pub struct Account {
    pub platform: Platform,
    pub identifier: String,
    pub display_url: String,
}

impl Account {
    /// Builds an account whose display URL is the platform's channel page.
    pub fn new(platform: Platform, identifier: impl Into<String>) -> Self {
        let identifier = identifier.into();
        let display_url = platform.channel_url(&identifier);
        Self { platform, identifier, display_url }
    }

    pub fn with_display_url(
        platform: Platform,
        identifier: impl Into<String>,
        display_url: impl Into<String>,
    ) -> Self {
        Self {
            platform,
            identifier: identifier.into(),
            display_url: display_url.into(),
        }
    }

    pub fn status_key(&self) -> StatusKey {
        StatusKey::new(self.platform, &self.identifier)
    }
}

/// Lookup key into the status map: `<Platform>_<identifier>`.
#[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct StatusKey(String);

impl StatusKey {
    pub fn new(platform: Platform, identifier: &str) -> Self {
        StatusKey(format!("{}_{}", platform, identifier))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StatusKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<StatusKey> for String {
    fn from(key: StatusKey) -> Self {
        key.0
    }
}
