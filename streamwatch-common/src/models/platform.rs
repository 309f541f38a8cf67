// File: streamwatch-common/src/models/platform.rs

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

/// Streaming platforms we know how to probe.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Platform {
    Twitch,
    Kick,
}

impl Platform {
    /// Public channel page for an account on this platform.
    pub fn channel_url(&self, identifier: &str) -> String {
        match self {
            Platform::Twitch => format!("https://twitch.tv/{}", identifier),
            Platform::Kick => format!("https://kick.com/{}", identifier),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Twitch => write!(f, "Twitch"),
            Platform::Kick => write!(f, "Kick"),
        }
    }
}

impl FromStr for Platform {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "twitch" => Ok(Platform::Twitch),
            "kick" => Ok(Platform::Kick),
            _ => Err(format!("Unknown platform: {}", s)),
        }
    }
}

/// Which Kick probing technique to run first.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum KickStrategyKind {
    /// Channel JSON endpoint rendered through the browser.
    Api,
    /// Public profile page markup scrape.
    Profile,
}

impl KickStrategyKind {
    pub fn other(&self) -> Self {
        match self {
            KickStrategyKind::Api => KickStrategyKind::Profile,
            KickStrategyKind::Profile => KickStrategyKind::Api,
        }
    }
}

impl fmt::Display for KickStrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KickStrategyKind::Api => write!(f, "api"),
            KickStrategyKind::Profile => write!(f, "profile"),
        }
    }
}

impl FromStr for KickStrategyKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "api" => Ok(KickStrategyKind::Api),
            "profile" => Ok(KickStrategyKind::Profile),
            _ => Err(format!("Unknown Kick strategy: {} (expected 'api' or 'profile')", s)),
        }
    }
}
