// ========================================================
// File: streamwatch-core/src/detectors/kick.rs
// ========================================================
//! Kick sits behind a bot-detection layer whose behaviour changes over time,
//! so there are two independent techniques here. `KickDetector` runs the
//! configured primary and, if that reports offline, the other as a backup.

use std::time::Duration;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, info, warn};

use streamwatch_common::models::{KickStrategyKind, Platform, RenderRequest};
use streamwatch_common::traits::{LiveDetector, PageRenderer};

use crate::Error;

pub const DEFAULT_SETTLE: Duration = Duration::from_secs(5);

/// Badge shown over the avatar on a live channel's profile page.
pub const LIVE_BADGE_SELECTOR: &str =
    r#"[data-testid="live-badge"], [data-state="live"], .live-badge"#;

/// `"livestream":{"id":123` with quotes optionally backslash-escaped, as in
/// the JSON payloads embedded into the page's scripts.
static LIVESTREAM_OBJECT: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r#"\\*"livestream\\*"\s*:\s*\{\s*\\*"id\\*"\s*:\s*\\*"?\d+"#).ok()
});

pub fn channel_api_url(identifier: &str) -> String {
    format!("https://kick.com/api/v1/channels/{}", urlencoding::encode(identifier))
}

pub fn profile_page_url(identifier: &str) -> String {
    format!("https://kick.com/{}", urlencoding::encode(identifier))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVerdict {
    Live,
    Offline,
    /// Not JSON: almost always the anti-bot challenge page.
    Unparseable,
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Interprets the text the browser shows for the channel endpoint.
pub fn interpret_channel_json(body: &str) -> ApiVerdict {
    let data: Value = match serde_json::from_str(body.trim()) {
        Ok(v) => v,
        Err(_) => return ApiVerdict::Unparseable,
    };
    let Some(channel) = data.as_object() else {
        return ApiVerdict::Unparseable;
    };
    match channel.get("livestream") {
        Some(stream) if truthy(stream) => ApiVerdict::Live,
        _ => ApiVerdict::Offline,
    }
}

pub fn markup_has_livestream_object(html: &str) -> bool {
    LIVESTREAM_OBJECT.as_ref().is_some_and(|re| re.is_match(html))
}

/// Strategy A: the channel JSON endpoint, loaded through the browser so the
/// challenge can run before we read the body.
pub struct KickApiStrategy {
    settle: Duration,
    navigation_timeout: Duration,
}

impl KickApiStrategy {
    pub fn new(settle: Duration, navigation_timeout: Duration) -> Self {
        Self { settle, navigation_timeout }
    }
}

#[async_trait]
impl LiveDetector for KickApiStrategy {
    fn platform(&self) -> Platform {
        Platform::Kick
    }

    fn strategy_name(&self) -> &str {
        "kick-api-v1"
    }

    async fn probe(&self, renderer: &dyn PageRenderer, identifier: &str) -> Result<bool, Error> {
        let request = RenderRequest::new(channel_api_url(identifier))
            .settle(self.settle)
            .timeout(self.navigation_timeout + self.settle)
            .with_body_text();
        let page = renderer.render(&request).await?;

        match interpret_channel_json(&page.body_text) {
            ApiVerdict::Live => Ok(true),
            ApiVerdict::Offline => Ok(false),
            ApiVerdict::Unparseable => {
                warn!(
                    "Kick API for '{}' returned non-JSON ({} chars), likely a challenge page; treating as offline",
                    identifier,
                    page.body_text.len()
                );
                Ok(false)
            }
        }
    }
}

/// Strategy B: the public profile page, searched for an embedded livestream
/// object and for the live badge.
pub struct KickProfileStrategy {
    settle: Duration,
    navigation_timeout: Duration,
    badge_selector: String,
}

impl KickProfileStrategy {
    pub fn new(settle: Duration, navigation_timeout: Duration) -> Self {
        Self {
            settle,
            navigation_timeout,
            badge_selector: LIVE_BADGE_SELECTOR.to_string(),
        }
    }

    pub fn with_badge_selector(mut self, selector: impl Into<String>) -> Self {
        self.badge_selector = selector.into();
        self
    }
}

#[async_trait]
impl LiveDetector for KickProfileStrategy {
    fn platform(&self) -> Platform {
        Platform::Kick
    }

    fn strategy_name(&self) -> &str {
        "kick-profile-v1"
    }

    async fn probe(&self, renderer: &dyn PageRenderer, identifier: &str) -> Result<bool, Error> {
        let request = RenderRequest::new(profile_page_url(identifier))
            .settle(self.settle)
            .timeout(self.navigation_timeout + self.settle)
            .probe(self.badge_selector.clone());
        let page = renderer.render(&request).await?;

        let has_object = markup_has_livestream_object(&page.html);
        debug!(
            "Kick profile '{}': livestream object={}, live badge={}",
            identifier, has_object, page.probe_matched
        );
        Ok(has_object || page.probe_matched)
    }
}

/// Builds the detector for one Kick technique.
pub fn strategy_for(kind: KickStrategyKind, settle: Duration, navigation_timeout: Duration) -> Box<dyn LiveDetector> {
    match kind {
        KickStrategyKind::Api => Box::new(KickApiStrategy::new(settle, navigation_timeout)),
        KickStrategyKind::Profile => Box::new(KickProfileStrategy::new(settle, navigation_timeout)),
    }
}

/// Primary strategy with an optional backup consulted only on "offline".
pub struct KickDetector {
    primary: Box<dyn LiveDetector>,
    fallback: Option<Box<dyn LiveDetector>>,
    name: String,
}

impl KickDetector {
    pub fn new(primary: Box<dyn LiveDetector>, fallback: Option<Box<dyn LiveDetector>>) -> Self {
        let name = match &fallback {
            Some(f) => format!("{}+{}", primary.strategy_name(), f.strategy_name()),
            None => primary.strategy_name().to_string(),
        };
        Self { primary, fallback, name }
    }

    pub fn from_kind(
        primary: KickStrategyKind,
        use_fallback: bool,
        settle: Duration,
        navigation_timeout: Duration,
    ) -> Self {
        let fallback = use_fallback.then(|| strategy_for(primary.other(), settle, navigation_timeout));
        Self::new(strategy_for(primary, settle, navigation_timeout), fallback)
    }
}

#[async_trait]
impl LiveDetector for KickDetector {
    fn platform(&self) -> Platform {
        Platform::Kick
    }

    fn strategy_name(&self) -> &str {
        &self.name
    }

    async fn probe(&self, renderer: &dyn PageRenderer, identifier: &str) -> Result<bool, Error> {
        if self.primary.is_live(renderer, identifier).await {
            return Ok(true);
        }
        match &self.fallback {
            Some(fallback) => {
                let live = fallback.is_live(renderer, identifier).await;
                if live {
                    info!(
                        "Kick '{}' live according to fallback {} only",
                        identifier,
                        fallback.strategy_name()
                    );
                }
                Ok(live)
            }
            None => Ok(false),
        }
    }
}
