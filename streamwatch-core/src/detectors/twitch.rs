// File: streamwatch-core/src/detectors/twitch.rs

use std::time::Duration;
use async_trait::async_trait;
use tracing::debug;

use streamwatch_common::models::{Platform, RenderRequest};
use streamwatch_common::traits::{LiveDetector, PageRenderer};

use crate::Error;

/// Twitch only embeds this in the client-rendered channel page while a
/// broadcast is running; the raw HTTP response never contains it.
const LIVE_BROADCAST_MARKERS: [&str; 2] = [
    r#""isLiveBroadcast":true"#,
    r#""isLiveBroadcast": true"#,
];

pub fn channel_page_url(identifier: &str) -> String {
    format!("https://www.twitch.tv/{}", urlencoding::encode(identifier))
}

pub fn markup_shows_live(html: &str) -> bool {
    LIVE_BROADCAST_MARKERS.iter().any(|m| html.contains(m))
}

/// Renders the channel page and looks for the live-broadcast marker.
pub struct TwitchMarkupDetector {
    navigation_timeout: Duration,
}

impl TwitchMarkupDetector {
    pub fn new(navigation_timeout: Duration) -> Self {
        Self { navigation_timeout }
    }
}

#[async_trait]
impl LiveDetector for TwitchMarkupDetector {
    fn platform(&self) -> Platform {
        Platform::Twitch
    }

    fn strategy_name(&self) -> &str {
        "twitch-markup-v1"
    }

    async fn probe(&self, renderer: &dyn PageRenderer, identifier: &str) -> Result<bool, Error> {
        let request = RenderRequest::new(channel_page_url(identifier))
            .timeout(self.navigation_timeout);
        let page = renderer.render(&request).await?;
        if page.html.is_empty() {
            return Err(Error::Detection(format!("empty markup for {}", request.url)));
        }
        let live = markup_shows_live(&page.html);
        debug!("Twitch '{}': {} bytes of markup, marker present={}", identifier, page.html.len(), live);
        Ok(live)
    }
}
