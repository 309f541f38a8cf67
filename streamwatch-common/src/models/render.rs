// File: streamwatch-common/src/models/render.rs

use std::time::Duration;

pub const DEFAULT_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);

/// One navigation through the scripted browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub url: String,
    /// Extra wait after the load event, for client-side rendering or an
    /// anti-bot challenge to finish.
    pub settle: Duration,
    /// Upper bound for navigation plus settle plus extraction.
    pub timeout: Duration,
    /// Also capture `document.body.innerText`.
    pub capture_body_text: bool,
    /// CSS selector whose presence is reported in `RenderedPage::probe_matched`.
    pub probe_selector: Option<String>,
}

impl RenderRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            settle: Duration::ZERO,
            timeout: DEFAULT_NAVIGATION_TIMEOUT,
            capture_body_text: false,
            probe_selector: None,
        }
    }

    pub fn settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_body_text(mut self) -> Self {
        self.capture_body_text = true;
        self
    }

    pub fn probe(mut self, selector: impl Into<String>) -> Self {
        self.probe_selector = Some(selector.into());
        self
    }
}

/// What the browser produced for a `RenderRequest`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedPage {
    pub html: String,
    pub body_text: String,
    pub probe_matched: bool,
}

impl RenderedPage {
    pub fn from_html(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            ..Default::default()
        }
    }

    pub fn from_body_text(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            html: format!("<html><head></head><body><pre>{}</pre></body></html>", text),
            body_text: text,
            probe_matched: false,
        }
    }
}
