// ========================================================
// File: streamwatch-core/src/browser/chromium.rs
// ========================================================
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures_util::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use streamwatch_common::models::{RenderRequest, RenderedPage};
use streamwatch_common::traits::PageRenderer;

use crate::Error;
use super::{BrowserSession, BrowserSettings};

const BODY_TEXT_SCRIPT: &str = "document.body ? document.body.innerText : ''";

/// Script answering whether any element matching `selector` is rendered with
/// a non-zero box and not hidden by CSS.
pub fn visibility_script(selector: &str) -> String {
    // JSON string literals are valid JavaScript string literals.
    let quoted = serde_json::to_string(selector).unwrap_or_else(|_| "\"\"".to_string());
    format!(
        "(() => {{ \
            try {{ \
                return Array.from(document.querySelectorAll({})).some(el => {{ \
                    const r = el.getBoundingClientRect(); \
                    const s = window.getComputedStyle(el); \
                    return r.width > 0 && r.height > 0 \
                        && s.visibility !== 'hidden' && s.display !== 'none' && s.opacity !== '0'; \
                }}); \
            }} catch (e) {{ return false; }} \
        }})()",
        quoted
    )
}

/// One headless Chromium process plus the single tab every detector reuses.
///
/// Must be shut down with [`BrowserSession::close`]; the check task calls it
/// after the pass whatever the pass returned.
pub struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
}

impl ChromiumSession {
    pub async fn launch(settings: &BrowserSettings) -> Result<Self, Error> {
        info!(
            "Launching Chromium (headless={}, sandbox={})",
            settings.headless, settings.sandbox
        );

        let mut builder = BrowserConfig::builder()
            .arg(format!("--user-agent={}", settings.user_agent))
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--lang=en-US")
            .request_timeout(settings.launch_timeout);
        if !settings.headless {
            builder = builder.with_head();
        }
        if !settings.sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(path) = &settings.executable {
            builder = builder.chrome_executable(path);
        }
        let config = builder
            .build()
            .map_err(|e| Error::Browser(format!("invalid browser config: {}", e)))?;

        let (mut browser, mut handler) = timeout(settings.launch_timeout, Browser::launch(config))
            .await?
            .map_err(|e| Error::Browser(format!("failed to launch Chromium: {}", e)))?;

        // The CDP handler has to be polled for the browser to make progress.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Chromium handler event error: {}", e);
                }
            }
        });

        let page = match timeout(settings.launch_timeout, browser.new_page("about:blank")).await {
            Ok(Ok(page)) => page,
            Ok(Err(e)) => {
                let _ = browser.close().await;
                handler_task.abort();
                return Err(Error::Browser(format!("failed to open page: {}", e)));
            }
            Err(elapsed) => {
                let _ = browser.close().await;
                handler_task.abort();
                return Err(Error::Timeout(elapsed));
            }
        };

        Ok(Self { browser, page, handler_task })
    }

    /// A probe that cannot be evaluated counts as "not visible".
    async fn selector_visible(&self, selector: &str) -> bool {
        let script = visibility_script(selector);
        match self.page.evaluate(script.as_str()).await {
            Ok(result) => result.into_value::<bool>().unwrap_or(false),
            Err(e) => {
                debug!("Visibility check for '{}' failed: {}", selector, e);
                false
            }
        }
    }

    async fn render_inner(&self, request: &RenderRequest) -> Result<RenderedPage, Error> {
        self.page
            .goto(request.url.as_str())
            .await
            .map_err(|e| Error::Navigation(format!("{}: {}", request.url, e)))?;

        if !request.settle.is_zero() {
            sleep(request.settle).await;
        }

        let html = self.page
            .content()
            .await
            .map_err(|e| Error::Browser(format!("reading markup of {}: {}", request.url, e)))?;

        let body_text = if request.capture_body_text {
            self.page
                .evaluate(BODY_TEXT_SCRIPT)
                .await
                .map_err(|e| Error::Browser(format!("reading body text of {}: {}", request.url, e)))?
                .into_value::<String>()?
        } else {
            String::new()
        };

        let probe_matched = match &request.probe_selector {
            Some(selector) => self.selector_visible(selector).await,
            None => false,
        };

        Ok(RenderedPage { html, body_text, probe_matched })
    }
}

#[async_trait]
impl PageRenderer for ChromiumSession {
    async fn render(&self, request: &RenderRequest) -> Result<RenderedPage, Error> {
        debug!("Rendering {} (settle={:?})", request.url, request.settle);
        timeout(request.timeout, self.render_inner(request)).await?
    }
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn close(mut self) {
        if let Err(e) = self.page.close().await {
            debug!("Closing page failed: {}", e);
        }
        if let Err(e) = self.browser.close().await {
            warn!("Closing Chromium failed: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            debug!("Waiting for Chromium exit failed: {}", e);
        }
        self.handler_task.abort();
        info!("Chromium session closed");
    }
}
