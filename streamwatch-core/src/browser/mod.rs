// File: streamwatch-core/src/browser/mod.rs

use std::path::PathBuf;
use std::time::Duration;
use async_trait::async_trait;

use streamwatch_common::traits::PageRenderer;

pub mod chromium;

pub use chromium::ChromiumSession;

/// A current desktop Chrome identity. Both Twitch and Kick serve degraded or
/// challenge pages to the default headless user-agent.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct BrowserSettings {
    pub headless: bool,
    /// Chromium's sandbox usually has to be disabled inside containers/CI.
    pub sandbox: bool,
    pub executable: Option<PathBuf>,
    pub user_agent: String,
    /// Budget for launching the browser and opening the first page.
    pub launch_timeout: Duration,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            sandbox: true,
            executable: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            launch_timeout: Duration::from_secs(30),
        }
    }
}

/// A renderer backed by a running browser that must be shut down explicitly.
#[async_trait]
pub trait BrowserSession: PageRenderer {
    /// Releases the tab and the browser process. Errors are logged only.
    async fn close(self);
}
