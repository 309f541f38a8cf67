use async_trait::async_trait;
use tracing::{debug, warn};
use crate::error::Error;
use crate::models::platform::Platform;
use crate::models::render::{RenderRequest, RenderedPage};

/// Anything that can load a URL in a JavaScript-capable browser context.
///
/// A single renderer is shared by every detector call within a pass.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn render(&self, request: &RenderRequest) -> Result<RenderedPage, Error>;
}

/// A live-status heuristic for one platform.
///
/// Implementations put all "real data or challenge page?" decisions inside
/// `probe`. Callers only ever see the boolean from `is_live`.
#[async_trait]
pub trait LiveDetector: Send + Sync {
    fn platform(&self) -> Platform;

    /// Versioned name of the technique, e.g. `kick-api-v1`.
    fn strategy_name(&self) -> &str;

    /// Fallible probe. `Ok(false)` for a page that loaded but shows no
    /// live signal; `Err` for anything that prevented a decision.
    async fn probe(&self, renderer: &dyn PageRenderer, identifier: &str) -> Result<bool, Error>;

    /// Fail-safe-offline wrapper around `probe`.
    async fn is_live(&self, renderer: &dyn PageRenderer, identifier: &str) -> bool {
        match self.probe(renderer, identifier).await {
            Ok(live) => {
                debug!("{} [{}] => {}", identifier, self.strategy_name(), live);
                live
            }
            Err(e) => {
                warn!(
                    "{} detection for '{}' failed via {}, assuming offline: {}",
                    self.platform(),
                    identifier,
                    self.strategy_name(),
                    e
                );
                false
            }
        }
    }
}
