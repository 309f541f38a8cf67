use async_trait::async_trait;
use crate::error::Error;

/// Delivers preformatted text to one fixed destination.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<(), Error>;
}
