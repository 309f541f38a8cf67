use crate::error::Error;
use crate::models::status::StatusMap;

/// Durable home of the status map between passes.
pub trait StateStore: Send + Sync {
    /// Never fails: a missing or unreadable store yields an empty map.
    fn load(&self) -> StatusMap;

    /// Replaces the persisted contents with `statuses`.
    fn save(&self, statuses: &StatusMap) -> Result<(), Error>;
}
