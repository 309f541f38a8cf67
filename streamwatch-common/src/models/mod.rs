// File: streamwatch-common/src/models/mod.rs
pub mod platform;
pub mod account;
pub mod status;
pub mod render;

pub use platform::{KickStrategyKind, Platform};
pub use account::{Account, StatusKey};
pub use status::{AccountOutcome, AlertOutcome, PassReport, StatusMap, Transition};
pub use render::{RenderRequest, RenderedPage, DEFAULT_NAVIGATION_TIMEOUT};
