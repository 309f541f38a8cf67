// File: streamwatch-common/src/traits/mod.rs
pub mod detector_traits;
pub mod notifier_traits;
pub mod state_traits;

pub use detector_traits::{LiveDetector, PageRenderer};
pub use notifier_traits::Notifier;
pub use state_traits::StateStore;
