// src/lib.rs

pub mod browser;
pub mod config;
pub mod detectors;
pub mod http;
pub mod notify;
pub mod reconciler;
pub mod state;
pub mod tasks;
pub mod test_utils;

pub use streamwatch_common::Error;
pub use config::{Config, Secrets};
pub use http::{DefaultHttpClient, HttpClient};
pub use reconciler::Reconciler;
pub use state::JsonStateStore;
