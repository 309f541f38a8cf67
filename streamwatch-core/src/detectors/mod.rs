// File: src/detectors/mod.rs

use std::collections::HashMap;
use std::time::Duration;

use streamwatch_common::models::{KickStrategyKind, Platform, DEFAULT_NAVIGATION_TIMEOUT};
use streamwatch_common::traits::LiveDetector;

pub mod kick;
pub mod twitch;

pub use kick::{KickApiStrategy, KickDetector, KickProfileStrategy};
pub use twitch::TwitchMarkupDetector;

#[derive(Debug, Clone)]
pub struct DetectionSettings {
    pub navigation_timeout: Duration,
    pub kick_settle: Duration,
    pub kick_primary: KickStrategyKind,
    pub kick_fallback: bool,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            navigation_timeout: DEFAULT_NAVIGATION_TIMEOUT,
            kick_settle: kick::DEFAULT_SETTLE,
            kick_primary: KickStrategyKind::Api,
            kick_fallback: true,
        }
    }
}

/// One detector per platform. Registering a second detector for a platform
/// replaces the first.
#[derive(Default)]
pub struct DetectorRegistry {
    detectors: HashMap<Platform, Box<dyn LiveDetector>>,
}

impl DetectorRegistry {
    pub fn new() -> Self {
        Self { detectors: HashMap::new() }
    }

    /// Twitch markup detector and the configured Kick strategy chain.
    pub fn from_settings(settings: &DetectionSettings) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(TwitchMarkupDetector::new(settings.navigation_timeout)));
        registry.register(Box::new(KickDetector::from_kind(
            settings.kick_primary,
            settings.kick_fallback,
            settings.kick_settle,
            settings.navigation_timeout,
        )));
        registry
    }

    pub fn register(&mut self, detector: Box<dyn LiveDetector>) {
        self.detectors.insert(detector.platform(), detector);
    }

    pub fn get(&self, platform: Platform) -> Option<&dyn LiveDetector> {
        self.detectors.get(&platform).map(|d| &**d)
    }

    pub fn strategies(&self) -> Vec<(Platform, String)> {
        let mut out: Vec<_> = self.detectors
            .iter()
            .map(|(p, d)| (*p, d.strategy_name().to_string()))
            .collect();
        out.sort();
        out
    }
}
