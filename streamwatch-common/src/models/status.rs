// File: streamwatch-common/src/models/status.rs

use std::collections::BTreeMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::models::account::StatusKey;

/// Last observed live flag per account, as persisted between passes.
///
/// Backed by a `BTreeMap` so the serialized form is ordered by key and an
/// unchanged map always serializes to the same bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusMap(BTreeMap<String, bool>);

impl StatusMap {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Missing keys read as offline.
    pub fn was_live(&self, key: &StatusKey) -> bool {
        self.0.get(key.as_str()).copied().unwrap_or(false)
    }

    pub fn get(&self, key: &StatusKey) -> Option<bool> {
        self.0.get(key.as_str()).copied()
    }

    pub fn set(&mut self, key: &StatusKey, live: bool) {
        self.0.insert(key.as_str().to_string(), live);
    }

    pub fn insert_raw(&mut self, key: impl Into<String>, live: bool) {
        self.0.insert(key.into(), live);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &bool)> {
        self.0.iter()
    }
}

impl FromIterator<(String, bool)> for StatusMap {
    fn from_iter<I: IntoIterator<Item = (String, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// What the reconciler decided for one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// offline -> live; the only case that alerts.
    WentLive,
    StillLive,
    Offline,
}

impl Transition {
    pub fn between(was_live: bool, is_live: bool) -> Self {
        match (was_live, is_live) {
            (false, true) => Transition::WentLive,
            (true, true) => Transition::StillLive,
            (_, false) => Transition::Offline,
        }
    }

    /// Flag stored after this transition.
    pub fn stored_value(&self) -> bool {
        !matches!(self, Transition::Offline)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertOutcome {
    NotNeeded,
    Sent,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct AccountOutcome {
    pub key: StatusKey,
    pub was_live: bool,
    pub is_live: bool,
    pub transition: Transition,
    pub alert: AlertOutcome,
}

/// Summary of one reconciliation pass.
#[derive(Debug, Clone)]
pub struct PassReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<AccountOutcome>,
}

impl PassReport {
    pub fn live_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_live).count()
    }

    pub fn alerts_sent(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.alert == AlertOutcome::Sent)
            .count()
    }

    pub fn alerts_failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.alert, AlertOutcome::Failed(_)))
            .count()
    }

    pub fn outcome_for(&self, key: &StatusKey) -> Option<&AccountOutcome> {
        self.outcomes.iter().find(|o| &o.key == key)
    }
}
