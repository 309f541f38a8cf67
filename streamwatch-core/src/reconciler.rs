// File: streamwatch-core/src/reconciler.rs

use std::sync::Arc;
use chrono::Utc;
use tracing::{info, warn};

use streamwatch_common::models::{
    Account, AccountOutcome, AlertOutcome, PassReport, StatusMap, Transition,
};
use streamwatch_common::traits::{Notifier, PageRenderer, StateStore};

use crate::detectors::DetectorRegistry;
use crate::notify::format_live_alert;
use crate::Error;

/// Walks the account list once, diffing detections against stored state and
/// alerting on offline -> live edges only.
pub struct Reconciler {
    accounts: Vec<Account>,
    detectors: DetectorRegistry,
    notifier: Arc<dyn Notifier>,
}

impl Reconciler {
    pub fn new(accounts: Vec<Account>, detectors: DetectorRegistry, notifier: Arc<dyn Notifier>) -> Self {
        Self { accounts, detectors, notifier }
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// Load state, run one pass, save state.
    pub async fn run_with(
        &self,
        renderer: &dyn PageRenderer,
        store: &dyn StateStore,
    ) -> Result<PassReport, Error> {
        let mut statuses = store.load();
        let report = self.run_pass(renderer, &mut statuses).await;
        store.save(&statuses)?;
        Ok(report)
    }

    /// One pass over every account, in configured order. Never fails: every
    /// detection and notification problem is absorbed and logged.
    pub async fn run_pass(&self, renderer: &dyn PageRenderer, statuses: &mut StatusMap) -> PassReport {
        let started_at = Utc::now();
        let mut outcomes = Vec::with_capacity(self.accounts.len());

        for account in &self.accounts {
            let key = account.status_key();

            let is_live = match self.detectors.get(account.platform) {
                Some(detector) => detector.is_live(renderer, &account.identifier).await,
                None => {
                    warn!("No detector registered for {}, treating '{}' as offline", account.platform, account.identifier);
                    false
                }
            };

            let was_live = statuses.was_live(&key);
            let transition = Transition::between(was_live, is_live);

            let alert = if transition == Transition::WentLive {
                match self.notifier.send(&format_live_alert(account)).await {
                    Ok(()) => AlertOutcome::Sent,
                    Err(e) => {
                        warn!("Error sending alert for {}: {}", key, e);
                        AlertOutcome::Failed(e.to_string())
                    }
                }
            } else {
                AlertOutcome::NotNeeded
            };

            // Written for every account, including the still-live no-op.
            statuses.set(&key, transition.stored_value());

            info!("Checked {} ({}): {}", account.identifier, account.platform, is_live);
            outcomes.push(AccountOutcome { key, was_live, is_live, transition, alert });
        }

        PassReport {
            started_at,
            finished_at: Utc::now(),
            outcomes,
        }
    }
}
