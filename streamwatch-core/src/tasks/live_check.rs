use std::sync::Arc;
use tracing::{error, info};

use streamwatch_common::models::PassReport;
use streamwatch_common::traits::{Notifier, StateStore};

use crate::browser::{BrowserSession, ChromiumSession};
use crate::config::Config;
use crate::detectors::DetectorRegistry;
use crate::http::DefaultHttpClient;
use crate::notify::TelegramNotifier;
use crate::reconciler::Reconciler;
use crate::state::JsonStateStore;
use crate::Error;

/// Builds the Telegram-backed reconciler described by `config`.
pub fn build_reconciler(config: &Config) -> Result<Reconciler, Error> {
    let notifier: Arc<dyn Notifier> = Arc::new(TelegramNotifier::new(
        Arc::new(DefaultHttpClient::new()?),
        config.telegram.clone(),
    ));
    Ok(build_reconciler_with(config, notifier))
}

pub fn build_reconciler_with(config: &Config, notifier: Arc<dyn Notifier>) -> Reconciler {
    let detectors = DetectorRegistry::from_settings(&config.detection);
    for (platform, strategy) in detectors.strategies() {
        info!("{} detection strategy: {}", platform, strategy);
    }
    Reconciler::new(config.accounts.clone(), detectors, notifier)
}

/// Runs exactly one check pass: launch the browser, reconcile every account,
/// persist state, close the browser.
///
/// A browser that cannot be launched aborts before the state file is touched.
/// This is the one non-configuration failure that halts the run: no account
/// was observed, so writing state would only erase the last known flags.
pub async fn run_once(config: &Config, reconciler: &Reconciler) -> Result<PassReport, Error> {
    info!("--- Starting Check ({} accounts) ---", reconciler.accounts().len());

    // 1) Open the shared browser session
    let session = ChromiumSession::launch(&config.browser).await?;

    // 2) Load state, check everyone, save state, close the browser
    let store = JsonStateStore::new(&config.state_path);
    run_in_session(session, reconciler, &store).await
}

/// Runs one pass on an already open session and closes it afterwards,
/// whether or not the pass succeeded.
pub async fn run_in_session<S: BrowserSession>(
    session: S,
    reconciler: &Reconciler,
    store: &dyn StateStore,
) -> Result<PassReport, Error> {
    let result = reconciler.run_with(&session, store).await;

    // Always release the browser
    session.close().await;

    match &result {
        Ok(report) => info!(
            "--- Check Complete: {} live, {} alerts sent, {} alerts failed ---",
            report.live_count(),
            report.alerts_sent(),
            report.alerts_failed()
        ),
        Err(e) => error!("Check pass could not persist state: {}", e),
    }
    result
}
