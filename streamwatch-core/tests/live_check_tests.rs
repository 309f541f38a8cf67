// File: streamwatch-core/tests/live_check_tests.rs

use std::sync::atomic::Ordering;
use std::sync::Arc;

use streamwatch_common::models::{Account, Platform, StatusKey};
use streamwatch_common::traits::StateStore;
use streamwatch_core::config::{Config, Secrets};
use streamwatch_core::detectors::twitch;
use streamwatch_core::http::DefaultHttpClient;
use streamwatch_core::tasks::live_check;
use streamwatch_core::test_utils::helpers::{MemoryStateStore, RecordingNotifier, ScriptedRenderer, ScriptedSession};
use streamwatch_core::Error;

const LIVE_MARKUP: &str = r#"<script>{"isLiveBroadcast":true}</script>"#;

fn test_config() -> Result<Config, Error> {
    let secrets = Secrets::from_lookup(|name| Some(format!("{}-value", name)))?;
    let mut config = Config::new(secrets);
    config.accounts = vec![Account::new(Platform::Twitch, "abc")];
    Ok(config)
}

fn live_session() -> ScriptedSession {
    let renderer = ScriptedRenderer::new();
    renderer.serve_html(&twitch::channel_page_url("abc"), LIVE_MARKUP);
    ScriptedSession::new(renderer)
}

#[tokio::test]
async fn test_session_closed_once_after_successful_pass() -> Result<(), Error> {
    let config = test_config()?;
    let notifier = Arc::new(RecordingNotifier::new());
    let reconciler = live_check::build_reconciler_with(&config, notifier.clone());
    let store = MemoryStateStore::new();
    let session = live_session();
    let closes = session.close_counter();

    let report = live_check::run_in_session(session, &reconciler, &store).await?;

    assert_eq!(closes.load(Ordering::SeqCst), 1);
    assert_eq!(report.alerts_sent(), 1);
    assert_eq!(store.load().get(&StatusKey::new(Platform::Twitch, "abc")), Some(true));
    Ok(())
}

#[tokio::test]
async fn test_session_closed_once_when_state_save_fails() -> Result<(), Error> {
    let config = test_config()?;
    let notifier = Arc::new(RecordingNotifier::new());
    let reconciler = live_check::build_reconciler_with(&config, notifier.clone());
    let store = MemoryStateStore::failing();
    let session = live_session();
    let closes = session.close_counter();

    let result = live_check::run_in_session(session, &reconciler, &store).await;

    assert!(matches!(result, Err(Error::State(_))), "save error is returned: {:?}", result);
    assert_eq!(closes.load(Ordering::SeqCst), 1);
    assert_eq!(store.save_count(), 0);
    // The pass itself ran before the save was attempted.
    assert_eq!(notifier.sent().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_build_reconciler_uses_configured_accounts() -> Result<(), Error> {
    let config = test_config()?;
    let reconciler = live_check::build_reconciler(&config)?;

    assert_eq!(reconciler.accounts(), config.accounts.as_slice());
    Ok(())
}

#[test]
fn test_http_client_builds_with_timeout() {
    assert!(DefaultHttpClient::new().is_ok());
    assert!(DefaultHttpClient::with_timeout(std::time::Duration::from_secs(1)).is_ok());
}
