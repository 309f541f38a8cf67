// File: streamwatch-core/tests/config_tests.rs

use std::collections::{HashMap, HashSet};
use std::io::Write;
use tempfile::NamedTempFile;

use streamwatch_common::models::{KickStrategyKind, Platform};
use streamwatch_core::config::{self, Config, Secrets, CHAT_ID_VAR, TELEGRAM_TOKEN_VAR};
use streamwatch_core::Error;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name: &str| map.get(name).cloned()
}

#[test]
fn test_secrets_present() -> Result<(), Error> {
    let secrets = Secrets::from_lookup(lookup(&[(TELEGRAM_TOKEN_VAR, "123:ABC"), (CHAT_ID_VAR, " 42 ")]))?;
    assert_eq!(secrets.telegram_token, "123:ABC");
    assert_eq!(secrets.chat_id, "42");
    assert!(!format!("{:?}", secrets).contains("123:ABC"));
    Ok(())
}

#[test]
fn test_missing_or_empty_secrets_are_fatal() {
    let missing_token = Secrets::from_lookup(lookup(&[(CHAT_ID_VAR, "42")]));
    assert!(matches!(missing_token, Err(Error::MissingSecret(ref v)) if v == TELEGRAM_TOKEN_VAR));

    let empty_chat = Secrets::from_lookup(lookup(&[(TELEGRAM_TOKEN_VAR, "t"), (CHAT_ID_VAR, "  ")]));
    assert!(matches!(empty_chat, Err(Error::MissingSecret(ref v)) if v == CHAT_ID_VAR));
}

#[test]
fn test_default_config() -> Result<(), Error> {
    let secrets = Secrets::from_lookup(lookup(&[(TELEGRAM_TOKEN_VAR, "t"), (CHAT_ID_VAR, "c")]))?;
    let config = Config::new(secrets);

    assert_eq!(config.state_path.to_str(), Some("stream_state.json"));
    assert_eq!(config.telegram.send_message_url(), "https://api.telegram.org/bott/sendMessage");
    assert_eq!(config.detection.kick_primary, KickStrategyKind::Api);
    assert!(config.detection.kick_fallback);
    assert!(config.browser.headless);
    Ok(())
}

#[test]
fn test_default_accounts_are_unique_and_ordered() -> Result<(), Error> {
    let accounts = config::default_accounts();
    config::validate_accounts(&accounts)?;

    let keys: HashSet<_> = accounts.iter().map(|a| a.status_key()).collect();
    assert_eq!(keys.len(), accounts.len());
    assert_eq!(accounts.iter().filter(|a| a.platform == Platform::Kick).count(), 5);
    assert_eq!(accounts.iter().filter(|a| a.platform == Platform::Twitch).count(), 4);
    // Same identifier on two platforms is two accounts.
    assert_eq!(accounts[1].status_key().as_str(), "Kick_naimiforever");
    assert_eq!(accounts[5].status_key().as_str(), "Twitch_naimiforever");
    Ok(())
}

#[test]
fn test_parse_accounts() -> Result<(), Error> {
    let accounts = config::parse_accounts(
        r#"[
            {"platform": "twitch", "identifier": "shake_make"},
            {"platform": "Kick", "identifier": "x", "display_url": "https://kick.com/x?ref=alerts"}
        ]"#,
    )?;

    assert_eq!(accounts.len(), 2);
    assert_eq!(accounts[0].platform, Platform::Twitch);
    assert_eq!(accounts[0].display_url, "https://twitch.tv/shake_make");
    assert_eq!(accounts[1].display_url, "https://kick.com/x?ref=alerts");
    Ok(())
}

#[test]
fn test_parse_accounts_rejects_bad_entries() {
    let cases = [
        r#"[{"platform": "youtube", "identifier": "a"}]"#,
        r#"[{"platform": "kick", "identifier": "  "}]"#,
        r#"[{"platform": "kick", "identifier": "a", "display_url": "not a url"}]"#,
        r#"[{"platform": "kick", "identifier": "a"}, {"platform": "KICK", "identifier": "a"}]"#,
        r#"{"platform": "kick", "identifier": "a"}"#,
    ];
    for json in cases {
        assert!(
            matches!(config::parse_accounts(json), Err(Error::Config(_))),
            "should reject {}",
            json
        );
    }
}

#[test]
fn test_load_accounts_file() -> Result<(), Error> {
    let mut file = NamedTempFile::new()?;
    write!(file, r#"[{{"platform": "twitch", "identifier": "dreamerzlel"}}]"#)?;

    let accounts = config::load_accounts_file(file.path())?;
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].status_key().as_str(), "Twitch_dreamerzlel");

    let missing = config::load_accounts_file(std::path::Path::new("/definitely/not/here.json"));
    assert!(matches!(missing, Err(Error::Config(_))));
    Ok(())
}
