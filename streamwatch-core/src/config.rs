// File: streamwatch-core/src/config.rs

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use serde::Deserialize;
use tracing::info;
use url::Url;

use streamwatch_common::models::{Account, Platform};

use crate::browser::BrowserSettings;
use crate::detectors::DetectionSettings;
use crate::notify::TelegramSettings;
use crate::state::DEFAULT_STATE_FILE;
use crate::Error;

pub const TELEGRAM_TOKEN_VAR: &str = "TELEGRAM_TOKEN";
pub const CHAT_ID_VAR: &str = "CHAT_ID";

/// Credentials for the notification bot. Both are required.
#[derive(Clone)]
pub struct Secrets {
    pub telegram_token: String,
    pub chat_id: String,
}

impl Secrets {
    /// Reads `TELEGRAM_TOKEN` and `CHAT_ID` from the process environment.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as `from_env` with an arbitrary source, for tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &str| -> Result<String, Error> {
            match lookup(name) {
                Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
                _ => Err(Error::MissingSecret(name.to_string())),
            }
        };
        Ok(Self {
            telegram_token: require(TELEGRAM_TOKEN_VAR)?,
            chat_id: require(CHAT_ID_VAR)?,
        })
    }
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("telegram_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

/// Everything a pass needs, built once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub telegram: TelegramSettings,
    pub state_path: PathBuf,
    pub accounts: Vec<Account>,
    pub browser: BrowserSettings,
    pub detection: DetectionSettings,
}

impl Config {
    /// Defaults for everything except the secrets.
    pub fn new(secrets: Secrets) -> Self {
        Self {
            telegram: TelegramSettings::new(secrets.telegram_token, secrets.chat_id),
            state_path: PathBuf::from(DEFAULT_STATE_FILE),
            accounts: default_accounts(),
            browser: BrowserSettings::default(),
            detection: DetectionSettings::default(),
        }
    }
}

/// The watched channels, in check order.
pub fn default_accounts() -> Vec<Account> {
    let kick = ["nahoule82k", "naimiforever", "therealpatty", "marouane53", "ilyaselmaliki"];
    let twitch = ["naimiforever", "naimi", "shake_make", "dreamerzlel"];

    kick.iter()
        .map(|id| Account::new(Platform::Kick, *id))
        .chain(twitch.iter().map(|id| Account::new(Platform::Twitch, *id)))
        .collect()
}

#[derive(Debug, Deserialize)]
struct AccountEntry {
    platform: String,
    identifier: String,
    #[serde(default)]
    display_url: Option<String>,
}

/// Parses a JSON array of `{platform, identifier, display_url?}` entries.
pub fn parse_accounts(json: &str) -> Result<Vec<Account>, Error> {
    let entries: Vec<AccountEntry> = serde_json::from_str(json)
        .map_err(|e| Error::Config(format!("accounts list is not valid: {}", e)))?;

    let mut accounts = Vec::with_capacity(entries.len());
    for entry in entries {
        let platform: Platform = entry.platform.parse().map_err(Error::Config)?;
        let identifier = entry.identifier.trim();
        if identifier.is_empty() {
            return Err(Error::Config(format!("empty identifier for {} account", platform)));
        }
        let account = match entry.display_url {
            Some(u) => {
                Url::parse(&u).map_err(|e| Error::Config(format!("bad display_url '{}': {}", u, e)))?;
                Account::with_display_url(platform, identifier, u)
            }
            None => Account::new(platform, identifier),
        };
        accounts.push(account);
    }

    validate_accounts(&accounts)?;
    Ok(accounts)
}

pub fn load_accounts_file(path: &Path) -> Result<Vec<Account>, Error> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("reading {}: {}", path.display(), e)))?;
    let accounts = parse_accounts(&json)?;
    info!("Loaded {} accounts from {}", accounts.len(), path.display());
    Ok(accounts)
}

/// Status keys must be unique across the list.
pub fn validate_accounts(accounts: &[Account]) -> Result<(), Error> {
    let mut seen = HashSet::new();
    for account in accounts {
        let key = account.status_key();
        if !seen.insert(key.clone()) {
            return Err(Error::Config(format!("duplicate account {}", key)));
        }
    }
    Ok(())
}
