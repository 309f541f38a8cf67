use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use streamwatch_common::models::KickStrategyKind;
use streamwatch_core::config::{self, Config, Secrets};
use streamwatch_core::tasks::live_check;

#[derive(Parser, Debug, Clone)]
#[command(name = "streamwatch")]
#[command(author, version, about = "Streamwatch - one-shot Twitch/Kick go-live notifier")]
struct Args {
    /// Where the last-seen live flags are kept between runs
    #[arg(long, default_value = "stream_state.json")]
    state_file: PathBuf,

    /// JSON file with the accounts to watch (defaults to the built-in list)
    #[arg(long)]
    accounts: Option<PathBuf>,

    /// Primary Kick technique: "api" or "profile"
    #[arg(long, default_value = "api")]
    kick_strategy: KickStrategyKind,

    /// Don't retry offline Kick results with the other technique
    #[arg(long, default_value = "false")]
    no_kick_fallback: bool,

    /// Seconds to wait after Kick page load for the bot challenge to clear
    #[arg(long, default_value = "5")]
    settle_secs: u64,

    /// Per-navigation timeout in seconds
    #[arg(long, default_value = "30")]
    nav_timeout_secs: u64,

    /// Show the browser window
    #[arg(long, default_value = "false")]
    headful: bool,

    /// Disable the Chromium sandbox (needed in most containers)
    #[arg(long, default_value = "false")]
    no_sandbox: bool,

    /// Chromium/Chrome binary to use instead of auto-detection
    #[arg(long)]
    chrome_path: Option<PathBuf>,

    /// Override the browser user-agent
    #[arg(long)]
    user_agent: Option<String>,

    /// Telegram Bot API base URL
    #[arg(long, default_value = "https://api.telegram.org")]
    telegram_api_base: String,
}

fn init_tracing() {
    let _ = tracing_log::LogTracer::init();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("streamwatch_core=info,streamwatch_runner=info"));
    let sub = fmt().with_env_filter(filter).finish();
    if let Err(e) = tracing::subscriber::set_global_default(sub) {
        eprintln!("Failed to set global subscriber: {}", e);
    }
}

fn build_config(args: &Args, secrets: Secrets) -> Result<Config, streamwatch_core::Error> {
    let mut config = Config::new(secrets);

    config.state_path = args.state_file.clone();
    config.telegram.api_base = args.telegram_api_base.clone();

    if let Some(path) = &args.accounts {
        config.accounts = config::load_accounts_file(path)?;
    } else {
        config::validate_accounts(&config.accounts)?;
    }

    config.detection.kick_primary = args.kick_strategy;
    config.detection.kick_fallback = !args.no_kick_fallback;
    config.detection.kick_settle = Duration::from_secs(args.settle_secs);
    config.detection.navigation_timeout = Duration::from_secs(args.nav_timeout_secs.max(1));

    config.browser.headless = !args.headful;
    config.browser.sandbox = !args.no_sandbox;
    config.browser.executable = args.chrome_path.clone();
    if let Some(ua) = &args.user_agent {
        config.browser.user_agent = ua.clone();
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();
    let args = Args::parse();

    // Secrets first: nothing is checked without a way to report it.
    let secrets = match Secrets::from_env() {
        Ok(s) => s,
        Err(e) => {
            error!("Startup aborted: {}", e);
            return Err(e.into());
        }
    };

    let config = build_config(&args, secrets)?;
    info!(
        "Streamwatch starting. accounts={}, state_file={}, kick_strategy={}, kick_fallback={}",
        config.accounts.len(),
        config.state_path.display(),
        config.detection.kick_primary,
        config.detection.kick_fallback
    );

    let reconciler = live_check::build_reconciler(&config)?;
    live_check::run_once(&config, &reconciler).await?;

    Ok(())
}
