// File: streamwatch-core/src/notify/mod.rs

use streamwatch_common::models::Account;

pub mod telegram;

pub use telegram::{TelegramNotifier, TelegramSettings};

/// Minimal escaping for Telegram's HTML parse mode.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// The alert sent when an account goes live.
pub fn format_live_alert(account: &Account) -> String {
    format!(
        "🚨 <b>{}</b> is LIVE on {}!\n{}",
        escape_html(&account.identifier),
        account.platform,
        escape_html(&account.display_url)
    )
}
