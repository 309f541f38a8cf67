// File: streamwatch-core/tests/telegram_tests.rs

use std::sync::Arc;
use async_trait::async_trait;
use mockall::mock;
use serde_json::{json, Value};

use streamwatch_common::models::{Account, Platform};
use streamwatch_common::traits::Notifier;
use streamwatch_core::http::{HttpClient, HttpResponse};
use streamwatch_core::notify::{self, TelegramNotifier, TelegramSettings};
use streamwatch_core::Error;

mock! {
    pub Http {}
    #[async_trait]
    impl HttpClient for Http {
        async fn post_json(&self, url: &str, body: Value) -> Result<HttpResponse, Error>;
    }
}

const SEND_URL: &str = "https://api.telegram.org/bot123:ABC/sendMessage";

fn reply(status: u16, body: &str) -> HttpResponse {
    HttpResponse { status, body: body.to_string() }
}

fn notifier(http: MockHttp) -> TelegramNotifier {
    TelegramNotifier::new(Arc::new(http), TelegramSettings::new("123:ABC", "-100200300"))
}

#[tokio::test]
async fn test_send_posts_html_message_to_chat() {
    let mut http = MockHttp::new();
    http.expect_post_json()
        .withf(|url, body| {
            url == SEND_URL
                && *body == json!({"chat_id": "-100200300", "text": "hello <b>there</b>", "parse_mode": "HTML"})
        })
        .times(1)
        .returning(|_, _| Ok(reply(200, r#"{"ok":true,"result":{"message_id":1}}"#)));

    let result = notifier(http).send("hello <b>there</b>").await;
    assert!(result.is_ok(), "{:?}", result);
}

#[tokio::test]
async fn test_rejected_message_is_an_error() {
    let mut http = MockHttp::new();
    http.expect_post_json()
        .times(1)
        .returning(|_, _| Ok(reply(400, r#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#)));

    match notifier(http).send("x").await {
        Err(Error::Notification(msg)) => assert!(msg.contains("chat not found"), "{}", msg),
        other => panic!("expected a notification error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_transport_failure_is_notification_error() {
    let mut http = MockHttp::new();
    http.expect_post_json()
        .times(1)
        .returning(|_, _| Err(Error::Io(std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused"))));

    let result = notifier(http).send("x").await;
    assert!(matches!(result, Err(Error::Notification(_))));
}

#[tokio::test]
async fn test_non_json_reply() {
    let mut http = MockHttp::new();
    http.expect_post_json()
        .times(2)
        .returning({
            let mut calls = 0;
            move |_, _| {
                calls += 1;
                if calls == 1 {
                    Ok(reply(200, "<html>proxy says ok</html>"))
                } else {
                    Ok(reply(502, "<html>bad gateway</html>"))
                }
            }
        });
    let notifier = notifier(http);

    assert!(notifier.send("x").await.is_ok(), "2xx counts as delivered");
    assert!(notifier.send("x").await.is_err());
}

#[test]
fn test_custom_api_base() {
    let mut settings = TelegramSettings::new("t0k", "42");
    settings.api_base = "http://localhost:8081/".to_string();

    assert_eq!(settings.send_message_url(), "http://localhost:8081/bott0k/sendMessage");
    assert!(!format!("{:?}", settings).contains("t0k"), "token must not leak into Debug");
}

#[test]
fn test_live_alert_format() {
    let alert = notify::format_live_alert(&Account::new(Platform::Kick, "marouane53"));
    assert_eq!(alert, "🚨 <b>marouane53</b> is LIVE on Kick!\nhttps://kick.com/marouane53");

    let alert = notify::format_live_alert(&Account::with_display_url(
        Platform::Twitch,
        "a<b>&c",
        "https://twitch.tv/x?a=1&b=2",
    ));
    assert_eq!(
        alert,
        "🚨 <b>a&lt;b&gt;&amp;c</b> is LIVE on Twitch!\nhttps://twitch.tv/x?a=1&amp;b=2"
    );
}
