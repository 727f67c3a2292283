//! Shared helpers for telegram-notifier integration tests.

#![allow(dead_code)]

pub mod mock_bot;

use std::sync::Once;

use telegram_notifier::{Config, TelegramConfig};

pub const TOKEN: &str = "123456:TEST-token";
pub const CHAT_ID: &str = "424242";

static TRACING_INIT: Once = Once::new();

/// Routes library logs to the test writer; set RUST_LOG=debug to see them.
pub fn init_test_tracing() {
    TRACING_INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Valid config pointing at `api_url` with a short retry delay.
pub fn config_for(api_url: &str, retry_attempts: u32) -> Config {
    let mut config = Config::new(TelegramConfig::new(TOKEN, CHAT_ID)).unwrap();
    config.api_url = Some(api_url.to_string());
    config.retry_attempts = retry_attempts;
    config.retry_delay = 0.1;
    config.timeout = 5;
    config
}

/// `{"ok":true,"result":<message>}` for a message with the given id and text.
pub fn message_body(message_id: i64, text: &str) -> String {
    serde_json::json!({
        "ok": true,
        "result": {
            "message_id": message_id,
            "date": 1_700_000_000,
            "chat": {"id": 424242, "type": "private"},
            "text": text
        }
    })
    .to_string()
}
