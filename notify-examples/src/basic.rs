use chrono::Local;
use notify_core::init_tracing;
use telegram_notifier::{Bot, Config, MessageOptions, TelegramNotifier};
use tracing::info;

/// Sends one message using TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID (a `.env` file works too).
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing("info", None)?;

    let notifier = TelegramNotifier::new(Config::from_env()?)?;
    let now = Local::now().format("%Y-%m-%d %H:%M:%S");
    let text = format!("<b>Hello</b> from telegram-notifier at {}", now);

    let sent = notifier
        .send_message(&text, &MessageOptions::default())
        .await?
        .into_result()?;
    info!(message_id = sent.message_id, chat_id = sent.chat.id, "Sent greeting");
    println!("Message sent with ID: {}", sent.message_id);
    Ok(())
}
