use std::time::Duration;

use notify_core::init_tracing;
use telegram_notifier::{Bot, Config, MessageOptions, TelegramNotifier};
use tracing::{info, warn};

/// Walks a simulated 20-step job while the bar in Telegram follows along.
/// Reads the config file at ~/.notify2/config.json, or the path given as the first argument.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing("info", None)?;

    let path = std::env::args().nth(1).map(std::path::PathBuf::from);
    let notifier = TelegramNotifier::new(Config::from_file(path.as_deref())?)?;
    notifier.test_connection().await?;

    let start = notifier
        .send_message("Starting long task...", &MessageOptions::default())
        .await?
        .into_result()?;

    let steps: Vec<u32> = (1..=20).collect();
    let mut bar = notifier
        .progress_bar(steps)?
        .with_label("Processing:")
        .with_message_id(start.message_id);

    while let Some(step) = bar.next().await {
        let step = match step {
            Ok(step) => step,
            Err(e) => {
                warn!(error = %e, "Progress reporting stopped");
                return Err(e.into());
            }
        };
        info!(step, "Working");
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    notifier
        .send_message("Task complete!", &MessageOptions::default())
        .await?;
    info!(message_id = start.message_id, "Done");
    Ok(())
}
