//! Command handlers. Each loads its config, talks to Telegram and prints a short report.

use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dialoguer::{Input, Password};
use notify_core::{mask_token, Bot, MediaOptions, MessageOptions, NotifyError, ParseMode};
use telegram_notifier::{default_config_path, Config, TelegramConfig, TelegramNotifier};
use tracing::debug;

use crate::cli::{Cli, Commands, ConfigArgs};
use crate::output::{note_error, note_info, note_success, note_warn, print_properties, truncate};

/// Shown text is cut to this many characters in the message details table.
const PREVIEW_CHARS: usize = 50;

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Test { source } => handle_test(&source).await,
        Commands::Send {
            message,
            source,
            parse_mode,
            disable_preview,
            silent,
        } => {
            let options = MessageOptions {
                parse_mode,
                disable_web_page_preview: disable_preview,
                disable_notification: silent,
                reply_to_message_id: None,
            };
            handle_send(message, &source, &options).await
        }
        Commands::Photo {
            path,
            source,
            caption,
            parse_mode,
        } => handle_upload(MediaKind::Photo, &path, &source, caption, parse_mode).await,
        Commands::Document {
            path,
            source,
            caption,
            parse_mode,
        } => handle_upload(MediaKind::Document, &path, &source, caption, parse_mode).await,
        Commands::Setup { config } => handle_setup(config).await,
        Commands::Info { source } => handle_info(&source),
    }
}

/// Prints `Error: ...` to stderr, plus a setup hint for configuration problems.
pub fn report_error(err: &anyhow::Error) {
    note_error(&format!("{:#}", err));
    let is_config = err
        .downcast_ref::<NotifyError>()
        .map(NotifyError::is_config)
        .unwrap_or(false);
    if is_config {
        note_info("Run 'notify setup' to create a configuration file, or pass --env.");
    }
}

fn connect(source: &ConfigArgs) -> Result<TelegramNotifier> {
    let config = source.load()?;
    Ok(TelegramNotifier::new(config)?)
}

async fn handle_test(source: &ConfigArgs) -> Result<()> {
    let notifier = connect(source)?;

    note_info("Testing Telegram connection...");
    notifier.test_connection().await?;
    note_success("Telegram connection test passed!");

    let bot = notifier.get_me().await?.into_result()?;
    let flag = |v: Option<bool>| v.unwrap_or(false).to_string();
    print_properties(
        "Bot Information",
        &[
            ("Bot ID", bot.id.to_string()),
            ("Bot Name", bot.first_name.clone()),
            (
                "Username",
                bot.username
                    .as_deref()
                    .map(|u| format!("@{}", u))
                    .unwrap_or_else(|| "-".to_string()),
            ),
            ("Can Join Groups", flag(bot.can_join_groups)),
            (
                "Can Read All Group Messages",
                flag(bot.can_read_all_group_messages),
            ),
            ("Supports Inline Queries", flag(bot.supports_inline_queries)),
        ],
    );
    Ok(())
}

/// Message text from the argument, else piped stdin, else an interactive prompt.
fn resolve_message(message: Option<String>) -> Result<String> {
    let text = match message {
        Some(text) => text,
        None if !io::stdin().is_terminal() => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read message from stdin")?;
            buf.trim().to_string()
        }
        None => Input::<String>::new()
            .with_prompt("Enter your message")
            .allow_empty(true)
            .interact_text()
            .context("Failed to read message")?,
    };

    if text.trim().is_empty() {
        return Err(NotifyError::Validation("No message provided".to_string()).into());
    }
    Ok(text)
}

async fn handle_send(
    message: Option<String>,
    source: &ConfigArgs,
    options: &MessageOptions,
) -> Result<()> {
    let notifier = connect(source)?;
    let text = resolve_message(message)?;

    debug!(chars = text.chars().count(), "Sending message");
    let sent = notifier.send_message(&text, options).await?.into_result()?;
    note_success("Message sent successfully!");

    let date = sent
        .sent_at()
        .map(|d| d.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| sent.date.to_string());
    let shown = sent.text.as_deref().unwrap_or(&text);
    print_properties(
        "Message Details",
        &[
            ("Message ID", sent.message_id.to_string()),
            ("Chat ID", sent.chat.id.to_string()),
            ("Date", date),
            ("Text", truncate(shown, PREVIEW_CHARS)),
        ],
    );
    Ok(())
}

#[derive(Debug, Clone, Copy)]
enum MediaKind {
    Photo,
    Document,
}

async fn handle_upload(
    kind: MediaKind,
    path: &Path,
    source: &ConfigArgs,
    caption: Option<String>,
    parse_mode: Option<ParseMode>,
) -> Result<()> {
    let notifier = connect(source)?;
    let options = MediaOptions {
        caption,
        parse_mode,
    };

    let sent = match kind {
        MediaKind::Photo => notifier.send_photo(path, &options).await?,
        MediaKind::Document => notifier.send_document(path, &options).await?,
    };

    match kind {
        MediaKind::Photo => note_success("Photo sent successfully!"),
        MediaKind::Document => note_success("Document sent successfully!"),
    }
    if let Some(message) = sent.result {
        note_info(&format!("Message ID: {}", message.message_id));
    }
    Ok(())
}

async fn handle_setup(target: Option<PathBuf>) -> Result<()> {
    setup(target).await.context("Setup failed")
}

async fn setup(target: Option<PathBuf>) -> Result<()> {
    note_info("Notify setup: you'll need a bot token from @BotFather and the target chat ID.");

    let bot_token: String = Password::new()
        .with_prompt("Enter your Telegram bot token")
        .interact()?;
    if bot_token.trim().is_empty() {
        return Err(NotifyError::Config("Bot token is required".to_string()).into());
    }
    let chat_id: String = Input::new()
        .with_prompt("Enter your Telegram chat ID")
        .interact_text()?;
    if chat_id.trim().is_empty() {
        return Err(NotifyError::Config("Chat ID is required".to_string()).into());
    }

    let config = Config::new(TelegramConfig::new(bot_token.trim(), chat_id.trim()))?;
    let notifier = TelegramNotifier::new(config.clone())?;

    note_info("Testing configuration...");
    notifier.test_connection().await?;
    note_success("Configuration is valid!");

    let path = match target {
        Some(path) => path,
        None => default_config_path()?,
    };
    if path.exists() {
        note_warn(&format!("Overwriting {}", path.display()));
    }
    let written = config.save_to_file(Some(&path))?;
    note_success(&format!("Configuration saved to {}", written.display()));

    println!();
    println!("Setup completed successfully! Next steps:");
    println!("  notify test                  # check the connection");
    println!("  notify send \"Hello, World!\"  # send a message");
    Ok(())
}

fn handle_info(source: &ConfigArgs) -> Result<()> {
    let config = source.load()?;

    let mut rows = vec![
        ("Bot Token", mask_token(&config.telegram.bot_token)),
        ("Chat ID", config.telegram.chat_id.clone()),
        ("Parse Mode", config.telegram.parse_mode.to_string()),
        ("Timeout", format!("{}s", config.timeout)),
        ("Retry Attempts", config.retry_attempts.to_string()),
        ("Retry Delay", format!("{:?}s", config.retry_delay)),
    ];
    if let Some(ref api_url) = config.api_url {
        rows.push(("API URL", api_url.clone()));
    }
    print_properties("Current Configuration", &rows);
    Ok(())
}
