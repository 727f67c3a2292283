//! CLI parser and config loading.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use notify_core::{ParseMode, Result};
use telegram_notifier::Config;

#[derive(Parser, Debug)]
#[command(name = "notify")]
#[command(about = "Send Telegram notifications from the command line", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Test the Telegram connection and show bot information.
    Test {
        #[command(flatten)]
        source: ConfigArgs,
    },
    /// Send a text message. Reads stdin or prompts when MESSAGE is omitted.
    Send {
        message: Option<String>,
        #[command(flatten)]
        source: ConfigArgs,
        /// HTML, Markdown or MarkdownV2 (default: from config).
        #[arg(short, long)]
        parse_mode: Option<ParseMode>,
        /// Disable link previews.
        #[arg(long)]
        disable_preview: bool,
        /// Send without a notification sound.
        #[arg(long)]
        silent: bool,
    },
    /// Send a photo with an optional caption.
    Photo {
        path: PathBuf,
        #[command(flatten)]
        source: ConfigArgs,
        #[arg(long)]
        caption: Option<String>,
        #[arg(short, long)]
        parse_mode: Option<ParseMode>,
    },
    /// Send a document with an optional caption.
    Document {
        path: PathBuf,
        #[command(flatten)]
        source: ConfigArgs,
        #[arg(long)]
        caption: Option<String>,
        #[arg(short, long)]
        parse_mode: Option<ParseMode>,
    },
    /// Interactive setup: prompt for token and chat id, test them, save the config file.
    Setup {
        /// Where to save (default: ~/.notify2/config.json).
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Show the current configuration with the token masked.
    Info {
        #[command(flatten)]
        source: ConfigArgs,
    },
}

/// Where to read configuration from: a file (default path unless `--config`) or env.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Path to the configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Read TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID from the environment instead of a file.
    #[arg(long, conflicts_with = "config")]
    pub env: bool,
}

impl ConfigArgs {
    pub fn load(&self) -> Result<Config> {
        if self.env {
            Config::from_env()
        } else {
            Config::from_file(self.config.as_deref())
        }
    }
}
