//! # telegram-notifier
//!
//! Telegram notifications over the Bot HTTP API: [`Config`] loading and validation,
//! the [`TelegramNotifier`] client with retry, and [`ProgressBar`], which mirrors the
//! progress of an iteration into a single, repeatedly edited message.

pub mod client;
pub mod config;
pub mod progress;

pub use client::{TelegramNotifier, DEFAULT_API_URL};
pub use config::{default_config_path, Config, TelegramConfig};
pub use progress::{ProgressBar, ProgressState};

pub use notify_core::{
    ApiResponse, Bot, Chat, MediaOptions, Message, MessageOptions, NotifyError, ParseMode, Result,
    User,
};
