//! # notify-core
//!
//! Core types and traits for Telegram notifications: [`Bot`], the [`ApiResponse`] envelope,
//! message and bot-info types, [`NotifyError`], input validation and tracing initialization.
//! Transport-agnostic; used by telegram-notifier and notify-cli.

pub mod bot;
pub mod error;
pub mod logger;
pub mod types;

pub use bot::{mask_token, validate_text, Bot, MAX_MESSAGE_LENGTH};
pub use error::{NotifyError, Result};
pub use logger::init_tracing;
pub use types::{ApiResponse, Chat, MediaOptions, Message, MessageOptions, ParseMode, User};
