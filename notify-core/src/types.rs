//! Core types: the Bot API response envelope, sent message, bot info, parse mode and send options.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::NotifyError;

/// Bot API response wrapper: `{ ok, result?, description?, error_code? }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<i64>,
}

impl<T> ApiResponse<T> {
    /// Consumes the envelope and returns `result`, failing when the server omitted it.
    pub fn into_result(self) -> crate::Result<T> {
        self.result.ok_or_else(|| {
            NotifyError::Telegram("Telegram API response has no result".to_string())
        })
    }
}

/// Chat the message was delivered to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub chat_type: String,
}

/// A message as returned by sendMessage, editMessageText, sendPhoto and sendDocument.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub message_id: i64,
    /// Unix timestamp (seconds).
    pub date: i64,
    pub chat: Chat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

impl Message {
    pub fn sent_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.date, 0)
    }
}

/// Bot identity returned by getMe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub is_bot: bool,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_join_groups: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_read_all_group_messages: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supports_inline_queries: Option<bool>,
}

/// Text formatting mode understood by Telegram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ParseMode {
    #[default]
    #[serde(rename = "HTML")]
    Html,
    Markdown,
    MarkdownV2,
}

impl ParseMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseMode::Html => "HTML",
            ParseMode::Markdown => "Markdown",
            ParseMode::MarkdownV2 => "MarkdownV2",
        }
    }
}

impl fmt::Display for ParseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParseMode {
    type Err = NotifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HTML" => Ok(ParseMode::Html),
            "Markdown" => Ok(ParseMode::Markdown),
            "MarkdownV2" => Ok(ParseMode::MarkdownV2),
            other => Err(NotifyError::Validation(format!(
                "Invalid parse mode: {} (expected HTML, Markdown or MarkdownV2)",
                other
            ))),
        }
    }
}

/// Options for sendMessage / editMessageText. `parse_mode: None` falls back to the configured default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageOptions {
    pub parse_mode: Option<ParseMode>,
    pub disable_web_page_preview: bool,
    pub disable_notification: bool,
    pub reply_to_message_id: Option<i64>,
}

impl MessageOptions {
    pub fn with_parse_mode(parse_mode: ParseMode) -> Self {
        Self {
            parse_mode: Some(parse_mode),
            ..Self::default()
        }
    }
}

/// Options for photo and document uploads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaOptions {
    pub caption: Option<String>,
    pub parse_mode: Option<ParseMode>,
}
