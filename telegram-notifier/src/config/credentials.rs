//! Telegram credentials: bot token, target chat and default parse mode.

use lazy_regex::regex_is_match;
use notify_core::ParseMode;
use serde::{Deserialize, Serialize};

/// Bot token from @BotFather, target chat id, and the parse mode used when a call doesn't override it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    #[serde(default)]
    pub parse_mode: ParseMode,
}

impl TelegramConfig {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            parse_mode: ParseMode::default(),
        }
    }

    /// Appends one message per problem found to `problems`.
    pub(crate) fn collect_problems(&self, problems: &mut Vec<String>) {
        let token = &self.bot_token;
        if token.chars().count() < 10 {
            problems.push("Bot token must be at least 10 characters long".to_string());
        } else if !token.contains(':') {
            problems.push("Bot token must contain a colon separator".to_string());
        } else if !regex_is_match!(r"^\d+:[A-Za-z0-9_-]+$", token) {
            problems.push("Bot token must look like <digits>:<letters, digits, _ or ->".to_string());
        }

        if self.chat_id.trim().is_empty() {
            problems.push("Chat ID cannot be empty".to_string());
        }
    }
}
