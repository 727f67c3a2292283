//! Bot abstraction for sending notifications.
//!
//! [`Bot`] is transport-agnostic; `telegram_notifier::TelegramNotifier` implements it over the Bot HTTP API
//! and tests substitute recording mocks.

use std::path::Path;

use async_trait::async_trait;

use crate::error::{NotifyError, Result};
use crate::types::{ApiResponse, MediaOptions, Message, MessageOptions, User};

/// Longest text Telegram accepts in one message, counted in UTF-16 code units.
pub const MAX_MESSAGE_LENGTH: usize = 4096;

/// Sends, edits and uploads to the configured chat. Every call checks local preconditions before
/// touching the network and returns the decoded envelope unchanged on success.
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends a text message.
    async fn send_message(&self, text: &str, options: &MessageOptions)
        -> Result<ApiResponse<Message>>;
    /// Replaces the text of a previously sent message.
    async fn edit_message_text(
        &self,
        message_id: i64,
        text: &str,
        options: &MessageOptions,
    ) -> Result<ApiResponse<Message>>;
    /// Uploads a local image as a photo.
    async fn send_photo(&self, path: &Path, options: &MediaOptions) -> Result<ApiResponse<Message>>;
    /// Uploads a local file as a document.
    async fn send_document(&self, path: &Path, options: &MediaOptions)
        -> Result<ApiResponse<Message>>;
    /// Returns the bot's own identity.
    async fn get_me(&self) -> Result<ApiResponse<User>>;

    /// Checks that the token is accepted by calling `get_me`.
    async fn test_connection(&self) -> Result<()> {
        self.get_me().await.map(|_| ())
    }
}

/// Rejects blank text and text longer than [`MAX_MESSAGE_LENGTH`].
pub fn validate_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(NotifyError::Validation("Message cannot be empty".to_string()));
    }
    if text.encode_utf16().count() > MAX_MESSAGE_LENGTH {
        return Err(NotifyError::Validation(format!(
            "Message too long (max {} characters)",
            MAX_MESSAGE_LENGTH
        )));
    }
    Ok(())
}

/// Shortens a bot token for display: first 10 characters followed by `...`.
pub fn mask_token(token: &str) -> String {
    if token.chars().count() > 10 {
        let prefix: String = token.chars().take(10).collect();
        format!("{}...", prefix)
    } else {
        token.to_string()
    }
}
