//! Mock implementation of [`telegram_notifier::Bot`] for integration tests.
//!
//! Records every `send_message` and `edit_message_text` call so tests can assert on the
//! rendered progress text and target message without hitting Telegram. One call can be
//! configured to fail.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use telegram_notifier::{
    ApiResponse, Bot, Chat, MediaOptions, Message, MessageOptions, NotifyError, ParseMode, Result,
    User,
};
use tokio::sync::mpsc;

/// One recorded text call.
#[derive(Debug, Clone, PartialEq)]
pub enum CallRecord {
    Send {
        text: String,
        parse_mode: Option<ParseMode>,
    },
    Edit {
        message_id: i64,
        text: String,
        parse_mode: Option<ParseMode>,
    },
}

impl CallRecord {
    pub fn text(&self) -> &str {
        match self {
            CallRecord::Send { text, .. } | CallRecord::Edit { text, .. } => text,
        }
    }

    pub fn parse_mode(&self) -> Option<ParseMode> {
        match self {
            CallRecord::Send { parse_mode, .. } | CallRecord::Edit { parse_mode, .. } => {
                *parse_mode
            }
        }
    }
}

/// Mock Bot that records calls and returns a fixed message id from `send_message`.
pub struct MockBot {
    /// Id returned by `send_message`.
    sent_message_id: i64,
    /// 1-based index of the call that fails, if any.
    fail_on_call: Option<usize>,
    calls: AtomicUsize,
    call_tx: mpsc::UnboundedSender<CallRecord>,
}

impl MockBot {
    pub fn new(
        sent_message_id: i64,
        fail_on_call: Option<usize>,
        call_tx: mpsc::UnboundedSender<CallRecord>,
    ) -> Self {
        Self {
            sent_message_id,
            fail_on_call,
            calls: AtomicUsize::new(0),
            call_tx,
        }
    }

    /// Creates a MockBot returning message id `777` and the receiver for call records.
    pub fn with_receiver() -> (Arc<Self>, mpsc::UnboundedReceiver<CallRecord>) {
        Self::failing_on(None)
    }

    /// Like [`MockBot::with_receiver`], but call number `fail_on_call` (1-based) fails.
    pub fn failing_on(
        fail_on_call: Option<usize>,
    ) -> (Arc<Self>, mpsc::UnboundedReceiver<CallRecord>) {
        let (call_tx, call_rx) = mpsc::unbounded_channel();
        let bot = Arc::new(Self::new(777, fail_on_call, call_tx));
        (bot, call_rx)
    }

    fn record(&self, call: CallRecord) -> Result<()> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let _ = self.call_tx.send(call);
        if self.fail_on_call == Some(n) {
            return Err(NotifyError::Telegram(
                "Telegram API error: Internal Server Error".to_string(),
            ));
        }
        Ok(())
    }

    fn message(&self, message_id: i64, text: &str) -> ApiResponse<Message> {
        ApiResponse {
            ok: true,
            result: Some(Message {
                message_id,
                date: 1_700_000_000,
                chat: Chat {
                    id: 42,
                    chat_type: "private".to_string(),
                },
                text: Some(text.to_string()),
                caption: None,
            }),
            description: None,
            error_code: None,
        }
    }
}

/// Drains every call recorded so far.
pub fn drain(rx: &mut mpsc::UnboundedReceiver<CallRecord>) -> Vec<CallRecord> {
    let mut calls = Vec::new();
    while let Ok(call) = rx.try_recv() {
        calls.push(call);
    }
    calls
}

#[async_trait]
impl Bot for MockBot {
    async fn send_message(
        &self,
        text: &str,
        options: &MessageOptions,
    ) -> Result<ApiResponse<Message>> {
        self.record(CallRecord::Send {
            text: text.to_string(),
            parse_mode: options.parse_mode,
        })?;
        Ok(self.message(self.sent_message_id, text))
    }

    async fn edit_message_text(
        &self,
        message_id: i64,
        text: &str,
        options: &MessageOptions,
    ) -> Result<ApiResponse<Message>> {
        self.record(CallRecord::Edit {
            message_id,
            text: text.to_string(),
            parse_mode: options.parse_mode,
        })?;
        Ok(self.message(message_id, text))
    }

    async fn send_photo(&self, _path: &Path, _options: &MediaOptions) -> Result<ApiResponse<Message>> {
        Ok(self.message(self.sent_message_id, ""))
    }

    async fn send_document(
        &self,
        _path: &Path,
        _options: &MediaOptions,
    ) -> Result<ApiResponse<Message>> {
        Ok(self.message(self.sent_message_id, ""))
    }

    async fn get_me(&self) -> Result<ApiResponse<User>> {
        Ok(ApiResponse {
            ok: true,
            result: Some(User {
                id: 1,
                is_bot: true,
                first_name: "Mock".to_string(),
                username: Some("mock_bot".to_string()),
                can_join_groups: None,
                can_read_all_group_messages: None,
                supports_inline_queries: None,
            }),
            description: None,
            error_code: None,
        })
    }
}
