//! Bot API client: [`TelegramNotifier`] implements [`Bot`] over HTTPS with a pooled reqwest client.
//!
//! Transient failures (429/500/502/503/504, connect errors, timeouts) are retried with exponential
//! backoff `retry_delay * 2^(n-1)`; other failures surface immediately. Error text never includes
//! the request URL, which embeds the bot token.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use notify_core::{
    validate_text, ApiResponse, Bot, MediaOptions, Message, MessageOptions, NotifyError,
    ParseMode, Result, User,
};
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio_retry::strategy::ExponentialBackoff;
use tokio_retry::RetryIf;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::progress::ProgressBar;

/// Public Bot API root.
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

const MAX_IDLE_CONNECTIONS: usize = 10;

/// Statuses worth another attempt.
const TRANSIENT_STATUSES: [StatusCode; 5] = [
    StatusCode::TOO_MANY_REQUESTS,
    StatusCode::INTERNAL_SERVER_ERROR,
    StatusCode::BAD_GATEWAY,
    StatusCode::SERVICE_UNAVAILABLE,
    StatusCode::GATEWAY_TIMEOUT,
];

/// Sends notifications to the configured chat.
pub struct TelegramNotifier {
    config: Config,
    http: reqwest::Client,
    base_url: String,
}

/// One failed attempt, before retry classification.
#[derive(Debug)]
enum AttemptError {
    Transport(reqwest::Error),
    Status {
        status: StatusCode,
        description: Option<String>,
    },
}

impl AttemptError {
    fn is_transient(&self) -> bool {
        match self {
            AttemptError::Transport(e) => e.is_connect() || e.is_timeout(),
            AttemptError::Status { status, .. } => TRANSIENT_STATUSES.contains(status),
        }
    }

    /// Short description for logs; never includes the URL.
    fn summary(&self) -> String {
        match self {
            AttemptError::Transport(e) if e.is_timeout() => "request timed out".to_string(),
            AttemptError::Transport(e) if e.is_connect() => "connection failed".to_string(),
            AttemptError::Transport(_) => "request failed".to_string(),
            AttemptError::Status { status, .. } => format!("HTTP {}", status),
        }
    }

    fn into_notify_error(self, action: &str) -> NotifyError {
        match self {
            AttemptError::Transport(e) => {
                NotifyError::Telegram(format!("Failed to {}: {}", action, e.without_url()))
            }
            AttemptError::Status {
                status,
                description: Some(description),
            } => NotifyError::Telegram(format!(
                "Failed to {}: HTTP {}: {}",
                action, status, description
            )),
            AttemptError::Status {
                status,
                description: None,
            } => NotifyError::Telegram(format!("Failed to {}: HTTP {}", action, status)),
        }
    }
}

/// Error body of a non-2xx response; only `description` is of interest.
#[derive(Deserialize)]
struct ErrorBody {
    description: Option<String>,
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: ParseMode,
    disable_web_page_preview: bool,
    disable_notification: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to_message_id: Option<i64>,
}

#[derive(Serialize)]
struct EditMessageTextRequest<'a> {
    chat_id: &'a str,
    message_id: i64,
    text: &'a str,
    parse_mode: ParseMode,
    disable_web_page_preview: bool,
}

/// A local file read into memory once so every retry can rebuild the multipart body.
struct Upload {
    field: &'static str,
    file_name: String,
    bytes: Vec<u8>,
}

impl TelegramNotifier {
    /// Validates `config` and builds the pooled HTTP client.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .pool_max_idle_per_host(MAX_IDLE_CONNECTIONS)
            .build()
            .map_err(|e| NotifyError::Config(format!("Failed to build HTTP client: {}", e)))?;

        let api_root = config
            .api_url
            .as_deref()
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/');
        let base_url = format!("{}/bot{}", api_root, config.telegram.bot_token);

        Ok(Self {
            config,
            http,
            base_url,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Wraps `items` in a [`ProgressBar`] that reports through this notifier.
    pub fn progress_bar<T>(&self, items: T) -> Result<ProgressBar<'_, Self, T::IntoIter>>
    where
        T: IntoIterator,
    {
        ProgressBar::new(self, items)
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.base_url, method)
    }

    fn parse_mode_or_default(&self, parse_mode: Option<ParseMode>) -> ParseMode {
        parse_mode.unwrap_or(self.config.telegram.parse_mode)
    }

    /// `retry_delay * 2^(n-1)`: tokio-retry yields `base^n * factor`, so base 2 and factor `delay_ms / 2`.
    fn retry_strategy(&self) -> impl Iterator<Item = Duration> {
        let delay_ms = (self.config.retry_delay * 1000.0).round() as u64;
        ExponentialBackoff::from_millis(2)
            .factor((delay_ms / 2).max(1))
            .take(self.config.retry_attempts as usize)
    }

    /// Sends the request built by `build`, retrying transient failures, and decodes the envelope.
    async fn call<T, F>(&self, method: &str, action: &str, build: F) -> Result<ApiResponse<T>>
    where
        T: DeserializeOwned,
        F: Fn() -> RequestBuilder + Send + Sync,
    {
        debug!(method, "Calling Telegram Bot API");

        let attempt = || {
            let request = build();
            async move {
                let response = request.send().await.map_err(AttemptError::Transport)?;
                let status = response.status();
                if status.is_success() {
                    return Ok(response);
                }
                let description = response
                    .json::<ErrorBody>()
                    .await
                    .ok()
                    .and_then(|body| body.description);
                Err(AttemptError::Status {
                    status,
                    description,
                })
            }
        };
        let should_retry = |e: &AttemptError| {
            let transient = e.is_transient();
            if transient {
                warn!(method, error = %e.summary(), "Transient Telegram API failure");
            }
            transient
        };

        let response = RetryIf::start(self.retry_strategy(), attempt, should_retry)
            .await
            .map_err(|e| e.into_notify_error(action))?;

        let envelope: ApiResponse<T> = response.json().await.map_err(|e| {
            NotifyError::Telegram(format!(
                "Failed to {}: invalid response: {}",
                action,
                e.without_url()
            ))
        })?;

        if !envelope.ok {
            return Err(NotifyError::Telegram(format!(
                "Telegram API error: {}",
                envelope.description.as_deref().unwrap_or("Unknown error")
            )));
        }
        Ok(envelope)
    }

    async fn upload(
        &self,
        method: &str,
        action: &str,
        upload: Upload,
        options: &MediaOptions,
    ) -> Result<ApiResponse<Message>> {
        let chat_id = self.config.telegram.chat_id.clone();
        let parse_mode = self.parse_mode_or_default(options.parse_mode);
        let caption = options.caption.clone().filter(|c| !c.is_empty());
        let url = self.method_url(method);

        let response: ApiResponse<Message> = self
            .call(method, action, || {
                let part = Part::bytes(upload.bytes.clone()).file_name(upload.file_name.clone());
                let mut form = Form::new()
                    .text("chat_id", chat_id.clone())
                    .text("parse_mode", parse_mode.as_str())
                    .part(upload.field, part);
                if let Some(ref caption) = caption {
                    form = form.text("caption", caption.clone());
                }
                self.http.post(&url).multipart(form)
            })
            .await?;

        if let Some(ref message) = response.result {
            info!(method, message_id = message.message_id, "Uploaded file");
        }
        Ok(response)
    }
}

/// Reads `path` for upload, or fails with `"{kind} file not found: {path}"`.
async fn read_upload(path: &Path, field: &'static str, kind: &str) -> Result<Upload> {
    if !path.is_file() {
        return Err(NotifyError::Validation(format!(
            "{} file not found: {}",
            kind,
            path.display()
        )));
    }
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        NotifyError::Validation(format!("Failed to read {}: {}", path.display(), e))
    })?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| field.to_string());
    Ok(Upload {
        field,
        file_name,
        bytes,
    })
}

#[async_trait]
impl Bot for TelegramNotifier {
    async fn send_message(
        &self,
        text: &str,
        options: &MessageOptions,
    ) -> Result<ApiResponse<Message>> {
        validate_text(text)?;

        let url = self.method_url("sendMessage");
        let body = SendMessageRequest {
            chat_id: &self.config.telegram.chat_id,
            text,
            parse_mode: self.parse_mode_or_default(options.parse_mode),
            disable_web_page_preview: options.disable_web_page_preview,
            disable_notification: options.disable_notification,
            reply_to_message_id: options.reply_to_message_id,
        };

        let response: ApiResponse<Message> = self
            .call("sendMessage", "send message", || self.http.post(&url).json(&body))
            .await?;
        if let Some(ref message) = response.result {
            info!(message_id = message.message_id, "Message sent");
        }
        Ok(response)
    }

    async fn edit_message_text(
        &self,
        message_id: i64,
        text: &str,
        options: &MessageOptions,
    ) -> Result<ApiResponse<Message>> {
        validate_text(text)?;

        let url = self.method_url("editMessageText");
        let body = EditMessageTextRequest {
            chat_id: &self.config.telegram.chat_id,
            message_id,
            text,
            parse_mode: self.parse_mode_or_default(options.parse_mode),
            disable_web_page_preview: options.disable_web_page_preview,
        };

        let response = self
            .call("editMessageText", "edit message", || {
                self.http.post(&url).json(&body)
            })
            .await?;
        debug!(message_id, "Message edited");
        Ok(response)
    }

    async fn send_photo(&self, path: &Path, options: &MediaOptions) -> Result<ApiResponse<Message>> {
        let upload = read_upload(path, "photo", "Photo").await?;
        self.upload("sendPhoto", "send photo", upload, options).await
    }

    async fn send_document(
        &self,
        path: &Path,
        options: &MediaOptions,
    ) -> Result<ApiResponse<Message>> {
        let upload = read_upload(path, "document", "Document").await?;
        self.upload("sendDocument", "send document", upload, options)
            .await
    }

    async fn get_me(&self) -> Result<ApiResponse<User>> {
        let url = self.method_url("getMe");
        self.call("getMe", "get bot info", || self.http.get(&url))
            .await
    }
}
