use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Telegram error: {0}")]
    Telegram(String),
}

impl NotifyError {
    /// Message payload without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            NotifyError::Config(msg) | NotifyError::Validation(msg) | NotifyError::Telegram(msg) => {
                msg
            }
        }
    }

    pub fn is_config(&self) -> bool {
        matches!(self, NotifyError::Config(_))
    }
}

pub type Result<T> = std::result::Result<T, NotifyError>;
