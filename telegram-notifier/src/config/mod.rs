//! Notifier configuration: Telegram credentials ([`TelegramConfig`]) plus network settings ([`Config`]).
//! Loaded from a JSON file, from env, or built directly; validated on every path.

mod credentials;
mod io;
mod settings;


pub use credentials::TelegramConfig;
pub use io::default_config_path;
pub use settings::{
    Config, DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_DELAY_SECS, DEFAULT_TIMEOUT_SECS,
};
