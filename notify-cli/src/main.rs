//! notify CLI: send Telegram messages, photos and documents; test, set up and inspect configuration.

use std::process::ExitCode;

use clap::Parser;
use notify_cli::{report_error, run, Cli};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let log_file = std::env::var("LOG_FILE").ok();
    if let Err(e) = notify_core::init_tracing("warn", log_file.as_deref()) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}
