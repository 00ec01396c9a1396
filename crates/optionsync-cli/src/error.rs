use std::io;

use optionsync_core::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] optionsync_core::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Authentication error: {0}")]
    Auth(String),
    #[error("Failed to load options from {0}")]
    LoadFailed(String),
    #[error("Failed to save {label}: {count} option(s) were not written")]
    SaveFailed { label: &'static str, count: usize },
    #[error("Failed to save {0}")]
    WriteFailed(String),
    #[error(
        "No option store configured. Run `optionsync config init --base-url <URL>` or set OPTIONSYNC_BASE_URL."
    )]
    NotConfigured,
}
