//! Remote option store seam and its wire envelope.

mod http;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::OptionEntry;

pub use http::HttpOptionStore;

/// Response envelope shared by every option endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: String::new(),
            data: Some(data),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn done() -> Self {
        Self {
            success: true,
            message: String::new(),
            data: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid store configuration: {0}")]
    InvalidConfiguration(&'static str),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Failed to parse JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("{0}")]
    Rejected(String),
}

impl StoreError {
    /// Text shown to the operator when this call fails.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected(message) if message.trim().is_empty() => {
                "The option store rejected the request".to_string()
            }
            Self::Rejected(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<StoreError> for crate::Error {
    fn from(error: StoreError) -> Self {
        Self::RemoteOperationFailed(error.user_message())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Trait for the remote key/value option store (async)
#[allow(async_fn_in_trait)]
pub trait OptionStore {
    /// Fetch every option the store exposes.
    async fn fetch_all(&self) -> StoreResult<Vec<OptionEntry>>;

    /// Write one option.
    async fn update(&self, key: &str, value: &str) -> StoreResult<()>;
}

impl<S: OptionStore> OptionStore for &S {
    async fn fetch_all(&self) -> StoreResult<Vec<OptionEntry>> {
        (**self).fetch_all().await
    }

    async fn update(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).update(key, value).await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn envelope_without_data_parses() {
        let parsed: ApiResponse<Vec<OptionEntry>> =
            serde_json::from_str(r#"{"success":false,"message":"denied"}"#).unwrap();
        assert!(!parsed.success);
        assert_eq!(parsed.message, "denied");
        assert_eq!(parsed.data, None);
    }

    #[test]
    fn envelope_ignores_unknown_fields() {
        let parsed: ApiResponse<Vec<OptionEntry>> = serde_json::from_str(
            r#"{"success":true,"message":"","data":[{"key":"ServerAddress","value":"https://x.com"}],"extra":1}"#,
        )
        .unwrap();
        assert_eq!(
            parsed.data,
            Some(vec![OptionEntry::new("ServerAddress", "https://x.com")])
        );
    }

    #[test]
    fn rejected_error_surfaces_store_message() {
        let error: crate::Error = StoreError::Rejected("SMTP server unreachable".to_string()).into();
        assert_eq!(
            error,
            crate::Error::RemoteOperationFailed("SMTP server unreachable".to_string())
        );
    }

    #[test]
    fn blank_rejection_gets_fallback_message() {
        assert_eq!(
            StoreError::Rejected(String::new()).user_message(),
            "The option store rejected the request"
        );
    }
}
