//! reqwest-backed client for `GET/PUT /api/option`.

use std::fmt;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use super::{ApiResponse, OptionStore, StoreError, StoreResult};
use crate::models::OptionEntry;
use crate::util::{compact_text, is_http_url, normalize_text_option};

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const OPTION_PATH: &str = "/api/option";

#[derive(Clone)]
pub struct HttpOptionStore {
    base_url: String,
    token: Option<String>,
    client: Client,
}

impl fmt::Debug for HttpOptionStore {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("HttpOptionStore")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

impl HttpOptionStore {
    pub fn new(base_url: impl AsRef<str>, token: Option<String>) -> StoreResult<Self> {
        Self::with_timeout(base_url, token, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(
        base_url: impl AsRef<str>,
        token: Option<String>,
        timeout: Duration,
    ) -> StoreResult<Self> {
        let base_url = normalize_base_url(base_url.as_ref())?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url,
            token: normalize_text_option(token),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}{OPTION_PATH}", self.base_url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header(reqwest::header::ACCEPT, "application/json");
        match self.token.as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

impl OptionStore for HttpOptionStore {
    async fn fetch_all(&self) -> StoreResult<Vec<OptionEntry>> {
        let response = self
            .authorize(self.client.get(self.endpoint()))
            .send()
            .await?;
        let envelope: ApiResponse<Vec<OptionEntry>> = read_envelope(response).await?;
        tracing::debug!(count = envelope.data.as_ref().map_or(0, Vec::len), "Fetched options");
        Ok(envelope.data.unwrap_or_default())
    }

    async fn update(&self, key: &str, value: &str) -> StoreResult<()> {
        let body = OptionEntry::new(key, value);
        let response = self
            .authorize(self.client.put(self.endpoint()).json(&body))
            .send()
            .await?;
        let _: ApiResponse<serde_json::Value> = read_envelope(response).await?;
        tracing::debug!(key, "Updated option");
        Ok(())
    }
}

async fn read_envelope<T: DeserializeOwned>(response: Response) -> StoreResult<ApiResponse<T>> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<ApiResponse<serde_json::Value>>(&body)
            .ok()
            .and_then(|envelope| normalize_text_option(Some(envelope.message)))
            .unwrap_or_else(|| compact_text(&body));
        return Err(StoreError::Status {
            status: status.as_u16(),
            message,
        });
    }

    let envelope: ApiResponse<T> = serde_json::from_str(&body)?;
    if envelope.success {
        Ok(envelope)
    } else {
        Err(StoreError::Rejected(envelope.message))
    }
}

fn normalize_base_url(raw: &str) -> StoreResult<String> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(StoreError::InvalidConfiguration(
            "option store URL must not be empty",
        ));
    }
    if !is_http_url(value) {
        return Err(StoreError::InvalidConfiguration(
            "option store URL must include http:// or https://",
        ));
    }
    Ok(value.trim_end_matches('/').to_string())
}
