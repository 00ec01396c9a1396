//! In-memory option registry backing the reference store.

use std::collections::BTreeMap;

use optionsync_core::models::parse_toggle;
use optionsync_core::{OptionEntry, OptionKey};
use tokio::sync::RwLock;

/// Options the store knows about before any write, with their initial values.
pub const DEFAULT_OPTIONS: &[(&str, &str)] = &[
    ("FileUploadPermission", "0"),
    ("FileDownloadPermission", "0"),
    ("ImageUploadPermission", "0"),
    ("ImageDownloadPermission", "0"),
    ("PasswordLoginEnabled", "true"),
    ("PasswordRegisterEnabled", "true"),
    ("EmailVerificationEnabled", "false"),
    ("GitHubOAuthEnabled", "false"),
    ("WeChatAuthEnabled", "false"),
    ("SMTPServer", ""),
    ("SMTPAccount", ""),
    ("SMTPToken", ""),
    ("Notice", ""),
    ("About", ""),
    ("Footer", ""),
    ("ServerAddress", ""),
    ("GitHubClientId", ""),
    ("GitHubClientSecret", ""),
    ("WeChatServerAddress", ""),
    ("WeChatServerToken", ""),
    ("WeChatAccountQRCodeImageURL", ""),
];

pub struct OptionRegistry {
    values: RwLock<BTreeMap<String, String>>,
}

impl OptionRegistry {
    /// Defaults overlaid with `overrides`.
    pub fn new(overrides: &[(String, String)]) -> Self {
        let mut values: BTreeMap<String, String> = DEFAULT_OPTIONS
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        for (key, value) in overrides {
            values.insert(key.clone(), value.clone());
        }
        Self {
            values: RwLock::new(values),
        }
    }

    /// Every option except credentials, sorted by key.
    pub async fn visible_options(&self) -> Vec<OptionEntry> {
        self.values
            .read()
            .await
            .iter()
            .filter(|(key, _)| !is_credential_key(key))
            .map(|(key, value)| OptionEntry::new(key.clone(), value.clone()))
            .collect()
    }

    #[cfg(test)]
    pub async fn get(&self, key: &str) -> Option<String> {
        self.values.read().await.get(key).cloned()
    }

    /// Validate and upsert one option.
    pub async fn update(&self, key: &str, value: &str) -> Result<(), String> {
        let mut values = self.values.write().await;
        let is_empty = |name: OptionKey| {
            values
                .get(name.as_str())
                .map_or(true, String::is_empty)
        };

        if parse_toggle(value) {
            if key == OptionKey::GitHubOAuthEnabled.as_str() && is_empty(OptionKey::GitHubClientId)
            {
                return Err(
                    "Cannot enable GitHub OAuth: fill in GitHub Client ID and GitHub Client Secret first"
                        .to_string(),
                );
            }
            if key == OptionKey::WeChatAuthEnabled.as_str()
                && is_empty(OptionKey::WeChatServerAddress)
            {
                return Err(
                    "Cannot enable WeChat login: fill in the WeChat server settings first"
                        .to_string(),
                );
            }
        }

        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Credentials are write-only over the API.
pub fn is_credential_key(key: &str) -> bool {
    key.contains("Token") || key.contains("Secret")
}
