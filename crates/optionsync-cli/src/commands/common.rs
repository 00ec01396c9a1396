use std::env;
use std::fmt;

use optionsync_core::util::normalize_text_option;
use optionsync_core::{
    GroupSaveReport, HttpOptionStore, Notifier, OptionGroup, OptionKey, OptionSet,
    SettingsSyncController, SkipReason,
};
use serde::Serialize;

use crate::config_profiles::{CliProfile, CliProfilesConfig};
use crate::credentials::TokenStore;
use crate::error::CliError;

pub const BASE_URL_ENV_VAR: &str = "OPTIONSYNC_BASE_URL";
pub const TOKEN_ENV_VAR: &str = "OPTIONSYNC_TOKEN";
pub const SECRET_MASK: &str = "********";

pub type CliController = SettingsSyncController<HttpOptionStore, StderrNotifier>;

/// Where the CLI talks to, resolved from flags, env, and the active profile.
#[derive(Clone, PartialEq, Eq)]
pub struct Connection {
    pub profile_name: String,
    pub base_url: String,
    pub token: Option<String>,
}

impl fmt::Debug for Connection {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Connection")
            .field("profile_name", &self.profile_name)
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Candidate values for one connection, highest precedence first.
#[derive(Debug, Default)]
pub struct ConnectionSources {
    pub flag_base_url: Option<String>,
    pub flag_token: Option<String>,
    pub env_base_url: Option<String>,
    pub env_token: Option<String>,
    pub profile: Option<CliProfile>,
}

impl ConnectionSources {
    /// Picks the first base URL and token available. `stored_token` is only
    /// consulted when neither a flag nor the environment supplies one.
    pub fn resolve(
        self,
        profile_name: String,
        stored_token: impl FnOnce() -> Result<Option<String>, CliError>,
    ) -> Result<Connection, CliError> {
        let base_url = normalize_text_option(self.flag_base_url)
            .or_else(|| normalize_text_option(self.env_base_url))
            .or_else(|| self.profile.as_ref().and_then(CliProfile::base_url))
            .ok_or(CliError::NotConfigured)?;

        let token = match normalize_text_option(self.flag_token)
            .or_else(|| normalize_text_option(self.env_token))
        {
            Some(token) => Some(token),
            None => normalize_text_option(stored_token()?),
        };

        Ok(Connection {
            profile_name,
            base_url,
            token,
        })
    }
}

pub fn resolve_connection(
    profile: Option<&str>,
    base_url: Option<String>,
    token: Option<String>,
) -> Result<Connection, CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile);
    let sources = ConnectionSources {
        flag_base_url: base_url,
        flag_token: token,
        env_base_url: env::var(BASE_URL_ENV_VAR).ok(),
        env_token: env::var(TOKEN_ENV_VAR).ok(),
        profile: config.profile(&profile_name).cloned(),
    };
    let store = TokenStore::new(&profile_name);
    let connection = sources.resolve(profile_name, || store.load())?;
    tracing::debug!(?connection, "Resolved option store connection");
    Ok(connection)
}

/// Build a controller for `connection` and load the current options.
pub async fn open_controller(connection: &Connection) -> Result<CliController, CliError> {
    let store = HttpOptionStore::new(&connection.base_url, connection.token.clone())?;
    let mut controller = SettingsSyncController::new(store, StderrNotifier);
    if controller.load().await {
        Ok(controller)
    } else {
        Err(CliError::LoadFailed(connection.base_url.clone()))
    }
}

/// Errors go to stderr, successes to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn error(&self, message: &str) {
        eprintln!("error: {message}");
    }

    fn success(&self, message: &str) {
        println!("{message}");
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct OptionListItem {
    pub key: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<OptionGroup>,
    pub secret: bool,
}

pub fn mask_value(value: &str, secret: bool, show_secrets: bool) -> String {
    if secret && !show_secrets && !value.is_empty() {
        SECRET_MASK.to_string()
    } else {
        value.to_string()
    }
}

/// Every option in `options`, including keys outside the fixed table.
pub fn option_list_items(options: &OptionSet, show_secrets: bool) -> Vec<OptionListItem> {
    options
        .iter()
        .map(|(key, value)| {
            let known = key.parse::<OptionKey>().ok();
            let secret = known.is_some_and(OptionKey::is_secret);
            OptionListItem {
                key: key.to_string(),
                value: mask_value(value, secret, show_secrets),
                group: known.map(OptionKey::group),
                secret,
            }
        })
        .collect()
}

pub fn format_option_lines(items: &[OptionListItem]) -> Vec<String> {
    let width = items.iter().map(|item| item.key.len()).max().unwrap_or(0);
    items
        .iter()
        .map(|item| {
            if item.value.is_empty() {
                format!("{:<width$}  (empty)", item.key)
            } else {
                format!("{:<width$}  {}", item.key, item.value)
            }
        })
        .collect()
}

pub fn format_save_report(report: &GroupSaveReport) -> Vec<String> {
    let written = report
        .written
        .iter()
        .map(|key| format!("saved    {key}"));
    let skipped = report.skipped.iter().map(|(key, reason)| match reason {
        SkipReason::Unchanged => format!("skipped  {key} (unchanged)"),
        SkipReason::BlankSecret => format!("skipped  {key} (blank, stored value kept)"),
        SkipReason::Toggle => format!("skipped  {key} (use `optionsync toggle`)"),
    });
    let failed = report
        .failed
        .iter()
        .map(|(key, message)| format!("failed   {key}: {message}"));
    written.chain(skipped).chain(failed).collect()
}
