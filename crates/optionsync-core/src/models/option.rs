//! The fixed option table: keys, groups, and write policies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A system option managed by the settings page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OptionKey {
    PasswordLoginEnabled,
    PasswordRegisterEnabled,
    EmailVerificationEnabled,
    GitHubOAuthEnabled,
    WeChatAuthEnabled,
    ServerAddress,
    SmtpServer,
    SmtpAccount,
    SmtpToken,
    GitHubClientId,
    GitHubClientSecret,
    WeChatServerAddress,
    WeChatServerToken,
    WeChatAccountQrCodeImageUrl,
}

/// Logical grouping of options; each group is saved as a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionGroup {
    /// Boolean switches written as soon as they are flipped
    Toggles,
    /// Public address of the server
    Server,
    /// Outgoing mail credentials
    Smtp,
    /// GitHub OAuth application credentials
    GitHubOAuth,
    /// WeChat login bridge settings
    WeChat,
}

/// When an edited option is sent to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WritePolicy {
    /// Written on every toggle with the negated value
    Immediate,
    /// Buffered, written unconditionally on save with one trailing `/` removed
    TrimmedOnSave,
    /// Buffered, written on group save only when it differs from the snapshot
    Buffered,
}

/// Static description of one option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: OptionKey,
    pub group: OptionGroup,
    /// A blank value means "leave unchanged" rather than "clear".
    pub secret: bool,
    pub policy: WritePolicy,
}

const fn toggle(key: OptionKey) -> FieldSpec {
    FieldSpec {
        key,
        group: OptionGroup::Toggles,
        secret: false,
        policy: WritePolicy::Immediate,
    }
}

const fn buffered(key: OptionKey, group: OptionGroup) -> FieldSpec {
    FieldSpec {
        key,
        group,
        secret: false,
        policy: WritePolicy::Buffered,
    }
}

const fn secret(key: OptionKey, group: OptionGroup) -> FieldSpec {
    FieldSpec {
        key,
        group,
        secret: true,
        policy: WritePolicy::Buffered,
    }
}

/// Every option in display order. Group entries are listed in save order.
pub const FIELD_TABLE: [FieldSpec; 14] = [
    toggle(OptionKey::PasswordLoginEnabled),
    toggle(OptionKey::PasswordRegisterEnabled),
    toggle(OptionKey::EmailVerificationEnabled),
    toggle(OptionKey::GitHubOAuthEnabled),
    toggle(OptionKey::WeChatAuthEnabled),
    FieldSpec {
        key: OptionKey::ServerAddress,
        group: OptionGroup::Server,
        secret: false,
        policy: WritePolicy::TrimmedOnSave,
    },
    buffered(OptionKey::SmtpServer, OptionGroup::Smtp),
    buffered(OptionKey::SmtpAccount, OptionGroup::Smtp),
    secret(OptionKey::SmtpToken, OptionGroup::Smtp),
    buffered(OptionKey::GitHubClientId, OptionGroup::GitHubOAuth),
    secret(OptionKey::GitHubClientSecret, OptionGroup::GitHubOAuth),
    buffered(OptionKey::WeChatServerAddress, OptionGroup::WeChat),
    buffered(OptionKey::WeChatAccountQrCodeImageUrl, OptionGroup::WeChat),
    secret(OptionKey::WeChatServerToken, OptionGroup::WeChat),
];

const TOGGLE_FIELDS: &[FieldSpec] = &[
    FIELD_TABLE[0],
    FIELD_TABLE[1],
    FIELD_TABLE[2],
    FIELD_TABLE[3],
    FIELD_TABLE[4],
];
const SERVER_FIELDS: &[FieldSpec] = &[FIELD_TABLE[5]];
const SMTP_FIELDS: &[FieldSpec] = &[FIELD_TABLE[6], FIELD_TABLE[7], FIELD_TABLE[8]];
const GITHUB_FIELDS: &[FieldSpec] = &[FIELD_TABLE[9], FIELD_TABLE[10]];
const WECHAT_FIELDS: &[FieldSpec] = &[FIELD_TABLE[11], FIELD_TABLE[12], FIELD_TABLE[13]];

impl OptionKey {
    /// All keys in display order.
    pub const ALL: [Self; 14] = [
        Self::PasswordLoginEnabled,
        Self::PasswordRegisterEnabled,
        Self::EmailVerificationEnabled,
        Self::GitHubOAuthEnabled,
        Self::WeChatAuthEnabled,
        Self::ServerAddress,
        Self::SmtpServer,
        Self::SmtpAccount,
        Self::SmtpToken,
        Self::GitHubClientId,
        Self::GitHubClientSecret,
        Self::WeChatServerAddress,
        Self::WeChatAccountQrCodeImageUrl,
        Self::WeChatServerToken,
    ];

    /// Wire name of the option.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PasswordLoginEnabled => "PasswordLoginEnabled",
            Self::PasswordRegisterEnabled => "PasswordRegisterEnabled",
            Self::EmailVerificationEnabled => "EmailVerificationEnabled",
            Self::GitHubOAuthEnabled => "GitHubOAuthEnabled",
            Self::WeChatAuthEnabled => "WeChatAuthEnabled",
            Self::ServerAddress => "ServerAddress",
            Self::SmtpServer => "SMTPServer",
            Self::SmtpAccount => "SMTPAccount",
            Self::SmtpToken => "SMTPToken",
            Self::GitHubClientId => "GitHubClientId",
            Self::GitHubClientSecret => "GitHubClientSecret",
            Self::WeChatServerAddress => "WeChatServerAddress",
            Self::WeChatServerToken => "WeChatServerToken",
            Self::WeChatAccountQrCodeImageUrl => "WeChatAccountQRCodeImageURL",
        }
    }

    /// Static table entry for this key.
    pub fn spec(self) -> FieldSpec {
        FIELD_TABLE
            .into_iter()
            .find(|spec| spec.key == self)
            .unwrap_or_else(|| unreachable!("every OptionKey has a FIELD_TABLE entry"))
    }

    pub fn group(self) -> OptionGroup {
        self.spec().group
    }

    pub fn is_secret(self) -> bool {
        self.spec().secret
    }

    pub fn policy(self) -> WritePolicy {
        self.spec().policy
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for OptionKey {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == value)
            .ok_or_else(|| format!("unknown option key: {value}"))
    }
}

impl OptionGroup {
    /// Fields of this group in save order.
    pub const fn fields(self) -> &'static [FieldSpec] {
        match self {
            Self::Toggles => TOGGLE_FIELDS,
            Self::Server => SERVER_FIELDS,
            Self::Smtp => SMTP_FIELDS,
            Self::GitHubOAuth => GITHUB_FIELDS,
            Self::WeChat => WECHAT_FIELDS,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Toggles => "authentication toggles",
            Self::Server => "server address",
            Self::Smtp => "SMTP settings",
            Self::GitHubOAuth => "GitHub OAuth settings",
            Self::WeChat => "WeChat login settings",
        }
    }
}

impl fmt::Display for WritePolicy {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Immediate => "toggle",
            Self::TrimmedOnSave => "server address",
            Self::Buffered => "buffered",
        })
    }
}

/// Interpret a stored toggle value. Anything but `"true"` is off.
pub fn parse_toggle(value: &str) -> bool {
    value == "true"
}

/// The string a toggle flips to from `current`.
pub fn negate_toggle(current: &str) -> &'static str {
    if parse_toggle(current) {
        "false"
    } else {
        "true"
    }
}
