//! Settings synchronization controller.
//!
//! Mirrors the remote option store into editable local state, keeps a
//! separate snapshot of server-confirmed values, and decides per field when
//! an edit is written back.

use crate::error::{Error, Result};
use crate::models::{negate_toggle, FieldSpec, OptionGroup, OptionKey, OptionSet, WritePolicy};
use crate::notify::Notifier;
use crate::store::OptionStore;
use crate::util::strip_one_trailing_slash;

/// Why a group save left a field alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The value matches the last server-confirmed value
    Unchanged,
    /// A blank secret means "keep the stored secret"
    BlankSecret,
    /// Toggles are written when flipped, never by a save
    Toggle,
}

/// Per-field outcome of one group save.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupSaveReport {
    pub written: Vec<OptionKey>,
    pub skipped: Vec<(OptionKey, SkipReason)>,
    pub failed: Vec<(OptionKey, String)>,
}

impl GroupSaveReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Store calls take `&mut self`, so one controller never has two requests in
/// flight and a save cannot overlap another save or toggle.
pub struct SettingsSyncController<S, N> {
    store: S,
    notifier: N,
    inputs: OptionSet,
    snapshot: OptionSet,
}

impl<S: OptionStore, N: Notifier> SettingsSyncController<S, N> {
    pub fn new(store: S, notifier: N) -> Self {
        Self {
            store,
            notifier,
            inputs: OptionSet::with_known_keys(),
            snapshot: OptionSet::with_known_keys(),
        }
    }

    /// Editable values, including unsaved buffered edits.
    pub const fn inputs(&self) -> &OptionSet {
        &self.inputs
    }

    /// Last server-confirmed values.
    pub const fn snapshot(&self) -> &OptionSet {
        &self.snapshot
    }

    pub fn value(&self, key: OptionKey) -> &str {
        self.inputs.get(key)
    }

    /// Replace local state with the store's full option list.
    ///
    /// On failure the message is surfaced and state is left untouched.
    pub async fn load(&mut self) -> bool {
        let result = self.store.fetch_all().await;

        match result {
            Ok(entries) => {
                let fetched = OptionSet::from_entries(entries);
                tracing::debug!(count = fetched.len(), "Loaded options");
                self.inputs = fetched.clone();
                self.snapshot = fetched;
                true
            }
            Err(error) => {
                let error = Error::from(error);
                tracing::warn!("Failed to load options: {}", error);
                self.notifier.error(&error.to_string());
                false
            }
        }
    }

    /// Flip a toggle away from `current_value` and write it immediately.
    ///
    /// Returns `Ok(false)` when the store rejected the write; the local value
    /// then stays as it was.
    pub async fn set_toggle(&mut self, key: OptionKey, current_value: &str) -> Result<bool> {
        require_policy(key, WritePolicy::Immediate)?;
        let value = negate_toggle(current_value);
        Ok(self.write(key, value.to_string()).await)
    }

    /// Flip a toggle using its current local value.
    pub async fn toggle(&mut self, key: OptionKey) -> Result<bool> {
        let current = self.inputs.get(key).to_string();
        self.set_toggle(key, &current).await
    }

    /// Buffer a text edit locally. Nothing is sent until the group is saved.
    pub fn edit_buffered(&mut self, key: OptionKey, value: impl Into<String>) -> Result<()> {
        match key.policy() {
            WritePolicy::Buffered | WritePolicy::TrimmedOnSave => {
                self.inputs.set(key, value);
                Ok(())
            }
            WritePolicy::Immediate => Err(Error::PolicyMismatch {
                key,
                expected: WritePolicy::Buffered,
            }),
        }
    }

    /// Write the server address with one trailing `/` removed.
    ///
    /// The write happens even when the value matches the snapshot.
    pub async fn save_server_address(&mut self) -> bool {
        let report = self.save_fields(OptionGroup::Server.fields()).await;
        report.is_success() && !report.written.is_empty()
    }

    /// Save one buffered group in its declared order.
    pub async fn save_group(&mut self, group: OptionGroup) -> GroupSaveReport {
        let report = self.save_fields(group.fields()).await;
        if report.is_success() && !report.written.is_empty() {
            self.notifier.success(&format!("Saved {}", group.label()));
        }
        report
    }

    /// Write each field in order by its write policy, one request at a time.
    ///
    /// Buffered fields are written when they differ from the snapshot, except
    /// that a blank secret is never sent. `TrimmedOnSave` fields always go out
    /// with one trailing `/` removed. Toggles are skipped. A failed write is
    /// surfaced and the remaining fields are still attempted.
    pub async fn save_fields(&mut self, fields: &[FieldSpec]) -> GroupSaveReport {
        let mut report = GroupSaveReport::default();

        for field in fields {
            let current = self.inputs.get(field.key);
            let value = match field.policy {
                WritePolicy::Immediate => {
                    report.skipped.push((field.key, SkipReason::Toggle));
                    continue;
                }
                WritePolicy::TrimmedOnSave => strip_one_trailing_slash(current).to_string(),
                WritePolicy::Buffered => {
                    if current == self.snapshot.get(field.key) {
                        report.skipped.push((field.key, SkipReason::Unchanged));
                        continue;
                    }
                    if field.secret && current.is_empty() {
                        report.skipped.push((field.key, SkipReason::BlankSecret));
                        continue;
                    }
                    current.to_string()
                }
            };

            match self.try_write(field.key, value).await {
                Ok(()) => report.written.push(field.key),
                Err(message) => report.failed.push((field.key, message)),
            }
        }

        report
    }

    async fn write(&mut self, key: OptionKey, value: String) -> bool {
        self.try_write(key, value).await.is_ok()
    }

    /// Send one option; on success both local state and snapshot take the
    /// new value, on failure neither changes and the message is surfaced.
    async fn try_write(&mut self, key: OptionKey, value: String) -> std::result::Result<(), String> {
        let result = self.store.update(key.as_str(), &value).await;

        match result {
            Ok(()) => {
                tracing::info!(key = key.as_str(), "Option updated");
                self.inputs.set(key, value.clone());
                self.snapshot.set(key, value);
                Ok(())
            }
            Err(error) => {
                let message = Error::from(error).to_string();
                tracing::warn!(key = key.as_str(), "Option update failed: {}", message);
                self.notifier.error(&message);
                Err(message)
            }
        }
    }
}

fn require_policy(key: OptionKey, expected: WritePolicy) -> Result<()> {
    if key.policy() == expected {
        Ok(())
    } else {
        Err(Error::PolicyMismatch { key, expected })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::OptionEntry;
    use crate::store::{StoreError, StoreResult};

    #[derive(Default)]
    struct FakeStore {
        entries: Vec<OptionEntry>,
        fetch_error: Option<String>,
        failing_keys: HashSet<&'static str>,
        writes: RefCell<Vec<(String, String)>>,
    }

    impl FakeStore {
        fn with_entries(entries: &[(&str, &str)]) -> Self {
            Self {
                entries: entries
                    .iter()
                    .map(|(key, value)| OptionEntry::new(*key, *value))
                    .collect(),
                ..Self::default()
            }
        }

        fn failing(mut self, key: &'static str) -> Self {
            self.failing_keys.insert(key);
            self
        }

        fn writes(&self) -> Vec<(String, String)> {
            self.writes.borrow().clone()
        }
    }

    impl OptionStore for FakeStore {
        async fn fetch_all(&self) -> StoreResult<Vec<OptionEntry>> {
            match &self.fetch_error {
                Some(message) => Err(StoreError::Rejected(message.clone())),
                None => Ok(self.entries.clone()),
            }
        }

        async fn update(&self, key: &str, value: &str) -> StoreResult<()> {
            self.writes
                .borrow_mut()
                .push((key.to_string(), value.to_string()));
            if self.failing_keys.contains(key) {
                Err(StoreError::Rejected(format!("{key} rejected")))
            } else {
                Ok(())
            }
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        errors: RefCell<Vec<String>>,
        successes: RefCell<Vec<String>>,
    }

    impl Notifier for RecordingNotifier {
        fn error(&self, message: &str) {
            self.errors.borrow_mut().push(message.to_string());
        }

        fn success(&self, message: &str) {
            self.successes.borrow_mut().push(message.to_string());
        }
    }

    fn write(key: &str, value: &str) -> (String, String) {
        (key.to_string(), value.to_string())
    }

    #[tokio::test]
    async fn load_overlays_fetched_values_on_known_keys() {
        let store = FakeStore::with_entries(&[("PasswordLoginEnabled", "true")]);
        let notifier = RecordingNotifier::default();
        let mut controller = SettingsSyncController::new(&store, &notifier);

        assert!(controller.load().await);
        assert_eq!(controller.value(OptionKey::PasswordLoginEnabled), "true");
        assert_eq!(controller.value(OptionKey::SmtpServer), "");
        assert_eq!(
            controller.snapshot().get(OptionKey::PasswordLoginEnabled),
            "true"
        );
        assert!(notifier.errors.borrow().is_empty());
    }

    #[tokio::test]
    async fn load_failure_keeps_prior_state_and_notifies_once() {
        let store = FakeStore {
            fetch_error: Some("root access required".to_string()),
            ..FakeStore::default()
        };
        let notifier = RecordingNotifier::default();
        let mut controller = SettingsSyncController::new(&store, &notifier);
        controller
            .edit_buffered(OptionKey::SmtpServer, "smtp.local")
            .unwrap();

        assert!(!controller.load().await);
        assert_eq!(controller.value(OptionKey::SmtpServer), "smtp.local");
        assert_eq!(*notifier.errors.borrow(), vec!["root access required"]);
    }

    #[tokio::test]
    async fn load_discards_unsaved_edits() {
        let store = FakeStore::with_entries(&[("SMTPServer", "smtp.example.com")]);
        let mut controller = SettingsSyncController::new(&store, RecordingNotifier::default());
        controller
            .edit_buffered(OptionKey::SmtpServer, "draft")
            .unwrap();

        controller.load().await;
        assert_eq!(controller.value(OptionKey::SmtpServer), "smtp.example.com");
    }

    #[tokio::test]
    async fn toggle_writes_negated_value_for_every_toggle() {
        for field in OptionGroup::Toggles.fields() {
            let key = field.key.as_str();
            for (current, expected) in [("true", "false"), ("false", "true")] {
                let store = FakeStore::with_entries(&[(key, current)]);
                let mut controller =
                    SettingsSyncController::new(&store, RecordingNotifier::default());
                controller.load().await;

                let written = controller.set_toggle(field.key, current).await.unwrap();

                assert!(written, "{key} from {current}");
                assert_eq!(store.writes(), vec![write(key, expected)]);
                assert_eq!(controller.value(field.key), expected);
                assert_eq!(controller.snapshot().get(field.key), expected);
            }
        }
    }

    #[tokio::test]
    async fn failed_toggle_leaves_value_unchanged() {
        let store = FakeStore::with_entries(&[("GitHubOAuthEnabled", "false")])
            .failing("GitHubOAuthEnabled");
        let notifier = RecordingNotifier::default();
        let mut controller = SettingsSyncController::new(&store, &notifier);
        controller.load().await;

        let written = controller.toggle(OptionKey::GitHubOAuthEnabled).await.unwrap();

        assert!(!written);
        assert_eq!(store.writes(), vec![write("GitHubOAuthEnabled", "true")]);
        assert_eq!(controller.value(OptionKey::GitHubOAuthEnabled), "false");
        assert_eq!(*notifier.errors.borrow(), vec!["GitHubOAuthEnabled rejected"]);
    }

    #[tokio::test]
    async fn toggle_rejects_buffered_keys_without_network() {
        let store = FakeStore::default();
        let mut controller = SettingsSyncController::new(&store, RecordingNotifier::default());

        let error = controller
            .set_toggle(OptionKey::SmtpServer, "true")
            .await
            .unwrap_err();

        assert_eq!(
            error,
            Error::PolicyMismatch {
                key: OptionKey::SmtpServer,
                expected: WritePolicy::Immediate,
            }
        );
        assert!(store.writes().is_empty());
    }

    #[tokio::test]
    async fn edit_buffered_rejects_toggles_and_stays_local() {
        let store = FakeStore::default();
        let mut controller = SettingsSyncController::new(&store, RecordingNotifier::default());

        assert!(controller
            .edit_buffered(OptionKey::WeChatAuthEnabled, "true")
            .is_err());
        controller
            .edit_buffered(OptionKey::GitHubClientId, "first")
            .unwrap();
        controller
            .edit_buffered(OptionKey::GitHubClientId, "second")
            .unwrap();

        assert_eq!(controller.value(OptionKey::GitHubClientId), "second");
        assert!(store.writes().is_empty());
    }

    #[tokio::test]
    async fn save_server_address_strips_one_trailing_slash() {
        for (input, expected) in [
            ("https://x.com/", "https://x.com"),
            ("https://x.com", "https://x.com"),
            ("https://x.com//", "https://x.com/"),
        ] {
            let store = FakeStore::default();
            let mut controller =
                SettingsSyncController::new(&store, RecordingNotifier::default());
            controller
                .edit_buffered(OptionKey::ServerAddress, input)
                .unwrap();

            assert!(controller.save_server_address().await);
            assert_eq!(store.writes(), vec![write("ServerAddress", expected)]);
            assert_eq!(controller.value(OptionKey::ServerAddress), expected);
        }
    }

    #[tokio::test]
    async fn save_server_address_writes_even_when_unchanged() {
        let store = FakeStore::with_entries(&[("ServerAddress", "https://x.com")]);
        let mut controller = SettingsSyncController::new(&store, RecordingNotifier::default());
        controller.load().await;

        assert!(controller.save_server_address().await);
        assert_eq!(store.writes(), vec![write("ServerAddress", "https://x.com")]);
    }

    #[tokio::test]
    async fn save_group_server_trims_and_writes_unconditionally() {
        let store = FakeStore::with_entries(&[("ServerAddress", "https://x.com/")]);
        let notifier = RecordingNotifier::default();
        let mut controller = SettingsSyncController::new(&store, &notifier);
        controller.load().await;

        let report = controller.save_group(OptionGroup::Server).await;

        assert_eq!(store.writes(), vec![write("ServerAddress", "https://x.com")]);
        assert_eq!(report.written, vec![OptionKey::ServerAddress]);
        assert_eq!(controller.value(OptionKey::ServerAddress), "https://x.com");

        controller
            .edit_buffered(OptionKey::ServerAddress, "https://y.com//")
            .unwrap();
        controller.save_group(OptionGroup::Server).await;
        assert_eq!(
            store.writes().last(),
            Some(&write("ServerAddress", "https://y.com/"))
        );
        assert_eq!(
            *notifier.successes.borrow(),
            vec!["Saved server address", "Saved server address"]
        );
    }

    #[tokio::test]
    async fn save_group_never_writes_toggles() {
        let store = FakeStore::with_entries(&[("PasswordLoginEnabled", "true")]);
        let mut controller = SettingsSyncController::new(&store, RecordingNotifier::default());
        controller.load().await;

        let report = controller.save_group(OptionGroup::Toggles).await;

        assert!(store.writes().is_empty());
        assert!(report.written.is_empty());
        assert_eq!(report.skipped.len(), OptionGroup::Toggles.fields().len());
        assert!(report
            .skipped
            .iter()
            .all(|(_, reason)| *reason == SkipReason::Toggle));
    }

    #[tokio::test]
    async fn save_group_skips_unchanged_fields() {
        let store = FakeStore::with_entries(&[
            ("SMTPServer", "smtp.example.com"),
            ("SMTPAccount", "ops@example.com"),
        ]);
        let mut controller = SettingsSyncController::new(&store, RecordingNotifier::default());
        controller.load().await;
        controller
            .edit_buffered(OptionKey::SmtpAccount, "alerts@example.com")
            .unwrap();

        let report = controller.save_group(OptionGroup::Smtp).await;

        assert_eq!(store.writes(), vec![write("SMTPAccount", "alerts@example.com")]);
        assert_eq!(report.written, vec![OptionKey::SmtpAccount]);
        assert_eq!(
            report.skipped,
            vec![
                (OptionKey::SmtpServer, SkipReason::Unchanged),
                (OptionKey::SmtpToken, SkipReason::Unchanged),
            ]
        );
    }

    #[tokio::test]
    async fn save_group_never_sends_blank_secret() {
        let store = FakeStore::with_entries(&[("GitHubClientSecret", "old-secret")]);
        let mut controller = SettingsSyncController::new(&store, RecordingNotifier::default());
        controller.load().await;
        controller
            .edit_buffered(OptionKey::GitHubClientSecret, "")
            .unwrap();

        let report = controller.save_group(OptionGroup::GitHubOAuth).await;

        assert!(store.writes().is_empty());
        assert!(report
            .skipped
            .contains(&(OptionKey::GitHubClientSecret, SkipReason::BlankSecret)));
    }

    #[tokio::test]
    async fn save_group_writes_cleared_non_secret_field() {
        let store = FakeStore::with_entries(&[("WeChatServerAddress", "https://wx.example.com")]);
        let mut controller = SettingsSyncController::new(&store, RecordingNotifier::default());
        controller.load().await;
        controller
            .edit_buffered(OptionKey::WeChatServerAddress, "")
            .unwrap();

        let report = controller.save_group(OptionGroup::WeChat).await;

        assert_eq!(store.writes(), vec![write("WeChatServerAddress", "")]);
        assert_eq!(report.written, vec![OptionKey::WeChatServerAddress]);
    }

    #[tokio::test]
    async fn save_group_continues_after_failed_write() {
        let store = FakeStore::default().failing("SMTPAccount");
        let notifier = RecordingNotifier::default();
        let mut controller = SettingsSyncController::new(&store, &notifier);
        controller.load().await;
        controller
            .edit_buffered(OptionKey::SmtpServer, "smtp.example.com")
            .unwrap();
        controller
            .edit_buffered(OptionKey::SmtpAccount, "ops@example.com")
            .unwrap();
        controller
            .edit_buffered(OptionKey::SmtpToken, "app-password")
            .unwrap();

        let report = controller.save_group(OptionGroup::Smtp).await;

        assert_eq!(
            store.writes(),
            vec![
                write("SMTPServer", "smtp.example.com"),
                write("SMTPAccount", "ops@example.com"),
                write("SMTPToken", "app-password"),
            ]
        );
        assert_eq!(
            report.written,
            vec![OptionKey::SmtpServer, OptionKey::SmtpToken]
        );
        assert_eq!(
            report.failed,
            vec![(OptionKey::SmtpAccount, "SMTPAccount rejected".to_string())]
        );
        assert_eq!(*notifier.errors.borrow(), vec!["SMTPAccount rejected"]);
        assert!(notifier.successes.borrow().is_empty());

        // The failed field keeps its edit but not a confirmed snapshot.
        assert_eq!(controller.value(OptionKey::SmtpAccount), "ops@example.com");
        assert_eq!(controller.snapshot().get(OptionKey::SmtpAccount), "");
        assert_eq!(
            controller.snapshot().get(OptionKey::SmtpServer),
            "smtp.example.com"
        );
    }

    #[tokio::test]
    async fn successful_write_updates_snapshot_so_resave_is_noop() {
        let store = FakeStore::default();
        let notifier = RecordingNotifier::default();
        let mut controller = SettingsSyncController::new(&store, &notifier);
        controller
            .edit_buffered(OptionKey::GitHubClientId, "client-123")
            .unwrap();

        controller.save_group(OptionGroup::GitHubOAuth).await;
        let second = controller.save_group(OptionGroup::GitHubOAuth).await;

        assert_eq!(store.writes(), vec![write("GitHubClientId", "client-123")]);
        assert!(second.written.is_empty());
        assert_eq!(*notifier.successes.borrow(), vec!["Saved GitHub OAuth settings"]);
    }

    #[tokio::test]
    async fn wechat_group_saves_token_last() {
        let store = FakeStore::default();
        let mut controller = SettingsSyncController::new(&store, RecordingNotifier::default());
        controller
            .edit_buffered(OptionKey::WeChatServerToken, "wx-token")
            .unwrap();
        controller
            .edit_buffered(OptionKey::WeChatAccountQrCodeImageUrl, "https://img/qr.png")
            .unwrap();
        controller
            .edit_buffered(OptionKey::WeChatServerAddress, "https://wx.example.com")
            .unwrap();

        controller.save_group(OptionGroup::WeChat).await;

        assert_eq!(
            store.writes(),
            vec![
                write("WeChatServerAddress", "https://wx.example.com"),
                write("WeChatAccountQRCodeImageURL", "https://img/qr.png"),
                write("WeChatServerToken", "wx-token"),
            ]
        );
    }
}
