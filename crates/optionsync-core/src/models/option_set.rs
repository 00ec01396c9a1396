//! Key/value mirror of the remote option store

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::option::OptionKey;

/// One `{key, value}` pair as carried on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionEntry {
    pub key: String,
    pub value: String,
}

impl OptionEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Option name to string value. Booleans are stored as `"true"`/`"false"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionSet {
    values: BTreeMap<String, String>,
}

impl OptionSet {
    /// A set holding every known key mapped to the empty string.
    pub fn with_known_keys() -> Self {
        let values = OptionKey::ALL
            .into_iter()
            .map(|key| (key.as_str().to_string(), String::new()))
            .collect();
        Self { values }
    }

    /// Known keys defaulted to empty, overlaid with `entries`.
    ///
    /// Later duplicates win. Keys outside the known set are kept.
    pub fn from_entries(entries: impl IntoIterator<Item = OptionEntry>) -> Self {
        let mut set = Self::with_known_keys();
        for entry in entries {
            set.values.insert(entry.key, entry.value);
        }
        set
    }

    pub fn get(&self, key: OptionKey) -> &str {
        self.get_raw(key.as_str()).unwrap_or_default()
    }

    pub fn get_raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: OptionKey, value: impl Into<String>) {
        self.values.insert(key.as_str().to_string(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
