//! optionsync-core - Core library for optionsync
//!
//! This crate contains the option table, the remote store client, and the
//! settings sync controller shared by the CLI and the reference store.

pub mod controller;
pub mod error;
pub mod models;
pub mod notify;
pub mod store;
pub mod util;

pub use controller::{GroupSaveReport, SettingsSyncController, SkipReason};
pub use error::{Error, Result};
pub use models::{OptionEntry, OptionGroup, OptionKey, OptionSet};
pub use notify::Notifier;
pub use store::{ApiResponse, HttpOptionStore, OptionStore, StoreError};
