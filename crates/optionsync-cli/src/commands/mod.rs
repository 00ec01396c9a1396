pub mod auth_cmd;
pub mod common;
pub mod completions;
pub mod config;
pub mod group;
pub mod list;
pub mod server;
pub mod toggle;
