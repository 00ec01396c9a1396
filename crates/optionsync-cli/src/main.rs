//! optionsync CLI - view and edit system options on a remote option store.

mod cli;
mod commands;
mod config_profiles;
mod credentials;
mod error;

use clap::Parser;
use optionsync_core::{OptionGroup, OptionKey};

use crate::cli::{Cli, Commands};
use crate::commands::auth_cmd::run_auth;
use crate::commands::common::resolve_connection;
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::group::run_group_save;
use crate::commands::list::{run_get, run_list};
use crate::commands::server::run_server_address;
use crate::commands::toggle::run_toggle;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let directive = "optionsync=info"
        .parse()
        .map_err(|error| CliError::Config(format!("invalid log directive: {error}")))?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(directive))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let profile = cli.profile.as_deref();
    let connect = || resolve_connection(profile, cli.base_url.clone(), cli.token.clone());

    match cli.command {
        Commands::List { json, show_secrets } => {
            run_list(&connect()?, json, show_secrets).await?;
        }
        Commands::Get { key } => run_get(&connect()?, key).await?,
        Commands::Toggle { key } => run_toggle(&connect()?, key).await?,
        Commands::ServerAddress { url } => run_server_address(&connect()?, url).await?,
        Commands::Smtp {
            server,
            account,
            smtp_token,
        } => {
            let edits = vec![
                (OptionKey::SmtpServer, server),
                (OptionKey::SmtpAccount, account),
                (OptionKey::SmtpToken, smtp_token),
            ];
            run_group_save(&connect()?, OptionGroup::Smtp, edits).await?;
        }
        Commands::Github {
            client_id,
            client_secret,
        } => {
            let edits = vec![
                (OptionKey::GitHubClientId, client_id),
                (OptionKey::GitHubClientSecret, client_secret),
            ];
            run_group_save(&connect()?, OptionGroup::GitHubOAuth, edits).await?;
        }
        Commands::Wechat {
            server_address,
            server_token,
            qr_code_url,
        } => {
            let edits = vec![
                (OptionKey::WeChatServerAddress, server_address),
                (OptionKey::WeChatServerToken, server_token),
                (OptionKey::WeChatAccountQrCodeImageUrl, qr_code_url),
            ];
            run_group_save(&connect()?, OptionGroup::WeChat, edits).await?;
        }
        Commands::Completions { shell, output } => run_completions(shell, output.as_deref())?,
        Commands::Config { command } => run_config(command, profile, cli.base_url.clone())?,
        Commands::Auth { command } => run_auth(command, profile, cli.token.clone())?,
    }

    Ok(())
}
