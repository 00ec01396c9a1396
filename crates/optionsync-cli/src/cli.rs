use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use optionsync_core::OptionKey;

#[derive(Parser)]
#[command(name = "optionsync")]
#[command(about = "View and edit system options on a remote option store")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// CLI profile name
    #[arg(long, global = true, value_name = "NAME")]
    pub profile: Option<String>,

    /// Option store base URL (overrides the profile)
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Root access token (overrides the keychain)
    #[arg(long, global = true, value_name = "TOKEN")]
    pub token: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List every option
    #[command(alias = "ls")]
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Print secret values instead of masking them
        #[arg(long)]
        show_secrets: bool,
    },
    /// Print one option value
    Get {
        /// Option key, e.g. SMTPServer
        #[arg(value_parser = parse_option_key)]
        key: OptionKey,
    },
    /// Flip an authentication toggle and save it immediately
    Toggle {
        /// Toggle key, e.g. PasswordLoginEnabled
        #[arg(value_parser = parse_option_key)]
        key: OptionKey,
    },
    /// Set the public server address (one trailing slash is removed)
    ServerAddress {
        /// Address such as https://yourdomain.com
        url: String,
    },
    /// Save SMTP settings
    Smtp {
        /// SMTP server host
        #[arg(long, value_name = "HOST")]
        server: Option<String>,
        /// SMTP account
        #[arg(long, value_name = "ACCOUNT")]
        account: Option<String>,
        /// SMTP access token; leave out to keep the stored one
        #[arg(long = "smtp-token", value_name = "TOKEN")]
        smtp_token: Option<String>,
    },
    /// Save GitHub OAuth settings
    Github {
        /// GitHub OAuth client ID
        #[arg(long, value_name = "ID")]
        client_id: Option<String>,
        /// GitHub OAuth client secret; leave out to keep the stored one
        #[arg(long, value_name = "SECRET")]
        client_secret: Option<String>,
    },
    /// Save WeChat login settings
    Wechat {
        /// WeChat server address
        #[arg(long, value_name = "URL")]
        server_address: Option<String>,
        /// WeChat server token; leave out to keep the stored one
        #[arg(long, value_name = "TOKEN")]
        server_token: Option<String>,
        /// WeChat official account QR code image URL
        #[arg(long, value_name = "URL")]
        qr_code_url: Option<String>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Configure CLI profiles
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Manage the stored root access token
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize or update profile config from `--base-url`
    Init {
        /// Keep current active profile instead of activating this one
        #[arg(long)]
        no_activate: bool,
    },
    /// Show the resolved profile
    Show,
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Store the `--token` value in the keychain
    Login,
    /// Show whether a token is stored for the profile
    Status,
    /// Remove the stored token
    Logout,
}

fn parse_option_key(value: &str) -> Result<OptionKey, String> {
    value.parse()
}
