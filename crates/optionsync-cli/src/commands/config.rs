use optionsync_core::util::{is_http_url, normalize_text_option};

use crate::cli::ConfigCommands;
use crate::config_profiles::{default_config_path, CliProfilesConfig};
use crate::credentials::TokenStore;
use crate::error::CliError;

pub fn run_config(
    command: ConfigCommands,
    global_profile: Option<&str>,
    global_base_url: Option<String>,
) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init { no_activate } => {
            run_config_init(global_profile, global_base_url, no_activate)
        }
        ConfigCommands::Show => run_config_show(global_profile),
    }
}

pub fn run_config_init(
    profile_name: Option<&str>,
    base_url: Option<String>,
    no_activate: bool,
) -> Result<(), CliError> {
    let mut config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile_name);

    let profile = config.profile_mut_or_default(&profile_name);
    if let Some(url) = normalize_text_option(base_url) {
        profile.base_url = Some(normalize_base_url(&url)?);
    }
    if profile.base_url().is_none() {
        return Err(CliError::Config(format!(
            "Profile '{profile_name}' has no base URL. Pass `--base-url <URL>`."
        )));
    }
    profile.validate().map_err(CliError::Config)?;

    if !no_activate {
        config.active_profile = Some(profile_name.clone());
    }

    let path = config.save().map_err(CliError::Config)?;
    println!(
        "Profile '{}' initialized at {}",
        profile_name,
        path.display()
    );
    if TokenStore::new(&profile_name).load()?.is_none() {
        println!("Run `optionsync auth login --token <TOKEN>` to store the root access token.");
    }
    Ok(())
}

pub fn run_config_show(profile_name: Option<&str>) -> Result<(), CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile_name);
    let path = default_config_path().map_err(CliError::Config)?;

    println!("config:   {}", path.display());
    println!("profile:  {profile_name}");
    let Some(profile) = config.profile(&profile_name) else {
        println!("Profile '{profile_name}' is not configured.");
        return Ok(());
    };
    println!(
        "base_url: {}",
        profile.base_url().as_deref().unwrap_or("(unset)")
    );
    let token_state = if TokenStore::new(&profile_name).load()?.is_some() {
        "stored"
    } else {
        "(none)"
    };
    println!("token:    {token_state}");
    Ok(())
}

/// Require an http(s) URL and drop trailing slashes.
pub fn normalize_base_url(url: &str) -> Result<String, CliError> {
    let trimmed = url.trim();
    if !is_http_url(trimmed) {
        return Err(CliError::Config(
            "base_url must include http:// or https://".to_string(),
        ));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}
