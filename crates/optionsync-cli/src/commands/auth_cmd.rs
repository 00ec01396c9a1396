use optionsync_core::util::normalize_text_option;

use crate::cli::AuthCommands;
use crate::config_profiles::CliProfilesConfig;
use crate::credentials::TokenStore;
use crate::error::CliError;

pub fn run_auth(
    command: AuthCommands,
    global_profile: Option<&str>,
    global_token: Option<String>,
) -> Result<(), CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(global_profile);
    let store = TokenStore::new(&profile_name);

    match command {
        AuthCommands::Login => {
            let token = normalize_text_option(global_token).ok_or_else(|| {
                CliError::Auth("Pass the root access token with `--token <TOKEN>`".to_string())
            })?;
            if config.profile(&profile_name).is_none() {
                tracing::warn!(
                    "Profile '{}' has no base URL yet; run `optionsync config init`",
                    profile_name
                );
            }
            store.save(&token)?;
            println!("Stored root access token for profile '{profile_name}'");
        }
        AuthCommands::Status => {
            if store.load()?.is_some() {
                println!("Profile '{profile_name}' has a stored root access token.");
            } else {
                println!("Profile '{profile_name}' has no stored root access token.");
            }
        }
        AuthCommands::Logout => {
            store.clear()?;
            println!("Removed root access token for profile '{profile_name}'");
        }
    }
    Ok(())
}
