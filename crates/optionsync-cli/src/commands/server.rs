use optionsync_core::OptionKey;

use crate::commands::common::{open_controller, Connection};
use crate::error::CliError;

pub async fn run_server_address(connection: &Connection, url: String) -> Result<(), CliError> {
    let mut controller = open_controller(connection).await?;
    controller.edit_buffered(OptionKey::ServerAddress, url)?;
    if !controller.save_server_address().await {
        return Err(CliError::WriteFailed(OptionKey::ServerAddress.to_string()));
    }

    println!(
        "{} = {}",
        OptionKey::ServerAddress,
        controller.value(OptionKey::ServerAddress)
    );
    Ok(())
}
