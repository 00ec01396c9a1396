use optionsync_core::models::parse_toggle;
use optionsync_core::OptionKey;

use crate::commands::common::{open_controller, Connection};
use crate::error::CliError;

pub async fn run_toggle(connection: &Connection, key: OptionKey) -> Result<(), CliError> {
    let mut controller = open_controller(connection).await?;
    if !controller.toggle(key).await? {
        return Err(CliError::WriteFailed(key.to_string()));
    }

    let state = if parse_toggle(controller.value(key)) {
        "enabled"
    } else {
        "disabled"
    };
    println!("{key} {state}");
    Ok(())
}
