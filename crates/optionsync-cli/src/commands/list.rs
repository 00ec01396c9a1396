use optionsync_core::OptionKey;

use crate::commands::common::{format_option_lines, open_controller, option_list_items, Connection};
use crate::error::CliError;

pub async fn run_list(
    connection: &Connection,
    as_json: bool,
    show_secrets: bool,
) -> Result<(), CliError> {
    let controller = open_controller(connection).await?;
    let items = option_list_items(controller.inputs(), show_secrets);

    if as_json {
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        for line in format_option_lines(&items) {
            println!("{line}");
        }
    }

    Ok(())
}

pub async fn run_get(connection: &Connection, key: OptionKey) -> Result<(), CliError> {
    let controller = open_controller(connection).await?;
    println!("{}", controller.value(key));
    Ok(())
}
