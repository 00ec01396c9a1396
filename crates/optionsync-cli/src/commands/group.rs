use optionsync_core::{OptionGroup, OptionKey};

use crate::commands::common::{format_save_report, open_controller, Connection};
use crate::error::CliError;

/// Apply the provided edits to one group and save it.
///
/// Fields left as `None` keep their loaded value and are skipped as unchanged.
pub async fn run_group_save(
    connection: &Connection,
    group: OptionGroup,
    edits: Vec<(OptionKey, Option<String>)>,
) -> Result<(), CliError> {
    let mut controller = open_controller(connection).await?;
    for (key, value) in edits {
        if let Some(value) = value {
            controller.edit_buffered(key, value)?;
        }
    }

    let report = controller.save_group(group).await;
    if report.written.is_empty() && report.is_success() {
        println!("Nothing to save for {}", group.label());
    }
    for line in format_save_report(&report) {
        println!("{line}");
    }

    if report.is_success() {
        Ok(())
    } else {
        Err(CliError::SaveFailed {
            label: group.label(),
            count: report.failed.len(),
        })
    }
}
