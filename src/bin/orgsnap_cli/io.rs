//! Small input helpers for the command handlers.

#![deny(clippy::all, clippy::pedantic)]

use std::path::Path;

use orgsnap_api_types::ResourceSelection;

use crate::client::CliError;

pub fn read_bytes(path: &Path) -> Result<Vec<u8>, CliError> {
    std::fs::read(path).map_err(|source| CliError::InputFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse repeated `--resource` values into a selection.
///
/// `TYPE` selects every resource of that type; `TYPE:id1,id2` pins specific
/// ids. Repeating a bare `TYPE` after an id list widens it back to all.
pub fn parse_selection(resources: &[String]) -> Result<ResourceSelection, CliError> {
    let mut selection = ResourceSelection::new();
    for entry in resources {
        match entry.split_once(':') {
            None => {
                if entry.trim().is_empty() {
                    return Err(CliError::InvalidInput(
                        "resource type must not be empty".to_string(),
                    ));
                }
                selection.select_all(entry.trim());
            }
            Some((resource_type, ids)) => {
                let resource_type = resource_type.trim();
                if resource_type.is_empty() {
                    return Err(CliError::InvalidInput(format!(
                        "missing resource type in `{entry}`"
                    )));
                }
                let ids: Vec<String> = ids
                    .split(',')
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(ToString::to_string)
                    .collect();
                if ids.is_empty() {
                    return Err(CliError::InvalidInput(format!(
                        "`{entry}` names no resource ids; use `{resource_type}` to select all"
                    )));
                }
                selection.select_ids(resource_type, ids);
            }
        }
    }
    Ok(selection)
}
