//! Template package commands.

#![deny(clippy::all, clippy::pedantic)]

use orgsnap::application::template::{
    default_template_schema, load_template_package, validate_template,
};

use crate::args::TemplatesCmd;
use crate::client::CliError;

pub fn handle(cmd: TemplatesCmd) -> Result<(), CliError> {
    match cmd {
        TemplatesCmd::Validate { template, schema } => {
            let package = load_template_package(&template)?;
            let schema = match schema {
                Some(path) => load_template_package(&path)?,
                None => default_template_schema(),
            };
            validate_template(&package, &schema)?;
            println!("Template package is valid");
        }
    }
    Ok(())
}
