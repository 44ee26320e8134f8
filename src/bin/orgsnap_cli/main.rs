//! orgsnap-cli: snapshot lifecycle client for the remote configuration
//! service. Thin command surface over the `orgsnap` library.
#![deny(clippy::all, clippy::pedantic)]

mod args;
mod client;
mod handlers;
mod io;
mod print;
#[cfg(test)]
mod tests;

use clap::Parser;
use tokio_util::sync::CancellationToken;

use args::{Cli, Commands};
use client::{CliError, build_ctx};

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let Cli {
        connection,
        config_file,
        command,
    } = Cli::parse();

    let settings = orgsnap::config::load(config_file.as_deref())?;
    orgsnap::infra::telemetry::init(&settings.logging)?;

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        });
    }

    match command {
        Commands::Snapshots(cmd) => {
            let ctx = build_ctx(&connection, &settings)?;
            handlers::snapshots::handle(&ctx, cmd.action, &cancel).await?;
        }
        Commands::Templates(cmd) => handlers::templates::handle(cmd.action)?,
    }

    Ok(())
}
