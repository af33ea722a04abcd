//! Logout command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::output;
use crate::session::{CliContext, storage};

#[derive(Args, Debug)]
pub struct LogoutArgs {}

pub async fn run(_args: LogoutArgs) -> Result<()> {
    let ctx = CliContext::load().await?;

    // Local state is cleared regardless of the server call's outcome.
    if let Err(err) = ctx.client.logout().await {
        tracing::warn!(error = %err, "server-side logout failed, clearing local session anyway");
    }
    storage::clear().context("Failed to clear stored session")?;

    output::success("Logged out");

    Ok(())
}
