//! Refresh token command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use crate::output;
use crate::session::CliContext;

#[derive(Args, Debug)]
pub struct RefreshTokenArgs {}

pub async fn run(_args: RefreshTokenArgs) -> Result<()> {
    let ctx = CliContext::open()?;

    eprintln!("{}", "Renewing access token...".dimmed());

    if !ctx.client.refresh().await {
        anyhow::bail!("Renewal failed. Run 'souq login' to start a new session.");
    }

    // Save the updated session: the renewal may have rotated the cookie
    ctx.save().context("Failed to save refreshed session")?;

    output::success("Access token renewed");

    Ok(())
}
