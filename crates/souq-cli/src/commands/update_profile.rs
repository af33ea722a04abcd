//! Update-profile command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use souq_core::ProfileUpdate;

use crate::output;
use crate::session::CliContext;

#[derive(Args, Debug)]
pub struct UpdateProfileArgs {
    /// New display name
    #[arg(long)]
    pub display_name: Option<String>,

    /// New bio
    #[arg(long)]
    pub bio: Option<String>,

    /// New location
    #[arg(long)]
    pub location: Option<String>,
}

pub async fn run(args: UpdateProfileArgs) -> Result<()> {
    let update = ProfileUpdate {
        display_name: args.display_name,
        bio: args.bio,
        location: args.location,
    };
    if update.is_empty() {
        anyhow::bail!("Nothing to update; pass at least one of --display-name, --bio, --location.");
    }

    let ctx = CliContext::load().await?;

    eprintln!("{}", "Updating profile...".dimmed());

    let user = ctx
        .client
        .update_profile(&update)
        .await
        .context("Failed to update profile")?;

    output::success("Profile updated");
    output::field("User", &user.email);
    if let Some(name) = &user.display_name {
        output::field("Name", name);
    }

    Ok(())
}
