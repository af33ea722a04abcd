//! Profile command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::output;
use crate::session::CliContext;

#[derive(Args, Debug)]
pub struct ProfileArgs {}

pub async fn run(_args: ProfileArgs) -> Result<()> {
    let ctx = CliContext::load().await?;

    let user = ctx
        .client
        .profile()
        .await
        .context("Failed to fetch profile")?;

    output::field("User", &user.email);
    if let Some(name) = &user.display_name {
        output::field("Name", name);
    }
    if let Some(bio) = &user.bio {
        output::field("Bio", bio);
    }
    if let Some(location) = &user.location {
        output::field("Location", location);
    }
    output::field("Verified", if user.verified { "yes" } else { "no" });
    if let Some(created) = &user.created_at {
        output::field("Member since", &created.format("%Y-%m-%d").to_string());
    }

    Ok(())
}
