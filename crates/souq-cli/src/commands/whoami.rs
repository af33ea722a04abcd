//! Whoami command implementation.

use anyhow::Result;
use clap::Args;

use crate::output;
use crate::session::CliContext;

#[derive(Args, Debug)]
pub struct WhoamiArgs {}

pub async fn run(_args: WhoamiArgs) -> Result<()> {
    let ctx = CliContext::load().await?;

    let Some(user) = ctx.client.session().user() else {
        anyhow::bail!("Session could not be restored. Run 'souq login' again.");
    };

    output::field("User", &user.email);
    if let Some(name) = &user.display_name {
        output::field("Name", name);
    }
    output::field("API", ctx.api.as_str());

    Ok(())
}
