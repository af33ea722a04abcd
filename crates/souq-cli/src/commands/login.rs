//! Login command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use souq_core::{ApiUrl, Credentials};

use crate::output;
use crate::session::CliContext;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account email address
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long)]
    pub password: String,

    /// Marketplace API base URL
    #[arg(long, default_value = "https://api.souq.example")]
    pub api: String,
}

pub async fn run(args: LoginArgs) -> Result<()> {
    let api = ApiUrl::new(&args.api).context("Invalid API URL")?;
    let ctx = CliContext::create(api)?;
    let credentials = Credentials::new(&args.email, &args.password);

    eprintln!("{}", "Logging in...".dimmed());

    let user = ctx
        .client
        .login(&credentials)
        .await
        .context("Failed to log in")?;

    // Save session
    ctx.save().context("Failed to save session")?;

    // Print success
    output::success("Logged in successfully");
    println!();
    output::field("User", &user.email);
    if let Some(name) = &user.display_name {
        output::field("Name", name);
    }
    output::field("API", ctx.api.as_str());

    Ok(())
}
