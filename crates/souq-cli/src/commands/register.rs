//! Register command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use souq_core::ApiUrl;

use crate::output;
use crate::session::CliContext;

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Account email address
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long)]
    pub password: String,

    /// Public display name
    #[arg(long)]
    pub display_name: Option<String>,

    /// Marketplace API base URL
    #[arg(long, default_value = "https://api.souq.example")]
    pub api: String,
}

pub async fn run(args: RegisterArgs) -> Result<()> {
    let api = ApiUrl::new(&args.api).context("Invalid API URL")?;
    let ctx = CliContext::create(api)?;

    eprintln!("{}", "Registering...".dimmed());

    let user = ctx
        .client
        .register(&args.email, &args.password, args.display_name.as_deref())
        .await
        .context("Failed to register")?;

    output::success("Account created");
    output::field("User", &user.email);
    println!();
    println!(
        "{}",
        "Log in with 'souq login' once the account is verified.".dimmed()
    );

    Ok(())
}
