//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::commands;

/// Marketplace CLI tool for session and profile operations.
#[derive(Parser, Debug)]
#[command(name = "souq")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new session (login)
    Login(commands::login::LoginArgs),

    /// Create a new account
    Register(commands::register::RegisterArgs),

    /// End the current session
    Logout(commands::logout::LogoutArgs),

    /// Display the current user
    Whoami(commands::whoami::WhoamiArgs),

    /// Fetch the full profile
    Profile(commands::profile::ProfileArgs),

    /// Update profile fields
    UpdateProfile(commands::update_profile::UpdateProfileArgs),

    /// Force an access-token renewal
    RefreshToken(commands::refresh_token::RefreshTokenArgs),
}
