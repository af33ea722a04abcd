//! Subcommand implementations.

pub mod login;
pub mod logout;
pub mod profile;
pub mod refresh_token;
pub mod register;
pub mod update_profile;
pub mod whoami;
