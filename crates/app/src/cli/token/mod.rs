//! `token` subcommands: bearer tokens for shoppers and staff.

use clap::{Args, Subcommand};

mod create;
mod list;
mod revoke;

#[derive(Debug, Args)]
pub(crate) struct TokenCommand {
    #[command(subcommand)]
    action: TokenAction,
}

#[derive(Debug, Subcommand)]
enum TokenAction {
    /// Issue a token for a user and print it once
    Create(create::CreateTokenArgs),

    /// Show a user's tokens without their secrets
    List(list::ListTokensArgs),

    /// Stop a token from authenticating
    Revoke(revoke::RevokeTokenArgs),
}

impl TokenCommand {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.action {
            TokenAction::Create(args) => create::run(args).await,
            TokenAction::List(args) => list::run(args).await,
            TokenAction::Revoke(args) => revoke::run(args).await,
        }
    }
}
