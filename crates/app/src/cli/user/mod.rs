//! `user` subcommands.

use clap::{Args, Subcommand};

mod create;

#[derive(Debug, Args)]
pub(crate) struct UserCommand {
    #[command(subcommand)]
    action: UserAction,
}

#[derive(Debug, Subcommand)]
enum UserAction {
    /// Register a shopper or staff account
    Create(create::CreateUserArgs),
}

impl UserCommand {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.action {
            UserAction::Create(args) => create::run(args).await,
        }
    }
}
