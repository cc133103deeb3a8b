//! `db` subcommands.

use clap::{Args, Subcommand};
use storefront_app::database;

use crate::cli::DatabaseArgs;

#[derive(Debug, Args)]
pub(crate) struct DbCommand {
    #[command(subcommand)]
    command: DbSubcommand,
}

#[derive(Debug, Subcommand)]
enum DbSubcommand {
    /// Apply pending schema migrations
    Migrate(DatabaseArgs),
}

impl DbCommand {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            DbSubcommand::Migrate(args) => {
                let pool = args.connect().await?;

                database::migrate(&pool)
                    .await
                    .map_err(|error| format!("failed to apply migrations: {error}"))?;

                println!("migrations applied");

                Ok(())
            }
        }
    }
}
