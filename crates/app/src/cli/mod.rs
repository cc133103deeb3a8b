//! Operator commands.

use clap::{Args, Parser, Subcommand};
use storefront_app::{auth::PgAuthService, database, signing::HmacSigner};

mod db;
mod token;
mod user;

#[derive(Debug, Parser)]
#[command(name = "storefront-app", about = "Storefront operator CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    User(user::UserCommand),
    Token(token::TokenCommand),
    Db(db::DbCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::User(command) => command.run().await,
            Commands::Token(command) => command.run().await,
            Commands::Db(command) => command.run().await,
        }
    }
}

#[derive(Debug, Args)]
pub(crate) struct DatabaseArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

impl DatabaseArgs {
    pub(crate) async fn connect(&self) -> Result<sqlx::PgPool, String> {
        database::connect(&self.database_url)
            .await
            .map_err(|error| format!("failed to connect to database: {error}"))
    }
}

#[derive(Debug, Args)]
pub(crate) struct AuthArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    /// Server-held pepper keying API token verifiers
    #[arg(long, env = "AUTH_TOKEN_PEPPER", hide_env_values = true)]
    token_pepper: String,
}

impl AuthArgs {
    pub(crate) async fn service(&self) -> Result<PgAuthService, String> {
        let signer = HmacSigner::new(self.token_pepper.as_bytes())
            .map_err(|error| format!("invalid token pepper: {error}"))?;

        Ok(PgAuthService::new(self.database.connect().await?, signer))
    }
}
