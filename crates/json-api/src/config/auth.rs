//! Auth Config

use clap::Args;

/// API token settings.
#[derive(Debug, Args)]
pub struct AuthConfig {
    /// Server-held pepper mixed into API token verifiers
    #[arg(long, env = "AUTH_TOKEN_PEPPER", hide_env_values = true)]
    pub token_pepper: String,
}
