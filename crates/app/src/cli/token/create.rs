use clap::Args;
use jiff::Timestamp;
use storefront_app::domain::users::records::UserUuid;
use uuid::Uuid;

use crate::cli::AuthArgs;

#[derive(Debug, Args)]
pub(crate) struct CreateTokenArgs {
    #[command(flatten)]
    auth: AuthArgs,

    /// User that should own the token
    #[arg(long)]
    user_uuid: Uuid,

    /// Optional expiry (RFC 3339)
    #[arg(long)]
    expires_at: Option<Timestamp>,
}

pub(crate) async fn run(args: CreateTokenArgs) -> Result<(), String> {
    if let Some(expires_at) = args.expires_at
        && expires_at <= Timestamp::now()
    {
        return Err("expires-at must be in the future".to_string());
    }

    let service = args.auth.service().await?;

    let issued = service
        .issue_api_token(UserUuid::from_uuid(args.user_uuid), args.expires_at)
        .await
        .map_err(|error| format!("failed to create token: {error}"))?;

    println!("token_uuid: {}", issued.metadata.uuid);
    println!("user_uuid: {}", issued.metadata.user_uuid);
    println!("token_version: {}", issued.metadata.version.as_i16());
    if let Some(expires_at) = issued.metadata.expires_at {
        println!("expires_at: {expires_at}");
    }
    println!("api_token: {}", issued.token);
    println!("store this token now; it is only shown once");

    Ok(())
}
