use clap::Args;
use storefront_app::domain::users::{
    PgUsersService, UsersService,
    data::NewUser,
    records::{Role, UserUuid},
};

use crate::cli::DatabaseArgs;

#[derive(Debug, Args)]
pub(crate) struct CreateUserArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    /// Login email, unique case-insensitively
    #[arg(long)]
    email: String,

    /// Display name
    #[arg(long)]
    name: String,

    /// `customer` or `admin`
    #[arg(long, default_value = "customer")]
    role: Role,
}

pub(crate) async fn run(args: CreateUserArgs) -> Result<(), String> {
    let service = PgUsersService::new(args.database.connect().await?);

    let user = service
        .create_user(NewUser {
            uuid: UserUuid::new(),
            email: args.email,
            name: args.name,
            role: args.role,
        })
        .await
        .map_err(|error| format!("failed to create user: {error}"))?;

    println!("user_uuid: {}", user.uuid);
    println!("email: {}", user.email);
    println!("role: {}", user.role);

    Ok(())
}
