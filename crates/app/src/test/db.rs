//! Per-test Postgres databases inside one shared container.
//!
//! The container starts on first use and lives for the whole test binary. Each
//! [`TestDb`] creates its own database, applies the migrations, and queues the
//! database to be dropped when it goes out of scope.

use once_cell::sync::Lazy;
use sqlx::{Connection, PgConnection, PgPool, query};
use testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres as PostgresImage;
use tokio::sync::{OnceCell, mpsc};
use uuid::Uuid;

use crate::database;

const USER: &str = "storefront_test";
const PASSWORD: &str = "storefront_test_password";
const MAINTENANCE_DATABASE: &str = "postgres";

/// The schema uses `UNIQUE NULLS NOT DISTINCT`, which needs Postgres 15 or later.
const POSTGRES_TAG: &str = "16-alpine";

static CONTAINER: Lazy<OnceCell<ContainerAsync<PostgresImage>>> = Lazy::new(OnceCell::new);

static DROP_QUEUE: Lazy<OnceCell<mpsc::UnboundedSender<String>>> = Lazy::new(OnceCell::new);

async fn start_container() -> ContainerAsync<PostgresImage> {
    PostgresImage::default()
        .with_user(USER)
        .with_password(PASSWORD)
        .with_db_name(MAINTENANCE_DATABASE)
        .with_tag(POSTGRES_TAG)
        .start()
        .await
        .expect("Failed to start PostgreSQL container")
}

async fn server_url(database: &str) -> String {
    let container = CONTAINER.get_or_init(start_container).await;

    let port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("Failed to get container port");

    let host =
        std::env::var("TESTCONTAINERS_HOST_OVERRIDE").unwrap_or_else(|_unset| "localhost".into());

    format!("postgresql://{USER}:{PASSWORD}@{host}:{port}/{database}")
}

/// Only names this module generates are ever interpolated into DDL.
fn is_test_database_name(name: &str) -> bool {
    name.starts_with("storefront_test_")
        && name.len() <= 63
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn unique_database_name() -> String {
    format!("storefront_test_{}", Uuid::now_v7().simple())
}

async fn start_drop_worker() -> mpsc::UnboundedSender<String> {
    let (sender, mut receiver) = mpsc::unbounded_channel::<String>();

    tokio::spawn(async move {
        while let Some(name) = receiver.recv().await {
            if let Err(error) = drop_database(&name).await {
                eprintln!("Failed to drop test database '{name}': {error}");
            }
        }
    });

    sender
}

async fn drop_database(name: &str) -> Result<(), sqlx::Error> {
    if !is_test_database_name(name) {
        return Ok(());
    }

    let mut conn = PgConnection::connect(&server_url(MAINTENANCE_DATABASE).await).await?;

    query(&format!("DROP DATABASE IF EXISTS \"{name}\" WITH (FORCE)"))
        .execute(&mut conn)
        .await?;

    conn.close().await
}

/// An isolated, migrated database.
///
/// Services commit normally; isolation comes from every test owning a fresh
/// database rather than from rolling transactions back.
#[derive(Debug)]
pub struct TestDb {
    pool: PgPool,
    name: String,
}

impl TestDb {
    pub async fn new() -> Self {
        DROP_QUEUE.get_or_init(start_drop_worker).await;

        let name = unique_database_name();

        let mut admin = PgConnection::connect(&server_url(MAINTENANCE_DATABASE).await)
            .await
            .expect("Failed to connect to maintenance database");

        query(&format!("CREATE DATABASE \"{name}\""))
            .execute(&mut admin)
            .await
            .expect("Failed to create test database");

        admin
            .close()
            .await
            .expect("Failed to close maintenance connection");

        let pool = PgPool::connect(&server_url(&name).await)
            .await
            .expect("Failed to connect to test database");

        database::migrate(&pool)
            .await
            .expect("Failed to run migrations on test database");

        Self { pool, name }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        if let Some(sender) = DROP_QUEUE.get() {
            // The worker is gone only when the runtime is shutting down.
            let _ignored = sender.send(self.name.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_names_are_safe_identifiers() {
        let name = unique_database_name();

        assert!(is_test_database_name(&name), "{name} should be accepted");
        assert_ne!(name, unique_database_name(), "names should be unique");
    }

    #[test]
    fn foreign_names_are_never_dropped() {
        for name in ["postgres", "storefront_test_\"; DROP ROLE x; --", "other_db"] {
            assert!(!is_test_database_name(name), "{name} should be refused");
        }
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the Postgres testcontainer"]
    async fn migrated_database_accepts_queries() {
        let test_db = TestDb::new().await;

        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = 'orders'",
        )
        .fetch_one(test_db.pool())
        .await
        .expect("Failed to query information_schema");

        assert_eq!(tables, 1, "orders table should exist after migrations");
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the Postgres testcontainer"]
    async fn container_supports_nulls_not_distinct() {
        let test_db = TestDb::new().await;

        let version: String = sqlx::query_scalar("SHOW server_version_num")
            .fetch_one(test_db.pool())
            .await
            .expect("Failed to read server version");

        let version: u32 = version.parse().expect("server_version_num is numeric");

        assert!(version >= 150_000, "Postgres {version} predates NULLS NOT DISTINCT");
    }
}
