//! Database migration commands.
//!
//! Each service owns a schema and its own `migrations/` directory. The
//! connection string is `<SERVICE>_DATABASE_URL`, falling back to
//! `DATABASE_URL`.
//!
//! ```bash
//! bazaar-cli migrate users
//! bazaar-cli migrate all
//! ```
//!
//! When the services share one database they also share its
//! `_sqlx_migrations` table, so every migrator ignores versions applied by
//! the other services.

use bazaar_web::config::get_database_url;
use bazaar_web::db::create_pool;
use sqlx::migrate::Migrator;

use super::CliError;

fn shared(mut migrator: Migrator) -> Migrator {
    migrator.set_ignore_missing(true);
    migrator
}

fn users_migrator() -> Migrator {
    shared(sqlx::migrate!("../users/migrations"))
}

fn catalog_migrator() -> Migrator {
    shared(sqlx::migrate!("../catalog/migrations"))
}

fn orders_migrator() -> Migrator {
    shared(sqlx::migrate!("../orders/migrations"))
}

/// Run the user service migrations (`identity` schema).
///
/// # Errors
///
/// Returns error if the database URL is missing, the connection fails or a
/// migration fails.
pub async fn users() -> Result<(), CliError> {
    run("users", "USERS_DATABASE_URL", &users_migrator()).await
}

/// Run the catalog service migrations (`catalog` schema).
///
/// # Errors
///
/// See [`users`].
pub async fn catalog() -> Result<(), CliError> {
    run("catalog", "CATALOG_DATABASE_URL", &catalog_migrator()).await
}

/// Run the order service migrations (`sales` schema).
///
/// # Errors
///
/// See [`users`].
pub async fn orders() -> Result<(), CliError> {
    run("orders", "ORDERS_DATABASE_URL", &orders_migrator()).await
}

async fn run(service: &str, url_key: &str, migrator: &Migrator) -> Result<(), CliError> {
    let database_url = get_database_url(url_key)?;

    tracing::info!(service, "Connecting to database...");
    let pool = create_pool(&database_url).await?;

    tracing::info!(service, migrations = migrator.iter().count(), "Running migrations...");
    migrator.run(&pool).await?;

    tracing::info!(service, "Migrations complete");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn all() -> [Migrator; 3] {
        [users_migrator(), catalog_migrator(), orders_migrator()]
    }

    #[test]
    fn test_versions_are_unique_across_services() {
        let mut seen = HashSet::new();
        for migrator in all() {
            for migration in migrator.iter() {
                assert!(
                    seen.insert(migration.version),
                    "version {} used twice",
                    migration.version
                );
            }
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_migrators_tolerate_each_other() {
        assert!(all().iter().all(|migrator| migrator.ignore_missing));
    }

    /// Runs against `DATABASE_URL` when one is configured.
    #[tokio::test]
    async fn test_all_services_migrate_one_database() {
        let Ok(url) = get_database_url("DATABASE_URL") else {
            return;
        };
        let pool = create_pool(&url).await.unwrap();

        // twice: the second pass sees every other service's versions applied
        for _ in 0..2 {
            for migrator in all() {
                migrator.run(&pool).await.unwrap();
            }
        }

        let applied: i64 = sqlx::query_scalar("SELECT count(*) FROM _sqlx_migrations")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert!(applied >= 3);
    }
}
