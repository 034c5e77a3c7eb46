//! Database command handlers for the CLI.

use std::path::Path;

use storefinder_core::AppConfig;

/// Open a pool against `DATABASE_URL`.
///
/// # Errors
///
/// Returns an error if `DATABASE_URL` is unset or the connection fails.
pub(crate) async fn connect(config: &AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let url = config.require_database_url()?;
    let pool =
        storefinder_db::connect_pool(url, storefinder_db::PoolConfig::from_app_config(config))
            .await?;
    Ok(pool)
}

/// Apply any migrations that have not yet run.
///
/// # Errors
///
/// Returns an error if a migration fails.
pub(crate) async fn run_migrate(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let applied = storefinder_db::run_migrations(pool).await?;
    tracing::info!(applied, "migrations complete");
    println!("applied {applied} migration(s)");
    Ok(())
}

/// Load a seed file and insert its stores in one transaction.
///
/// With `dry_run` the file is parsed and validated but no connection is
/// opened.
///
/// # Errors
///
/// Returns an error if the file is invalid, the database is unreachable, or
/// any insert fails (in which case nothing is written).
pub(crate) async fn run_seed(config: &AppConfig, path: &Path, dry_run: bool) -> anyhow::Result<()> {
    let seed = storefinder_core::load_seed_file(path)?;

    if dry_run {
        let names: Vec<&str> = seed.stores.iter().map(|s| s.name.as_str()).collect();
        println!(
            "dry-run: would seed {} stores: [{}]",
            names.len(),
            names.join(", ")
        );
        return Ok(());
    }

    let pool = connect(config).await?;
    let result = storefinder_db::seed_stores(&pool, &seed.stores).await;
    pool.close().await;

    let count = result?;
    tracing::info!(count, path = %path.display(), "seed complete");
    println!("seeded {count} stores from {}", path.display());
    Ok(())
}
