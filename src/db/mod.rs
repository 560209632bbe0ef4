use sqlx::PgPool;

pub mod tx;

/// Apply the embedded migrations. Any failure is fatal to startup.
pub async fn run_migrations(pool: &PgPool) -> Result<(), String> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|err| format!("Failed to run migrations: {}", err))?;

    tracing::info!("Migrations run successfully");
    Ok(())
}
