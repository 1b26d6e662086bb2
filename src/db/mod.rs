pub mod events;

use sqlx::SqlitePool;

/// Create the schema if it does not exist yet. Safe to run on every start.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
