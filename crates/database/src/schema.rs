//! Database schema and connection management

use crate::{DatabaseError, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use tracing::{debug, info};

/// Tables the queries read from
const REQUIRED_TABLES: [&str; 2] = ["measurement", "station"];

/// Database connection wrapper
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open an existing measurement archive read-only
    pub async fn connect(path: &Path) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .read_only(true)
            .create_if_missing(false);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.verify_schema().await?;

        info!("Database connected: {}", path.display());
        Ok(db)
    }

    /// Connect to an in-memory database with the archive's table layout (for testing)
    pub async fn in_memory() -> Result<Self> {
        // A single connection that never expires, otherwise the data goes with it.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        let db = Self { pool };
        db.run_migrations().await?;
        db.verify_schema().await?;

        info!("In-memory database initialized");
        Ok(db)
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Check that every table the queries depend on exists
    async fn verify_schema(&self) -> Result<()> {
        let tables: Vec<String> =
            sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table'")
                .fetch_all(&self.pool)
                .await?;

        for required in REQUIRED_TABLES {
            if !tables.iter().any(|t| t == required) {
                return Err(DatabaseError::MissingTable(required.to_string()));
            }
        }

        debug!(tables = ?REQUIRED_TABLES, "Schema verified");
        Ok(())
    }

    async fn run_migrations(&self) -> Result<()> {
        sqlx::query(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::Migration(e.to_string()))?;

        Ok(())
    }
}

/// Layout of the station archive the API is served from
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS measurement (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    station TEXT NOT NULL,
    date TEXT NOT NULL,
    prcp FLOAT,
    tobs FLOAT
);

CREATE INDEX IF NOT EXISTS idx_measurement_station_date
    ON measurement(station, date);

CREATE TABLE IF NOT EXISTS station (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    station TEXT NOT NULL,
    name TEXT NOT NULL,
    latitude FLOAT,
    longitude FLOAT,
    elevation FLOAT
);
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_has_required_tables() {
        let db = Database::in_memory().await.unwrap();
        db.verify_schema().await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_table_is_reported() {
        let db = Database::in_memory().await.unwrap();
        sqlx::query("DROP TABLE station")
            .execute(db.pool())
            .await
            .unwrap();

        match db.verify_schema().await {
            Err(DatabaseError::MissingTable(table)) => assert_eq!(table, "station"),
            other => panic!("expected missing table, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_connect_rejects_missing_file() {
        let path = std::env::temp_dir().join("climate-database-does-not-exist.sqlite");
        assert!(Database::connect(&path).await.is_err());
    }
}
