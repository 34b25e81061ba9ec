//! Climate Database Layer
//!
//! Read-only access to the station measurement archive.

mod models;
mod queries;
mod schema;

pub use models::*;
pub use schema::Database;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database connection failed: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("Required table missing: {0}")]
    MissingTable(String),

    #[error("Migration failed: {0}")]
    Migration(String),
}

pub type Result<T> = std::result::Result<T, DatabaseError>;
