//! Tubecast persistence layer.
//!
//! SQLite-backed repository for video records. Migrations are embedded; call
//! [`MIGRATOR`]`.run(&pool)` after creating a pool.

mod video_repository;

pub use video_repository::VideoRepository;

/// Embedded migrations for the videos schema.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Create a SQLite connection pool for the given database URL.
pub async fn create_pool(database_url: &str) -> Result<sqlx::SqlitePool, sqlx::Error> {
    sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
}
