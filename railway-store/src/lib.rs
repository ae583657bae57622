pub mod app_config;
pub mod database;
pub mod memory;
pub mod redis_repo;
pub mod seed;
pub mod ticket_repo;
pub mod train_repo;
pub mod user_repo;

pub use database::DbClient;
pub use redis_repo::RedisClient;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("Repository error: {0}")]
    Repository(String),
}
