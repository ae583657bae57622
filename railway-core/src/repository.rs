use async_trait::async_trait;

use crate::{Ticket, TrainRecord, User};

pub type RepoError = Box<dyn std::error::Error + Send + Sync>;

/// Repository trait for train data access
#[async_trait]
pub trait TrainRepository: Send + Sync {
    async fn list_trains(&self) -> Result<Vec<TrainRecord>, RepoError>;

    async fn get_train(&self, id: &str) -> Result<Option<TrainRecord>, RepoError>;

    async fn find_by_route(
        &self,
        source: &str,
        destination: &str,
    ) -> Result<Vec<TrainRecord>, RepoError>;

    /// Insert or replace by id.
    async fn save_train(&self, train: &TrainRecord) -> Result<(), RepoError>;

    /// Returns `false` when no such train existed.
    async fn delete_train(&self, id: &str) -> Result<bool, RepoError>;

    async fn count_trains(&self) -> Result<i64, RepoError>;

    /// Atomically takes `count` seats. `None` when the train is missing or has too few seats left.
    async fn reserve_seats(&self, id: &str, count: i32) -> Result<Option<TrainRecord>, RepoError>;

    /// Gives seats back, never above the train's total.
    async fn release_seats(&self, id: &str, count: i32) -> Result<Option<TrainRecord>, RepoError>;
}

/// Repository trait for account data access
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, user: &User) -> Result<(), RepoError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    async fn exists_by_username(&self, username: &str) -> Result<bool, RepoError>;

    async fn exists_by_email(&self, email: &str) -> Result<bool, RepoError>;
}

/// Repository trait for ticket data access
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Insert or replace by id.
    async fn save_ticket(&self, ticket: &Ticket) -> Result<(), RepoError>;

    async fn get_ticket(&self, id: &str) -> Result<Option<Ticket>, RepoError>;

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Ticket>, RepoError>;
}
