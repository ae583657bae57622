//! Process-local repositories, used when no database is configured and in tests.

use std::collections::HashMap;

use async_trait::async_trait;
use railway_core::repository::{RepoError, TicketRepository, TrainRepository, UserRepository};
use railway_core::{Ticket, TrainRecord, User};
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryTrainRepository {
    trains: RwLock<HashMap<String, TrainRecord>>,
}

impl InMemoryTrainRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted(mut trains: Vec<TrainRecord>) -> Vec<TrainRecord> {
    trains.sort_by(|a, b| a.departure_time.cmp(&b.departure_time).then_with(|| a.name.cmp(&b.name)));
    trains
}

#[async_trait]
impl TrainRepository for InMemoryTrainRepository {
    async fn list_trains(&self) -> Result<Vec<TrainRecord>, RepoError> {
        Ok(sorted(self.trains.read().await.values().cloned().collect()))
    }

    async fn get_train(&self, id: &str) -> Result<Option<TrainRecord>, RepoError> {
        Ok(self.trains.read().await.get(id).cloned())
    }

    async fn find_by_route(&self, source: &str, destination: &str) -> Result<Vec<TrainRecord>, RepoError> {
        let trains = self.trains.read().await;
        Ok(sorted(
            trains.values().filter(|t| t.serves(source, destination)).cloned().collect(),
        ))
    }

    async fn save_train(&self, train: &TrainRecord) -> Result<(), RepoError> {
        self.trains.write().await.insert(train.id.clone(), train.clone());
        Ok(())
    }

    async fn delete_train(&self, id: &str) -> Result<bool, RepoError> {
        Ok(self.trains.write().await.remove(id).is_some())
    }

    async fn count_trains(&self) -> Result<i64, RepoError> {
        Ok(self.trains.read().await.len() as i64)
    }

    async fn reserve_seats(&self, id: &str, count: i32) -> Result<Option<TrainRecord>, RepoError> {
        let mut trains = self.trains.write().await;
        match trains.get_mut(id) {
            Some(train) if train.available_seats >= count => {
                train.available_seats -= count;
                Ok(Some(train.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn release_seats(&self, id: &str, count: i32) -> Result<Option<TrainRecord>, RepoError> {
        let mut trains = self.trains.write().await;
        Ok(trains.get_mut(id).map(|train| {
            train.available_seats = (train.available_seats + count).min(train.total_seats);
            train.clone()
        }))
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create_user(&self, user: &User) -> Result<(), RepoError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.username == user.username || u.email == user.email) {
            return Err(format!("User {} already exists", user.username).into());
        }
        users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        Ok(self.users.read().await.values().find(|u| u.username == username).cloned())
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, RepoError> {
        Ok(self.users.read().await.values().any(|u| u.username == username))
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, RepoError> {
        Ok(self.users.read().await.values().any(|u| u.email == email))
    }
}

#[derive(Default)]
pub struct InMemoryTicketRepository {
    tickets: RwLock<HashMap<String, Ticket>>,
}

impl InMemoryTicketRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TicketRepository for InMemoryTicketRepository {
    async fn save_ticket(&self, ticket: &Ticket) -> Result<(), RepoError> {
        self.tickets.write().await.insert(ticket.id.clone(), ticket.clone());
        Ok(())
    }

    async fn get_ticket(&self, id: &str) -> Result<Option<Ticket>, RepoError> {
        Ok(self.tickets.read().await.get(id).cloned())
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Ticket>, RepoError> {
        let mut tickets: Vec<Ticket> = self
            .tickets
            .read()
            .await
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        tickets.sort_by(|a, b| b.booking_date.cmp(&a.booking_date).then_with(|| a.id.cmp(&b.id)));
        Ok(tickets)
    }
}
