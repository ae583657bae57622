use std::sync::Arc;

use chrono::Utc;
use railway_core::repository::{RepoError, TicketRepository, TrainRepository};
use railway_core::ticket::TicketBookingRequest;
use railway_core::{CoreError, Ticket, TicketStatus};
use railway_shared::models::events::{TicketBookedEvent, TicketCancelledEvent};
use railway_shared::RailwayEvent;
use tokio::sync::broadcast;

#[derive(Debug, thiserror::Error)]
pub enum TicketError {
    #[error("Train not found with id: {0}")]
    TrainNotFound(String),
    #[error("Ticket not found with id: {0}")]
    TicketNotFound(String),
    #[error("Not enough seats available")]
    NotEnoughSeats,
    #[error("Ticket {0} belongs to another user")]
    NotOwner(String),
    #[error("Ticket {0} is already cancelled")]
    AlreadyCancelled(String),
    #[error(transparent)]
    Invalid(#[from] CoreError),
    #[error("Repository error: {0}")]
    Repository(String),
}

impl TicketError {
    fn repo(e: RepoError) -> Self {
        TicketError::Repository(e.to_string())
    }
}

/// Direct ticket purchases against train availability.
#[derive(Clone)]
pub struct TicketService {
    trains: Arc<dyn TrainRepository>,
    tickets: Arc<dyn TicketRepository>,
    events: broadcast::Sender<RailwayEvent>,
}

impl TicketService {
    pub fn new(
        trains: Arc<dyn TrainRepository>,
        tickets: Arc<dyn TicketRepository>,
        events: broadcast::Sender<RailwayEvent>,
    ) -> Self {
        Self { trains, tickets, events }
    }

    pub async fn book_ticket(
        &self,
        user_id: &str,
        request: &TicketBookingRequest,
    ) -> Result<Ticket, TicketError> {
        request.validate()?;

        if self.trains.get_train(&request.train_id).await.map_err(TicketError::repo)?.is_none() {
            return Err(TicketError::TrainNotFound(request.train_id.clone()));
        }

        let train = self
            .trains
            .reserve_seats(&request.train_id, request.number_of_seats)
            .await
            .map_err(TicketError::repo)?
            .ok_or(TicketError::NotEnoughSeats)?;

        let ticket = Ticket {
            id: Ticket::new_id(),
            user_id: user_id.to_string(),
            train_id: train.id.clone(),
            passenger_name: request.passenger_name.trim().to_string(),
            seat_number: train.total_seats - train.available_seats,
            seat_count: request.number_of_seats,
            price: train.price * request.number_of_seats as f64,
            booking_date: Utc::now().date_naive(),
            status: TicketStatus::Booked,
        };

        if let Err(e) = self.tickets.save_ticket(&ticket).await {
            // Give the seats back; the ticket never existed.
            if let Err(release_err) = self.trains.release_seats(&train.id, ticket.seat_count).await {
                tracing::error!(train_id = %train.id, "Failed to release seats: {}", release_err);
            }
            return Err(TicketError::repo(e));
        }

        tracing::info!(
            ticket_id = %ticket.id,
            train_id = %ticket.train_id,
            seats = ticket.seat_count,
            "Ticket booked"
        );
        self.publish(RailwayEvent::TicketBooked(TicketBookedEvent {
            ticket_id: ticket.id.clone(),
            user_id: ticket.user_id.clone(),
            train_id: ticket.train_id.clone(),
            seats: ticket.seat_count as u32,
            timestamp: Utc::now().timestamp(),
        }));

        Ok(ticket)
    }

    pub async fn tickets_for_user(&self, user_id: &str) -> Result<Vec<Ticket>, TicketError> {
        self.tickets.list_by_user(user_id).await.map_err(TicketError::repo)
    }

    pub async fn cancel_ticket(&self, user_id: &str, ticket_id: &str) -> Result<Ticket, TicketError> {
        let mut ticket = self
            .tickets
            .get_ticket(ticket_id)
            .await
            .map_err(TicketError::repo)?
            .ok_or_else(|| TicketError::TicketNotFound(ticket_id.to_string()))?;

        if ticket.user_id != user_id {
            return Err(TicketError::NotOwner(ticket_id.to_string()));
        }
        if ticket.status == TicketStatus::Cancelled {
            return Err(TicketError::AlreadyCancelled(ticket_id.to_string()));
        }

        self.trains
            .release_seats(&ticket.train_id, ticket.seat_count)
            .await
            .map_err(TicketError::repo)?
            .ok_or_else(|| TicketError::TrainNotFound(ticket.train_id.clone()))?;

        ticket.status = TicketStatus::Cancelled;
        self.tickets.save_ticket(&ticket).await.map_err(TicketError::repo)?;

        tracing::info!(ticket_id = %ticket.id, "Ticket cancelled");
        self.publish(RailwayEvent::TicketCancelled(TicketCancelledEvent {
            ticket_id: ticket.id.clone(),
            train_id: ticket.train_id.clone(),
            timestamp: Utc::now().timestamp(),
        }));

        Ok(ticket)
    }

    fn publish(&self, event: RailwayEvent) {
        let topic = event.topic();
        if self.events.send(event).is_err() {
            tracing::debug!(topic, "No subscribers for event");
        }
    }
}
