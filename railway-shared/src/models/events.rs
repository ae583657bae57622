use uuid::Uuid;

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct BookingConfirmedEvent {
    pub session_id: Uuid,
    pub user_id: String,
    pub pnr: String,
    pub train_id: String,
    pub class_type: String,
    pub seats: Vec<String>,
    pub amount: i64,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct TicketBookedEvent {
    pub ticket_id: String,
    pub user_id: String,
    pub train_id: String,
    pub seats: u32,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct TicketCancelledEvent {
    pub ticket_id: String,
    pub train_id: String,
    pub timestamp: i64,
}

/// Everything published on the in-process event channel.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RailwayEvent {
    BookingConfirmed(BookingConfirmedEvent),
    TicketBooked(TicketBookedEvent),
    TicketCancelled(TicketCancelledEvent),
}

impl RailwayEvent {
    pub fn topic(&self) -> &'static str {
        match self {
            RailwayEvent::BookingConfirmed(_) => "booking.confirmed",
            RailwayEvent::TicketBooked(_) => "ticket.booked",
            RailwayEvent::TicketCancelled(_) => "ticket.cancelled",
        }
    }
}
