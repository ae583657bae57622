use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{CoreError, CoreResult};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Booked,
    Cancelled,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Booked => "BOOKED",
            TicketStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::str::FromStr for TicketStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BOOKED" => Ok(TicketStatus::Booked),
            "CANCELLED" => Ok(TicketStatus::Cancelled),
            other => Err(CoreError::InternalError(format!("Unknown ticket status: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub user_id: String,
    pub train_id: String,
    pub passenger_name: String,
    pub seat_number: i32,
    pub seat_count: i32,
    pub price: f64,
    pub booking_date: NaiveDate,
    pub status: TicketStatus,
}

impl Ticket {
    pub fn new_id() -> String {
        Uuid::new_v4().simple().to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketBookingRequest {
    pub train_id: String,
    pub passenger_name: String,
    #[serde(default = "default_seat_count")]
    pub number_of_seats: i32,
}

fn default_seat_count() -> i32 {
    1
}

impl TicketBookingRequest {
    pub fn validate(&self) -> CoreResult<()> {
        if self.passenger_name.trim().is_empty() {
            return Err(CoreError::ValidationError("Passenger name is required".into()));
        }
        if self.number_of_seats < 1 {
            return Err(CoreError::ValidationError("At least one seat must be booked".into()));
        }
        Ok(())
    }
}
