use chrono::{DateTime, NaiveDate, Utc};
use railway_catalog::SeatStatus;
use railway_core::{PaymentMethod, PaymentRequest};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a booking session currently stands.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStep {
    Search,
    Seats,
    Payment,
    Success,
}

impl BookingStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStep::Search => "search",
            BookingStep::Seats => "seats",
            BookingStep::Payment => "payment",
            BookingStep::Success => "success",
        }
    }
}

impl std::fmt::Display for BookingStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
    Pending,
}

/// A completed booking as shown to the traveller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub pnr: String,
    pub train_id: String,
    pub train_number: String,
    pub train_name: String,
    pub from: String,
    pub to: String,
    pub travel_date: NaiveDate,
    pub departure: String,
    pub arrival: String,
    pub class_type: String,
    pub seats: Vec<String>,
    pub passengers: u32,
    pub total_amount: i64,
    pub status: BookingStatus,
    pub booked_at: DateTime<Utc>,
}

/// Payment progress inside the payment step.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentPhase {
    #[default]
    Idle,
    Processing { method: PaymentMethod },
    Confirmed { pnr: String, reference: String },
    Failed { reason: String },
}

impl PaymentPhase {
    pub fn is_processing(&self) -> bool {
        matches!(self, PaymentPhase::Processing { .. })
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, PaymentPhase::Confirmed { .. })
    }
}

/// Body of `POST /api/bookings/sessions/{id}/train`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectTrainRequest {
    pub train_id: String,
    pub class_type: String,
}

/// Body of `POST /api/bookings/sessions/{id}/pay`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PayRequest {
    #[serde(default)]
    pub method: PaymentMethod,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatToggleResponse {
    pub seat_id: String,
    pub status: SeatStatus,
    pub selected: Vec<String>,
}

/// Returned with 202 once a payment has been handed to the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentAccepted {
    pub session_id: Uuid,
    pub amount: i64,
    pub currency: String,
    pub method: PaymentMethod,
}

impl From<PaymentRequest> for PaymentAccepted {
    fn from(req: PaymentRequest) -> Self {
        Self {
            session_id: req.session_id,
            amount: req.amount,
            currency: req.currency,
            method: req.method,
        }
    }
}
