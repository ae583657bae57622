use railway_catalog::pricing::seat_total;
use railway_catalog::SeatMapError;
use railway_core::Train;

use crate::models::BookingStep;

/// Owns the booking wizard state and enforces its transitions:
/// search -> seats -> payment -> success -> search, plus cancel from anywhere.
#[derive(Debug, Clone)]
pub struct BookingFlow {
    step: BookingStep,
    train: Option<Train>,
    class_type: String,
    seats: Vec<String>,
    total_price: i64,
    generation: u64,
}

impl BookingFlow {
    pub fn new() -> Self {
        Self {
            step: BookingStep::Search,
            train: None,
            class_type: String::new(),
            seats: Vec::new(),
            total_price: 0,
            generation: 0,
        }
    }

    pub fn step(&self) -> BookingStep {
        self.step
    }

    pub fn train(&self) -> Option<&Train> {
        self.train.as_ref()
    }

    pub fn class_type(&self) -> &str {
        &self.class_type
    }

    pub fn seats(&self) -> &[String] {
        &self.seats
    }

    pub fn total_price(&self) -> i64 {
        self.total_price
    }

    /// Bumped on every reset so stale timers can tell their booking is gone.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Per-seat price of the chosen class.
    pub fn price_per_seat(&self) -> Option<i64> {
        self.train
            .as_ref()
            .and_then(|t| t.fare_class(&self.class_type))
            .map(|c| c.price)
    }

    /// Transition: Search → Seats
    pub fn select_train(&mut self, train: Train, class_type: &str) -> Result<(), FlowError> {
        self.expect_step(BookingStep::Seats, BookingStep::Search)?;

        if class_type.trim().is_empty() {
            return Err(FlowError::EmptyClass);
        }
        if train.fare_class(class_type).is_none() {
            return Err(FlowError::UnknownClass(class_type.to_string()));
        }

        self.train = Some(train);
        self.class_type = class_type.to_string();
        self.step = BookingStep::Seats;
        Ok(())
    }

    /// Transition: Seats → Payment. Returns the fare for the chosen seats.
    pub fn confirm_seats(&mut self, seats: Vec<String>) -> Result<i64, FlowError> {
        self.expect_step(BookingStep::Payment, BookingStep::Seats)?;

        if seats.is_empty() {
            return Err(FlowError::NoSeatsSelected);
        }
        let price_per_seat = self.price_per_seat().ok_or(FlowError::MissingTrain)?;

        self.total_price = seat_total(seats.len(), price_per_seat);
        self.seats = seats;
        self.step = BookingStep::Payment;
        Ok(self.total_price)
    }

    /// Transition: Payment → Success. Returns the generation the reset timer must match.
    pub fn complete_payment(&mut self) -> Result<u64, FlowError> {
        self.expect_step(BookingStep::Success, BookingStep::Payment)?;
        self.step = BookingStep::Success;
        Ok(self.generation)
    }

    /// Transition: Success → Search, only for the booking the timer was armed for.
    pub fn reset_after_success(&mut self, generation: u64) -> bool {
        if self.step != BookingStep::Success || self.generation != generation {
            return false;
        }
        self.clear();
        true
    }

    /// Any step → Search.
    pub fn cancel(&mut self) {
        self.clear();
    }

    fn clear(&mut self) {
        self.step = BookingStep::Search;
        self.train = None;
        self.class_type.clear();
        self.seats.clear();
        self.total_price = 0;
        self.generation += 1;
    }

    fn expect_step(&self, to: BookingStep, required: BookingStep) -> Result<(), FlowError> {
        if self.step != required {
            return Err(FlowError::InvalidTransition {
                from: self.step.to_string(),
                to: to.to_string(),
            });
        }
        Ok(())
    }
}

impl Default for BookingFlow {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("A class must be chosen before selecting seats")]
    EmptyClass,

    #[error("Train does not offer class: {0}")]
    UnknownClass(String),

    #[error("No train selected")]
    MissingTrain,

    #[error("Select at least one seat")]
    NoSeatsSelected,

    #[error(transparent)]
    Seat(#[from] SeatMapError),

    #[error("A payment is already in progress")]
    PaymentInFlight,

    #[error("Payment has already been completed")]
    PaymentCompleted,

    #[error("Payment has not been confirmed")]
    PaymentNotConfirmed,
}
