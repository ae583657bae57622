pub mod search;
pub mod repository;
pub mod identity;
pub mod payment;
pub mod ticket;
pub mod train;

pub use identity::{Role, User};
pub use payment::{PaymentGateway, PaymentMethod, PaymentOutcome, PaymentRequest};
pub use ticket::{Ticket, TicketStatus};
pub use train::{FareClass, Train, TrainRecord, TrainRequest};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Internal service error: {0}")]
    InternalError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
