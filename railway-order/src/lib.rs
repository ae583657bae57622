pub mod flow;
pub mod models;
pub mod orchestrator;
pub mod session;
pub mod tickets;

pub use flow::{BookingFlow, FlowError};
pub use models::{
    Booking, BookingStatus, BookingStep, PayRequest, PaymentAccepted, PaymentPhase, SeatToggleResponse,
    SelectTrainRequest,
};
pub use orchestrator::{FlowTimings, PaymentHandle, PaymentOrchestrator, SharedSession, SimulatedPaymentGateway};
pub use session::{BookingSession, SessionSnapshot};
pub use tickets::{TicketError, TicketService};
