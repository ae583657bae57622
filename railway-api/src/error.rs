use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use railway_core::repository::RepoError;
use railway_core::CoreError;
use railway_order::{FlowError, TicketError};
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    AuthenticationError(String),
    AuthorizationError(String),
    ValidationError(String),
    NotFoundError(String),
    ConflictError(String),
    RateLimited(String),
    InternalServerError(String),
    Anyhow(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::AuthenticationError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::AuthorizationError(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, msg),
            AppError::RateLimited(msg) => (StatusCode::TOO_MANY_REQUESTS, msg),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Anyhow(err)
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        Self::InternalServerError(err.to_string())
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ValidationError(msg) => Self::ValidationError(msg),
            CoreError::NotFound(msg) => Self::NotFoundError(msg),
            CoreError::Conflict(msg) => Self::ConflictError(msg),
            CoreError::InternalError(msg) => Self::InternalServerError(msg),
        }
    }
}

impl From<FlowError> for AppError {
    fn from(err: FlowError) -> Self {
        match err {
            FlowError::EmptyClass | FlowError::UnknownClass(_) | FlowError::NoSeatsSelected => {
                Self::ValidationError(err.to_string())
            }
            FlowError::Seat(_) => Self::NotFoundError(err.to_string()),
            FlowError::InvalidTransition { .. }
            | FlowError::MissingTrain
            | FlowError::PaymentInFlight
            | FlowError::PaymentCompleted
            | FlowError::PaymentNotConfirmed => Self::ConflictError(err.to_string()),
        }
    }
}

impl From<TicketError> for AppError {
    fn from(err: TicketError) -> Self {
        match err {
            TicketError::TrainNotFound(_) | TicketError::TicketNotFound(_) => {
                Self::NotFoundError(err.to_string())
            }
            TicketError::NotEnoughSeats | TicketError::AlreadyCancelled(_) => {
                Self::ConflictError(err.to_string())
            }
            TicketError::NotOwner(_) => Self::AuthorizationError(err.to_string()),
            TicketError::Invalid(core) => core.into(),
            TicketError::Repository(msg) => Self::InternalServerError(msg),
        }
    }
}
