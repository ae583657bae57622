use axum::{
    extract::{Path, State},
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use railway_core::ticket::TicketBookingRequest;
use railway_core::Ticket;

use crate::middleware::{user_auth_middleware, Claims};
use crate::{error::AppError, state::AppState};

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/tickets/book", post(book_ticket))
        .route("/api/tickets/my-tickets", get(my_tickets))
        .route("/api/tickets/cancel/{id}", post(cancel_ticket))
        .route_layer(middleware::from_fn_with_state(state, user_auth_middleware))
}

async fn book_ticket(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<TicketBookingRequest>,
) -> Result<Json<Ticket>, AppError> {
    Ok(Json(state.tickets.book_ticket(&claims.sub, &req).await?))
}

async fn my_tickets(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<Ticket>>, AppError> {
    Ok(Json(state.tickets.tickets_for_user(&claims.sub).await?))
}

async fn cancel_ticket(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<Ticket>, AppError> {
    Ok(Json(state.tickets.cancel_ticket(&claims.sub, &id).await?))
}
