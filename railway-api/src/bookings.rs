use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use railway_catalog::CheckoutBreakdown;
use railway_core::Train;
use railway_order::{
    Booking, BookingSession, PayRequest, PaymentAccepted, SeatToggleResponse, SelectTrainRequest,
    SessionSnapshot, SharedSession,
};
use tracing::info;
use uuid::Uuid;

use crate::middleware::{user_auth_middleware, Claims};
use crate::{error::AppError, state::AppState};

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/bookings/sessions", post(create_session))
        .route("/api/bookings/sessions/{id}", get(get_session).delete(delete_session))
        .route("/api/bookings/sessions/{id}/train", post(select_train))
        .route("/api/bookings/sessions/{id}/seats/{seat_id}", post(toggle_seat))
        .route("/api/bookings/sessions/{id}/confirm-seats", post(confirm_seats))
        .route("/api/bookings/sessions/{id}/pay", post(pay))
        .route("/api/bookings/sessions/{id}/acknowledge", post(acknowledge))
        .route("/api/bookings/sessions/{id}/cancel", post(cancel))
        .route_layer(middleware::from_fn_with_state(state, user_auth_middleware))
}

/// Sessions of other users are reported as missing.
async fn owned_session(state: &AppState, id: Uuid, claims: &Claims) -> Result<SharedSession, AppError> {
    let not_found = || AppError::NotFoundError(format!("Booking session not found: {}", id));
    let session = state.sessions.get(id).await.ok_or_else(not_found)?;
    if session.lock().await.owner() != claims.sub {
        return Err(not_found());
    }
    Ok(session)
}

async fn create_session(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<(StatusCode, Json<SessionSnapshot>), AppError> {
    let session = BookingSession::new(claims.sub.clone(), state.checkout);
    let snapshot = session.snapshot();
    state.sessions.insert(session).await;
    info!(session_id = %snapshot.id, user_id = %claims.sub, "Booking session created");
    Ok((StatusCode::CREATED, Json(snapshot)))
}

async fn get_session(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let session = owned_session(&state, id, &claims).await?;
    let snapshot = session.lock().await.snapshot();
    Ok(Json(snapshot))
}

async fn delete_session(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    owned_session(&state, id, &claims).await?;
    state.sessions.remove(id).await;
    Ok(StatusCode::NO_CONTENT)
}

async fn select_train(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(req): Json<SelectTrainRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let session = owned_session(&state, id, &claims).await?;
    let record = state
        .trains
        .get_train(&req.train_id)
        .await?
        .ok_or_else(|| AppError::NotFoundError(format!("Train not found with id: {}", req.train_id)))?;

    let mut s = session.lock().await;
    s.select_train(Train::from(&record), &req.class_type)?;
    Ok(Json(s.snapshot()))
}

async fn toggle_seat(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path((id, seat_id)): Path<(Uuid, String)>,
) -> Result<Json<SeatToggleResponse>, AppError> {
    let session = owned_session(&state, id, &claims).await?;
    let mut s = session.lock().await;
    let status = s.toggle_seat(&seat_id)?;
    let selected = s.seat_map().map(|m| m.selected_ids()).unwrap_or_default();
    Ok(Json(SeatToggleResponse { seat_id, status, selected }))
}

async fn confirm_seats(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<CheckoutBreakdown>, AppError> {
    let session = owned_session(&state, id, &claims).await?;
    let breakdown = session.lock().await.confirm_seats()?;
    Ok(Json(breakdown))
}

async fn pay(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(req): Json<PayRequest>,
) -> Result<(StatusCode, Json<PaymentAccepted>), AppError> {
    let session = owned_session(&state, id, &claims).await?;
    let handle = state.payments.start_payment(session, req.method).await?;
    Ok((StatusCode::ACCEPTED, Json(handle.request.into())))
}

async fn acknowledge(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<Booking>, AppError> {
    let session = owned_session(&state, id, &claims).await?;
    Ok(Json(state.payments.acknowledge(&session).await?))
}

async fn cancel(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let session = owned_session(&state, id, &claims).await?;
    let mut s = session.lock().await;
    s.cancel()?;
    Ok(Json(s.snapshot()))
}
