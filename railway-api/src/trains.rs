use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    routing::get,
    Json, Router,
};
use railway_core::search::TrainSearchQuery;
use railway_core::{TrainRecord, TrainRequest};
use tracing::info;

use crate::middleware::admin_auth_middleware;
use crate::{error::AppError, state::AppState};

pub fn routes(state: AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/api/trains", axum::routing::post(add_train))
        .route("/api/trains/{id}", axum::routing::put(update_train).delete(delete_train))
        .route_layer(middleware::from_fn_with_state(state, admin_auth_middleware));

    Router::new()
        .route("/api/trains", get(list_trains))
        .route("/api/trains/search", get(search_trains))
        .route("/api/trains/{id}", get(get_train))
        .merge(admin)
}

fn not_found(id: &str) -> AppError {
    AppError::NotFoundError(format!("Train not found with id: {}", id))
}

async fn list_trains(State(state): State<AppState>) -> Result<Json<Vec<TrainRecord>>, AppError> {
    Ok(Json(state.trains.list_trains().await?))
}

async fn get_train(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TrainRecord>, AppError> {
    state.trains.get_train(&id).await?.map(Json).ok_or_else(|| not_found(&id))
}

async fn search_trains(
    State(state): State<AppState>,
    Query(query): Query<TrainSearchQuery>,
) -> Result<Json<Vec<TrainRecord>>, AppError> {
    let (source, destination) = query.route()?;
    let trains = state.trains.find_by_route(&source, &destination).await?;
    tracing::debug!(%source, %destination, results = trains.len(), "Train search");
    Ok(Json(trains))
}

async fn add_train(
    State(state): State<AppState>,
    Json(req): Json<TrainRequest>,
) -> Result<Json<TrainRecord>, AppError> {
    req.validate()?;
    let train = TrainRecord::from_request(&req);
    state.trains.save_train(&train).await?;
    info!(train_id = %train.id, number = %train.number, "Train added");
    Ok(Json(train))
}

async fn update_train(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<TrainRequest>,
) -> Result<Json<TrainRecord>, AppError> {
    req.validate()?;
    let mut train = state.trains.get_train(&id).await?.ok_or_else(|| not_found(&id))?;
    train.apply_update(&req);
    state.trains.save_train(&train).await?;
    info!(train_id = %train.id, "Train updated");
    Ok(Json(train))
}

async fn delete_train(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !state.trains.delete_train(&id).await? {
        return Err(not_found(&id));
    }
    info!(train_id = %id, "Train deleted");
    Ok(StatusCode::NO_CONTENT)
}
