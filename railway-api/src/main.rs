use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use railway_api::{
    app,
    state::{AppState, AuthConfig, Repositories},
};
use railway_shared::RailwayEvent;
use railway_store::app_config::Config;
use railway_store::ticket_repo::PostgresTicketRepository;
use railway_store::train_repo::PostgresTrainRepository;
use railway_store::user_repo::PostgresUserRepository;
use railway_store::{seed, DbClient, RedisClient};
use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "railway_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Railway API on port {}", config.server.port);

    let repos = match &config.database {
        Some(db) => {
            let client = DbClient::new(&db.url).await.context("Failed to connect to Postgres")?;
            client.migrate().await.context("Failed to run migrations")?;
            Repositories {
                trains: Arc::new(PostgresTrainRepository::new(client.pool.clone())),
                users: Arc::new(PostgresUserRepository::new(client.pool.clone())),
                tickets: Arc::new(PostgresTicketRepository::new(client.pool)),
            }
        }
        None => {
            tracing::warn!("No database configured, using the in-memory store");
            Repositories::in_memory()
        }
    };

    seed::seed_trains(repos.trains.as_ref()).await.context("Failed to seed trains")?;

    let auth = AuthConfig {
        secret: config.auth.jwt_secret.clone(),
        expiration: config.auth.jwt_expiration_seconds,
        allow_admin_signup: config.auth.allow_admin_signup,
    };
    let mut state = AppState::new(repos, auth, &config.business_rules);

    if let Some(redis) = &config.redis {
        state = state.with_redis(RedisClient::new(&redis.url).context("Invalid Redis URL")?);
    }

    spawn_event_logger(state.events.subscribe());
    state.spawn_session_sweeper();
    tracing::info!(gateway = state.payments.gateway_name(), "Payment gateway ready");

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

fn spawn_event_logger(mut rx: broadcast::Receiver<RailwayEvent>) {
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => match serde_json::to_string(&event) {
                    Ok(payload) => tracing::info!(topic = event.topic(), %payload, "Event published"),
                    Err(e) => tracing::warn!("Failed to serialize event: {}", e),
                },
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Event logger lagging");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}
