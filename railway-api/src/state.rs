use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use railway_catalog::{CheckoutCalculator, CheckoutRates};
use railway_core::repository::{TicketRepository, TrainRepository, UserRepository};
use railway_core::PaymentGateway;
use railway_order::{
    BookingSession, FlowTimings, PaymentOrchestrator, SharedSession, SimulatedPaymentGateway,
    TicketService,
};
use railway_shared::RailwayEvent;
use railway_store::app_config::BusinessRules;
use railway_store::memory::{InMemoryTicketRepository, InMemoryTrainRepository, InMemoryUserRepository};
use railway_store::RedisClient;
use tokio::sync::{broadcast, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use uuid::Uuid;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
    pub allow_admin_signup: bool,
}

#[derive(Clone)]
pub struct Repositories {
    pub trains: Arc<dyn TrainRepository>,
    pub users: Arc<dyn UserRepository>,
    pub tickets: Arc<dyn TicketRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        Self {
            trains: Arc::new(InMemoryTrainRepository::new()),
            users: Arc::new(InMemoryUserRepository::new()),
            tickets: Arc::new(InMemoryTicketRepository::new()),
        }
    }
}

struct SessionEntry {
    session: SharedSession,
    touched: Instant,
}

/// Live booking sessions, keyed by id. Entries idle for longer than `idle_ttl` are evicted by
/// [`SessionRegistry::evict_idle`].
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, SessionEntry>>>,
    idle_ttl: Duration,
}

impl SessionRegistry {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_ttl,
        }
    }

    pub async fn insert(&self, session: BookingSession) -> SharedSession {
        let id = session.id();
        let shared = Arc::new(Mutex::new(session));
        let entry = SessionEntry {
            session: shared.clone(),
            touched: Instant::now(),
        };
        self.sessions.write().await.insert(id, entry);
        shared
    }

    /// Looks up a session and marks it as used.
    pub async fn get(&self, id: Uuid) -> Option<SharedSession> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&id)?;
        entry.touched = Instant::now();
        Some(entry.session.clone())
    }

    pub async fn remove(&self, id: Uuid) -> Option<SharedSession> {
        self.sessions.write().await.remove(&id).map(|entry| entry.session)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops every session not touched within the idle TTL. Returns how many were dropped.
    pub async fn evict_idle(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.touched) < self.idle_ttl);
        before - sessions.len()
    }

    pub fn spawn_sweeper(&self, every: Duration) -> JoinHandle<()> {
        let registry = self.clone();
        tokio::spawn(async move {
            let mut ticker = time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let evicted = registry.evict_idle().await;
                if evicted > 0 {
                    let remaining = registry.len().await;
                    tracing::info!(evicted, remaining, "Evicted idle booking sessions");
                }
            }
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub trains: Arc<dyn TrainRepository>,
    pub users: Arc<dyn UserRepository>,
    pub tickets: TicketService,
    pub sessions: SessionRegistry,
    pub payments: PaymentOrchestrator,
    pub checkout: CheckoutCalculator,
    pub redis: Option<Arc<RedisClient>>,
    pub rate_limit_per_minute: i64,
    pub events: broadcast::Sender<RailwayEvent>,
    pub auth: AuthConfig,
    session_sweep: Duration,
}

impl AppState {
    pub fn new(repos: Repositories, auth: AuthConfig, rules: &BusinessRules) -> Self {
        let (events, _) = broadcast::channel(100);
        let gateway = Arc::new(SimulatedPaymentGateway::new(Duration::from_millis(
            rules.payment_processing_ms,
        )));
        let timings = FlowTimings {
            confirmation_display: Duration::from_millis(rules.confirmation_display_ms),
            success_reset: Duration::from_millis(rules.success_reset_ms),
        };

        Self {
            tickets: TicketService::new(repos.trains.clone(), repos.tickets.clone(), events.clone()),
            trains: repos.trains,
            users: repos.users,
            sessions: SessionRegistry::new(Duration::from_millis(rules.session_idle_ms)),
            payments: PaymentOrchestrator::new(gateway, timings, events.clone()),
            checkout: CheckoutCalculator::new(CheckoutRates {
                convenience_fee_percent: rules.convenience_fee_percent,
                gst_percent: rules.gst_percent,
            }),
            redis: None,
            rate_limit_per_minute: rules.rate_limit_per_minute,
            events,
            auth,
            session_sweep: Duration::from_millis(rules.session_sweep_ms),
        }
    }

    /// Starts the background eviction of idle booking sessions. Needs a running tokio runtime.
    pub fn spawn_session_sweeper(&self) -> JoinHandle<()> {
        self.sessions.spawn_sweeper(self.session_sweep)
    }

    pub fn with_redis(mut self, redis: RedisClient) -> Self {
        self.redis = Some(Arc::new(redis));
        self
    }

    /// Swaps the payment gateway, keeping timings and the event channel.
    pub fn with_gateway(mut self, gateway: Arc<dyn PaymentGateway>, timings: FlowTimings) -> Self {
        self.payments = PaymentOrchestrator::new(gateway, timings, self.events.clone());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(owner: &str) -> BookingSession {
        BookingSession::with_seed(owner, CheckoutCalculator::new(CheckoutRates::default()), 7)
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_sessions_are_evicted() {
        let registry = SessionRegistry::new(Duration::from_millis(50));
        let (nimal, kamal) = (session("nimal"), session("kamal"));
        let (kept, dropped) = (nimal.id(), kamal.id());
        registry.insert(nimal).await;
        registry.insert(kamal).await;

        time::advance(Duration::from_millis(40)).await;
        assert!(registry.get(kept).await.is_some());
        time::advance(Duration::from_millis(30)).await;

        assert_eq!(registry.evict_idle().await, 1);
        assert_eq!(registry.len().await, 1);
        assert!(registry.get(kept).await.is_some());
        assert!(registry.get(dropped).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_empties_abandoned_registry() {
        let registry = SessionRegistry::new(Duration::from_millis(50));
        for owner in ["a", "b", "c"] {
            registry.insert(session(owner)).await;
        }
        let sweeper = registry.spawn_sweeper(Duration::from_millis(10));

        time::sleep(Duration::from_millis(100)).await;
        assert_eq!(registry.len().await, 0);
        sweeper.abort();
    }
}
