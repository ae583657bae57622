use std::sync::Arc;
use std::time::Duration;

use railway_core::{PaymentGateway, PaymentMethod, PaymentOutcome, PaymentRequest};
use railway_shared::models::events::BookingConfirmedEvent;
use railway_shared::RailwayEvent;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;

use crate::flow::FlowError;
use crate::models::{Booking, PaymentPhase};
use crate::session::BookingSession;

pub type SharedSession = Arc<Mutex<BookingSession>>;

/// How long the confirmation and the success screen stay up.
#[derive(Debug, Clone, Copy)]
pub struct FlowTimings {
    pub confirmation_display: Duration,
    pub success_reset: Duration,
}

impl Default for FlowTimings {
    fn default() -> Self {
        Self {
            confirmation_display: Duration::from_secs(2),
            success_reset: Duration::from_secs(2),
        }
    }
}

/// Stand-in gateway: waits, then approves everything.
pub struct SimulatedPaymentGateway {
    processing_delay: Duration,
}

impl SimulatedPaymentGateway {
    pub fn new(processing_delay: Duration) -> Self {
        Self { processing_delay }
    }
}

impl Default for SimulatedPaymentGateway {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}

#[async_trait::async_trait]
impl PaymentGateway for SimulatedPaymentGateway {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn submit(
        &self,
        request: &PaymentRequest,
    ) -> Result<PaymentOutcome, Box<dyn std::error::Error + Send + Sync>> {
        tokio::time::sleep(self.processing_delay).await;
        Ok(PaymentOutcome::Succeeded {
            reference: format!("sim_{}", request.session_id.simple()),
        })
    }
}

/// A payment that has been handed to the gateway.
pub struct PaymentHandle {
    pub request: PaymentRequest,
    pub task: JoinHandle<()>,
}

/// Drives a session through payment: gateway call, confirmation display,
/// success screen and the reset back to search.
#[derive(Clone)]
pub struct PaymentOrchestrator {
    gateway: Arc<dyn PaymentGateway>,
    timings: FlowTimings,
    events: broadcast::Sender<RailwayEvent>,
}

impl PaymentOrchestrator {
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        timings: FlowTimings,
        events: broadcast::Sender<RailwayEvent>,
    ) -> Self {
        Self { gateway, timings, events }
    }

    pub fn gateway_name(&self) -> &str {
        self.gateway.name()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RailwayEvent> {
        self.events.subscribe()
    }

    /// Marks the session as paying and runs the rest in the background.
    pub async fn start_payment(
        &self,
        session: SharedSession,
        method: PaymentMethod,
    ) -> Result<PaymentHandle, FlowError> {
        let request = session.lock().await.begin_payment(method)?;
        tracing::info!(
            session_id = %request.session_id,
            amount = request.amount,
            gateway = self.gateway.name(),
            "Payment submitted"
        );

        let this = self.clone();
        let submitted = request.clone();
        let task = tokio::spawn(async move { this.drive(session, submitted).await });

        Ok(PaymentHandle { request, task })
    }

    async fn drive(&self, session: SharedSession, request: PaymentRequest) {
        let outcome = match self.gateway.submit(&request).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(session_id = %request.session_id, "Payment gateway error: {}", e);
                PaymentOutcome::Failed { reason: e.to_string() }
            }
        };

        {
            let mut s = session.lock().await;
            match s.settle_payment(outcome) {
                Ok(PaymentPhase::Confirmed { pnr, .. }) => {
                    tracing::info!(session_id = %request.session_id, pnr = %pnr, "Payment confirmed");
                }
                Ok(phase) => {
                    tracing::warn!(session_id = %request.session_id, ?phase, "Payment not confirmed");
                    return;
                }
                Err(e) => {
                    tracing::warn!(session_id = %request.session_id, "Dropping payment outcome: {}", e);
                    return;
                }
            }
        }

        tokio::time::sleep(self.timings.confirmation_display).await;

        // The traveller may already have moved on via acknowledge().
        if let Err(e) = self.acknowledge(&session).await {
            tracing::debug!(session_id = %request.session_id, "Confirmation already handled: {}", e);
        }
    }

    /// Payment → Success, publishes the booking and arms the reset timer.
    pub async fn acknowledge(&self, session: &SharedSession) -> Result<Booking, FlowError> {
        let (booking, generation, event) = {
            let mut s = session.lock().await;
            let (booking, generation) = s.acknowledge_payment()?;
            let event = BookingConfirmedEvent {
                session_id: s.id(),
                user_id: s.owner().to_string(),
                pnr: booking.pnr.clone(),
                train_id: booking.train_id.clone(),
                class_type: booking.class_type.clone(),
                seats: booking.seats.clone(),
                amount: booking.total_amount,
                timestamp: booking.booked_at.timestamp(),
            };
            (booking, generation, event)
        };

        self.publish(RailwayEvent::BookingConfirmed(event));
        self.arm_reset(session.clone(), generation);
        Ok(booking)
    }

    fn arm_reset(&self, session: SharedSession, generation: u64) {
        let delay = self.timings.success_reset;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut s = session.lock().await;
            if s.reset_after_success(generation) {
                tracing::debug!(session_id = %s.id(), "Session returned to search");
            }
        });
    }

    fn publish(&self, event: RailwayEvent) {
        let topic = event.topic();
        if self.events.send(event).is_err() {
            tracing::debug!(topic, "No subscribers for event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookingStep;
    use railway_catalog::{CheckoutCalculator, SeatStatus};
    use railway_core::{FareClass, Train};

    struct DecliningGateway;

    #[async_trait::async_trait]
    impl PaymentGateway for DecliningGateway {
        fn name(&self) -> &str {
            "declining"
        }

        async fn submit(
            &self,
            _request: &PaymentRequest,
        ) -> Result<PaymentOutcome, Box<dyn std::error::Error + Send + Sync>> {
            Err("Simulated Payment Gateway Failure".into())
        }
    }

    fn train() -> Train {
        Train {
            id: "1005".into(),
            number: "1005".into(),
            name: "Podi Menike".into(),
            from: "Colombo".into(),
            to: "Badulla".into(),
            departure: "05:55".into(),
            arrival: "16:00".into(),
            duration: "10h 05m".into(),
            classes: vec![FareClass { class_type: "Standard Class".into(), price: 1200, available: 500 }],
            days: vec!["Daily".into()],
        }
    }

    async fn session_at_payment() -> SharedSession {
        let mut s = BookingSession::with_seed("user-7", CheckoutCalculator::default(), 3);
        s.select_train(train(), "Standard Class").unwrap();
        let id = s
            .seat_map()
            .unwrap()
            .seats()
            .iter()
            .find(|seat| seat.status == SeatStatus::Available)
            .map(|seat| seat.id.clone())
            .unwrap();
        s.toggle_seat(&id).unwrap();
        s.confirm_seats().unwrap();
        Arc::new(Mutex::new(s))
    }

    fn orchestrator(gateway: Arc<dyn PaymentGateway>) -> PaymentOrchestrator {
        let (tx, _) = broadcast::channel(16);
        PaymentOrchestrator::new(gateway, FlowTimings::default(), tx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_payment_confirms_then_resets() {
        let orch = orchestrator(Arc::new(SimulatedPaymentGateway::default()));
        assert_eq!(orch.gateway_name(), "simulated");
        let mut events = orch.subscribe();
        let session = session_at_payment().await;

        let handle = orch.start_payment(session.clone(), PaymentMethod::Card).await.unwrap();
        assert_eq!(handle.request.amount, 1200 + 24 + 61);
        assert!(session.lock().await.payment().is_processing());

        tokio::time::sleep(Duration::from_millis(2100)).await;
        {
            let s = session.lock().await;
            assert_eq!(s.step(), BookingStep::Payment);
            assert!(s.payment().is_confirmed());
        }

        handle.task.await.unwrap();
        assert_eq!(session.lock().await.step(), BookingStep::Success);

        match events.recv().await.unwrap() {
            RailwayEvent::BookingConfirmed(e) => {
                assert_eq!(e.user_id, "user-7");
                assert_eq!(e.train_id, "1005");
                assert_eq!(e.seats.len(), 1);
                assert_eq!(e.pnr.len(), 10);
            }
            other => panic!("unexpected event {:?}", other),
        }

        tokio::time::sleep(Duration::from_millis(2100)).await;
        let s = session.lock().await;
        assert_eq!(s.step(), BookingStep::Search);
        assert!(s.flow().train().is_none());
        assert!(s.last_booking().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_early_acknowledge_skips_display_wait() {
        let orch = orchestrator(Arc::new(SimulatedPaymentGateway::default()));
        let session = session_at_payment().await;

        let handle = orch.start_payment(session.clone(), PaymentMethod::Upi).await.unwrap();
        assert!(matches!(orch.acknowledge(&session).await, Err(FlowError::PaymentNotConfirmed)));

        tokio::time::sleep(Duration::from_millis(2100)).await;
        let booking = orch.acknowledge(&session).await.unwrap();
        assert_eq!(booking.passengers, 1);
        assert_eq!(session.lock().await.step(), BookingStep::Success);

        handle.task.await.unwrap();
        assert_eq!(session.lock().await.step(), BookingStep::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gateway_error_marks_payment_failed() {
        let orch = orchestrator(Arc::new(DecliningGateway));
        let session = session_at_payment().await;

        let handle = orch.start_payment(session.clone(), PaymentMethod::Card).await.unwrap();
        handle.task.await.unwrap();

        let s = session.lock().await;
        assert_eq!(s.step(), BookingStep::Payment);
        assert!(matches!(s.payment(), PaymentPhase::Failed { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_reset_does_not_clobber_new_booking() {
        let orch = orchestrator(Arc::new(SimulatedPaymentGateway::default()));
        let session = session_at_payment().await;

        let handle = orch.start_payment(session.clone(), PaymentMethod::Card).await.unwrap();
        handle.task.await.unwrap();

        {
            let mut s = session.lock().await;
            s.cancel().unwrap();
            s.select_train(train(), "Standard Class").unwrap();
        }

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(session.lock().await.step(), BookingStep::Seats);
    }
}
