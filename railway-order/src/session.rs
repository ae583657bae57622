use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use railway_catalog::{CheckoutBreakdown, CheckoutCalculator, SeatMap, SeatStatus};
use railway_core::{PaymentMethod, PaymentOutcome, PaymentRequest, Train};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::flow::{BookingFlow, FlowError};
use crate::models::{Booking, BookingStatus, BookingStep, PaymentPhase};

pub const CURRENCY: &str = "LKR";

/// One traveller's booking in progress: the wizard state, the seat map it is
/// looking at, the checkout figures and the payment phase.
#[derive(Debug)]
pub struct BookingSession {
    id: Uuid,
    owner: String,
    created_at: DateTime<Utc>,
    flow: BookingFlow,
    seat_map: Option<SeatMap>,
    checkout: Option<CheckoutBreakdown>,
    payment: PaymentPhase,
    last_booking: Option<Booking>,
    calculator: CheckoutCalculator,
    seed: u64,
    rng: StdRng,
}

impl BookingSession {
    pub fn new(owner: impl Into<String>, calculator: CheckoutCalculator) -> Self {
        Self::with_seed(owner, calculator, rand::random())
    }

    pub fn with_seed(owner: impl Into<String>, calculator: CheckoutCalculator, seed: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner: owner.into(),
            created_at: Utc::now(),
            flow: BookingFlow::new(),
            seat_map: None,
            checkout: None,
            payment: PaymentPhase::Idle,
            last_booking: None,
            calculator,
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn step(&self) -> BookingStep {
        self.flow.step()
    }

    pub fn flow(&self) -> &BookingFlow {
        &self.flow
    }

    pub fn seat_map(&self) -> Option<&SeatMap> {
        self.seat_map.as_ref()
    }

    pub fn checkout(&self) -> Option<&CheckoutBreakdown> {
        self.checkout.as_ref()
    }

    pub fn payment(&self) -> &PaymentPhase {
        &self.payment
    }

    pub fn last_booking(&self) -> Option<&Booking> {
        self.last_booking.as_ref()
    }

    /// Search → Seats. A fresh seat map is drawn every time; earlier picks are gone.
    pub fn select_train(&mut self, train: Train, class_type: &str) -> Result<&SeatMap, FlowError> {
        self.flow.select_train(train, class_type)?;
        self.checkout = None;
        self.payment = PaymentPhase::Idle;
        Ok(self.seat_map.insert(SeatMap::generate(class_type, &mut self.rng)))
    }

    pub fn toggle_seat(&mut self, seat_id: &str) -> Result<SeatStatus, FlowError> {
        if self.flow.step() != BookingStep::Seats {
            return Err(FlowError::InvalidTransition {
                from: self.flow.step().to_string(),
                to: BookingStep::Seats.to_string(),
            });
        }
        let seat_map = self.seat_map.as_mut().ok_or(FlowError::MissingTrain)?;
        Ok(seat_map.toggle(seat_id)?)
    }

    /// Seats → Payment with whatever is currently selected on the map.
    pub fn confirm_seats(&mut self) -> Result<CheckoutBreakdown, FlowError> {
        let selected = self
            .seat_map
            .as_ref()
            .map(SeatMap::selected_ids)
            .unwrap_or_default();
        let total = self.flow.confirm_seats(selected)?;
        let breakdown = self.calculator.breakdown(total);
        self.checkout = Some(breakdown);
        Ok(breakdown)
    }

    /// Marks the payment as in flight and returns what to submit to the gateway.
    /// Allowed again after a failed attempt.
    pub fn begin_payment(&mut self, method: PaymentMethod) -> Result<PaymentRequest, FlowError> {
        if self.flow.step() != BookingStep::Payment {
            return Err(FlowError::InvalidTransition {
                from: self.flow.step().to_string(),
                to: BookingStep::Payment.to_string(),
            });
        }
        match self.payment {
            PaymentPhase::Processing { .. } => return Err(FlowError::PaymentInFlight),
            PaymentPhase::Confirmed { .. } => return Err(FlowError::PaymentCompleted),
            PaymentPhase::Idle | PaymentPhase::Failed { .. } => {}
        }
        let checkout = self.checkout.ok_or(FlowError::NoSeatsSelected)?;

        self.payment = PaymentPhase::Processing { method };
        Ok(PaymentRequest {
            session_id: self.id,
            amount: checkout.final_amount,
            currency: CURRENCY.to_string(),
            method,
        })
    }

    /// Records the gateway's answer. A success gets a PNR drawn from the session generator.
    pub fn settle_payment(&mut self, outcome: PaymentOutcome) -> Result<&PaymentPhase, FlowError> {
        if !self.payment.is_processing() {
            return Err(FlowError::PaymentNotConfirmed);
        }
        self.payment = match outcome {
            PaymentOutcome::Succeeded { reference } => PaymentPhase::Confirmed {
                pnr: generate_pnr(&mut self.rng),
                reference,
            },
            PaymentOutcome::Failed { reason } => PaymentPhase::Failed { reason },
        };
        Ok(&self.payment)
    }

    /// Payment → Success once the confirmation has been shown. Returns the booking
    /// and the generation the reset timer must be armed with.
    pub fn acknowledge_payment(&mut self) -> Result<(Booking, u64), FlowError> {
        let pnr = match &self.payment {
            PaymentPhase::Confirmed { pnr, .. } => pnr.clone(),
            _ => return Err(FlowError::PaymentNotConfirmed),
        };
        let booking = self.build_booking(pnr)?;
        let generation = self.flow.complete_payment()?;
        self.last_booking = Some(booking.clone());
        Ok((booking, generation))
    }

    /// Success → Search for the booking `generation` belongs to.
    pub fn reset_after_success(&mut self, generation: u64) -> bool {
        if !self.flow.reset_after_success(generation) {
            return false;
        }
        self.clear_view();
        true
    }

    /// Back to search from any step, except while money is moving.
    pub fn cancel(&mut self) -> Result<(), FlowError> {
        if self.flow.step() == BookingStep::Payment {
            match self.payment {
                PaymentPhase::Processing { .. } => return Err(FlowError::PaymentInFlight),
                PaymentPhase::Confirmed { .. } => return Err(FlowError::PaymentCompleted),
                _ => {}
            }
        }
        self.flow.cancel();
        self.clear_view();
        Ok(())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            owner: self.owner.clone(),
            step: self.flow.step(),
            train: self.flow.train().cloned(),
            class_type: self.flow.class_type().to_string(),
            seats: self.flow.seats().to_vec(),
            total_price: self.flow.total_price(),
            seat_map: self.seat_map.clone(),
            checkout: self.checkout,
            payment: self.payment.clone(),
            last_booking: self.last_booking.clone(),
            seed: self.seed,
            created_at: self.created_at,
        }
    }

    fn build_booking(&self, pnr: String) -> Result<Booking, FlowError> {
        let train = self.flow.train().ok_or(FlowError::MissingTrain)?;
        let now = Utc::now();
        Ok(Booking {
            pnr,
            train_id: train.id.clone(),
            train_number: train.number.clone(),
            train_name: train.name.clone(),
            from: train.from.clone(),
            to: train.to.clone(),
            travel_date: now.date_naive(),
            departure: train.departure.clone(),
            arrival: train.arrival.clone(),
            class_type: self.flow.class_type().to_string(),
            seats: self.flow.seats().to_vec(),
            passengers: self.flow.seats().len() as u32,
            total_amount: self
                .checkout
                .map(|c| c.final_amount)
                .unwrap_or_else(|| self.flow.total_price()),
            status: BookingStatus::Confirmed,
            booked_at: now,
        })
    }

    fn clear_view(&mut self) {
        self.seat_map = None;
        self.checkout = None;
        self.payment = PaymentPhase::Idle;
    }
}

/// Ten digits, 1000000000..=9999999999. Not guaranteed unique.
pub fn generate_pnr<R: Rng + ?Sized>(rng: &mut R) -> String {
    rng.gen_range(1_000_000_000u64..=9_999_999_999).to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub owner: String,
    pub step: BookingStep,
    pub train: Option<Train>,
    pub class_type: String,
    pub seats: Vec<String>,
    pub total_price: i64,
    pub seat_map: Option<SeatMap>,
    pub checkout: Option<CheckoutBreakdown>,
    pub payment: PaymentPhase,
    pub last_booking: Option<Booking>,
    pub seed: u64,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use railway_core::FareClass;

    fn intercity() -> Train {
        Train {
            id: "8050".into(),
            number: "8050".into(),
            name: "Intercity Express".into(),
            from: "Colombo Fort".into(),
            to: "Kandy".into(),
            departure: "07:00".into(),
            arrival: "09:45".into(),
            duration: "2h 45m".into(),
            classes: vec![FareClass { class_type: "Second Class".into(), price: 420, available: 40 }],
            days: vec!["Daily".into()],
        }
    }

    /// Picks the first `n` seats that came out available.
    fn pick_available(session: &mut BookingSession, n: usize) -> Vec<String> {
        let ids: Vec<String> = session
            .seat_map()
            .unwrap()
            .seats()
            .iter()
            .filter(|s| s.status == SeatStatus::Available)
            .take(n)
            .map(|s| s.id.clone())
            .collect();
        for id in &ids {
            session.toggle_seat(id).unwrap();
        }
        ids
    }

    fn session() -> BookingSession {
        BookingSession::with_seed("user-1", CheckoutCalculator::default(), 11)
    }

    #[test]
    fn test_two_seats_at_420_pay_840_plus_charges() {
        let mut s = session();
        s.select_train(intercity(), "Second Class").unwrap();
        assert_eq!(s.seat_map().unwrap().seats().len(), 60);

        let picked = pick_available(&mut s, 2);
        let checkout = s.confirm_seats().unwrap();

        assert_eq!(s.flow().seats(), picked.as_slice());
        assert_eq!(s.flow().total_price(), 840);
        assert_eq!(checkout.base_amount, 840);
        assert_eq!(checkout.final_amount, 840 + 17 + 43);

        let request = s.begin_payment(PaymentMethod::Upi).unwrap();
        assert_eq!(request.amount, checkout.final_amount);
        assert_eq!(request.session_id, s.id());
    }

    #[test]
    fn test_reselecting_train_regenerates_seat_map() {
        let mut s = session();
        s.select_train(intercity(), "Second Class").unwrap();
        pick_available(&mut s, 1);
        s.cancel().unwrap();
        assert!(s.seat_map().is_none());

        s.select_train(intercity(), "Second Class").unwrap();
        assert_eq!(s.seat_map().unwrap().count(SeatStatus::Selected), 0);
    }

    #[test]
    fn test_confirm_without_selection_fails() {
        let mut s = session();
        s.select_train(intercity(), "Second Class").unwrap();
        assert!(matches!(s.confirm_seats(), Err(FlowError::NoSeatsSelected)));
    }

    #[test]
    fn test_successful_payment_then_reset() {
        let mut s = session();
        s.select_train(intercity(), "Second Class").unwrap();
        pick_available(&mut s, 2);
        s.confirm_seats().unwrap();
        s.begin_payment(PaymentMethod::Card).unwrap();

        assert!(matches!(s.begin_payment(PaymentMethod::Card), Err(FlowError::PaymentInFlight)));
        assert!(matches!(s.cancel(), Err(FlowError::PaymentInFlight)));

        let phase = s
            .settle_payment(PaymentOutcome::Succeeded { reference: "SIM-1".into() })
            .unwrap()
            .clone();
        let pnr = match phase {
            PaymentPhase::Confirmed { pnr, .. } => pnr,
            other => panic!("unexpected phase {:?}", other),
        };
        assert_eq!(pnr.len(), 10);

        let (booking, generation) = s.acknowledge_payment().unwrap();
        assert_eq!(s.step(), BookingStep::Success);
        assert_eq!(booking.pnr, pnr);
        assert_eq!(booking.passengers, 2);
        assert_eq!(booking.status, BookingStatus::Confirmed);

        assert!(s.reset_after_success(generation));
        let snap = s.snapshot();
        assert_eq!(snap.step, BookingStep::Search);
        assert!(snap.train.is_none());
        assert_eq!(snap.class_type, "");
        assert!(snap.seats.is_empty());
        assert_eq!(snap.total_price, 0);
        assert!(snap.seat_map.is_none());
        assert_eq!(snap.payment, PaymentPhase::Idle);
        assert_eq!(snap.last_booking.unwrap().pnr, pnr);
    }

    #[test]
    fn test_failed_payment_can_be_retried() {
        let mut s = session();
        s.select_train(intercity(), "Second Class").unwrap();
        pick_available(&mut s, 1);
        s.confirm_seats().unwrap();
        s.begin_payment(PaymentMethod::Wallet).unwrap();

        s.settle_payment(PaymentOutcome::Failed { reason: "Card declined".into() }).unwrap();
        assert_eq!(s.step(), BookingStep::Payment);
        assert!(matches!(s.acknowledge_payment(), Err(FlowError::PaymentNotConfirmed)));

        assert!(s.begin_payment(PaymentMethod::Card).is_ok());
    }

    #[test]
    fn test_pnr_range() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..1000 {
            let pnr: u64 = generate_pnr(&mut rng).parse().unwrap();
            assert!((1_000_000_000..=9_999_999_999).contains(&pnr));
        }
    }

    #[test]
    fn test_seed_reproduces_seat_map() {
        let mut a = BookingSession::with_seed("u", CheckoutCalculator::default(), 99);
        let mut b = BookingSession::with_seed("u", CheckoutCalculator::default(), 99);
        let map_a = a.select_train(intercity(), "Second Class").unwrap().clone();
        let map_b = b.select_train(intercity(), "Second Class").unwrap();
        assert_eq!(map_a.seats(), map_b.seats());
    }
}
