mod common;

use std::time::Duration;

use common::{fast_rules, test_state};
use railway_api::app;
use railway_client::{ClientError, RailwayClient, SignupForm};
use railway_core::ticket::TicketBookingRequest;
use railway_core::PaymentMethod;
use railway_order::{BookingStep, PaymentPhase};

async fn spawn_server() -> RailwayClient {
    let state = test_state(&fast_rules(20)).await;
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app(state)).await.unwrap();
    });
    RailwayClient::new(format!("http://{}", addr))
}

#[tokio::test]
async fn test_search_falls_back_to_list() {
    let client = spawn_server().await;

    assert_eq!(client.search_trains("", "Kandy").await.unwrap().len(), 12);
    let found = client.search_trains("Colombo", "Jaffna").await.unwrap();
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|t| t.destination == "Jaffna"));
}

#[tokio::test]
async fn test_sign_up_sign_in_and_tickets() {
    let client = spawn_server().await;

    let mismatch = client
        .sign_up(SignupForm::new("sunil", "sunil@example.lk", "secret1", "secret9"))
        .await;
    assert!(matches!(mismatch, Err(ClientError::Validation(_))));

    let msg = client
        .sign_up(SignupForm::new("sunil", "sunil@example.lk", "secret1", "secret1"))
        .await
        .unwrap();
    assert_eq!(msg.message, "User registered successfully!");

    let err = client
        .sign_up(SignupForm::new("sunil", "x@example.lk", "secret1", "secret1"))
        .await
        .unwrap_err();
    match err {
        ClientError::Http { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Error: Username is already taken!");
        }
        other => panic!("unexpected {:?}", other),
    }

    let jwt = client.sign_in("sunil", "secret1").await.unwrap();
    assert_eq!(jwt.roles, vec!["ROLE_USER".to_string()]);
    assert!(client.is_signed_in());

    let train = client.search_trains("Galle", "Colombo").await.unwrap().remove(0);
    let ticket = client
        .book_ticket(&TicketBookingRequest {
            train_id: train.id.clone(),
            passenger_name: "Sunil Fernando".into(),
            number_of_seats: 1,
        })
        .await
        .unwrap();
    assert_eq!(ticket.price, 400.0);
    assert_eq!(client.my_tickets().await.unwrap().len(), 1);

    client.sign_out();
    assert_eq!(client.my_tickets().await.unwrap_err().status(), Some(401));
}

#[tokio::test]
async fn test_bad_credentials_message() {
    let client = spawn_server().await;
    let err = client.sign_in("ghost", "secret1").await.unwrap_err();
    match err {
        ClientError::Http { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Bad credentials");
        }
        other => panic!("unexpected {:?}", other),
    }
    assert!(!client.is_signed_in());
}

#[tokio::test]
async fn test_booking_session_via_client() {
    let client = spawn_server().await;
    client
        .sign_up(SignupForm::new("nadee", "nadee@example.lk", "secret1", "secret1"))
        .await
        .unwrap();
    client.sign_in("nadee", "secret1").await.unwrap();

    let train = client.search_trains("Colombo", "Kandy").await.unwrap().remove(0);
    let session = client.create_session().await.unwrap();
    let snapshot = client.select_train(session.id, &train.id, "Standard Class").await.unwrap();
    assert_eq!(snapshot.step, BookingStep::Seats);

    let seat = snapshot
        .seat_map
        .unwrap()
        .seats()
        .iter()
        .find(|s| s.status == railway_catalog::SeatStatus::Available)
        .map(|s| s.id.clone())
        .unwrap();
    let toggled = client.toggle_seat(session.id, &seat).await.unwrap();
    assert_eq!(toggled.selected, vec![seat.clone()]);

    let checkout = client.confirm_seats(session.id).await.unwrap();
    assert_eq!(checkout.base_amount, 600);

    let accepted = client.pay(session.id, PaymentMethod::Wallet).await.unwrap();
    assert_eq!(accepted.amount, checkout.final_amount);

    let mut confirmed = false;
    for _ in 0..200 {
        let s = client.session(session.id).await.unwrap();
        if matches!(s.payment, PaymentPhase::Confirmed { .. }) || s.last_booking.is_some() {
            confirmed = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(confirmed);

    client.delete_session(session.id).await.unwrap();
    assert_eq!(client.session(session.id).await.unwrap_err().status(), Some(404));
}
