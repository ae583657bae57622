//! HTTP client for the railway booking API.

mod token;

use railway_catalog::CheckoutBreakdown;
use railway_core::identity::{JwtResponse, MessageResponse, SigninRequest, SignupRequest};
use railway_core::ticket::TicketBookingRequest;
use railway_core::{PaymentMethod, Ticket, TrainRecord};
use railway_order::{
    Booking, PayRequest, PaymentAccepted, SeatToggleResponse, SelectTrainRequest, SessionSnapshot,
};
use railway_shared::Masked;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use uuid::Uuid;

pub use token::TokenStore;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
    /// Rejected locally, nothing was sent.
    #[error("{0}")]
    Validation(String),
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("could not decode response: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Sign-up form as entered, including the confirmation field.
#[derive(Debug, Clone)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: Masked<String>,
    pub confirm_password: Masked<String>,
    pub roles: Vec<String>,
}

impl SignupForm {
    pub fn new(username: &str, email: &str, password: &str, confirm_password: &str) -> Self {
        Self {
            username: username.to_string(),
            email: email.to_string(),
            password: Masked::from(password),
            confirm_password: Masked::from(confirm_password),
            roles: vec!["user".to_string()],
        }
    }

    fn into_request(self) -> Result<SignupRequest, ClientError> {
        if self.password != self.confirm_password {
            return Err(ClientError::Validation("Passwords do not match".to_string()));
        }
        Ok(SignupRequest {
            username: self.username,
            email: self.email,
            password: self.password,
            role: Some(self.roles),
        })
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Clone)]
pub struct RailwayClient {
    base_url: String,
    cli: Client,
    tokens: TokenStore,
}

impl RailwayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cli: Client::new(),
            tokens: TokenStore::default(),
        }
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn is_signed_in(&self) -> bool {
        self.tokens.get().is_some()
    }

    fn request(&self, meth: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("{} {}", meth, url);
        self.cli.request(meth, url)
    }

    fn authed(&self, meth: Method, path: &str) -> RequestBuilder {
        let req = self.request(meth, path);
        match self.tokens.get() {
            Some(token) => req.bearer_auth(token.expose()),
            None => req,
        }
    }

    async fn send<U: DeserializeOwned>(&self, req: RequestBuilder) -> Result<U, ClientError> {
        let resp = self.check(req).await?;
        resp.json::<U>().await.map_err(|e| ClientError::Decode(e.to_string()))
    }

    async fn check(&self, req: RequestBuilder) -> Result<Response, ClientError> {
        let resp = req.send().await.map_err(ClientError::Transport)?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let text = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string());
        tracing::warn!("request failed ({}): {}", status.as_u16(), message);
        Err(ClientError::Http { status: status.as_u16(), message })
    }

    pub async fn list_trains(&self) -> Result<Vec<TrainRecord>, ClientError> {
        self.send(self.request(Method::GET, "/api/trains")).await
    }

    pub async fn get_train(&self, id: &str) -> Result<TrainRecord, ClientError> {
        self.send(self.request(Method::GET, &format!("/api/trains/{}", id))).await
    }

    /// Blank `source` or `destination` lists every train instead of searching.
    pub async fn search_trains(&self, source: &str, destination: &str) -> Result<Vec<TrainRecord>, ClientError> {
        let (source, destination) = (source.trim(), destination.trim());
        if source.is_empty() || destination.is_empty() {
            return self.list_trains().await;
        }
        let req = self
            .request(Method::GET, "/api/trains/search")
            .query(&[("source", source), ("destination", destination)]);
        self.send(req).await
    }

    pub async fn sign_up(&self, form: SignupForm) -> Result<MessageResponse, ClientError> {
        let body = form.into_request()?;
        self.send(self.request(Method::POST, "/api/auth/signup").json(&body)).await
    }

    /// Stores the returned access token for later calls.
    pub async fn sign_in(&self, username: &str, password: &str) -> Result<JwtResponse, ClientError> {
        let body = SigninRequest {
            username: username.to_string(),
            password: Masked::from(password),
        };
        let resp: JwtResponse = self.send(self.request(Method::POST, "/api/auth/signin").json(&body)).await?;
        self.tokens.set(resp.access_token.clone());
        Ok(resp)
    }

    pub fn sign_out(&self) {
        self.tokens.clear();
    }

    pub async fn book_ticket(&self, request: &TicketBookingRequest) -> Result<Ticket, ClientError> {
        self.send(self.authed(Method::POST, "/api/tickets/book").json(request)).await
    }

    pub async fn my_tickets(&self) -> Result<Vec<Ticket>, ClientError> {
        self.send(self.authed(Method::GET, "/api/tickets/my-tickets")).await
    }

    pub async fn cancel_ticket(&self, id: &str) -> Result<Ticket, ClientError> {
        self.send(self.authed(Method::POST, &format!("/api/tickets/cancel/{}", id))).await
    }

    pub async fn create_session(&self) -> Result<SessionSnapshot, ClientError> {
        self.send(self.authed(Method::POST, "/api/bookings/sessions")).await
    }

    pub async fn session(&self, id: Uuid) -> Result<SessionSnapshot, ClientError> {
        self.send(self.authed(Method::GET, &session_path(id, ""))).await
    }

    pub async fn select_train(&self, id: Uuid, train_id: &str, class_type: &str) -> Result<SessionSnapshot, ClientError> {
        let body = SelectTrainRequest {
            train_id: train_id.to_string(),
            class_type: class_type.to_string(),
        };
        self.send(self.authed(Method::POST, &session_path(id, "/train")).json(&body)).await
    }

    pub async fn toggle_seat(&self, id: Uuid, seat_id: &str) -> Result<SeatToggleResponse, ClientError> {
        self.send(self.authed(Method::POST, &session_path(id, &format!("/seats/{}", seat_id)))).await
    }

    pub async fn confirm_seats(&self, id: Uuid) -> Result<CheckoutBreakdown, ClientError> {
        self.send(self.authed(Method::POST, &session_path(id, "/confirm-seats"))).await
    }

    pub async fn pay(&self, id: Uuid, method: PaymentMethod) -> Result<PaymentAccepted, ClientError> {
        let body = PayRequest { method };
        self.send(self.authed(Method::POST, &session_path(id, "/pay")).json(&body)).await
    }

    pub async fn acknowledge(&self, id: Uuid) -> Result<Booking, ClientError> {
        self.send(self.authed(Method::POST, &session_path(id, "/acknowledge"))).await
    }

    pub async fn cancel_session(&self, id: Uuid) -> Result<SessionSnapshot, ClientError> {
        self.send(self.authed(Method::POST, &session_path(id, "/cancel"))).await
    }

    pub async fn delete_session(&self, id: Uuid) -> Result<(), ClientError> {
        self.check(self.authed(Method::DELETE, &session_path(id, ""))).await?;
        Ok(())
    }
}

fn session_path(id: Uuid, suffix: &str) -> String {
    format!("/api/bookings/sessions/{}{}", id, suffix)
}
