use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::State, routing::post, Json, Router};
use railway_core::identity::{JwtResponse, MessageResponse, SigninRequest, SignupRequest};
use railway_core::{Role, User};
use railway_shared::Masked;
use tracing::info;

use crate::middleware::auth::{issue_token, Claims};
use crate::{error::AppError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/signin", post(signin))
}

async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    req.validate()?;
    let username = req.username.trim().to_string();
    let email = req.email.trim().to_string();

    if state.users.exists_by_username(&username).await? {
        return Err(AppError::ValidationError("Error: Username is already taken!".to_string()));
    }
    if state.users.exists_by_email(&email).await? {
        return Err(AppError::ValidationError("Error: Email is already in use!".to_string()));
    }

    let role = Role::from_requested(req.role.as_deref());
    if role == Role::Admin && !state.auth.allow_admin_signup {
        return Err(AppError::AuthorizationError("Error: Admin sign-up is disabled!".to_string()));
    }

    let password_hash = hash_password(req.password).await?;
    let user = User::new(username, email, password_hash, role);
    state.users.create_user(&user).await?;

    info!(user_id = %user.id, role = role.as_str(), "User registered");
    Ok(Json(MessageResponse::new("User registered successfully!")))
}

async fn signin(
    State(state): State<AppState>,
    Json(req): Json<SigninRequest>,
) -> Result<Json<JwtResponse>, AppError> {
    let bad_credentials = || AppError::AuthenticationError("Bad credentials".to_string());

    let user = state
        .users
        .find_by_username(req.username.trim())
        .await?
        .ok_or_else(bad_credentials)?;

    if !verify_password(req.password, user.password_hash.clone()).await? {
        return Err(bad_credentials());
    }

    let claims = Claims::for_user(&user, state.auth.expiration);
    let token = issue_token(&claims, &state.auth.secret)?;

    info!(user_id = %user.id, "User signed in");
    Ok(Json(JwtResponse {
        access_token: Masked(token),
        token_type: "Bearer".to_string(),
        id: user.id,
        username: user.username,
        email: user.email,
        roles: vec![user.role.authority().to_string()],
    }))
}

async fn hash_password(password: Masked<String>) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.expose().as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
    })
    .await
    .map_err(|e| AppError::InternalServerError(e.to_string()))?
}

async fn verify_password(password: Masked<String>, stored: Masked<String>) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || {
        let parsed = PasswordHash::new(stored.expose())
            .map_err(|e| AppError::InternalServerError(format!("Failed to parse password hash: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(password.expose().as_bytes(), &parsed)
            .is_ok())
    })
    .await
    .map_err(|e| AppError::InternalServerError(e.to_string()))?
}
