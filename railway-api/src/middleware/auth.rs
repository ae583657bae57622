use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization};
use axum_extra::TypedHeader;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use railway_core::{Role, User};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, state::AppState};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub role: Role,
    pub exp: usize,
}

impl Claims {
    pub fn for_user(user: &User, expiration_seconds: u64) -> Self {
        Self {
            sub: user.id.clone(),
            username: user.username.clone(),
            role: user.role,
            exp: (Utc::now() + Duration::seconds(expiration_seconds as i64)).timestamp() as usize,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

pub fn issue_token(claims: &Claims, secret: &str) -> Result<String, AppError> {
    encode(&Header::default(), claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| AppError::InternalServerError(format!("Token encoding failed: {}", e)))
}

fn verify_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &Validation::default())
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!("Rejected token: {}", e);
            AppError::AuthenticationError("Invalid or expired token".to_string())
        })
}

async fn authenticate(state: &AppState, req: Request) -> Result<(Claims, Request), AppError> {
    let (mut parts, body) = req.into_parts();
    let TypedHeader(Authorization(bearer)) =
        TypedHeader::<Authorization<Bearer>>::from_request_parts(&mut parts, state)
            .await
            .map_err(|_| AppError::AuthenticationError("Missing bearer token".to_string()))?;

    let claims = verify_token(bearer.token(), &state.auth.secret)?;
    Ok((claims, Request::from_parts(parts, body)))
}

/// Any signed-in user. Inserts [`Claims`] into the request extensions.
pub async fn user_auth_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (claims, mut req) = authenticate(&state, req).await?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Signed-in users with the admin role only.
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (claims, mut req) = authenticate(&state, req).await?;
    if !claims.is_admin() {
        return Err(AppError::AuthorizationError("Admin role required".to_string()));
    }
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_roundtrip_and_tamper() {
        let user = User::new("ruwan".into(), "ruwan@example.lk".into(), "x".into(), Role::Admin);
        let claims = Claims::for_user(&user, 3600);
        let token = issue_token(&claims, "s3cret").unwrap();

        let decoded = verify_token(&token, "s3cret").unwrap();
        assert_eq!(decoded.sub, user.id);
        assert!(decoded.is_admin());

        assert!(verify_token(&token, "other").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let user = User::new("ruwan".into(), "ruwan@example.lk".into(), "x".into(), Role::User);
        let mut claims = Claims::for_user(&user, 0);
        claims.exp = (Utc::now().timestamp() - 3600) as usize;
        let token = issue_token(&claims, "s3cret").unwrap();
        assert!(verify_token(&token, "s3cret").is_err());
    }
}
