use chrono::{DateTime, Utc};
use railway_shared::Masked;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{CoreError, CoreResult};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    /// Sign-up sends a list of role names; anything other than `admin` means a regular user.
    /// Whether an anonymous caller may actually register as admin is decided by the server's
    /// `auth.allow_admin_signup` setting.
    pub fn from_requested(roles: Option<&[String]>) -> Self {
        match roles {
            Some(names) if names.iter().any(|r| r.eq_ignore_ascii_case("admin")) => Role::Admin,
            _ => Role::User,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    pub fn authority(&self) -> &'static str {
        match self {
            Role::User => "ROLE_USER",
            Role::Admin => "ROLE_ADMIN",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(CoreError::ValidationError(format!("Unknown role: {}", other))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: Masked<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: String, email: String, password_hash: String, role: Role) -> Self {
        Self {
            id: Uuid::new_v4().simple().to_string(),
            username,
            email,
            password_hash: Masked(password_hash),
            role,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: Masked<String>,
    #[serde(default)]
    pub role: Option<Vec<String>>,
}

impl SignupRequest {
    pub fn validate(&self) -> CoreResult<()> {
        if self.username.trim().is_empty() {
            return Err(CoreError::ValidationError("Username is required".into()));
        }
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(CoreError::ValidationError("A valid email is required".into()));
        }
        if self.password.expose().chars().count() < MIN_PASSWORD_LEN {
            return Err(CoreError::ValidationError(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigninRequest {
    pub username: String,
    pub password: Masked<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JwtResponse {
    pub access_token: Masked<String>,
    pub token_type: String,
    pub id: String,
    pub username: String,
    pub email: String,
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}
