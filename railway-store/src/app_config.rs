use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    /// Absent means the in-memory store.
    pub database: Option<DatabaseConfig>,
    /// Absent means no rate limiting.
    pub redis: Option<RedisConfig>,
    pub auth: AuthConfig,
    #[serde(default)]
    pub business_rules: BusinessRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BusinessRules {
    #[serde(default = "default_convenience_fee")]
    pub convenience_fee_percent: u32,
    #[serde(default = "default_gst")]
    pub gst_percent: u32,
    #[serde(default = "default_step_ms")]
    pub payment_processing_ms: u64,
    #[serde(default = "default_step_ms")]
    pub confirmation_display_ms: u64,
    #[serde(default = "default_step_ms")]
    pub success_reset_ms: u64,
    #[serde(default = "default_rate_limit")]
    pub rate_limit_per_minute: i64,
    /// Booking sessions untouched for this long are dropped.
    #[serde(default = "default_session_idle_ms")]
    pub session_idle_ms: u64,
    #[serde(default = "default_session_sweep_ms")]
    pub session_sweep_ms: u64,
}

fn default_convenience_fee() -> u32 { 2 }
fn default_gst() -> u32 { 5 }
fn default_step_ms() -> u64 { 2000 }
fn default_rate_limit() -> i64 { 120 }
fn default_session_idle_ms() -> u64 { 30 * 60 * 1000 }
fn default_session_sweep_ms() -> u64 { 60 * 1000 }
fn default_true() -> bool { true }

impl Default for BusinessRules {
    fn default() -> Self {
        Self {
            convenience_fee_percent: default_convenience_fee(),
            gst_percent: default_gst(),
            payment_processing_ms: default_step_ms(),
            confirmation_display_ms: default_step_ms(),
            success_reset_ms: default_step_ms(),
            rate_limit_per_minute: default_rate_limit(),
            session_idle_ms: default_session_idle_ms(),
            session_sweep_ms: default_session_sweep_ms(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_seconds: u64,
    /// When false, sign-up requests asking for the admin role are refused.
    #[serde(default = "default_true")]
    pub allow_admin_signup: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedisConfig {
    pub url: String,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg.. `RAILWAY_AUTH__JWT_SECRET=...` sets `auth.jwt_secret`
            .add_source(config::Environment::with_prefix("RAILWAY").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};

    fn parse(toml: &str) -> Config {
        config::Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let cfg = parse(
            r#"
            [server]
            port = 8080
            [auth]
            jwt_secret = "secret"
            jwt_expiration_seconds = 86400
            "#,
        );
        assert!(cfg.database.is_none());
        assert!(cfg.redis.is_none());
        assert_eq!(cfg.business_rules.convenience_fee_percent, 2);
        assert_eq!(cfg.business_rules.gst_percent, 5);
        assert_eq!(cfg.business_rules.success_reset_ms, 2000);
        assert_eq!(cfg.business_rules.session_idle_ms, 1_800_000);
        assert!(cfg.auth.allow_admin_signup);
    }

    #[test]
    fn test_partial_business_rules() {
        let cfg = parse(
            r#"
            [server]
            port = 9000
            [database]
            url = "postgres://localhost/railway"
            [auth]
            jwt_secret = "secret"
            jwt_expiration_seconds = 60
            allow_admin_signup = false
            [business_rules]
            gst_percent = 18
            session_idle_ms = 5000
            "#,
        );
        assert!(!cfg.auth.allow_admin_signup);
        assert_eq!(cfg.business_rules.session_idle_ms, 5000);
        assert_eq!(cfg.business_rules.session_sweep_ms, 60_000);
        assert_eq!(cfg.database.unwrap().url, "postgres://localhost/railway");
        assert_eq!(cfg.business_rules.gst_percent, 18);
        assert_eq!(cfg.business_rules.convenience_fee_percent, 2);
    }
}
