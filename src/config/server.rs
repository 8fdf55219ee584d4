use axum::http::HeaderValue;
use std::{env, net::SocketAddr};
use tracing::warn;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:4000";
const DEFAULT_REFERRAL_CODE_MAX_ATTEMPTS: u32 = 64;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// `None` allows any origin.
    pub cors_allowed_origin: Option<String>,
    pub referral_code_max_attempts: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 4000)),
            cors_allowed_origin: None,
            referral_code_max_attempts: DEFAULT_REFERRAL_CODE_MAX_ATTEMPTS,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let bind_addr = match env::var("BIND_ADDR") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                warn!(value = %raw, "Invalid BIND_ADDR; using {}", DEFAULT_BIND_ADDR);
                defaults.bind_addr
            }),
            Err(_) => defaults.bind_addr,
        };

        let cors_allowed_origin = env::var("CORS_ALLOWED_ORIGIN")
            .ok()
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty() && origin != "*")
            .filter(|origin| {
                let valid = HeaderValue::from_str(origin).is_ok();
                if !valid {
                    warn!(value = %origin, "Invalid CORS_ALLOWED_ORIGIN; allowing any origin");
                }
                valid
            });

        let referral_code_max_attempts = match env::var("REFERRAL_CODE_MAX_ATTEMPTS") {
            Ok(raw) => match raw.parse::<u32>() {
                Ok(attempts) if attempts > 0 => attempts,
                _ => {
                    warn!(value = %raw, "Invalid REFERRAL_CODE_MAX_ATTEMPTS; using default");
                    defaults.referral_code_max_attempts
                }
            },
            Err(_) => defaults.referral_code_max_attempts,
        };

        Self {
            bind_addr,
            cors_allowed_origin,
            referral_code_max_attempts,
        }
    }
}
