use std::env;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::RngCore;
use tracing::warn;

use super::is_production;

const MIN_PRODUCTION_SECRET_BYTES: usize = 32;

/// Signing material for session tokens.
#[derive(Clone)]
pub struct TokenConfig {
    secret: Vec<u8>,
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl TokenConfig {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Reads `JWT_SECRET`. Outside production a missing secret falls back to
    /// a random per-process key, so tokens do not survive a restart.
    pub fn from_env() -> Self {
        match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => Self::new(decode_secret_bytes(&secret)),
            _ => {
                warn!("JWT_SECRET not set; generating ephemeral signing key (development only)");
                let mut bytes = [0u8; 64];
                rand::thread_rng().fill_bytes(&mut bytes);
                Self::new(bytes.to_vec())
            }
        }
    }

    pub fn secret(&self) -> &[u8] {
        &self.secret
    }
}

pub fn validate_production_config() {
    if !is_production() {
        return;
    }

    let secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set in production");
    let decoded_secret = decode_secret_bytes(&secret);

    if decoded_secret.len() < MIN_PRODUCTION_SECRET_BYTES {
        panic!(
            "FATAL: JWT_SECRET must be at least {} bytes in production",
            MIN_PRODUCTION_SECRET_BYTES
        );
    }

    let lowered = secret.to_ascii_lowercase();
    if lowered.contains("my_secret_key")
        || lowered.contains("changeme")
        || lowered.contains("example")
        || lowered.contains("default")
    {
        panic!("FATAL: JWT_SECRET appears to be a default value. Generate a secure secret!");
    }
}

fn decode_secret_bytes(secret: &str) -> Vec<u8> {
    STANDARD
        .decode(secret.as_bytes())
        .unwrap_or_else(|_| secret.as_bytes().to_vec())
}
