pub mod server;
pub mod token;

pub use server::ServerConfig;
pub use token::{validate_production_config, TokenConfig};

use std::env;

pub(crate) fn current_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string())
}

pub(crate) fn is_production() -> bool {
    current_environment() == "production"
}
