pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod services;

// Make test_utils available for both unit tests and integration tests
pub mod test_utils;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use config::{ServerConfig, TokenConfig};
use repositories::{
    ReferralRepository, SqliteReferralRepository, SqliteUserRepository, UserRepository,
};
use services::{
    AuthService, EmailAvailability, ReferralCodeGenerator, ReferralService, TokenService,
    UserService,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub auth_service: Arc<AuthService>,
    pub referral_service: Arc<ReferralService>,
    pub token_service: Arc<TokenService>,
    pub pool: sqlx::SqlitePool,
}

impl AppState {
    /// Wire repositories and services over a migrated pool.
    pub fn new(pool: sqlx::SqlitePool, server: &ServerConfig, token: &TokenConfig) -> Self {
        let user_repository: Arc<dyn UserRepository> =
            Arc::new(SqliteUserRepository::new(pool.clone()));
        let referral_repository: Arc<dyn ReferralRepository> =
            Arc::new(SqliteReferralRepository::new(pool.clone()));

        let emails = EmailAvailability::new(user_repository.clone(), referral_repository.clone());
        let codes = ReferralCodeGenerator::new(server.referral_code_max_attempts);

        Self {
            user_service: Arc::new(UserService::new(
                user_repository.clone(),
                emails.clone(),
                codes,
            )),
            auth_service: Arc::new(AuthService::new(user_repository.clone())),
            referral_service: Arc::new(ReferralService::new(
                user_repository,
                referral_repository,
                emails,
            )),
            token_service: Arc::new(TokenService::new(token)),
            pool,
        }
    }
}

/// Full HTTP surface without CORS or tracing layers.
pub fn build_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/add-referre", post(handlers::add_referee_handler))
        .route("/referrals-data", get(handlers::referrals_data_handler))
        .route("/user-details", get(handlers::user_details_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer_token,
        ));

    Router::new()
        .route("/signup", post(auth::signup_handler))
        .route("/login", post(auth::login_handler))
        .route("/health", get(handlers::health_handler))
        .merge(protected_routes)
        .with_state(state)
}

pub fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    match config
        .cors_allowed_origin
        .as_deref()
        .and_then(|origin| HeaderValue::from_str(origin).ok())
    {
        Some(origin) => layer.allow_origin(origin),
        None => layer.allow_origin(Any),
    }
}

/// Router with the production middleware stack applied.
pub fn app(state: AppState, config: &ServerConfig) -> Router {
    build_router(state)
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
}
