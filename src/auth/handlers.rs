use crate::error::Result;
use crate::handlers::JsonBody;
use crate::services::{LoginRequest, SignupRequest};
use crate::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupPayload {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub referral_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub jwt_token: String,
}

/// POST /signup - Register and receive a session token
pub async fn signup_handler(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<SignupPayload>,
) -> Result<Json<TokenResponse>> {
    let request = SignupRequest {
        username: payload.username,
        email: payload.email,
        password: payload.password,
        referral_code: payload.referral_code.unwrap_or_default(),
    };

    let user = state.user_service.signup(request).await?;
    let jwt_token = state.token_service.issue(&user.username)?;

    Ok(Json(TokenResponse { jwt_token }))
}

/// POST /login - Exchange email and password for a session token
pub async fn login_handler(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginPayload>,
) -> Result<Json<TokenResponse>> {
    let request = LoginRequest {
        email: payload.email,
        password: payload.password,
    };

    let user = state
        .auth_service
        .authenticate(request)
        .await
        .inspect_err(|e| tracing::info!("Login rejected: {}", e))?;
    let jwt_token = state.token_service.issue(&user.username)?;
    tracing::info!(username = %user.username, "User logged in");

    Ok(Json(TokenResponse { jwt_token }))
}
