use crate::auth::AuthenticatedUser;
use crate::error::Result;
use crate::handlers::JsonBody;
use crate::models::Referral;
use crate::services::AddRefereeRequest;
use crate::AppState;
use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct AddRefereePayload {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReferralsResponse {
    pub referrals: Vec<Referral>,
}

/// POST /add-referre - Invite someone by email
pub async fn add_referee_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    JsonBody(payload): JsonBody<AddRefereePayload>,
) -> Result<Json<MessageResponse>> {
    let request = AddRefereeRequest {
        name: payload.name,
        email: payload.email,
    };

    state
        .referral_service
        .add_referee(&caller.username, request)
        .await?;

    Ok(Json(MessageResponse {
        message: "Referee added successfully".to_string(),
    }))
}

/// GET /referrals-data - List the caller's invitations
pub async fn referrals_data_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> Result<Json<ReferralsResponse>> {
    let referrals = state
        .referral_service
        .referrals_for(&caller.username)
        .await?;

    Ok(Json(ReferralsResponse { referrals }))
}
