use crate::auth::AuthenticatedUser;
use crate::error::Result;
use crate::models::UserDetails;
use crate::AppState;
use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetailsResponse {
    pub user_details: UserDetails,
}

/// GET /user-details - The caller's own profile
pub async fn user_details_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> Result<Json<UserDetailsResponse>> {
    let user_details = state.user_service.user_details(&caller.username).await?;
    Ok(Json(UserDetailsResponse { user_details }))
}
