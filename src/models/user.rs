use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[sqlx(rename = "password")]
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub referral_code: String,
    pub referred_by: Option<String>,
    pub created_at: Option<String>,
}

/// Public projection of a user returned by `/user-details`.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct UserDetails {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub referral_code: String,
    pub referred_by: Option<String>,
}

impl From<User> for UserDetails {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            referral_code: user.referral_code,
            referred_by: user.referred_by,
        }
    }
}

/// Row to be inserted on signup. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub referral_code: String,
    pub referred_by: Option<String>,
}
