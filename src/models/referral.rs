use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// Lifecycle of an invitation. The only transition is `Pending -> Successful`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum RefereeStatus {
    Pending,
    Successful,
}

impl RefereeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefereeStatus::Pending => "Pending",
            RefereeStatus::Successful => "Successful",
        }
    }
}

impl fmt::Display for RefereeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Referral {
    pub id: i64,
    pub referred_user_id: i64,
    pub referee_name: String,
    pub referee_email: String,
    pub referee_status: RefereeStatus,
    pub created_at: Option<String>,
}
