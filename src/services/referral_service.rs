use crate::models::Referral;
use crate::repositories::{ReferralRepository, RepositoryError, UniqueField, UserRepository};
use crate::services::email_availability::{
    is_valid_email, EmailAvailability, EmailConflict,
};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum ReferralServiceError {
    #[error("Referee name is required")]
    MissingName,
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("Email already exists")]
    EmailAlreadyExists,
    #[error("Already referred by another person")]
    AlreadyReferred,
    #[error("User not found")]
    UserNotFound,
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

impl From<EmailConflict> for ReferralServiceError {
    fn from(err: EmailConflict) -> Self {
        match err {
            EmailConflict::Registered => ReferralServiceError::EmailAlreadyExists,
            EmailConflict::AlreadyReferred => ReferralServiceError::AlreadyReferred,
            EmailConflict::RepositoryError(e) => ReferralServiceError::RepositoryError(e),
        }
    }
}

pub struct AddRefereeRequest {
    pub name: String,
    pub email: String,
}

pub struct ReferralService {
    users: Arc<dyn UserRepository>,
    referrals: Arc<dyn ReferralRepository>,
    emails: EmailAvailability,
}

impl ReferralService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        referrals: Arc<dyn ReferralRepository>,
        emails: EmailAvailability,
    ) -> Self {
        Self {
            users,
            referrals,
            emails,
        }
    }

    /// Records a pending invitation from `referrer_username` to `request.email`.
    pub async fn add_referee(
        &self,
        referrer_username: &str,
        request: AddRefereeRequest,
    ) -> Result<Referral, ReferralServiceError> {
        let name = request.name.trim();
        let email = request.email.trim();

        if name.is_empty() {
            return Err(ReferralServiceError::MissingName);
        }
        if !is_valid_email(email) {
            return Err(ReferralServiceError::InvalidEmail);
        }

        self.emails.ensure_unclaimed(email).await?;

        let referrer = self
            .users
            .find_by_username(referrer_username)
            .await?
            .ok_or(ReferralServiceError::UserNotFound)?;

        match self.referrals.create_referral(referrer.id, name, email).await {
            Ok(referral) => {
                tracing::info!(
                    referrer = %referrer.username,
                    referee_email = %referral.referee_email,
                    "Referee added"
                );
                Ok(referral)
            }
            Err(RepositoryError::AlreadyExists(UniqueField::RefereeEmail)) => {
                Err(ReferralServiceError::AlreadyReferred)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn referrals_for(
        &self,
        referrer_username: &str,
    ) -> Result<Vec<Referral>, ReferralServiceError> {
        let referrer = self
            .users
            .find_by_username(referrer_username)
            .await?
            .ok_or(ReferralServiceError::UserNotFound)?;

        Ok(self.referrals.list_for_referrer(referrer.id).await?)
    }
}
