use crate::repositories::{ReferralRepository, RepositoryError, UserRepository};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum EmailConflict {
    #[error("Email already exists")]
    Registered,
    #[error("Already referred by another person")]
    AlreadyReferred,
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

/// Shape check only; deliverability is never verified.
pub fn is_valid_email(email: &str) -> bool {
    !email.is_empty() && email.len() <= 255 && email.contains('@')
}

/// The one place that decides whether an email address is still free.
#[derive(Clone)]
pub struct EmailAvailability {
    users: Arc<dyn UserRepository>,
    referrals: Arc<dyn ReferralRepository>,
}

impl EmailAvailability {
    pub fn new(users: Arc<dyn UserRepository>, referrals: Arc<dyn ReferralRepository>) -> Self {
        Self { users, referrals }
    }

    /// Fails if a user already owns the email.
    pub async fn ensure_not_registered(&self, email: &str) -> Result<(), EmailConflict> {
        if self.users.find_by_email(email).await?.is_some() {
            return Err(EmailConflict::Registered);
        }
        Ok(())
    }

    /// Fails if a user owns the email or any referral already invites it.
    pub async fn ensure_unclaimed(&self, email: &str) -> Result<(), EmailConflict> {
        self.ensure_not_registered(email).await?;
        if self.referrals.find_by_referee_email(email).await?.is_some() {
            return Err(EmailConflict::AlreadyReferred);
        }
        Ok(())
    }
}
