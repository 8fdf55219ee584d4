use crate::repositories::user_repository::{RepositoryError, UserRepository};
use rand::Rng;

pub const REFERRAL_CODE_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
pub const REFERRAL_CODE_LENGTH: usize = 4;

#[derive(Debug, thiserror::Error)]
pub enum ReferralCodeError {
    #[error("No unused referral code found after {0} attempts")]
    Exhausted(u32),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

#[derive(Debug, Clone)]
pub struct ReferralCodeGenerator {
    max_attempts: u32,
}

impl ReferralCodeGenerator {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Each character is drawn independently from the 62-symbol charset.
    pub fn generate(&self) -> String {
        let mut rng = rand::thread_rng();
        (0..REFERRAL_CODE_LENGTH)
            .map(|_| {
                let idx = rng.gen_range(0..REFERRAL_CODE_CHARSET.len());
                REFERRAL_CODE_CHARSET[idx] as char
            })
            .collect()
    }

    /// Draws codes until one is not owned by any user. Each draw spends one
    /// unit of `remaining`; the caller owns the budget so that retries after
    /// an insert-time collision share it.
    pub async fn generate_unique(
        &self,
        users: &dyn UserRepository,
        remaining: &mut u32,
    ) -> Result<String, ReferralCodeError> {
        while *remaining > 0 {
            *remaining -= 1;
            let code = self.generate();
            if !users.referral_code_exists(&code).await? {
                return Ok(code);
            }
            tracing::debug!(remaining = *remaining, "Referral code collision, retrying");
        }

        tracing::error!(
            attempts = self.max_attempts,
            "Referral code space exhausted"
        );
        Err(ReferralCodeError::Exhausted(self.max_attempts))
    }
}

pub fn is_well_formed(code: &str) -> bool {
    code.len() == REFERRAL_CODE_LENGTH && code.bytes().all(|b| b.is_ascii_alphanumeric())
}
