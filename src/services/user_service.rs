use crate::models::{NewUser, User, UserDetails};
use crate::repositories::{RepositoryError, UniqueField, UserRepository};
use crate::services::email_availability::{
    is_valid_email, EmailAvailability, EmailConflict,
};
use crate::services::password::hash_password;
use crate::services::referral_code::{is_well_formed, ReferralCodeError, ReferralCodeGenerator};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    #[error("Username is required")]
    MissingUsername,
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("Password is required")]
    MissingPassword,
    #[error("Username already exists")]
    UsernameTaken,
    #[error("Email already exists")]
    EmailTaken,
    #[error("Invalid referral code")]
    InvalidReferralCode,
    #[error("User not found")]
    UserNotFound,
    #[error("Referral codes exhausted after {0} attempts")]
    ReferralCodesExhausted(u32),
    #[error("Password hashing failed: {0}")]
    HashingError(String),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

impl From<ReferralCodeError> for UserServiceError {
    fn from(err: ReferralCodeError) -> Self {
        match err {
            ReferralCodeError::Exhausted(attempts) => {
                UserServiceError::ReferralCodesExhausted(attempts)
            }
            ReferralCodeError::RepositoryError(e) => UserServiceError::RepositoryError(e),
        }
    }
}

pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Empty means the user signed up without a referral.
    pub referral_code: String,
}

pub struct UserService {
    repository: Arc<dyn UserRepository>,
    emails: EmailAvailability,
    codes: ReferralCodeGenerator,
}

impl UserService {
    pub fn new(
        repository: Arc<dyn UserRepository>,
        emails: EmailAvailability,
        codes: ReferralCodeGenerator,
    ) -> Self {
        Self {
            repository,
            emails,
            codes,
        }
    }

    /// Registers a new user, redeeming `referral_code` when one is given.
    pub async fn signup(&self, request: SignupRequest) -> Result<User, UserServiceError> {
        let username = request.username.trim();
        let email = request.email.trim();
        let referral_code = request.referral_code.trim();

        if username.is_empty() {
            return Err(UserServiceError::MissingUsername);
        }
        if !is_valid_email(email) {
            return Err(UserServiceError::InvalidEmail);
        }
        if request.password.is_empty() {
            return Err(UserServiceError::MissingPassword);
        }

        if self.repository.find_by_username(username).await?.is_some() {
            return Err(UserServiceError::UsernameTaken);
        }

        match self.emails.ensure_not_registered(email).await {
            Ok(()) => {}
            Err(EmailConflict::Registered) | Err(EmailConflict::AlreadyReferred) => {
                return Err(UserServiceError::EmailTaken)
            }
            Err(EmailConflict::RepositoryError(e)) => return Err(e.into()),
        }

        let referred_by = if referral_code.is_empty() {
            None
        } else {
            Some(self.resolve_referrer(referral_code).await?)
        };

        let password_hash = hash_password(&request.password)
            .map_err(|e| UserServiceError::HashingError(e.to_string()))?;

        // A concurrent signup can still take the generated code before our
        // insert; draw again within the same attempt budget.
        let mut remaining = self.codes.max_attempts();
        loop {
            let referral_code = self
                .codes
                .generate_unique(self.repository.as_ref(), &mut remaining)
                .await?;
            let new_user = NewUser {
                username: username.to_string(),
                email: email.to_string(),
                password_hash: password_hash.clone(),
                referral_code,
                referred_by: referred_by.clone(),
            };

            match self.repository.register_user(&new_user).await {
                Ok(user) => {
                    tracing::info!(
                        username = %user.username,
                        referred_by = ?user.referred_by,
                        "User signed up"
                    );
                    return Ok(user);
                }
                Err(RepositoryError::AlreadyExists(UniqueField::Username)) => {
                    return Err(UserServiceError::UsernameTaken)
                }
                Err(RepositoryError::AlreadyExists(UniqueField::Email)) => {
                    return Err(UserServiceError::EmailTaken)
                }
                Err(RepositoryError::AlreadyExists(UniqueField::ReferralCode)) => {
                    tracing::warn!(remaining, "Referral code taken during insert, regenerating");
                }
                Err(e) => return Err(UserServiceError::RepositoryError(e)),
            }
        }
    }

    async fn resolve_referrer(&self, referral_code: &str) -> Result<String, UserServiceError> {
        if !is_well_formed(referral_code) {
            return Err(UserServiceError::InvalidReferralCode);
        }
        self.repository
            .find_by_referral_code(referral_code)
            .await?
            .map(|owner| owner.username)
            .ok_or(UserServiceError::InvalidReferralCode)
    }

    pub async fn user_details(&self, username: &str) -> Result<UserDetails, UserServiceError> {
        self.repository
            .find_details_by_username(username)
            .await?
            .ok_or(UserServiceError::UserNotFound)
    }

    pub async fn list_users(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<User>, UserServiceError> {
        Ok(self.repository.list_users(limit, offset).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::referral_repository::MockReferralRepository;
    use crate::repositories::user_repository::MockUserRepository;
    use mockall::predicate::*;

    fn existing_user(username: &str, email: &str, code: &str) -> User {
        User {
            id: 1,
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            referral_code: code.to_string(),
            referred_by: None,
            created_at: None,
        }
    }

    fn service(users: MockUserRepository) -> UserService {
        let users: Arc<dyn UserRepository> = Arc::new(users);
        let emails =
            EmailAvailability::new(users.clone(), Arc::new(MockReferralRepository::new()));
        UserService::new(users, emails, ReferralCodeGenerator::new(4))
    }

    fn request(referral_code: &str) -> SignupRequest {
        SignupRequest {
            username: "bob".to_string(),
            email: "bob@example.com".to_string(),
            password: "password123".to_string(),
            referral_code: referral_code.to_string(),
        }
    }

    #[tokio::test]
    async fn test_signup_without_referral() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_find_by_username()
            .with(eq("bob"))
            .returning(|_| Box::pin(async move { Ok(None) }));
        mock_repo
            .expect_find_by_email()
            .with(eq("bob@example.com"))
            .returning(|_| Box::pin(async move { Ok(None) }));
        mock_repo
            .expect_referral_code_exists()
            .returning(|_| Box::pin(async move { Ok(false) }));
        mock_repo
            .expect_register_user()
            .withf(|new_user| {
                new_user.referred_by.is_none() && new_user.password_hash != "password123"
            })
            .times(1)
            .returning(|new_user| {
                let mut user =
                    existing_user(&new_user.username, &new_user.email, &new_user.referral_code);
                user.id = 2;
                Box::pin(async move { Ok(user) })
            });

        let user = service(mock_repo).signup(request("")).await.unwrap();
        assert_eq!(user.username, "bob");
        assert!(is_well_formed(&user.referral_code));
    }

    #[tokio::test]
    async fn test_signup_username_taken() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo.expect_find_by_username().returning(|_| {
            let user = existing_user("bob", "other@example.com", "AB12");
            Box::pin(async move { Ok(Some(user)) })
        });
        mock_repo.expect_register_user().never();

        let result = service(mock_repo).signup(request("")).await;
        assert!(matches!(result, Err(UserServiceError::UsernameTaken)));
    }

    #[tokio::test]
    async fn test_signup_unknown_referral_code_inserts_nothing() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_find_by_username()
            .returning(|_| Box::pin(async move { Ok(None) }));
        mock_repo
            .expect_find_by_email()
            .returning(|_| Box::pin(async move { Ok(None) }));
        mock_repo
            .expect_find_by_referral_code()
            .with(eq("ZZ99"))
            .times(1)
            .returning(|_| Box::pin(async move { Ok(None) }));
        mock_repo.expect_register_user().never();

        let result = service(mock_repo).signup(request("ZZ99")).await;
        assert!(matches!(result, Err(UserServiceError::InvalidReferralCode)));
    }

    #[tokio::test]
    async fn test_signup_malformed_referral_code_skips_lookup() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_find_by_username()
            .returning(|_| Box::pin(async move { Ok(None) }));
        mock_repo
            .expect_find_by_email()
            .returning(|_| Box::pin(async move { Ok(None) }));
        mock_repo.expect_find_by_referral_code().never();

        let result = service(mock_repo).signup(request("not-a-code")).await;
        assert!(matches!(result, Err(UserServiceError::InvalidReferralCode)));
    }

    #[tokio::test]
    async fn test_signup_regenerates_code_on_insert_collision() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_find_by_username()
            .returning(|_| Box::pin(async move { Ok(None) }));
        mock_repo
            .expect_find_by_email()
            .returning(|_| Box::pin(async move { Ok(None) }));
        mock_repo
            .expect_referral_code_exists()
            .returning(|_| Box::pin(async move { Ok(false) }));
        let mut inserts = 0;
        mock_repo
            .expect_register_user()
            .times(2)
            .returning(move |new_user| {
                inserts += 1;
                let result = if inserts == 1 {
                    Err(RepositoryError::AlreadyExists(UniqueField::ReferralCode))
                } else {
                    Ok(existing_user(
                        &new_user.username,
                        &new_user.email,
                        &new_user.referral_code,
                    ))
                };
                Box::pin(async move { result })
            });

        let user = service(mock_repo).signup(request("")).await.unwrap();
        assert_eq!(user.email, "bob@example.com");
    }

    #[tokio::test]
    async fn test_insert_collisions_share_the_attempt_budget() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_find_by_username()
            .returning(|_| Box::pin(async move { Ok(None) }));
        mock_repo
            .expect_find_by_email()
            .returning(|_| Box::pin(async move { Ok(None) }));
        mock_repo
            .expect_referral_code_exists()
            .times(4)
            .returning(|_| Box::pin(async move { Ok(false) }));
        mock_repo
            .expect_register_user()
            .times(4)
            .returning(|_| {
                Box::pin(async move {
                    Err(RepositoryError::AlreadyExists(UniqueField::ReferralCode))
                })
            });

        let result = service(mock_repo).signup(request("")).await;
        assert!(matches!(
            result,
            Err(UserServiceError::ReferralCodesExhausted(4))
        ));
    }

    #[tokio::test]
    async fn test_signup_rejects_invalid_email() {
        let mock_repo = MockUserRepository::new();
        let mut req = request("");
        req.email = "invalid-email".to_string();

        let result = service(mock_repo).signup(req).await;
        assert!(matches!(result, Err(UserServiceError::InvalidEmail)));
    }

    #[tokio::test]
    async fn test_user_details_not_found() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_find_details_by_username()
            .with(eq("ghost"))
            .returning(|_| Box::pin(async move { Ok(None) }));

        let result = service(mock_repo).user_details("ghost").await;
        assert!(matches!(result, Err(UserServiceError::UserNotFound)));
    }
}
