use crate::models::{NewUser, RefereeStatus, User, UserDetails};
use async_trait::async_trait;
use sqlx::SqlitePool;

/// Column guarded by a UNIQUE constraint that rejected a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Username,
    Email,
    ReferralCode,
    RefereeEmail,
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Record not found")]
    NotFound,
    #[error("Duplicate value for {0:?}")]
    AlreadyExists(UniqueField),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Maps a SQLite unique violation onto the column it names, e.g.
/// `UNIQUE constraint failed: user.email`.
pub(crate) fn unique_violation(err: &sqlx::Error) -> Option<UniqueField> {
    let db_err = match err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => db_err,
        _ => return None,
    };
    let message = db_err.message();
    if message.contains("user.username") {
        Some(UniqueField::Username)
    } else if message.contains("user.email") {
        Some(UniqueField::Email)
    } else if message.contains("user.referral_code") {
        Some(UniqueField::ReferralCode)
    } else if message.contains("user_referrals.referee_email") {
        Some(UniqueField::RefereeEmail)
    } else {
        None
    }
}

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait UserRepository: Send + Sync {
    /// Inserts the user. When `new_user.referred_by` is set, every pending
    /// invitation for the user's email is marked successful in the same
    /// transaction.
    async fn register_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
    async fn find_by_referral_code(&self, code: &str) -> RepositoryResult<Option<User>>;
    async fn referral_code_exists(&self, code: &str) -> RepositoryResult<bool>;
    async fn find_details_by_username(
        &self,
        username: &str,
    ) -> RepositoryResult<Option<UserDetails>>;
    async fn list_users(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> RepositoryResult<Vec<User>>;
}

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, column: &str, value: &str) -> RepositoryResult<Option<User>> {
        let sql = format!(
            r#"
            SELECT id, username, email, password, referral_code, referred_by, created_at
            FROM user
            WHERE {} = ?
            "#,
            column
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn register_user(&self, new_user: &NewUser) -> RepositoryResult<User> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO user (username, email, password, referral_code, referred_by)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(&new_user.referral_code)
        .bind(&new_user.referred_by)
        .execute(&mut *tx)
        .await;

        let id = match inserted {
            Ok(res) => res.last_insert_rowid(),
            Err(e) => {
                return Err(match unique_violation(&e) {
                    Some(field) => RepositoryError::AlreadyExists(field),
                    None => RepositoryError::Database(e),
                });
            }
        };

        if new_user.referred_by.is_some() {
            // Matches on email alone: a referee row is not tied to a specific code.
            let redeemed = sqlx::query(
                "UPDATE user_referrals SET referee_status = ? WHERE referee_email = ? AND referee_status = ?",
            )
            .bind(RefereeStatus::Successful)
            .bind(&new_user.email)
            .bind(RefereeStatus::Pending)
            .execute(&mut *tx)
            .await?;
            tracing::debug!(
                email = %new_user.email,
                rows = redeemed.rows_affected(),
                "Redeemed pending referrals"
            );
        }

        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password, referral_code, referred_by, created_at
            FROM user
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>> {
        self.find_one("username", username).await
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        self.find_one("email", email).await
    }

    async fn find_by_referral_code(&self, code: &str) -> RepositoryResult<Option<User>> {
        self.find_one("referral_code", code).await
    }

    async fn referral_code_exists(&self, code: &str) -> RepositoryResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user WHERE referral_code = ?")
            .bind(code)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    async fn find_details_by_username(
        &self,
        username: &str,
    ) -> RepositoryResult<Option<UserDetails>> {
        let details = sqlx::query_as::<_, UserDetails>(
            r#"
            SELECT id, username, email, referral_code, referred_by
            FROM user
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(details)
    }

    async fn list_users(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> RepositoryResult<Vec<User>> {
        let limit = limit.unwrap_or(100);
        let offset = offset.unwrap_or(0);

        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password, referral_code, referred_by, created_at
            FROM user
            ORDER BY id ASC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }
}
