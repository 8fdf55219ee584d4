use crate::models::{RefereeStatus, Referral};
use crate::repositories::user_repository::{
    unique_violation, RepositoryError, RepositoryResult,
};
use async_trait::async_trait;
use sqlx::SqlitePool;

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait ReferralRepository: Send + Sync {
    async fn create_referral(
        &self,
        referred_user_id: i64,
        referee_name: &str,
        referee_email: &str,
    ) -> RepositoryResult<Referral>;
    async fn find_by_referee_email(&self, email: &str) -> RepositoryResult<Option<Referral>>;
    async fn list_for_referrer(&self, referred_user_id: i64) -> RepositoryResult<Vec<Referral>>;
}

pub struct SqliteReferralRepository {
    pool: SqlitePool,
}

impl SqliteReferralRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReferralRepository for SqliteReferralRepository {
    async fn create_referral(
        &self,
        referred_user_id: i64,
        referee_name: &str,
        referee_email: &str,
    ) -> RepositoryResult<Referral> {
        let result = sqlx::query(
            r#"
            INSERT INTO user_referrals (referred_user_id, referee_name, referee_email, referee_status)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(referred_user_id)
        .bind(referee_name)
        .bind(referee_email)
        .bind(RefereeStatus::Pending)
        .execute(&self.pool)
        .await;

        let id = match result {
            Ok(res) => res.last_insert_rowid(),
            Err(e) => {
                return Err(match unique_violation(&e) {
                    Some(field) => RepositoryError::AlreadyExists(field),
                    None => RepositoryError::Database(e),
                });
            }
        };

        sqlx::query_as::<_, Referral>(
            r#"
            SELECT id, referred_user_id, referee_name, referee_email, referee_status, created_at
            FROM user_referrals
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    async fn find_by_referee_email(&self, email: &str) -> RepositoryResult<Option<Referral>> {
        let referral = sqlx::query_as::<_, Referral>(
            r#"
            SELECT id, referred_user_id, referee_name, referee_email, referee_status, created_at
            FROM user_referrals
            WHERE referee_email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(referral)
    }

    async fn list_for_referrer(&self, referred_user_id: i64) -> RepositoryResult<Vec<Referral>> {
        let referrals = sqlx::query_as::<_, Referral>(
            r#"
            SELECT id, referred_user_id, referee_name, referee_email, referee_status, created_at
            FROM user_referrals
            WHERE referred_user_id = ?
            ORDER BY id ASC
            "#,
        )
        .bind(referred_user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(referrals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::UniqueField;
    use crate::test_utils::{create_test_pool, test_helpers};

    #[tokio::test]
    async fn test_create_and_list() {
        let pool = create_test_pool().await;
        let alice =
            test_helpers::insert_test_user(&pool, "alice", "alice@example.com", "pw", "AB12")
                .await
                .unwrap();
        let repo = SqliteReferralRepository::new(pool);

        let referral = repo
            .create_referral(alice, "Bob", "bob@example.com")
            .await
            .unwrap();
        assert_eq!(referral.referee_status, RefereeStatus::Pending);
        assert_eq!(referral.referred_user_id, alice);

        repo.create_referral(alice, "Carol", "carol@example.com")
            .await
            .unwrap();

        let listed = repo.list_for_referrer(alice).await.unwrap();
        let emails: Vec<&str> = listed.iter().map(|r| r.referee_email.as_str()).collect();
        assert_eq!(emails, vec!["bob@example.com", "carol@example.com"]);
        assert!(repo.list_for_referrer(alice + 1).await.unwrap().is_empty());

        let found = repo.find_by_referee_email("bob@example.com").await.unwrap();
        assert_eq!(found.map(|r| r.id), Some(referral.id));
    }

    #[tokio::test]
    async fn test_duplicate_referee_email_is_rejected() {
        let pool = create_test_pool().await;
        let alice =
            test_helpers::insert_test_user(&pool, "alice", "alice@example.com", "pw", "AB12")
                .await
                .unwrap();
        let repo = SqliteReferralRepository::new(pool);

        repo.create_referral(alice, "Bob", "bob@example.com")
            .await
            .unwrap();
        let result = repo.create_referral(alice, "Bobby", "bob@example.com").await;
        assert!(matches!(
            result,
            Err(RepositoryError::AlreadyExists(UniqueField::RefereeEmail))
        ));
    }

    #[tokio::test]
    async fn test_unknown_referrer_violates_foreign_key() {
        let pool = create_test_pool().await;
        let repo = SqliteReferralRepository::new(pool);

        let result = repo.create_referral(999, "Bob", "bob@example.com").await;
        assert!(matches!(result, Err(RepositoryError::Database(_))));
    }
}
