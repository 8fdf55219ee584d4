pub mod test_helpers {
    use crate::config::{ServerConfig, TokenConfig};
    use crate::models::RefereeStatus;
    use crate::services::password::hash_password;
    use crate::AppState;
    use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

    pub const TEST_JWT_SECRET: &str = "integration-test-signing-secret";

    /// Create a new in-memory SQLite database for testing
    pub async fn create_test_db() -> Result<SqlitePool, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        crate::db::run_migrations(&pool).await?;

        Ok(pool)
    }

    /// Application state over `pool` with a fixed signing secret
    pub fn test_state(pool: SqlitePool) -> AppState {
        AppState::new(
            pool,
            &ServerConfig::default(),
            &TokenConfig::new(TEST_JWT_SECRET.as_bytes().to_vec()),
        )
    }

    /// Insert a user row directly, bypassing signup
    pub async fn insert_test_user(
        pool: &SqlitePool,
        username: &str,
        email: &str,
        password: &str,
        referral_code: &str,
    ) -> Result<i64, sqlx::Error> {
        let password_hash = hash_password(password).map_err(|e| {
            sqlx::Error::Configuration(format!("Password hashing failed: {}", e).into())
        })?;

        let result = sqlx::query(
            "INSERT INTO user (username, email, password, referral_code) VALUES (?, ?, ?, ?)",
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(referral_code)
        .execute(pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Insert a pending invitation from `referrer_id`
    pub async fn insert_test_referral(
        pool: &SqlitePool,
        referrer_id: i64,
        name: &str,
        email: &str,
    ) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO user_referrals (referred_user_id, referee_name, referee_email, referee_status)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(referrer_id)
        .bind(name)
        .bind(email)
        .bind(RefereeStatus::Pending)
        .execute(pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn referral_status(
        pool: &SqlitePool,
        referral_id: i64,
    ) -> Result<RefereeStatus, sqlx::Error> {
        sqlx::query_scalar("SELECT referee_status FROM user_referrals WHERE id = ?")
            .bind(referral_id)
            .fetch_one(pool)
            .await
    }

    pub async fn count_users(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM user")
            .fetch_one(pool)
            .await
    }
}

// Re-export commonly used test functions at module level for convenience
// Note: This is test-only code. Panic on error is acceptable in tests.
#[cfg(test)]
pub async fn create_test_pool() -> sqlx::SqlitePool {
    match test_helpers::create_test_db().await {
        Ok(pool) => pool,
        Err(e) => panic!("Failed to create test pool: {}", e),
    }
}
