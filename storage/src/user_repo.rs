//! User repository: registered bot users and extra admins.

use crate::models::UserRecord;
use crate::sqlite_pool::SqlitePoolManager;
use chrono::Utc;
use tracing::info;

#[derive(Clone)]
pub struct UserRepository {
    pool_manager: SqlitePoolManager,
}

impl UserRepository {
    pub fn new(pool_manager: SqlitePoolManager) -> Self {
        Self { pool_manager }
    }

    pub(crate) async fn init(&self) -> Result<(), sqlx::Error> {
        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                user_id INTEGER PRIMARY KEY,
                username TEXT,
                first_name TEXT,
                referrer_id INTEGER,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS admins (
                user_id INTEGER PRIMARY KEY
            )
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Registers or refreshes a user. Name fields follow the latest update;
    /// `referrer_id` is written only on first registration so the original
    /// referrer is never overwritten.
    pub async fn upsert_user(
        &self,
        user_id: i64,
        username: Option<&str>,
        first_name: Option<&str>,
        referrer_id: Option<i64>,
    ) -> Result<(), sqlx::Error> {
        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            INSERT INTO users (user_id, username, first_name, referrer_id, created_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                username = excluded.username,
                first_name = excluded.first_name
            "#,
        )
        .bind(user_id)
        .bind(username)
        .bind(first_name)
        .bind(referrer_id)
        .bind(Utc::now())
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn get_user(&self, user_id: i64) -> Result<Option<UserRecord>, sqlx::Error> {
        let pool = self.pool_manager.pool();

        sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// True when the user is listed in the extra-admins table.
    pub async fn is_admin(&self, user_id: i64) -> Result<bool, sqlx::Error> {
        let pool = self.pool_manager.pool();

        let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM admins WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

        Ok(row.is_some())
    }

    pub async fn add_admin(&self, user_id: i64) -> Result<(), sqlx::Error> {
        let pool = self.pool_manager.pool();

        sqlx::query("INSERT OR IGNORE INTO admins (user_id) VALUES (?)")
            .bind(user_id)
            .execute(pool)
            .await?;

        info!("Added admin: user_id={}", user_id);
        Ok(())
    }

    pub async fn remove_admin(&self, user_id: i64) -> Result<bool, sqlx::Error> {
        let pool = self.pool_manager.pool();

        let result = sqlx::query("DELETE FROM admins WHERE user_id = ?")
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
