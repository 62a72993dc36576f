//! Settings repository: key/value switches read by the menu renderer.

use crate::sqlite_pool::SqlitePoolManager;

/// Key of the free-trial switch; the start menu shows the trial button only
/// when its value is "1".
pub const FREE_TRIAL_KEY: &str = "free_trial_status";

#[derive(Clone)]
pub struct SettingsRepository {
    pool_manager: SqlitePoolManager,
}

impl SettingsRepository {
    pub fn new(pool_manager: SqlitePoolManager) -> Self {
        Self { pool_manager }
    }

    pub(crate) async fn init(&self) -> Result<(), sqlx::Error> {
        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, sqlx::Error> {
        let pool = self.pool_manager.pool();

        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(|r| r.0))
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<(), sqlx::Error> {
        let pool = self.pool_manager.pool();

        sqlx::query("INSERT OR REPLACE INTO settings (key, value) VALUES (?, ?)")
            .bind(key)
            .bind(value)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Whether the free-trial button should be offered on the start menu.
    pub async fn free_trial_enabled(&self) -> Result<bool, sqlx::Error> {
        Ok(self.get(FREE_TRIAL_KEY).await?.as_deref() == Some("1"))
    }
}
