//! Menu repository: dynamic message bodies and their buttons.
//!
//! The bot renders menus entirely from these two tables, so operators can
//! change copy and layout at runtime without redeploying.

use crate::models::{MenuButton, MenuMessage};
use crate::sqlite_pool::SqlitePoolManager;
use tracing::info;

/// Seeded landing-menu name; the bot falls back to it everywhere.
pub(crate) const START_MENU: &str = "start_main";

#[derive(Clone)]
pub struct MenuRepository {
    pool_manager: SqlitePoolManager,
}

impl MenuRepository {
    pub fn new(pool_manager: SqlitePoolManager) -> Self {
        Self { pool_manager }
    }

    pub(crate) async fn init(&self) -> Result<(), sqlx::Error> {
        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS messages (
                message_name TEXT PRIMARY KEY,
                text TEXT,
                file_id TEXT,
                file_type TEXT
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS buttons (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                menu_name TEXT NOT NULL,
                text TEXT NOT NULL,
                target TEXT NOT NULL,
                is_url INTEGER NOT NULL DEFAULT 0,
                row INTEGER NOT NULL,
                col INTEGER NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_buttons_menu_name ON buttons(menu_name)")
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Seeds the start menu text when no operator has defined one yet.
    pub async fn ensure_defaults(&self) -> Result<(), sqlx::Error> {
        let pool = self.pool_manager.pool();

        let result = sqlx::query(
            "INSERT OR IGNORE INTO messages (message_name, text) VALUES (?, ?)",
        )
        .bind(START_MENU)
        .bind("👋 Welcome!\n\nUse the buttons below to buy configs, manage your services, or reach support.")
        .execute(pool)
        .await?;

        if result.rows_affected() > 0 {
            info!("Seeded default {} message", START_MENU);
        }
        Ok(())
    }

    pub async fn get_message(&self, name: &str) -> Result<Option<MenuMessage>, sqlx::Error> {
        let pool = self.pool_manager.pool();

        sqlx::query_as::<_, MenuMessage>("SELECT * FROM messages WHERE message_name = ?")
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Creates or overwrites a dynamic message.
    pub async fn upsert_message(
        &self,
        name: &str,
        text: Option<&str>,
        file_id: Option<&str>,
        file_type: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            INSERT INTO messages (message_name, text, file_id, file_type)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(message_name) DO UPDATE SET
                text = excluded.text,
                file_id = excluded.file_id,
                file_type = excluded.file_type
            "#,
        )
        .bind(name)
        .bind(text)
        .bind(file_id)
        .bind(file_type)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Buttons of a menu in grid order (row, then column).
    pub async fn list_buttons(&self, menu_name: &str) -> Result<Vec<MenuButton>, sqlx::Error> {
        let pool = self.pool_manager.pool();

        sqlx::query_as::<_, MenuButton>(
            "SELECT * FROM buttons WHERE menu_name = ? ORDER BY row, col",
        )
        .bind(menu_name)
        .fetch_all(pool)
        .await
    }

    pub async fn add_button(
        &self,
        menu_name: &str,
        text: &str,
        target: &str,
        is_url: bool,
        row: i64,
        col: i64,
    ) -> Result<i64, sqlx::Error> {
        let pool = self.pool_manager.pool();

        let result = sqlx::query(
            "INSERT INTO buttons (menu_name, text, target, is_url, row, col) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(menu_name)
        .bind(text)
        .bind(target)
        .bind(is_url)
        .bind(row)
        .bind(col)
        .execute(pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn delete_button(&self, button_id: i64) -> Result<bool, sqlx::Error> {
        let pool = self.pool_manager.pool();

        let result = sqlx::query("DELETE FROM buttons WHERE id = ?")
            .bind(button_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
