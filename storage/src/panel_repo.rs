//! Panel repository: persistence and queries for panels and their inbounds.
//!
//! Uses SqlitePoolManager and the models (PanelRecord, NewPanel, InboundRecord).
//! Deleting a panel cascades to its inbounds via the foreign key.

use crate::models::{InboundRecord, NewPanel, PanelRecord};
use crate::sqlite_pool::SqlitePoolManager;
use tracing::info;

#[derive(Clone)]
pub struct PanelRepository {
    pool_manager: SqlitePoolManager,
}

impl PanelRepository {
    pub fn new(pool_manager: SqlitePoolManager) -> Self {
        Self { pool_manager }
    }

    pub(crate) async fn init(&self) -> Result<(), sqlx::Error> {
        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS panels (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                panel_type TEXT NOT NULL,
                url TEXT NOT NULL,
                sub_base TEXT NOT NULL DEFAULT '',
                token TEXT NOT NULL DEFAULT '',
                username TEXT,
                password TEXT
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS panel_inbounds (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                panel_id INTEGER NOT NULL REFERENCES panels(id) ON DELETE CASCADE,
                protocol TEXT NOT NULL,
                tag TEXT NOT NULL,
                inbound_id INTEGER
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_panel_inbounds_panel_id ON panel_inbounds(panel_id)",
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Inserts a panel and returns its new id.
    pub async fn insert_panel(&self, panel: &NewPanel) -> Result<i64, sqlx::Error> {
        let pool = self.pool_manager.pool();

        let result = sqlx::query(
            r#"
            INSERT INTO panels (name, panel_type, url, sub_base, token, username, password)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&panel.name)
        .bind(&panel.panel_type)
        .bind(&panel.url)
        .bind(&panel.sub_base)
        .bind(&panel.token)
        .bind(&panel.username)
        .bind(&panel.password)
        .execute(pool)
        .await?;

        let id = result.last_insert_rowid();
        info!("Saved panel: id={}, name={}", id, panel.name);
        Ok(id)
    }

    /// All panels, newest first.
    pub async fn list_panels(&self) -> Result<Vec<PanelRecord>, sqlx::Error> {
        let pool = self.pool_manager.pool();

        sqlx::query_as::<_, PanelRecord>("SELECT * FROM panels ORDER BY id DESC")
            .fetch_all(pool)
            .await
    }

    pub async fn get_panel(&self, panel_id: i64) -> Result<Option<PanelRecord>, sqlx::Error> {
        let pool = self.pool_manager.pool();

        sqlx::query_as::<_, PanelRecord>("SELECT * FROM panels WHERE id = ?")
            .bind(panel_id)
            .fetch_optional(pool)
            .await
    }

    /// Deletes a panel; its inbounds go with it. Returns whether a row existed.
    pub async fn delete_panel(&self, panel_id: i64) -> Result<bool, sqlx::Error> {
        let pool = self.pool_manager.pool();

        let result = sqlx::query("DELETE FROM panels WHERE id = ?")
            .bind(panel_id)
            .execute(pool)
            .await?;

        info!("Deleted panel: id={}", panel_id);
        Ok(result.rows_affected() > 0)
    }

    /// Inserts one inbound row and returns its new id. `inbound_id` is the
    /// vendor-side id; pass None for manually entered inbounds.
    pub async fn insert_inbound(
        &self,
        panel_id: i64,
        protocol: &str,
        tag: &str,
        inbound_id: Option<i64>,
    ) -> Result<i64, sqlx::Error> {
        let pool = self.pool_manager.pool();

        let result = sqlx::query(
            "INSERT INTO panel_inbounds (panel_id, protocol, tag, inbound_id) VALUES (?, ?, ?, ?)",
        )
        .bind(panel_id)
        .bind(protocol)
        .bind(tag)
        .bind(inbound_id)
        .execute(pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn list_inbounds(&self, panel_id: i64) -> Result<Vec<InboundRecord>, sqlx::Error> {
        let pool = self.pool_manager.pool();

        sqlx::query_as::<_, InboundRecord>(
            "SELECT * FROM panel_inbounds WHERE panel_id = ? ORDER BY id",
        )
        .bind(panel_id)
        .fetch_all(pool)
        .await
    }

    pub async fn delete_inbound(&self, inbound_row_id: i64) -> Result<bool, sqlx::Error> {
        let pool = self.pool_manager.pool();

        let result = sqlx::query("DELETE FROM panel_inbounds WHERE id = ?")
            .bind(inbound_row_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Replaces all inbounds of a panel with the given set, in one transaction.
    /// Used by the refresh-from-panel action; returns the number inserted.
    pub async fn replace_inbounds(
        &self,
        panel_id: i64,
        inbounds: &[(String, String, Option<i64>)],
    ) -> Result<usize, sqlx::Error> {
        let pool = self.pool_manager.pool();
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM panel_inbounds WHERE panel_id = ?")
            .bind(panel_id)
            .execute(&mut *tx)
            .await?;

        for (protocol, tag, inbound_id) in inbounds {
            sqlx::query(
                "INSERT INTO panel_inbounds (panel_id, protocol, tag, inbound_id) VALUES (?, ?, ?, ?)",
            )
            .bind(panel_id)
            .bind(protocol)
            .bind(tag)
            .bind(inbound_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(
            "Replaced inbounds for panel {}: {} rows",
            panel_id,
            inbounds.len()
        );
        Ok(inbounds.len())
    }
}
