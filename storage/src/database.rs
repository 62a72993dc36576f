//! Database: one pool, all repositories, schema creation on connect.

use crate::menu_repo::MenuRepository;
use crate::panel_repo::PanelRepository;
use crate::settings_repo::SettingsRepository;
use crate::sqlite_pool::SqlitePoolManager;
use crate::user_repo::UserRepository;
use tracing::info;

/// All repositories over a shared SQLite pool. `connect` creates missing
/// tables and seeds the default start menu before returning.
#[derive(Clone)]
pub struct Database {
    pool_manager: SqlitePoolManager,
    pub panels: PanelRepository,
    pub menus: MenuRepository,
    pub users: UserRepository,
    pub settings: SettingsRepository,
}

impl Database {
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;

        let db = Self {
            panels: PanelRepository::new(pool_manager.clone()),
            menus: MenuRepository::new(pool_manager.clone()),
            users: UserRepository::new(pool_manager.clone()),
            settings: SettingsRepository::new(pool_manager.clone()),
            pool_manager,
        };

        info!("Creating database tables if not exist");
        db.panels.init().await?;
        db.menus.init().await?;
        db.users.init().await?;
        db.settings.init().await?;
        db.menus.ensure_defaults().await?;
        info!("Database tables created successfully");

        Ok(db)
    }

    /// Returns the underlying pool manager for ad hoc queries (tests).
    pub fn pool_manager(&self) -> &SqlitePoolManager {
        &self.pool_manager
    }
}
