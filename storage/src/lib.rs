//! Storage crate: persisted panels, inbounds, dynamic menus, users, and settings.
//!
//! ## Modules
//!
//! - [`models`] – PanelRecord, NewPanel, InboundRecord, MenuMessage, MenuButton, UserRecord
//! - [`panel_repo`] – PanelRepository (panels + panel_inbounds)
//! - [`menu_repo`] – MenuRepository (messages + buttons)
//! - [`user_repo`] – UserRepository (users + admins)
//! - [`settings_repo`] – SettingsRepository (key/value settings)
//! - [`database`] – Database: shared pool plus all repositories
//! - [`sqlite_pool`] – SqlitePoolManager

mod database;
mod menu_repo;
mod models;
mod panel_repo;
mod settings_repo;
mod sqlite_pool;
mod user_repo;


pub use database::Database;
pub use menu_repo::MenuRepository;
pub use models::{InboundRecord, MenuButton, MenuMessage, NewPanel, PanelRecord, UserRecord};
pub use panel_repo::PanelRepository;
pub use settings_repo::{SettingsRepository, FREE_TRIAL_KEY};
pub use sqlite_pool::SqlitePoolManager;
pub use user_repo::UserRepository;
