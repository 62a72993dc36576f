//! Bot user model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered bot user. `referrer_id` is the user who referred them, set
/// once on first contact and never overwritten.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserRecord {
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub referrer_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}
