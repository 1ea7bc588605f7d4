use sea_orm::DatabaseConnection;

use crate::config::db::{DbKind, RuntimeEnv};

/// Shared application state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Database connection (absent for handlers that never touch storage)
    db: Option<DatabaseConnection>,
    pub env: RuntimeEnv,
    pub db_kind: Option<DbKind>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, env: RuntimeEnv, db_kind: DbKind) -> Self {
        Self {
            db: Some(db),
            env,
            db_kind: Some(db_kind),
        }
    }

    pub fn without_db(env: RuntimeEnv) -> Self {
        Self {
            db: None,
            env,
            db_kind: None,
        }
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }
}
