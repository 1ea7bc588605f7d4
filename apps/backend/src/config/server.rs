use std::env;

use crate::config::db::DbKind;
use crate::error::AppError;

/// HTTP listener and storage selection for the binary.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub db_kind: DbKind,
}

impl ServerConfig {
    /// Read `LINKAGE_HOST`, `LINKAGE_PORT` and `LINKAGE_DB_KIND`.
    pub fn from_env() -> Result<Self, AppError> {
        let host = env::var("LINKAGE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = match env::var("LINKAGE_PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|_| {
                AppError::config(format!("LINKAGE_PORT must be a valid port number, got '{raw}'"))
            })?,
            Err(_) => 3001,
        };
        let db_kind = match env::var("LINKAGE_DB_KIND") {
            Ok(raw) => raw.parse::<DbKind>()?,
            Err(_) => DbKind::Postgres,
        };

        Ok(Self {
            host,
            port,
            db_kind,
        })
    }
}
