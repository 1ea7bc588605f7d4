use std::env;
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// Runtime environment; selects database names and safety rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEnv {
    Prod,
    Test,
}

/// Storage engine selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbKind {
    Postgres,
    SqliteFile,
    SqliteMemory,
}

impl FromStr for DbKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(DbKind::Postgres),
            "sqlite-file" | "sqlite_file" | "sqlite" => Ok(DbKind::SqliteFile),
            "sqlite-memory" | "sqlite_memory" | "memory" => Ok(DbKind::SqliteMemory),
            other => Err(AppError::config(format!(
                "unknown database kind '{other}' (expected postgres | sqlite-file | sqlite-memory)"
            ))),
        }
    }
}

impl fmt::Display for DbKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DbKind::Postgres => "postgres",
            DbKind::SqliteFile => "sqlite-file",
            DbKind::SqliteMemory => "sqlite-memory",
        };
        f.write_str(s)
    }
}

/// Database role used for the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbOwner {
    /// Application-level access
    App,
    /// Owner-level access (migrations)
    Owner,
}

/// Connection string for the given environment, engine and role.
pub fn make_conn_spec(env: RuntimeEnv, db_kind: DbKind, owner: DbOwner) -> Result<String, AppError> {
    match db_kind {
        DbKind::Postgres => postgres_url(env, owner),
        DbKind::SqliteFile => Ok(format!("sqlite://{}?mode=rwc", sqlite_path(env)?)),
        DbKind::SqliteMemory => Ok("sqlite::memory:".to_string()),
    }
}

fn postgres_url(env: RuntimeEnv, owner: DbOwner) -> Result<String, AppError> {
    let host = env::var("POSTGRES_HOST").unwrap_or_else(|_| "localhost".to_string());
    let port = env::var("POSTGRES_PORT").unwrap_or_else(|_| "5432".to_string());
    let db_name = db_name(env)?;
    let (username, password) = credentials(owner)?;

    Ok(format!(
        "postgresql://{username}:{password}@{host}:{port}/{db_name}"
    ))
}

fn db_name(env: RuntimeEnv) -> Result<String, AppError> {
    match env {
        RuntimeEnv::Prod => must_var("PROD_DB"),
        RuntimeEnv::Test => {
            let db_name = must_var("TEST_DB")?;
            // test runs must never touch a non-test database
            if !db_name.ends_with("_test") {
                return Err(AppError::config(format!(
                    "Test environment requires database name to end with '_test', but got: '{db_name}'"
                )));
            }
            Ok(db_name)
        }
    }
}

fn credentials(owner: DbOwner) -> Result<(String, String), AppError> {
    match owner {
        DbOwner::App => Ok((must_var("APP_DB_USER")?, must_var("APP_DB_PASSWORD")?)),
        DbOwner::Owner => Ok((
            must_var("LINKAGE_OWNER_USER")?,
            must_var("LINKAGE_OWNER_PASSWORD")?,
        )),
    }
}

fn sqlite_path(env: RuntimeEnv) -> Result<String, AppError> {
    let path = must_var("LINKAGE_SQLITE_PATH")?;
    if env == RuntimeEnv::Test && !path.contains("test") {
        return Err(AppError::config(format!(
            "Test environment requires the sqlite path to contain 'test', but got: '{path}'"
        )));
    }
    Ok(path)
}

fn must_var(name: &str) -> Result<String, AppError> {
    env::var(name)
        .map_err(|_| AppError::config(format!("Required environment variable '{name}' is not set")))
}
