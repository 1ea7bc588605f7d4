use std::time::Duration;

use migration::{migrate, MigrationCommand};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use tracing::{info, warn};

use crate::config::db::{make_conn_spec, DbKind, DbOwner, RuntimeEnv};
use crate::error::AppError;

const CONNECT_ATTEMPTS: u32 = 5;
const CONNECT_RETRY_MS: u64 = 500;

fn connect_options(url: String, db_kind: DbKind) -> ConnectOptions {
    let mut opts = ConnectOptions::new(url);
    opts.sqlx_logging(false);
    match db_kind {
        // Every sqlite in-memory connection is its own database, so the pool
        // is pinned to a single connection that never expires.
        DbKind::SqliteMemory => {
            opts.max_connections(1)
                .min_connections(1)
                .idle_timeout(Duration::from_secs(24 * 60 * 60))
                .max_lifetime(Duration::from_secs(24 * 60 * 60));
        }
        DbKind::SqliteFile => {
            opts.max_connections(1);
        }
        DbKind::Postgres => {
            opts.max_connections(16)
                .connect_timeout(Duration::from_secs(5))
                .acquire_timeout(Duration::from_secs(5));
        }
    }
    opts
}

async fn connect_with_retry(url: &str, db_kind: DbKind) -> Result<DatabaseConnection, AppError> {
    let mut last_error = None;
    for attempt in 1..=CONNECT_ATTEMPTS {
        match Database::connect(connect_options(url.to_string(), db_kind)).await {
            Ok(conn) => {
                if attempt > 1 {
                    info!(attempts = attempt, "connection_retry=success");
                }
                return Ok(conn);
            }
            Err(e) => {
                warn!(
                    attempt,
                    max_attempts = CONNECT_ATTEMPTS,
                    "connection_retry=failed"
                );
                last_error = Some(e);
                if attempt < CONNECT_ATTEMPTS {
                    tokio::time::sleep(Duration::from_millis(CONNECT_RETRY_MS)).await;
                }
            }
        }
    }
    Err(last_error
        .map(AppError::from)
        .unwrap_or_else(|| AppError::config("connection retry failed without an error")))
}

/// Per-connection session settings.
async fn apply_session_settings(
    conn: &DatabaseConnection,
    db_kind: DbKind,
) -> Result<(), AppError> {
    let statements: &[&str] = match db_kind {
        DbKind::SqliteFile | DbKind::SqliteMemory => {
            &["PRAGMA foreign_keys = ON;", "PRAGMA busy_timeout = 5000;"]
        }
        DbKind::Postgres => &["SET timezone = 'UTC';"],
    };
    for stmt in statements {
        conn.execute_unprepared(stmt).await?;
    }
    Ok(())
}

/// Connect without touching the schema.
pub async fn connect_db(
    env: RuntimeEnv,
    db_kind: DbKind,
    owner: DbOwner,
) -> Result<DatabaseConnection, AppError> {
    let url = make_conn_spec(env, db_kind, owner)?;
    let conn = connect_with_retry(&url, db_kind).await?;
    apply_session_settings(&conn, db_kind).await?;
    Ok(conn)
}

/// Connect as the application role and bring the schema up to date.
///
/// sqlite in-memory databases migrate on the returned connection itself;
/// Postgres and sqlite files migrate through a short-lived owner connection
/// first.
pub async fn bootstrap_db(
    env: RuntimeEnv,
    db_kind: DbKind,
) -> Result<DatabaseConnection, AppError> {
    info!(env = ?env, db_kind = %db_kind, pid = std::process::id(), "bootstrap=start");

    let conn = match db_kind {
        DbKind::SqliteMemory | DbKind::SqliteFile => {
            let conn = connect_db(env, db_kind, DbOwner::App).await?;
            migrate(&conn, MigrationCommand::Up).await?;
            conn
        }
        DbKind::Postgres => {
            let owner = connect_db(env, db_kind, DbOwner::Owner).await?;
            migrate(&owner, MigrationCommand::Up).await?;
            if let Err(e) = owner.close().await {
                warn!(error = %e, "failed to close owner connection after migration");
            }
            connect_db(env, db_kind, DbOwner::App).await?
        }
    };

    info!(db_kind = %db_kind, "bootstrap=ready");
    Ok(conn)
}

/// Run one migration command through an owner connection (migration CLI).
pub async fn orchestrate_migration(
    env: RuntimeEnv,
    db_kind: DbKind,
    command: MigrationCommand,
) -> Result<(), AppError> {
    if db_kind == DbKind::SqliteMemory {
        return Err(AppError::config(
            "in-memory sqlite is discarded when the process exits; migrate postgres or sqlite-file",
        ));
    }

    info!(env = ?env, db_kind = %db_kind, cmd = ?command, "migrate=start");
    let owner = connect_db(env, db_kind, DbOwner::Owner).await?;
    let result = migrate(&owner, command).await;
    if let Err(e) = owner.close().await {
        warn!(error = %e, "failed to close owner connection after migration");
    }
    result?;
    info!(cmd = ?command, "migrate=done");
    Ok(())
}
