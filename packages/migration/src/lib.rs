pub use sea_orm_migration::prelude::*;
pub use sea_orm_migration::sea_orm::{ConnectionTrait, DatabaseConnection};
use sea_orm_migration::sea_orm::{DatabaseBackend, Statement};

mod m20261016_000001_create_dummy_schema;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20261016_000001_create_dummy_schema::Migration)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationCommand {
    Up,
    Down,
    Fresh,
    Reset,
    Refresh,
    Status,
}

impl std::str::FromStr for MigrationCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            "fresh" => Ok(Self::Fresh),
            "reset" => Ok(Self::Reset),
            "refresh" => Ok(Self::Refresh),
            "status" => Ok(Self::Status),
            other => Err(format!(
                "unknown command '{other}' (expected up | down | fresh | reset | refresh | status)"
            )),
        }
    }
}

/// Run a migration command against an already-connected database.
///
/// Used by the application bootstrap, the CLI and the test harness.
pub async fn migrate(db: &DatabaseConnection, command: MigrationCommand) -> Result<(), DbErr> {
    let name = database_name(db).await?;
    let applied_before = count_applied_migrations(db).await?;

    tracing::info!(
        cmd = ?command,
        backend = ?db.get_database_backend(),
        database = %name,
        defined = Migrator::migrations().len(),
        applied = applied_before,
        "migration_start"
    );

    let result = match command {
        MigrationCommand::Up => Migrator::up(db, None).await,
        MigrationCommand::Down => Migrator::down(db, None).await,
        MigrationCommand::Fresh => Migrator::fresh(db).await,
        MigrationCommand::Reset => Migrator::reset(db).await,
        MigrationCommand::Refresh => Migrator::refresh(db).await,
        MigrationCommand::Status => Migrator::status(db).await,
    };

    match result {
        Ok(()) => {
            let applied_after = count_applied_migrations(db).await?;
            tracing::info!(cmd = ?command, applied = applied_after, "migration_ok");
            Ok(())
        }
        Err(e) => {
            tracing::error!(cmd = ?command, error = %e, "migration_failed");
            Err(e)
        }
    }
}

async fn database_name(db: &DatabaseConnection) -> Result<String, DbErr> {
    let backend = db.get_database_backend();
    let sql = match backend {
        DatabaseBackend::Postgres => "SELECT current_database() AS name",
        DatabaseBackend::Sqlite => "SELECT file AS name FROM pragma_database_list WHERE name = 'main'",
        _ => return Ok("<unsupported>".to_string()),
    };

    let row = db
        .query_one(Statement::from_string(backend, sql.to_string()))
        .await?;
    let name = row
        .and_then(|r| r.try_get::<String>("", "name").ok())
        .unwrap_or_default();

    Ok(if name.is_empty() {
        ":memory:".to_string()
    } else {
        name
    })
}

/// Number of applied migrations; 0 when the bookkeeping table does not exist yet.
pub async fn count_applied_migrations(db: &DatabaseConnection) -> Result<usize, DbErr> {
    match Migrator::get_applied_migrations(db).await {
        Ok(migrations) => Ok(migrations.len()),
        Err(DbErr::Exec(_)) | Err(DbErr::Query(_)) => Ok(0),
        Err(e) => Err(e),
    }
}
