//! `migration-cli <command> [--env prod|test] [--db postgres|sqlite-file]`
//!
//! Applies the linkage schema migrations with the owner role. In-memory
//! sqlite is migrated by the backend at startup instead.

use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use linkage::config::db::{DbKind, RuntimeEnv};
use linkage::infra::db::orchestrate_migration;
use migration::MigrationCommand;

#[derive(Clone, Copy, ValueEnum)]
enum Env {
    Prod,
    Test,
}

impl From<Env> for RuntimeEnv {
    fn from(env: Env) -> Self {
        match env {
            Env::Prod => RuntimeEnv::Prod,
            Env::Test => RuntimeEnv::Test,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Db {
    Postgres,
    SqliteFile,
}

impl From<Db> for DbKind {
    fn from(db: Db) -> Self {
        match db {
            Db::Postgres => DbKind::Postgres,
            Db::SqliteFile => DbKind::SqliteFile,
        }
    }
}

#[derive(Parser)]
#[command(name = "migration-cli", about = "Apply linkage schema migrations")]
struct Args {
    /// up | down | fresh | reset | refresh | status
    command: String,

    #[arg(short, long, value_enum, default_value = "test")]
    env: Env,

    #[arg(short, long, value_enum, default_value = "postgres")]
    db: Db,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .without_time()
        .with_target(false)
        .with_env_filter("migration=info,linkage=info,sqlx=warn")
        .init();

    let args = Args::parse();
    let Ok(command) = args.command.parse::<MigrationCommand>() else {
        eprintln!("unknown migration command '{}'", args.command);
        return ExitCode::from(2);
    };

    match orchestrate_migration(args.env.into(), args.db.into(), command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Migration failed: {e}");
            ExitCode::FAILURE
        }
    }
}
