//! `GET /health`: liveness plus a database probe.
//!
//! Always answers 200; a broken database shows up as `db: "error"` with a
//! detail, so load balancers can tell a degraded instance from a dead one.

use actix_web::{web, HttpResponse};
use migration::count_applied_migrations;
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::warn;

use crate::db::require_db;
use crate::schema::{relations, ResourceType};
use crate::state::app_state::AppState;
use crate::trace_ctx;

#[derive(Debug, Serialize)]
struct HealthReport {
    status: &'static str,
    app_version: &'static str,
    db: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    db_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    migrations: Option<usize>,
    resource_types: usize,
    relations: usize,
    time: String,
}

enum DbProbe {
    Ok { migrations: Option<usize> },
    Failed(String),
}

async fn probe(db: &DatabaseConnection) -> DbProbe {
    let ping = Statement::from_string(db.get_database_backend(), "SELECT 1 AS health_check");
    match db.query_one(ping).await {
        Ok(_) => DbProbe::Ok {
            migrations: count_applied_migrations(db).await.ok(),
        },
        Err(e) => DbProbe::Failed(format!("DB query failed: {e}")),
    }
}

async fn health(app_state: web::Data<AppState>) -> HttpResponse {
    let outcome = match require_db(&app_state) {
        Ok(db) => probe(db).await,
        Err(e) => DbProbe::Failed(format!("DB unavailable: {e}")),
    };

    let (db, db_error, migrations) = match outcome {
        DbProbe::Ok { migrations } => ("ok", None, migrations),
        DbProbe::Failed(detail) => {
            warn!(trace_id = %trace_ctx::trace_id(), detail = %detail, "Health probe failed");
            ("error", Some(detail), None)
        }
    };

    HttpResponse::Ok().json(HealthReport {
        status: "ok",
        app_version: env!("CARGO_PKG_VERSION"),
        db,
        db_error,
        migrations,
        resource_types: ResourceType::ALL.len(),
        relations: ResourceType::ALL.iter().map(|ty| relations(*ty).len()).sum(),
        time: OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_else(|_| "unknown".to_string()),
    })
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("").route(web::get().to(health)));
}
