use actix_web::{web, App, HttpServer};
use linkage::config::db::RuntimeEnv;
use linkage::config::server::ServerConfig;
use linkage::infra::state::build_state;
use linkage::middleware::request_trace::RequestTrace;
use linkage::middleware::structured_logger::StructuredLogger;
use linkage::middleware::trace_span::TraceSpan;
use linkage::routes;

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment
    // (docker env_file, or `set -a; . ./.env; set +a` locally).
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Invalid server configuration: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(host = %config.host, port = config.port, db_kind = %config.db_kind, "server_starting");

    let app_state = match build_state()
        .with_env(RuntimeEnv::Prod)
        .with_db(config.db_kind)
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!("database_ready");

    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
