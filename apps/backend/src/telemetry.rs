use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the process-wide subscriber.
///
/// `RUST_LOG` controls filtering; `LINKAGE_LOG_FORMAT=pretty` switches from
/// JSON lines to human-readable output for local runs.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,actix_web=info,sqlx=warn,sea_orm=warn"));

    let pretty = std::env::var("LINKAGE_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("pretty"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    if pretty {
        registry
            .with(fmt::layer().with_target(false).compact())
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_file(false)
                    .with_line_number(false)
                    .with_thread_ids(false)
                    .with_thread_names(false)
                    .with_ansi(false)
                    .json(),
            )
            .init();
    }
}
