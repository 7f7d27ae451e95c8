use std::sync::Arc;

use anyhow::Result;
use axum::{
    routing::{get, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;
use tracing_subscriber::EnvFilter;

use jamii_common::Config;
use jamii_store::{ReportStore, VoteLedger};

mod rest;

pub struct AppState {
    pub store: ReportStore,
    pub ledger: VoteLedger,
    pub pool: PgPool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("jamii_api=info".parse()?)
                .add_directive("jamii_store=info".parse()?),
        )
        .init();

    let config = Config::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;
    jamii_store::migrate(&pool).await?;

    let state = Arc::new(AppState {
        store: ReportStore::new(pool.clone()),
        ledger: VoteLedger::new(pool.clone()),
        pool,
    });

    let app = Router::new()
        // Health check
        .route("/", get(|| async { "ok" }))
        // Reports
        .route("/reports", post(rest::create_report).get(rest::list_reports))
        .route(
            "/reports/department",
            get(rest::department_reports).post(rest::department_reports_body),
        )
        .route("/reports/status", put(rest::update_status))
        .route("/reports/department-status", put(rest::update_department_status))
        .route("/reports/assign", put(rest::assign_department))
        .route("/reports/vote", post(rest::cast_vote))
        // Dashboard aggregates
        .route("/reports/stats/timeseries", get(rest::stats_timeseries))
        .route("/reports/stats/{dimension}", get(rest::stats_by_dimension))
        .route("/reports/{id}", get(rest::get_report))
        .with_state(state)
        // CORS stays open for the resident dashboard SPA
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        // Logging layer: method + path + status + latency only
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        );

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!("JamiiReport API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
