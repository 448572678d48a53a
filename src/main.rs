//! Persona engine service entry point.

use std::sync::Arc;

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use persona_engine::adapters::http::assignment::{assignment_routes, AssignmentHandlers};
use persona_engine::adapters::postgres::{PgAssignmentRepository, PgBankingRecords};
use persona_engine::application::handlers::assignment::{
    AssignBatchHandler, AssignPersonaHandler, GetAssignmentsHandler, GetSummaryHandler,
    RecordOverrideHandler,
};
use persona_engine::config::AppConfig;
use persona_engine::domain::persona::PersonaRegistry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level)),
        )
        .init();

    // An invalid catalog is fatal; misclassifying quietly is worse than
    // refusing to start.
    let registry = Arc::new(PersonaRegistry::load(&config.personas.catalog_path)?);
    tracing::info!(
        catalog = config.personas.catalog_path.as_str(),
        personas = registry.len(),
        "persona catalog loaded"
    );

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("database migrations applied");
    }

    let records = Arc::new(PgBankingRecords::new(pool.clone()));
    let repository = Arc::new(PgAssignmentRepository::new(pool));

    let assign_handler = Arc::new(AssignPersonaHandler::new(
        records.clone(),
        repository.clone(),
        registry.clone(),
    ));
    let handlers = AssignmentHandlers::new(
        assign_handler.clone(),
        Arc::new(AssignBatchHandler::new(assign_handler)),
        Arc::new(RecordOverrideHandler::new(
            records.clone(),
            repository.clone(),
            registry,
        )),
        Arc::new(GetAssignmentsHandler::new(repository)),
        Arc::new(GetSummaryHandler::new(records)),
    );

    // Validation rejects an empty origin list in production, so the
    // wildcard branch is only reachable in development and staging.
    let cors = if config.server.cors_origins_list().is_empty() {
        CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .server
            .cors_origins_list()
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new().allow_origin(origins).allow_methods(Any).allow_headers(Any)
    };

    let app = Router::new()
        .nest("/api", assignment_routes(handlers))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(cors);

    let addr = config.server.socket_addr();
    tracing::info!(%addr, "persona engine listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
