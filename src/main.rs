//! Catalog Server - library catalog and circulation REST API

use axum::{
    routing::{get, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog_server::{api, config::AppConfig, repository::Repository, services::Services, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    init_tracing(&config);

    tracing::info!("Starting Catalog Server v{}", env!("CARGO_PKG_VERSION"));

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await?;

    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations").run(&pool).await?;

    tracing::info!("Database migrations completed");

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    let repository = Repository::new(pool);
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(Services::new(repository)),
    };

    let app = create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("catalog_server={},tower_http=debug", config.logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Catalog
        .route("/catalog/summary", get(api::catalog::get_summary))
        // Books
        .route("/books", get(api::books::list_books).post(api::books::create_book))
        .route(
            "/books/:id",
            get(api::books::get_book)
                .put(api::books::update_book)
                .delete(api::books::delete_book),
        )
        .route("/books/:id/copies", post(api::copies::create_copy))
        // Genres and languages
        .route("/genres", get(api::genres::list_genres).post(api::genres::create_genre))
        .route("/genres/:id/books", get(api::genres::list_genre_books))
        .route(
            "/languages",
            get(api::genres::list_languages).post(api::genres::create_language),
        )
        // Authors
        .route("/authors", get(api::authors::list_authors).post(api::authors::create_author))
        .route(
            "/authors/:id",
            get(api::authors::get_author)
                .put(api::authors::update_author)
                .delete(api::authors::delete_author),
        )
        // Copies
        .route("/copies/:id", get(api::copies::get_copy))
        .route("/copies/:id/loan", post(api::copies::lend_copy))
        .route(
            "/copies/:id/renew",
            get(api::copies::get_renewal).post(api::copies::renew_copy),
        )
        .route("/copies/:id/return", post(api::copies::return_copy))
        // Loans
        .route("/loans", get(api::loans::all_loans))
        .route("/loans/mine", get(api::loans::my_loans))
        .with_state(state);

    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
