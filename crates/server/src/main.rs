//! Queple-rs server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use queple_api::{AppState, router as api_router};
use queple_common::Config;
use queple_core::{
    DeckService, FallbackBank, GenerationService, InteractionService, QuestionService, UserService,
};
use queple_db::repositories::{
    CategoryRepository, InteractionRepository, QuestionRepository, UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Pick up a local .env before reading configuration
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "queple=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting queple-rs server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = queple_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    queple_db::migrate(&db).await?;
    info!("Migrations completed");

    // Keep one handle aside so the pool can be closed on shutdown.
    let shutdown_db = db.clone();
    let db = Arc::new(db);

    // Seed reference data (idempotent upserts)
    queple_db::seed::run(&db).await?;

    // Initialize repositories
    let user_repo = UserRepository::new(Arc::clone(&db));
    let category_repo = CategoryRepository::new(Arc::clone(&db));
    let question_repo = QuestionRepository::new(Arc::clone(&db));
    let interaction_repo = InteractionRepository::new(Arc::clone(&db));

    // Initialize services
    let generation_service = GenerationService::new(
        config.generation.clone(),
        question_repo.clone(),
        category_repo.clone(),
    );
    let deck_service = DeckService::new(
        question_repo.clone(),
        interaction_repo.clone(),
        user_repo.clone(),
        generation_service.clone(),
        FallbackBank::new(),
    );
    let interaction_service = InteractionService::new(interaction_repo.clone(), user_repo.clone());
    let question_service = QuestionService::new(
        question_repo,
        interaction_repo,
        user_repo.clone(),
        generation_service.clone(),
    );
    let user_service = UserService::new(user_repo);

    let state = AppState {
        deck_service,
        interaction_service,
        question_service,
        generation_service,
        user_service,
    };

    // Build the application router
    let app = Router::new()
        .merge(api_router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Close the connection pool before exiting
    shutdown_db.close().await?;
    info!("Shutdown complete");

    Ok(())
}
