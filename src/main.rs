mod core;
mod features;
mod modules;
mod shared;

use std::sync::Arc;

use axum::{middleware::from_fn_with_state, Router};
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::core::config::Config;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::features::auth::routes as auth_routes;
use crate::features::events::handlers::EventState;
use crate::features::events::{routes as events_routes, ArchiveService, EventService};
use crate::features::photos::handlers::PhotoState;
use crate::features::photos::{routes as photos_routes, IngestionService, PhotoService};
use crate::modules::storage::UploadStore;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .enable_all()
        .build()?;

    runtime.block_on(async_main())
}

async fn async_main() -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    tracing::info!("Configuration loaded successfully");

    // Create database connection pool
    let pool = database::create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    // Run migrations automatically
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database migrations completed successfully");

    // Initialize the upload store and make sure its root exists so static
    // serving has a directory to point at from the first request on
    let store = Arc::new(UploadStore::new(&config.storage));
    tokio::fs::create_dir_all(store.root()).await?;
    tracing::info!("Upload store rooted at {}", store.root().display());

    // Initialize services
    let event_service = Arc::new(EventService::new(pool.clone(), Arc::clone(&store)));
    let photo_service = Arc::new(PhotoService::new(pool.clone(), Arc::clone(&store)));
    let ingestion_service = Arc::new(IngestionService::new(pool.clone(), Arc::clone(&store)));
    let archive_service = Arc::new(ArchiveService::new(Arc::clone(&store)));
    let admin_config = Arc::new(config.admin.clone());
    tracing::info!("Services initialized");

    let event_state = EventState {
        event_service: Arc::clone(&event_service),
        archive_service: Arc::clone(&archive_service),
    };
    let photo_state = PhotoState {
        photo_service: Arc::clone(&photo_service),
        ingestion_service: Arc::clone(&ingestion_service),
        event_service: Arc::clone(&event_service),
    };

    // Build swagger router with config-driven info
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };
    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);
    let swagger =
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi));

    // Admin routes (require the x-admin-password header)
    let admin_routes = Router::new()
        .merge(events_routes::admin_routes(event_state.clone()))
        .merge(photos_routes::admin_routes(
            photo_state.clone(),
            config.app.max_upload_body_size,
        ))
        .route_layer(from_fn_with_state(
            Arc::clone(&admin_config),
            middleware::admin_middleware,
        ));

    // Public routes
    let public_routes = Router::new()
        .merge(auth_routes::routes(admin_config))
        .merge(events_routes::public_routes(event_state))
        .merge(photos_routes::public_routes(photo_state));

    // Simple health check endpoint (no auth required)
    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    let app = Router::new()
        .merge(swagger)
        .merge(admin_routes)
        .merge(public_routes)
        .merge(health_route)
        // Uploaded photos are served straight from the uploads root
        .nest_service("/static", ServeDir::new(&config.storage.uploads_dir))
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    // Start server
    let addr = config.app.server_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
