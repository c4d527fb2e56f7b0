use std::net::SocketAddr;
use std::sync::Arc;

use axum::middleware;
use sea_orm_migration::MigratorTrait;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rider_safety_backend::{
    config::Config,
    db,
    middleware::rate_limit::{create_global_governor, log_request},
    risk::SafeRoutePlanner,
    routes,
    routing::OsrmClient,
    AppState,
};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rider_safety_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();
    tracing::info!("Starting server at {}", config.server_addr());

    // Connect to database
    let db = db::connect(&config)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Connected to database");

    // Run migrations
    migration::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    tracing::info!("Migrations complete");

    if config.seed_demo_zones {
        db::seed::seed_zones(&db, db::seed::DEMO_ZONES)
            .await
            .expect("Failed to seed risk zones");
    }

    // Routing provider
    let osrm = OsrmClient::new(
        config.osrm_base_url.clone(),
        config.osrm_profile.clone(),
        config.routing_timeout(),
    )
    .expect("Failed to create routing client");
    tracing::info!(
        base_url = %config.osrm_base_url,
        profile = %config.osrm_profile,
        timeout_secs = config.routing_timeout_secs,
        "Routing provider configured"
    );

    let state = AppState {
        db,
        planner: SafeRoutePlanner::new(Arc::new(osrm), config.routing_timeout()),
        config: config.clone(),
    };

    // Create router with middleware
    let app = routes::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(create_global_governor())
        .layer(middleware::from_fn(log_request));

    // Start server with socket address for rate limiting
    let addr: SocketAddr = config.server_addr().parse().expect("Invalid address");
    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Failed to start server");
}
