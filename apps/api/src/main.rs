use std::sync::Arc;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::{self, TraceLayer};
use tracing::{Level, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod router;

use availability_cell::{InMemoryAvailabilityStore, SupabaseAvailabilityStore};
use booking_cell::{InMemoryBookingStore, SupabaseBookingStore};
use shared_config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Salon Scheduling API server");

    // Load configuration
    let config = Arc::new(AppConfig::from_env());

    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = if config.is_configured() {
        info!("Using Supabase storage at {}", config.supabase_url);
        router::create_router(
            config.clone(),
            Arc::new(SupabaseAvailabilityStore::new(&config)),
            Arc::new(SupabaseBookingStore::new(&config)),
        )
    } else {
        warn!("Supabase not configured, availability and bookings are kept in memory");
        router::create_router(
            config.clone(),
            Arc::new(InMemoryAvailabilityStore::new()),
            Arc::new(InMemoryBookingStore::new()),
        )
    };

    let app = app
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new()
                    .level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new()
                    .level(Level::INFO)),
        )
        .layer(cors);

    // Run the server
    let listener = TcpListener::bind(config.bind_address.as_str()).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
