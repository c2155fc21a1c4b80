use axum::http::{header, HeaderValue, Method};
use clap::Parser;
use powersense_server::{
    cli::{Cli, Commands},
    config::ServerConfig,
    handlers,
    state::ServerState,
    storage::SqliteUserStore,
};
use sqlx::sqlite::SqlitePoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::time;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "powersense_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = ServerConfig::from_env()?;

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;

    let user_store = SqliteUserStore::new(pool.clone());
    user_store.initialize().await?;

    match cli.command {
        Some(Commands::User(cmd)) => {
            return cmd.execute(&user_store).await;
        }
        Some(Commands::Serve) | None => {
            // Continue to run server
        }
    }

    info!("Starting PowerSense server v{}", VERSION);
    info!("   Bind address: {}", config.bind_address());
    info!("   Data directory: {:?}", config.data_directory);
    info!("   Session timeout: {}s", config.session_timeout_seconds);

    let state = Arc::new(ServerState::new(config.clone(), Arc::new(user_store)));

    // Background sweep for expired sessions
    {
        let sessions = state.sessions.clone();
        tokio::spawn(async move {
            let mut interval = time::interval(Duration::from_secs(300));
            loop {
                interval.tick().await;
                let cleaned = sessions.cleanup_expired();
                if cleaned > 0 {
                    info!("Cleaned up {} expired sessions", cleaned);
                }
            }
        });
    }

    // Background sweep for stale rate-limiter entries
    {
        let rate_limiter = state.rate_limiter.clone();
        tokio::spawn(async move {
            let mut interval = time::interval(Duration::from_secs(120));
            loop {
                interval.tick().await;
                rate_limiter.cleanup();
            }
        });
    }

    let cors_origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect();
    info!("   CORS origins: {:?}", config.cors_origins);
    let cors = CorsLayer::new()
        .allow_origin(cors_origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_credentials(true);

    // Limit request body size; the API only ever receives small JSON bodies.
    const MAX_API_BODY_SIZE: usize = 1024 * 1024;

    let app = handlers::router(state)
        .layer(RequestBodyLimitLayer::new(MAX_API_BODY_SIZE))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = config.bind_address().parse()?;
    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
