use std::error::Error;
use std::sync::Arc;

use http::header::CONTENT_TYPE;
use http::{HeaderName, HeaderValue, Method};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use campaign_board::adapters::http::{api_router, AppState};
use campaign_board::adapters::{
    notification_channel, postgres_storage, run_migrations, InMemoryStore, SeedData,
    StaticAuthorizer, TracingNotifier,
};
use campaign_board::application::Storage;
use campaign_board::config::{AppConfig, CorsPolicy, DatabaseConfig, LogFormat, ServerConfig};

type BoxError = Box<dyn Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);
    let addr = config.server.socket_addr()?;
    tracing::info!(%addr, environment = ?config.server.environment, "Loaded configuration");

    // --- Directory seed and permission grants ---
    let seed = load_seed(&config).await?;
    let authorizer = Arc::new(StaticAuthorizer::from_grants(seed.grants.clone()));
    tracing::info!(grants = authorizer.len(), "Authorizer ready");

    // --- Storage ---
    let storage = match &config.database {
        Some(database) => connect(database).await?,
        None => {
            let store = InMemoryStore::from_seed(seed);
            tracing::info!(
                users = store.user_count(),
                campaigns = store.campaign_count(),
                "Using in-memory storage"
            );
            Storage::shared(Arc::new(store))
        }
    };

    // --- Notifications ---
    let (queue, dispatcher) =
        notification_channel(config.notifications.queue_capacity, Arc::new(TracingNotifier));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let dispatcher_handle = tokio::spawn(dispatcher.run(shutdown_rx));

    let queue = Arc::new(queue);
    let state = AppState::new(storage, authorizer, queue.clone(), config.board.limits());

    // --- Router ---
    let request_id_header = HeaderName::from_static("x-request-id");
    let app = api_router(state).layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(request_id_header.clone(), MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::new(request_id_header))
            .layer(cors_layer(&config.server))
            .layer(TimeoutLayer::new(config.server.request_timeout())),
    );

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Starting server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Let the dispatcher deliver what is already queued.
    tracing::info!("Server stopped accepting connections, draining notifications");
    if shutdown_tx.send(true).is_err() {
        tracing::warn!("Notification dispatcher already stopped");
    }
    match dispatcher_handle.await {
        Ok(delivered) => tracing::info!(
            delivered,
            dropped = queue.dropped(),
            "Graceful shutdown complete"
        ),
        Err(e) => tracing::error!(error = %e, "Notification dispatcher task failed"),
    }

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    match config.server.log_format() {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn load_seed(config: &AppConfig) -> Result<SeedData, BoxError> {
    let Some(path) = &config.directory.seed_file else {
        return Ok(SeedData::default());
    };
    let json = tokio::fs::read_to_string(path).await?;
    let seed = SeedData::from_json(&json)?;
    tracing::info!(
        path = %path.display(),
        users = seed.users.len(),
        campaigns = seed.campaigns.len(),
        "Loaded directory seed"
    );
    Ok(seed)
}

async fn connect(database: &DatabaseConfig) -> Result<Storage, BoxError> {
    let pool = PgPoolOptions::new()
        .min_connections(database.min_connections)
        .max_connections(database.max_connections)
        .acquire_timeout(database.connect_timeout())
        .connect(&database.url)
        .await?;
    tracing::info!("Database connection pool created");

    if database.run_migrations {
        run_migrations(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    Ok(postgres_storage(pool))
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins = match server.cors_policy() {
        CorsPolicy::AnyOrigin => return CorsLayer::permissive(),
        CorsPolicy::Origins(origins) => origins,
    };

    let origins: Vec<HeaderValue> = origins
        .into_iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static("x-user-id")])
}

/// Resolves on SIGINT, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received SIGINT, starting graceful shutdown"),
        () = terminate => tracing::info!("Received SIGTERM, starting graceful shutdown"),
    }
}
