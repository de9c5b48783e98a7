mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::Config;
use crate::core::database;
use crate::core::router::{build_router, AppServices};
use crate::features::auth::{AuthService, SessionService};
use crate::features::hazards::{HazardClassifier, HttpDetectorClient};
use crate::features::reports::{NominatimGeocoder, ReportService, SubmissionService};
use crate::features::users::UserService;
use crate::modules::storage::UploadStore;
use crate::shared::templates::PageRenderer;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

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
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
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

    tracing::info!(
        "System info: tokio_worker_threads={}, pid={}",
        worker_threads,
        std::process::id()
    );
    tracing::info!("Configuration loaded successfully");

    // Create database connection pool
    let pool = database::create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    // Run migrations automatically
    tracing::info!("Running database migrations...");
    database::run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database migrations completed successfully");

    // Upload storage
    let upload_store = Arc::new(UploadStore::new(config.app.upload_dir()));
    upload_store.ensure_dir().await?;

    // Accounts and sessions
    let user_service = Arc::new(UserService::new(pool.clone()));
    let session_service = Arc::new(SessionService::new(
        &config.session,
        Arc::clone(&user_service),
    ));
    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&user_service),
        Arc::clone(&session_service),
    ));
    tracing::info!("Auth services initialized");

    // Hazard detection and geocoding adapters
    let detector = Arc::new(HttpDetectorClient::new(&config.detector)?);
    let classifier = Arc::new(HazardClassifier::new(detector));
    tracing::info!(
        "Hazard detector configured: {} (model: {})",
        config.detector.url,
        config.detector.model
    );

    let geocoder = Arc::new(NominatimGeocoder::new(&config.geocoder)?);
    tracing::info!("Reverse geocoder configured: {}", config.geocoder.base_url);

    // Reports
    let report_service = Arc::new(ReportService::new(pool.clone()));
    let submission_service = Arc::new(SubmissionService::new(
        upload_store,
        classifier,
        geocoder,
        Arc::clone(&report_service),
    ));

    let renderer = Arc::new(PageRenderer::new()?);

    let app = build_router(
        &config,
        AppServices {
            auth_service,
            session_service,
            report_service,
            submission_service,
            renderer,
        },
    );

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    socket.set_nodelay(true)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on {}", format!("http://{}", addr));
    tracing::info!(
        "Swagger UI available at {}",
        format!("http://{}/swagger-ui/", addr)
    );

    axum::serve(listener, app).await?;

    Ok(())
}
