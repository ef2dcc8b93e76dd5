use anyhow::{Context, Result};
use axum::{extract::DefaultBodyLimit, middleware, routing::{get, post}, Router};
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::{
    auth,
    config::{Config, RealtimeConfig},
    dashboard::{DashboardFetcher, DashboardHandle},
    feed::{LocalFeed, PgNotifyFeed},
    handlers::{self, AppState},
    logging::SensitiveKey,
    pricing::PricingService,
    signals::setup_signal_handlers,
    supabase::SupabaseClient,
};

/// Start the MiraiDev API server
///
/// This function:
/// 1. Builds the Supabase client and starts the initial pricing load
/// 2. Connects the change feed and spawns the live dashboard
/// 3. Sets up signal handlers for graceful shutdown and pricing reload
/// 4. Serves requests until a shutdown signal arrives
pub async fn start_server(config: Config) -> Result<()> {
    let config = Arc::new(config);

    let supabase = SupabaseClient::new(&config.supabase)?;
    info!(
        "Supabase project {} (key {})",
        config.supabase.url,
        SensitiveKey::new(&config.supabase.service_role_key)
    );

    // Quotes answer 503 until this finishes
    let pricing = Arc::new(PricingService::new(supabase.clone()));
    tokio::spawn({
        let pricing = pricing.clone();
        async move {
            if let Err(e) = pricing.load().await {
                warn!("Pricing data unavailable until a reload succeeds: {}", e);
            }
        }
    });

    let hub = LocalFeed::default();
    let pg_feed = start_change_feed(&config.realtime, hub.clone()).await?;

    let dashboard = DashboardHandle::spawn(
        DashboardFetcher::new(supabase.clone(), config.dashboard.clone()),
        &hub,
    );

    let (shutdown_tx, signal_handle) = setup_signal_handlers(pricing.clone());
    let mut shutdown_rx = shutdown_tx.subscribe();

    let state = AppState {
        config: config.clone(),
        supabase,
        pricing,
        dashboard: dashboard.subscribe(),
        feed: hub,
    };

    let app = create_router(state);

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    info!("Starting MiraiDev API on {}", addr);
    info!(
        "Configuration: {} admin keys, realtime {}",
        config.admin_keys.iter().filter(|k| k.enabled).count(),
        if pg_feed.is_some() { "enabled" } else { "local only" }
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
            info!("Shutdown signal received, draining connections...");
        })
        .await?;

    dashboard.shutdown();
    drop(pg_feed);

    signal_handle.await?;
    info!("Server stopped gracefully");

    Ok(())
}

/// Connect the Postgres notification listener when realtime is enabled
async fn start_change_feed(realtime: &RealtimeConfig, hub: LocalFeed) -> Result<Option<PgNotifyFeed>> {
    if !realtime.enabled {
        info!("Realtime disabled, dashboard updates come from local writes only");
        return Ok(None);
    }

    let database_url = realtime
        .database_url
        .as_deref()
        .context("realtime.database_url is required when realtime is enabled")?;

    if realtime.run_migrations {
        info!("Running database migrations...");
        let pool = sqlx::PgPool::connect(database_url)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;
        pool.close().await;
    }

    let feed = PgNotifyFeed::connect(database_url, &realtime.channel, hub)
        .await
        .context("Failed to start change feed")?;
    Ok(Some(feed))
}

/// Create the Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route("/api/pricing/reload", post(handlers::pricing::reload))
        .route("/api/dashboard/stats", get(handlers::dashboard::stats))
        .route("/api/dashboard/stream", get(handlers::dashboard::stream))
        .route(
            "/api/projects/:id/messages",
            get(handlers::chat::list).post(handlers::chat::create),
        )
        .layer(middleware::from_fn_with_state(
            state.config.clone(),
            auth::admin_middleware,
        ));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Public endpoints (no auth required)
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/api/pricing/options", get(handlers::pricing::options))
        .route("/api/pricing/quote", post(handlers::pricing::quote))
        .route("/api/pricing/packages/:id", get(handlers::pricing::package))
        .route("/api/portfolio", get(handlers::portfolio::list))
        .route("/api/contact", post(handlers::contact::create))
        .merge(admin_routes)
        .with_state(state)
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
