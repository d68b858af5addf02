use std::sync::Arc;

use anyhow::Result;
use resale_tracker::{
    app,
    config::Config,
    db,
    repos::points_platform::PgPointsPlatformResolver,
    services::{
        platform_cache::CachedPlatformResolver,
        points_valuation::{PointsPlatformResolver, PointsValuationService},
        profit::ProfitCalculator,
    },
    types::AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "resale_tracker=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let db_pool = db::make_db_pool(&config.database_url, config.db_max_connections).await?;
    db::run_migrations(&db_pool).await?;

    let pg_resolver = PgPointsPlatformResolver::new(db_pool);
    let resolver: Arc<dyn PointsPlatformResolver> = if config.platform_cache {
        Arc::new(CachedPlatformResolver::new(pg_resolver))
    } else {
        Arc::new(pg_resolver)
    };
    let calculator = ProfitCalculator::new(PointsValuationService::new(resolver));

    let app = app::build_router(AppState::new(calculator));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for CTRL+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("signal received, starting graceful shutdown");
}
