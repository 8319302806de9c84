use crate::{
    axum_http::{default_routers, routers, static_site},
    config::config_model::DotEnvyConfig,
};
use anyhow::{Context, Result};
use axum::{
    Router,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::get,
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;
use vhr_core::domain::repositories::user_access::UserAccessRepository;

pub fn build_router<R>(config: Arc<DotEnvyConfig>, user_access_repo: Arc<R>) -> Result<Router>
where
    R: UserAccessRepository + Send + Sync + 'static,
{
    let app = Router::new()
        .nest(
            "/api/v1/access",
            routers::access::routes(user_access_repo, Arc::clone(&config)),
        )
        .nest(
            "/api/v1/plans",
            routers::plans::routes(Arc::new(config.plan_catalog.clone())),
        )
        .route("/api/v1/health-check", get(default_routers::health_check));

    let app = match config.static_site.as_ref() {
        Some(site) => {
            info!(root = %site.root.display(), "Serving static site");
            app.merge(static_site::routes(site.root.clone()))
        }
        None => app.fallback(default_routers::not_found),
    };

    let body_limit_bytes: usize = config
        .backend_server
        .body_limit
        .checked_mul(1024 * 1024)
        .and_then(|bytes| bytes.try_into().ok())
        .context("SERVER_BODY_LIMIT is too large")?;

    let app = app
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.backend_server.timeout,
        )))
        .layer(RequestBodyLimitLayer::new(body_limit_bytes))
        .layer(
            CorsLayer::new()
                .allow_methods([Method::GET, Method::OPTIONS])
                .allow_headers([AUTHORIZATION, CONTENT_TYPE])
                .allow_origin(Any),
        )
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

pub async fn start<R>(config: Arc<DotEnvyConfig>, user_access_repo: Arc<R>) -> Result<()>
where
    R: UserAccessRepository + Send + Sync + 'static,
{
    let app = build_router(Arc::clone(&config), user_access_repo)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.backend_server.port));
    let listener = TcpListener::bind(addr).await?;

    info!("Server is running on port {}", config.backend_server.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to install CTRL+C signal handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}
