//! Server mode
//!
//! Builds the registry, mounts the exporter routes and serves until a
//! shutdown signal arrives.

use std::sync::Arc;

use actix_web::{App, HttpServer, middleware::DefaultHeaders, web};
use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::api::{ExporterSettings, exporter_routes};
use crate::config::StaticConfig;
use crate::runtime::lifetime;

/// Run the HTTP server
///
/// This function:
/// 1. Builds the registry and registers every collector
/// 2. Binds the listen address (failure here is fatal)
/// 3. Serves scrapes until Ctrl+C
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(config: Arc<StaticConfig>) -> Result<()> {
    let registry = lifetime::startup::prepare_registry(&config)?;

    let settings = ExporterSettings {
        metrics_path: config.metrics.path.clone(),
    };
    let bind_address = config.bind_address();
    let workers = config.server.workers.clamp(1, 32);

    let server = HttpServer::new(move || {
        let metrics_path = settings.metrics_path.clone();
        App::new()
            .app_data(web::Data::new(Arc::clone(&registry)))
            .app_data(web::Data::new(settings.clone()))
            .wrap(DefaultHeaders::new().add(("Cache-Control", "no-cache, no-store, must-revalidate")))
            .configure(move |cfg| exporter_routes(cfg, &metrics_path))
    })
    .workers(workers)
    .disable_signals()
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    warn!(
        "Serving metrics at http://{}{} with {} workers",
        bind_address, config.metrics.path, workers
    );

    let handle = server.handle();
    actix_web::rt::spawn(async move {
        lifetime::shutdown::listen_for_shutdown().await;
        handle.stop(true).await;
    });

    server.await.context("HTTP server terminated with an error")?;
    info!("Server stopped");
    Ok(())
}
