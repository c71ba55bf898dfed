pub mod landing;
pub mod metrics;

use actix_web::web;

pub use landing::LandingService;
pub use metrics::MetricsService;

/// Per-server settings shared with the handlers
#[derive(Clone, Debug)]
pub struct ExporterSettings {
    pub metrics_path: String,
}

/// Mount the landing page at `/` and the scrape endpoint at `metrics_path`.
///
/// Handlers expect `web::Data<Arc<Registry>>` and `web::Data<ExporterSettings>`
/// in the app data.
pub fn exporter_routes(cfg: &mut web::ServiceConfig, metrics_path: &str) {
    cfg.route(metrics_path, web::get().to(MetricsService::metrics))
        .route("/", web::get().to(LandingService::index));
}
