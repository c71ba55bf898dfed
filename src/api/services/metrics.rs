//! Prometheus metrics endpoint
//!
//! Runs a full scrape of the registry and returns it in the text
//! exposition format.

use std::sync::Arc;

use actix_web::{HttpResponse, Responder, web};
use tracing::{error, trace};

use crate::metrics::Registry;
use crate::metrics::encoder::CONTENT_TYPE;

/// Metrics service handler
pub struct MetricsService;

impl MetricsService {
    /// Handle metrics export request
    ///
    /// Collection may touch host statistics, so it runs on the blocking pool.
    pub async fn metrics(registry: web::Data<Arc<Registry>>) -> impl Responder {
        trace!("Received scrape request");
        let registry = Arc::clone(registry.get_ref());

        match web::block(move || registry.expose()).await {
            Ok(Ok(body)) => HttpResponse::Ok().content_type(CONTENT_TYPE).body(body),
            Ok(Err(e)) => {
                error!("Scrape failed: {}", e);
                HttpResponse::InternalServerError()
                    .content_type("text/plain; charset=utf-8")
                    .body(format!("An error has occurred while serving metrics: {}", e))
            }
            Err(e) => {
                error!("Scrape task failed: {}", e);
                HttpResponse::InternalServerError()
                    .content_type("text/plain; charset=utf-8")
                    .body("An error has occurred while serving metrics")
            }
        }
    }
}
