use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::collectors::register_default_collectors;
use crate::config::StaticConfig;
use crate::metrics::Registry;

/// 准备服务器启动的上下文：构建 registry 并注册全部 collector
///
/// 所有注册都在服务器接受请求之前完成。
pub fn prepare_registry(config: &StaticConfig) -> Result<Arc<Registry>> {
    let start_time = std::time::Instant::now();
    debug!("Building metrics registry...");

    let registry = Registry::new().with_timestamps(config.metrics.emit_timestamps);
    register_default_collectors(
        &registry,
        &config.metrics.namespace,
        Duration::from_millis(config.metrics.cpu_sample_window_ms),
    )
    .context("Failed to register collectors")?;

    info!(
        "Registered {} metrics under namespace '{}' in {:?}",
        registry.registered_names().len(),
        config.metrics.namespace,
        start_time.elapsed()
    );
    Ok(Arc::new(registry))
}
