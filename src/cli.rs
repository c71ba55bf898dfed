//! Command-line interface definitions using clap

use clap::Parser;

use crate::config::StaticConfig;
use crate::errors::Result;

/// Howard Exporter - host usage and demo counters for Prometheus
#[derive(Parser, Debug, Default)]
#[command(name = "howard-exporter")]
#[command(version)]
#[command(about = "Exposes host CPU/memory usage and demo counters for Prometheus", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to ./config.toml when present)
    #[arg(long, short = 'c')]
    pub config: Option<String>,

    /// Listen address, e.g. `:8081` or `127.0.0.1:9100`
    #[arg(long, short = 'l')]
    pub listen: Option<String>,

    /// Path the metrics are served under
    #[arg(long)]
    pub metrics_path: Option<String>,

    /// Print a sample configuration file and exit
    #[arg(long)]
    pub generate_config: bool,
}

impl Cli {
    /// Load the configuration and apply command-line overrides on top.
    pub fn resolve_config(&self) -> Result<StaticConfig> {
        let mut config = StaticConfig::load(self.config.as_deref())?;
        if let Some(listen) = &self.listen {
            config.apply_listen_address(listen)?;
        }
        if let Some(path) = &self.metrics_path {
            config.metrics.path = path.clone();
        }
        config.validate()?;
        Ok(config)
    }
}
