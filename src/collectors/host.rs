use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::Sender;
use tracing::warn;

use crate::errors::Result;
use crate::metrics::{
    Collector, Desc, GaugeVec, Opts, Sample, collect_instrument, describe_instrument,
};
use crate::providers::HostStats;

use super::{HOST_LABEL, HOST_LABEL_VALUE};

/// CPU and memory usage gauges
pub struct HostCollector {
    cpu_usage: GaugeVec,
    memory_usage: GaugeVec,
    stats: Arc<dyn HostStats>,
    cpu_window: Duration,
}

impl HostCollector {
    pub fn new(namespace: &str, stats: Arc<dyn HostStats>, cpu_window: Duration) -> Result<Self> {
        let cpu_usage = GaugeVec::new(
            Opts::new("cpu_usage", "This is cpu usage stats").namespace(namespace),
            &[HOST_LABEL],
        )?;
        let memory_usage = GaugeVec::new(
            Opts::new("memory_usage", "This is memory usage stats").namespace(namespace),
            &[HOST_LABEL],
        )?;

        Ok(Self {
            cpu_usage,
            memory_usage,
            stats,
            cpu_window,
        })
    }

    fn refresh_cpu(&self) {
        let result = self
            .stats
            .cpu_percent(self.cpu_window)
            .and_then(|pct| self.cpu_usage.set(&[HOST_LABEL_VALUE], pct));
        if let Err(e) = result {
            warn!("CPU usage refresh failed, keeping last value: {}", e);
        }
    }

    fn refresh_memory(&self) {
        let result = self
            .stats
            .memory_used_percent()
            .and_then(|pct| self.memory_usage.set(&[HOST_LABEL_VALUE], pct));
        if let Err(e) = result {
            warn!("Memory usage refresh failed, keeping last value: {}", e);
        }
    }
}

impl Collector for HostCollector {
    fn describe(&self, descs: &Sender<Arc<Desc>>) {
        describe_instrument(&self.cpu_usage, descs);
        describe_instrument(&self.memory_usage, descs);
    }

    fn collect(&self, samples: &Sender<Sample>) {
        self.refresh_cpu();
        collect_instrument(&self.cpu_usage, samples);

        self.refresh_memory();
        collect_instrument(&self.memory_usage, samples);
    }
}
