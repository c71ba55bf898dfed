use std::sync::Arc;

use crossbeam_channel::Sender;
use tracing::warn;

use crate::errors::Result;
use crate::metrics::{
    Collector, CounterVec, Desc, HistogramVec, Opts, Sample, collect_instrument,
    describe_instrument, linear_buckets,
};
use crate::providers::{Route, TrafficSource};

use super::{AUTO_INCREMENT_LABEL_VALUE, HOST_LABEL};

/// Fixed observations recorded on every scrape: `(label, value)`
const HISTOGRAM_OBSERVATIONS: [(&str, f64); 2] = [("label_1", 100.0), ("label_2", 50.0)];

/// Demonstration instruments: a +1 counter, a diagnostic histogram and
/// per-route access counters fed by a [`TrafficSource`].
pub struct SyntheticCollector {
    auto_increment: CounterVec,
    histogram: HistogramVec,
    endpoints_access: CounterVec,
    traffic: Arc<dyn TrafficSource>,
    routes: Vec<Route>,
}

impl SyntheticCollector {
    pub fn new(
        namespace: &str,
        traffic: Arc<dyn TrafficSource>,
        routes: Vec<Route>,
    ) -> Result<Self> {
        let auto_increment = CounterVec::new(
            Opts::new("auto_increment_counter", "+1").namespace(namespace),
            &[HOST_LABEL],
        )?;
        let histogram = HistogramVec::new(
            Opts::new("histogram_test", "histogram test").namespace(namespace),
            &[HOST_LABEL],
            linear_buckets(20.0, 5.0, 5)?,
        )?;
        let endpoints_access = CounterVec::new(
            Opts::new("endpoints_access", "endpoints access").namespace(namespace),
            &["path"],
        )?;

        Ok(Self {
            auto_increment,
            histogram,
            endpoints_access,
            traffic,
            routes,
        })
    }

    fn refresh_auto_increment(&self) {
        if let Err(e) = self.auto_increment.inc(&[AUTO_INCREMENT_LABEL_VALUE]) {
            warn!("Auto-increment counter refresh failed: {}", e);
        }
    }

    fn refresh_histogram(&self) {
        for (label, value) in HISTOGRAM_OBSERVATIONS {
            if let Err(e) = self.histogram.observe(&[label], value) {
                warn!("Histogram observation failed: {}", e);
            }
        }
    }

    fn refresh_endpoints(&self) {
        let increments = match self.traffic.increments(&self.routes) {
            Ok(increments) => increments,
            Err(e) => {
                warn!("Traffic source failed, keeping last counts: {}", e);
                return;
            }
        };
        if increments.len() != self.routes.len() {
            warn!(
                "Traffic source returned {} increments for {} routes, keeping last counts",
                increments.len(),
                self.routes.len()
            );
            return;
        }

        for (route, delta) in self.routes.iter().zip(increments) {
            if let Err(e) = self.endpoints_access.add(&[route.path.as_str()], delta) {
                warn!("Endpoint counter refresh for {} failed: {}", route.path, e);
            }
        }
    }
}

impl Collector for SyntheticCollector {
    fn describe(&self, descs: &Sender<Arc<Desc>>) {
        describe_instrument(&self.auto_increment, descs);
        describe_instrument(&self.histogram, descs);
        describe_instrument(&self.endpoints_access, descs);
    }

    fn collect(&self, samples: &Sender<Sample>) {
        self.refresh_auto_increment();
        collect_instrument(&self.auto_increment, samples);

        self.refresh_histogram();
        collect_instrument(&self.histogram, samples);

        self.refresh_endpoints();
        collect_instrument(&self.endpoints_access, samples);
    }
}
