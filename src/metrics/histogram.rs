use std::collections::HashMap;
use std::sync::Arc;

use super::desc::{Desc, MetricKind, Opts};
use super::instrument::{Instrument, LabeledStore, Sample, SampleValue};
use crate::errors::{ExporterError, Result};

/// `count` bounds starting at `start`, each `width` apart.
pub fn linear_buckets(start: f64, width: f64, count: usize) -> Result<Vec<f64>> {
    if count < 1 {
        return Err(ExporterError::schema_violation(
            "linear_buckets needs a positive count",
        ));
    }
    if width <= 0.0 {
        return Err(ExporterError::schema_violation(format!(
            "linear_buckets needs a positive width, got {}",
            width
        )));
    }
    Ok((0..count).map(|i| start + width * i as f64).collect())
}

/// `count` bounds starting at `start`, each `factor` times the previous.
pub fn exponential_buckets(start: f64, factor: f64, count: usize) -> Result<Vec<f64>> {
    if count < 1 {
        return Err(ExporterError::schema_violation(
            "exponential_buckets needs a positive count",
        ));
    }
    if start <= 0.0 {
        return Err(ExporterError::schema_violation(format!(
            "exponential_buckets needs a positive start, got {}",
            start
        )));
    }
    if factor <= 1.0 {
        return Err(ExporterError::schema_violation(format!(
            "exponential_buckets needs a factor greater than 1, got {}",
            factor
        )));
    }
    let mut next = start;
    Ok((0..count)
        .map(|_| {
            let bound = next;
            next *= factor;
            bound
        })
        .collect())
}

#[derive(Default)]
struct HistogramState {
    counts: Vec<u64>,
    sum: f64,
    count: u64,
}

/// Cumulative histogram partitioned by label values
pub struct HistogramVec {
    store: LabeledStore<HistogramState>,
    bounds: Arc<[f64]>,
}

impl HistogramVec {
    /// `buckets` must be non-empty and strictly increasing. A trailing
    /// `+Inf` is dropped since that bucket is always implied.
    pub fn new(opts: Opts, label_names: &[&str], buckets: Vec<f64>) -> Result<Self> {
        let desc = Desc::new(opts, MetricKind::Histogram, label_names)?;

        let mut buckets = buckets;
        if buckets.last() == Some(&f64::INFINITY) {
            buckets.pop();
        }
        if buckets.is_empty() {
            return Err(ExporterError::schema_violation(format!(
                "histogram '{}' needs at least one bucket",
                desc.fq_name()
            )));
        }
        if buckets.iter().any(|b| b.is_nan()) || buckets.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ExporterError::schema_violation(format!(
                "histogram '{}' buckets must be strictly increasing: {:?}",
                desc.fq_name(),
                buckets
            )));
        }

        Ok(Self {
            store: LabeledStore::new(desc),
            bounds: buckets.into(),
        })
    }

    pub fn buckets(&self) -> &[f64] {
        &self.bounds
    }

    /// Record `value`: every bucket whose bound is >= `value` grows by one.
    pub fn observe(&self, label_values: &[&str], value: f64) -> Result<()> {
        let bounds = &self.bounds;
        self.store
            .update(label_values, |state| Ok(record(state, bounds, value)))
    }

    pub fn observe_with(&self, labels: &HashMap<&str, &str>, value: f64) -> Result<()> {
        let bounds = &self.bounds;
        self.store
            .update_with(labels, |state| Ok(record(state, bounds, value)))
    }

    /// `(cumulative bucket counts, sum, count)` for one combination
    pub fn get(&self, label_values: &[&str]) -> Result<Option<(Vec<u64>, f64, u64)>> {
        self.store
            .read(label_values, |s| (s.counts.clone(), s.sum, s.count))
    }
}

fn record(state: &mut HistogramState, bounds: &[f64], value: f64) {
    if state.counts.is_empty() {
        state.counts = vec![0; bounds.len()];
    }
    for (bound, count) in bounds.iter().zip(state.counts.iter_mut()) {
        if value <= *bound {
            *count += 1;
        }
    }
    state.sum += value;
    state.count += 1;
}

impl Instrument for HistogramVec {
    fn desc(&self) -> &Arc<Desc> {
        self.store.desc()
    }

    fn collect(&self) -> Vec<Sample> {
        let bounds = &self.bounds;
        self.store.snapshot(|state| SampleValue::Histogram {
            buckets: bounds
                .iter()
                .copied()
                .zip(state.counts.iter().copied())
                .collect(),
            sum: state.sum,
            count: state.count,
        })
    }
}
