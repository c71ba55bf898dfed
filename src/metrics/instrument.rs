//! Shared instrument plumbing
//!
//! Every instrument stores its per-label-combination state in a
//! [`LabeledStore`]: a `BTreeMap` keyed by the canonical label-value tuple,
//! behind a mutex owned by that instrument alone.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use super::desc::Desc;
use crate::errors::Result;

/// Numeric payload of one sample
#[derive(Debug, Clone, PartialEq)]
pub enum SampleValue {
    Counter(f64),
    Gauge(f64),
    Histogram {
        /// `(upper_bound, cumulative_count)`, ascending, without `+Inf`
        buckets: Vec<(f64, u64)>,
        sum: f64,
        count: u64,
    },
}

/// One materialized label combination of an instrument
#[derive(Debug, Clone)]
pub struct Sample {
    pub desc: Arc<Desc>,
    pub label_values: Vec<String>,
    pub value: SampleValue,
    pub timestamp: DateTime<Utc>,
}

impl Sample {
    /// `(label_name, label_value)` pairs in schema order
    pub fn labels(&self) -> impl Iterator<Item = (&str, &str)> {
        self.desc
            .label_names()
            .iter()
            .map(String::as_str)
            .zip(self.label_values.iter().map(String::as_str))
    }

    /// Scalar value for counters and gauges, `None` for histograms
    pub fn scalar(&self) -> Option<f64> {
        match self.value {
            SampleValue::Counter(v) | SampleValue::Gauge(v) => Some(v),
            SampleValue::Histogram { .. } => None,
        }
    }
}

/// Describe/collect surface common to all instruments.
pub trait Instrument: Send + Sync {
    /// Static schema; never depends on observed values.
    fn desc(&self) -> &Arc<Desc>;

    /// One sample per observed label combination, in label-tuple order.
    fn collect(&self) -> Vec<Sample>;
}

/// Label-keyed state guarded by a per-instrument mutex
pub(crate) struct LabeledStore<T> {
    desc: Arc<Desc>,
    values: Mutex<BTreeMap<Vec<String>, T>>,
}

impl<T: Default> LabeledStore<T> {
    pub(crate) fn new(desc: Desc) -> Self {
        Self {
            desc: Arc::new(desc),
            values: Mutex::new(BTreeMap::new()),
        }
    }

    pub(crate) fn desc(&self) -> &Arc<Desc> {
        &self.desc
    }

    /// Validate `label_values`, then run `f` on the state under the lock.
    ///
    /// `f` may reject the update; the entry is only created once `f`
    /// succeeds, so a rejected call leaves no trace.
    pub(crate) fn update<R>(
        &self,
        label_values: &[&str],
        f: impl FnOnce(&mut T) -> Result<R>,
    ) -> Result<R> {
        let key = self.desc.label_key(label_values)?;
        self.update_key(key, f)
    }

    pub(crate) fn update_with<R>(
        &self,
        labels: &HashMap<&str, &str>,
        f: impl FnOnce(&mut T) -> Result<R>,
    ) -> Result<R> {
        let key = self.desc.label_key_from_map(labels)?;
        self.update_key(key, f)
    }

    fn update_key<R>(&self, key: Vec<String>, f: impl FnOnce(&mut T) -> Result<R>) -> Result<R> {
        let mut values = self.values.lock();
        match values.get_mut(&key) {
            Some(state) => f(state),
            None => {
                let mut state = T::default();
                let out = f(&mut state)?;
                values.insert(key, state);
                Ok(out)
            }
        }
    }

    pub(crate) fn read<R>(&self, label_values: &[&str], f: impl FnOnce(&T) -> R) -> Result<Option<R>> {
        let key = self.desc.label_key(label_values)?;
        Ok(self.values.lock().get(&key).map(f))
    }

    pub(crate) fn snapshot(&self, to_value: impl Fn(&T) -> SampleValue) -> Vec<Sample> {
        let timestamp = Utc::now();
        self.values
            .lock()
            .iter()
            .map(|(key, state)| Sample {
                desc: Arc::clone(&self.desc),
                label_values: key.clone(),
                value: to_value(state),
                timestamp,
            })
            .collect()
    }
}
