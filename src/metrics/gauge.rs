use std::collections::HashMap;
use std::sync::Arc;

use super::desc::{Desc, MetricKind, Opts};
use super::instrument::{Instrument, LabeledStore, Sample, SampleValue};
use crate::errors::Result;

/// Last-set value partitioned by label values
pub struct GaugeVec {
    store: LabeledStore<f64>,
}

impl GaugeVec {
    pub fn new(opts: Opts, label_names: &[&str]) -> Result<Self> {
        let desc = Desc::new(opts, MetricKind::Gauge, label_names)?;
        Ok(Self {
            store: LabeledStore::new(desc),
        })
    }

    pub fn set(&self, label_values: &[&str], value: f64) -> Result<()> {
        self.store.update(label_values, |v| {
            *v = value;
            Ok(())
        })
    }

    pub fn set_with(&self, labels: &HashMap<&str, &str>, value: f64) -> Result<()> {
        self.store.update_with(labels, |v| {
            *v = value;
            Ok(())
        })
    }

    pub fn add(&self, label_values: &[&str], delta: f64) -> Result<()> {
        self.store.update(label_values, |v| {
            *v += delta;
            Ok(())
        })
    }

    pub fn sub(&self, label_values: &[&str], delta: f64) -> Result<()> {
        self.add(label_values, -delta)
    }

    pub fn inc(&self, label_values: &[&str]) -> Result<()> {
        self.add(label_values, 1.0)
    }

    pub fn dec(&self, label_values: &[&str]) -> Result<()> {
        self.add(label_values, -1.0)
    }

    pub fn get(&self, label_values: &[&str]) -> Result<Option<f64>> {
        self.store.read(label_values, |v| *v)
    }
}

impl Instrument for GaugeVec {
    fn desc(&self) -> &Arc<Desc> {
        self.store.desc()
    }

    fn collect(&self) -> Vec<Sample> {
        self.store.snapshot(|v| SampleValue::Gauge(*v))
    }
}
