use std::collections::HashMap;
use std::sync::Arc;

use super::desc::{Desc, MetricKind, Opts};
use super::instrument::{Instrument, LabeledStore, Sample, SampleValue};
use crate::errors::{ExporterError, Result};

/// Monotonic counter partitioned by label values
pub struct CounterVec {
    store: LabeledStore<f64>,
}

impl CounterVec {
    pub fn new(opts: Opts, label_names: &[&str]) -> Result<Self> {
        let desc = Desc::new(opts, MetricKind::Counter, label_names)?;
        Ok(Self {
            store: LabeledStore::new(desc),
        })
    }

    /// Add `delta` to the combination named by `label_values`.
    ///
    /// Negative and NaN deltas are rejected and leave the value unchanged.
    pub fn add(&self, label_values: &[&str], delta: f64) -> Result<()> {
        let delta = self.check_delta(delta)?;
        self.store.update(label_values, |value| {
            *value += delta;
            Ok(())
        })
    }

    pub fn add_with(&self, labels: &HashMap<&str, &str>, delta: f64) -> Result<()> {
        let delta = self.check_delta(delta)?;
        self.store.update_with(labels, |value| {
            *value += delta;
            Ok(())
        })
    }

    pub fn inc(&self, label_values: &[&str]) -> Result<()> {
        self.add(label_values, 1.0)
    }

    /// Current value, `None` if the combination was never observed
    pub fn get(&self, label_values: &[&str]) -> Result<Option<f64>> {
        self.store.read(label_values, |v| *v)
    }

    fn check_delta(&self, delta: f64) -> Result<f64> {
        if delta < 0.0 || delta.is_nan() {
            return Err(ExporterError::schema_violation(format!(
                "counter '{}' cannot be increased by {}",
                self.store.desc().fq_name(),
                delta
            )));
        }
        Ok(delta)
    }
}

impl Instrument for CounterVec {
    fn desc(&self) -> &Arc<Desc> {
        self.store.desc()
    }

    fn collect(&self) -> Vec<Sample> {
        self.store.snapshot(|v| SampleValue::Counter(*v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter() -> CounterVec {
        CounterVec::new(
            Opts::new("auto_increment_counter", "+1").namespace("howard_exporter"),
            &["Label"],
        )
        .unwrap()
    }

    #[test]
    fn test_add_accumulates() {
        let c = counter();
        c.inc(&["label1"]).unwrap();
        c.add(&["label1"], 2.5).unwrap();
        assert_eq!(c.get(&["label1"]).unwrap(), Some(3.5));
    }

    #[test]
    fn test_add_strictly_increases() {
        let c = counter();
        let mut last = 0.0;
        for _ in 0..10 {
            c.add(&["a"], 0.5).unwrap();
            let now = c.get(&["a"]).unwrap().unwrap();
            assert!(now > last);
            last = now;
        }
    }

    #[test]
    fn test_negative_delta_rejected_and_value_unchanged() {
        let c = counter();
        c.add(&["label1"], 4.0).unwrap();

        let err = c.add(&["label1"], -1.0).unwrap_err();
        assert!(matches!(err, ExporterError::SchemaViolation(_)));
        assert_eq!(c.get(&["label1"]).unwrap(), Some(4.0));

        assert!(c.add(&["label1"], f64::NAN).is_err());
        assert_eq!(c.get(&["label1"]).unwrap(), Some(4.0));
    }

    #[test]
    fn test_wrong_label_count_leaves_no_state() {
        let c = counter();
        assert!(c.inc(&[]).is_err());
        assert!(c.inc(&["a", "b"]).is_err());
        assert!(c.collect().is_empty());
    }

    #[test]
    fn test_add_with_map() {
        let c = counter();
        c.add_with(&HashMap::from([("Label", "x")]), 2.0).unwrap();
        assert_eq!(c.get(&["x"]).unwrap(), Some(2.0));

        let extra = HashMap::from([("Label", "x"), ("path", "/")]);
        assert!(c.add_with(&extra, 1.0).is_err());
        assert_eq!(c.get(&["x"]).unwrap(), Some(2.0));
    }

    #[test]
    fn test_collect_one_sample_per_combination_sorted() {
        let c = counter();
        c.inc(&["b"]).unwrap();
        c.inc(&["a"]).unwrap();
        c.inc(&["b"]).unwrap();

        let samples = c.collect();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].label_values, vec!["a".to_string()]);
        assert_eq!(samples[0].value, SampleValue::Counter(1.0));
        assert_eq!(samples[1].value, SampleValue::Counter(2.0));
    }

    #[test]
    fn test_desc_is_value_independent() {
        let c = counter();
        let before = c.desc().as_ref().clone();
        c.add(&["x"], 10.0).unwrap();
        assert_eq!(*c.desc().as_ref(), before);
    }
}
