//! Instrument behaviour tests
//!
//! Describe/collect symmetry, counter monotonicity, label schema
//! enforcement, histogram bucket placement and concurrent updates.

use std::collections::HashMap;
use std::sync::Arc;

use howard_exporter::errors::ExporterError;
use howard_exporter::metrics::{
    CounterVec, GaugeVec, HistogramVec, Instrument, Opts, SampleValue, linear_buckets,
};

fn opts(name: &str) -> Opts {
    Opts::new(name, "test metric").namespace("howard_exporter")
}

// =============================================================================
// Describe / collect symmetry
// =============================================================================

#[test]
fn test_describe_identical_before_and_after_observations() {
    let counter = CounterVec::new(opts("c"), &["Label"]).unwrap();
    let gauge = GaugeVec::new(opts("g"), &["Label"]).unwrap();
    let histogram =
        HistogramVec::new(opts("h"), &["Label"], linear_buckets(20.0, 5.0, 5).unwrap()).unwrap();

    let before = [
        counter.desc().as_ref().clone(),
        gauge.desc().as_ref().clone(),
        histogram.desc().as_ref().clone(),
    ];

    counter.add(&["a"], 3.0).unwrap();
    gauge.set(&["a"], -2.0).unwrap();
    histogram.observe(&["a"], 27.0).unwrap();

    let after = [
        counter.desc().as_ref().clone(),
        gauge.desc().as_ref().clone(),
        histogram.desc().as_ref().clone(),
    ];
    assert_eq!(before, after);
}

#[test]
fn test_collect_is_repeatable_and_uncached() {
    let gauge = GaugeVec::new(opts("g"), &["Label"]).unwrap();
    gauge.set(&["label1"], 1.0).unwrap();

    assert_eq!(gauge.collect()[0].scalar(), Some(1.0));
    assert_eq!(gauge.collect()[0].scalar(), Some(1.0));

    gauge.set(&["label1"], 2.0).unwrap();
    assert_eq!(gauge.collect()[0].scalar(), Some(2.0));
}

// =============================================================================
// Counter
// =============================================================================

#[test]
fn test_counter_positive_adds_strictly_increase() {
    let counter = CounterVec::new(opts("c"), &["Label"]).unwrap();
    let mut previous = 0.0;
    for delta in [0.1, 1.0, 7.0, 0.5] {
        counter.add(&["x"], delta).unwrap();
        let current = counter.get(&["x"]).unwrap().unwrap();
        assert!(current > previous);
        previous = current;
    }
}

#[test]
fn test_counter_negative_add_fails_and_keeps_value() {
    let counter = CounterVec::new(opts("c"), &["Label"]).unwrap();
    counter.add(&["x"], 5.0).unwrap();

    let err = counter.add(&["x"], -0.5).unwrap_err();
    assert!(matches!(err, ExporterError::SchemaViolation(_)));
    assert_eq!(counter.get(&["x"]).unwrap(), Some(5.0));
}

#[test]
fn test_counter_negative_add_on_new_combination_creates_nothing() {
    let counter = CounterVec::new(opts("c"), &["Label"]).unwrap();
    assert!(counter.add(&["fresh"], -1.0).is_err());
    assert!(counter.collect().is_empty());
}

// =============================================================================
// Label schema enforcement
// =============================================================================

#[test]
fn test_missing_or_extra_labels_rejected_atomically() {
    let gauge = GaugeVec::new(opts("g"), &["Label", "path"]).unwrap();
    gauge.set(&["a", "/"], 1.0).unwrap();

    let missing = HashMap::from([("Label", "a")]);
    let extra = HashMap::from([("Label", "a"), ("path", "/"), ("host", "h")]);
    let renamed = HashMap::from([("Label", "a"), ("route", "/")]);

    for labels in [&missing, &extra, &renamed] {
        let err = gauge.set_with(labels, 99.0).unwrap_err();
        assert!(matches!(err, ExporterError::SchemaViolation(_)));
    }
    assert!(gauge.set(&["a"], 99.0).is_err());
    assert!(gauge.set(&["a", "/", "x"], 99.0).is_err());

    let samples = gauge.collect();
    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].scalar(), Some(1.0));
}

#[test]
fn test_schema_violation_on_one_instrument_does_not_affect_another() {
    let a = CounterVec::new(opts("a"), &["Label"]).unwrap();
    let b = CounterVec::new(opts("b"), &["Label"]).unwrap();
    a.inc(&["x"]).unwrap();
    b.inc(&["x"]).unwrap();

    assert!(a.inc(&[]).is_err());
    assert_eq!(a.get(&["x"]).unwrap(), Some(1.0));
    assert_eq!(b.get(&["x"]).unwrap(), Some(1.0));
}

// =============================================================================
// Histogram
// =============================================================================

#[test]
fn test_histogram_observation_22() {
    let histogram =
        HistogramVec::new(opts("h"), &["Label"], vec![20.0, 25.0, 30.0, 35.0, 40.0]).unwrap();
    histogram.observe(&["label_1"], 22.0).unwrap();

    let samples = histogram.collect();
    assert_eq!(samples.len(), 1);
    match &samples[0].value {
        SampleValue::Histogram {
            buckets,
            sum,
            count,
        } => {
            assert_eq!(
                buckets,
                &vec![(20.0, 0), (25.0, 1), (30.0, 1), (35.0, 1), (40.0, 1)]
            );
            assert_eq!(*count, 1);
            assert_eq!(*sum, 22.0);
        }
        other => panic!("unexpected sample value {:?}", other),
    }
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_concurrent_counter_updates_are_not_lost() {
    let counter = Arc::new(CounterVec::new(opts("c"), &["Label"]).unwrap());

    std::thread::scope(|s| {
        for _ in 0..50 {
            let counter = Arc::clone(&counter);
            s.spawn(move || {
                for _ in 0..100 {
                    counter.inc(&["label1"]).unwrap();
                }
            });
        }
    });

    assert_eq!(counter.get(&["label1"]).unwrap(), Some(5000.0));
}

#[test]
fn test_concurrent_histogram_observations_are_consistent() {
    let histogram = Arc::new(
        HistogramVec::new(opts("h"), &["Label"], linear_buckets(20.0, 5.0, 5).unwrap()).unwrap(),
    );

    std::thread::scope(|s| {
        for i in 0..50 {
            let histogram = Arc::clone(&histogram);
            s.spawn(move || {
                let value = if i % 2 == 0 { 22.0 } else { 100.0 };
                histogram.observe(&["x"], value).unwrap();
            });
        }
    });

    let (counts, sum, count) = histogram.get(&["x"]).unwrap().unwrap();
    assert_eq!(count, 50);
    assert_eq!(sum, 25.0 * 22.0 + 25.0 * 100.0);
    assert_eq!(counts, vec![0, 25, 25, 25, 25]);
}
