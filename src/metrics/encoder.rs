//! Text exposition encoding
//!
//! Translates gathered families into the `prometheus` crate's data model and
//! delegates serialization to its [`TextEncoder`].

use prometheus::proto;
use prometheus::{Encoder, TextEncoder};

use super::desc::MetricKind;
use super::instrument::{Sample, SampleValue};
use super::registry::MetricFamily;
use crate::errors::Result;

/// Content type of the text exposition format
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Render families as exposition text.
///
/// When `with_timestamps` is set every sample line carries its collection
/// time in milliseconds.
pub fn encode_text(families: &[MetricFamily], with_timestamps: bool) -> Result<String> {
    let proto_families: Vec<proto::MetricFamily> = families
        .iter()
        .map(|family| to_proto_family(family, with_timestamps))
        .collect();

    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&proto_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

fn to_proto_family(family: &MetricFamily, with_timestamps: bool) -> proto::MetricFamily {
    let mut mf = proto::MetricFamily::default();
    mf.set_name(family.desc.fq_name().to_string());
    mf.set_help(family.desc.help().to_string());
    mf.set_field_type(match family.desc.kind() {
        MetricKind::Counter => proto::MetricType::COUNTER,
        MetricKind::Gauge => proto::MetricType::GAUGE,
        MetricKind::Histogram => proto::MetricType::HISTOGRAM,
    });
    mf.set_metric(
        family
            .samples
            .iter()
            .map(|sample| to_proto_metric(sample, with_timestamps))
            .collect(),
    );
    mf
}

fn to_proto_metric(sample: &Sample, with_timestamps: bool) -> proto::Metric {
    let mut metric = proto::Metric::default();
    metric.set_label(
        sample
            .labels()
            .map(|(name, value)| {
                let mut pair = proto::LabelPair::default();
                pair.set_name(name.to_string());
                pair.set_value(value.to_string());
                pair
            })
            .collect(),
    );

    match &sample.value {
        SampleValue::Counter(v) => {
            let mut counter = proto::Counter::default();
            counter.set_value(*v);
            metric.set_counter(counter);
        }
        SampleValue::Gauge(v) => {
            let mut gauge = proto::Gauge::default();
            gauge.set_value(*v);
            metric.set_gauge(gauge);
        }
        SampleValue::Histogram {
            buckets,
            sum,
            count,
        } => {
            let mut histogram = proto::Histogram::default();
            histogram.set_sample_count(*count);
            histogram.set_sample_sum(*sum);
            histogram.set_bucket(
                buckets
                    .iter()
                    .map(|(bound, cumulative)| {
                        let mut bucket = proto::Bucket::default();
                        bucket.set_upper_bound(*bound);
                        bucket.set_cumulative_count(*cumulative);
                        bucket
                    })
                    .collect(),
            );
            metric.set_histogram(histogram);
        }
    }

    if with_timestamps {
        metric.set_timestamp_ms(sample.timestamp.timestamp_millis());
    }
    metric
}
