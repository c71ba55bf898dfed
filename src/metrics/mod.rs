//! Metrics core
//!
//! Instruments, the collector capability, the registry and the text
//! exposition encoder.

pub mod collector;
mod counter;
mod desc;
pub mod encoder;
mod gauge;
mod histogram;
mod instrument;
mod registry;

pub use collector::{Collector, collect_instrument, describe_instrument};
pub use counter::CounterVec;
pub use desc::{Desc, MetricKind, Opts};
pub use gauge::GaugeVec;
pub use histogram::{HistogramVec, exponential_buckets, linear_buckets};
pub use instrument::{Instrument, Sample, SampleValue};
pub use registry::{MetricFamily, Registry};
