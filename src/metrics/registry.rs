//! Collector registry
//!
//! Holds the registered collectors and the identities they declared.
//! Registration validates everything before committing; scrapes fan out to
//! every collector and are grouped into metric families for the encoder.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use super::collector::Collector;
use super::desc::Desc;
use super::encoder;
use super::instrument::Sample;
use crate::errors::{ExporterError, Result};

/// All samples sharing one identity
#[derive(Debug, Clone)]
pub struct MetricFamily {
    pub desc: Arc<Desc>,
    pub samples: Vec<Sample>,
}

struct Registered {
    collector: Arc<dyn Collector>,
    fq_names: Vec<String>,
    /// Described nothing; its samples skip the identity check
    unchecked: bool,
}

#[derive(Default)]
struct Inner {
    collectors: Vec<Registered>,
    descs: HashMap<String, Arc<Desc>>,
}

/// Registry of collectors
#[derive(Default)]
pub struct Registry {
    inner: RwLock<Inner>,
    emit_timestamps: bool,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach collection timestamps to every exposed sample.
    pub fn with_timestamps(mut self, emit: bool) -> Self {
        self.emit_timestamps = emit;
        self
    }

    /// Register a collector.
    ///
    /// Fails with `DuplicateMetric` if the collector declares an identity
    /// twice or one that is already registered; the registry is unchanged
    /// on failure.
    pub fn register(&self, collector: Arc<dyn Collector>) -> Result<()> {
        let descs = describe_all(collector.as_ref());

        let mut inner = self.inner.write();

        let mut own = HashSet::with_capacity(descs.len());
        for desc in &descs {
            let fq_name = desc.fq_name();
            if !own.insert(fq_name) {
                return Err(ExporterError::duplicate_metric(format!(
                    "collector declares '{}' more than once",
                    fq_name
                )));
            }
            if inner.descs.contains_key(fq_name) {
                return Err(ExporterError::duplicate_metric(format!(
                    "'{}' is already registered",
                    fq_name
                )));
            }
        }

        let unchecked = descs.is_empty();
        if unchecked {
            warn!("Registering a collector that describes no metrics; its output is unchecked");
        }

        let fq_names: Vec<String> = descs.iter().map(|d| d.fq_name().to_string()).collect();
        for desc in descs {
            inner.descs.insert(desc.fq_name().to_string(), desc);
        }
        info!("Registered collector with metrics: {:?}", fq_names);
        inner.collectors.push(Registered {
            collector,
            fq_names,
            unchecked,
        });

        Ok(())
    }

    /// Remove a previously registered collector, freeing its identities.
    ///
    /// Returns `false` if the collector was not registered.
    pub fn unregister(&self, collector: &Arc<dyn Collector>) -> bool {
        let mut inner = self.inner.write();
        let Some(pos) = inner
            .collectors
            .iter()
            .position(|r| Arc::ptr_eq(&r.collector, collector))
        else {
            return false;
        };

        let removed = inner.collectors.remove(pos);
        for fq_name in &removed.fq_names {
            inner.descs.remove(fq_name);
        }
        true
    }

    /// Identities currently registered, sorted
    pub fn registered_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.read().descs.keys().cloned().collect();
        names.sort();
        names
    }

    /// Run every collector once and concatenate their samples.
    pub fn collect(&self) -> Vec<Sample> {
        self.collect_tagged()
            .into_iter()
            .flat_map(|(_, samples)| samples)
            .collect()
    }

    /// Samples per collector, tagged with whether that collector is unchecked.
    fn collect_tagged(&self) -> Vec<(bool, Vec<Sample>)> {
        let collectors: Vec<(Arc<dyn Collector>, bool)> = self
            .inner
            .read()
            .collectors
            .iter()
            .map(|r| (Arc::clone(&r.collector), r.unchecked))
            .collect();

        collectors
            .iter()
            .map(|(collector, unchecked)| {
                let (tx, rx) = crossbeam_channel::unbounded();
                collector.collect(&tx);
                drop(tx);
                (*unchecked, rx.into_iter().collect())
            })
            .collect()
    }

    /// Collect and group samples by identity.
    ///
    /// A sample with a wrong number of label values fails the whole scrape,
    /// as does a sample from a describing collector whose identity was never
    /// declared. Samples of unchecked collectors may use any identity that
    /// does not conflict with a declared one.
    pub fn gather(&self) -> Result<Vec<MetricFamily>> {
        let tagged = self.collect_tagged();

        let described: HashMap<String, Arc<Desc>> = self.inner.read().descs.clone();

        let mut families: Vec<MetricFamily> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for (unchecked, sample) in tagged
            .into_iter()
            .flat_map(|(unchecked, samples)| samples.into_iter().map(move |s| (unchecked, s)))
        {
            let fq_name = sample.desc.fq_name();
            match described.get(fq_name) {
                Some(desc) if **desc != *sample.desc => {
                    return Err(ExporterError::encoding(format!(
                        "collected metric '{}' does not match its registered description",
                        fq_name
                    )));
                }
                None if !unchecked => {
                    return Err(ExporterError::encoding(format!(
                        "collected metric '{}' was not described by any registered collector",
                        fq_name
                    )));
                }
                _ => {}
            }
            if sample.label_values.len() != sample.desc.label_names().len() {
                return Err(ExporterError::encoding(format!(
                    "collected metric '{}' has {} label value(s) for {} label name(s)",
                    fq_name,
                    sample.label_values.len(),
                    sample.desc.label_names().len()
                )));
            }

            match index.get(fq_name) {
                Some(&i) if *families[i].desc != *sample.desc => {
                    return Err(ExporterError::encoding(format!(
                        "collected metric '{}' was emitted with conflicting descriptions",
                        fq_name
                    )));
                }
                Some(&i) => families[i].samples.push(sample),
                None => {
                    index.insert(fq_name.to_string(), families.len());
                    families.push(MetricFamily {
                        desc: Arc::clone(&sample.desc),
                        samples: vec![sample],
                    });
                }
            }
        }

        Ok(families)
    }

    /// Scrape and render the text exposition format.
    pub fn expose(&self) -> Result<String> {
        let start = Instant::now();
        let families = self.gather()?;
        let body = encoder::encode_text(&families, self.emit_timestamps)?;
        debug!(
            "Scrape produced {} metric families in {:?}",
            families.len(),
            start.elapsed()
        );
        Ok(body)
    }
}

fn describe_all(collector: &dyn Collector) -> Vec<Arc<Desc>> {
    let (tx, rx) = crossbeam_channel::unbounded();
    collector.describe(&tx);
    drop(tx);
    rx.into_iter().collect()
}
