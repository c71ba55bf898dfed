//! Metric identity and label schema
//!
//! A [`Desc`] is the immutable description of one instrument: its
//! namespace, name, help text, kind and ordered label names. It is fixed at
//! construction and is what the registry uses for collision checks.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::errors::{ExporterError, Result};

/// Instrument kind as written on the `# TYPE` line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Counter,
    Gauge,
    Histogram,
}

impl MetricKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Counter => "counter",
            Self::Gauge => "gauge",
            Self::Histogram => "histogram",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity options: namespace, name and help text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    pub namespace: String,
    pub name: String,
    pub help: String,
}

impl Opts {
    pub fn new<N: Into<String>, H: Into<String>>(name: N, help: H) -> Self {
        Self {
            namespace: String::new(),
            name: name.into(),
            help: help.into(),
        }
    }

    pub fn namespace<S: Into<String>>(mut self, namespace: S) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// `namespace_name`, or just `name` when the namespace is empty
    pub fn fq_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}_{}", self.namespace, self.name)
        }
    }
}

/// Static schema of an instrument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Desc {
    opts: Opts,
    fq_name: String,
    kind: MetricKind,
    label_names: Vec<String>,
}

impl Desc {
    /// Build and validate a descriptor.
    ///
    /// Fails with `SchemaViolation` when the metric name or any label name is
    /// malformed, when a label name repeats, or when a histogram declares the
    /// reserved `le` label.
    pub fn new(opts: Opts, kind: MetricKind, label_names: &[&str]) -> Result<Self> {
        let fq_name = opts.fq_name();
        if !is_valid_metric_name(&fq_name) {
            return Err(ExporterError::schema_violation(format!(
                "'{}' is not a valid metric name",
                fq_name
            )));
        }

        let mut seen = HashSet::with_capacity(label_names.len());
        for label in label_names {
            if !is_valid_label_name(label) {
                return Err(ExporterError::schema_violation(format!(
                    "'{}' is not a valid label name for metric '{}'",
                    label, fq_name
                )));
            }
            if kind == MetricKind::Histogram && *label == "le" {
                return Err(ExporterError::schema_violation(format!(
                    "label name 'le' is reserved for histogram '{}'",
                    fq_name
                )));
            }
            if !seen.insert(*label) {
                return Err(ExporterError::schema_violation(format!(
                    "duplicate label name '{}' in metric '{}'",
                    label, fq_name
                )));
            }
        }

        Ok(Self {
            opts,
            fq_name,
            kind,
            label_names: label_names.iter().map(|s| s.to_string()).collect(),
        })
    }

    pub fn namespace(&self) -> &str {
        &self.opts.namespace
    }

    pub fn name(&self) -> &str {
        &self.opts.name
    }

    pub fn help(&self) -> &str {
        &self.opts.help
    }

    pub fn fq_name(&self) -> &str {
        &self.fq_name
    }

    pub fn kind(&self) -> MetricKind {
        self.kind
    }

    pub fn label_names(&self) -> &[String] {
        &self.label_names
    }

    /// Canonical storage key from positional label values.
    pub fn label_key(&self, values: &[&str]) -> Result<Vec<String>> {
        if values.len() != self.label_names.len() {
            return Err(ExporterError::schema_violation(format!(
                "metric '{}' expects {} label value(s) {:?}, got {}",
                self.fq_name,
                self.label_names.len(),
                self.label_names,
                values.len()
            )));
        }
        Ok(values.iter().map(|v| v.to_string()).collect())
    }

    /// Canonical storage key from a label map.
    ///
    /// The map must contain exactly the declared label names.
    pub fn label_key_from_map(&self, labels: &HashMap<&str, &str>) -> Result<Vec<String>> {
        if labels.len() != self.label_names.len() {
            return Err(ExporterError::schema_violation(format!(
                "metric '{}' expects labels {:?}, got {} label(s)",
                self.fq_name,
                self.label_names,
                labels.len()
            )));
        }

        self.label_names
            .iter()
            .map(|name| {
                labels.get(name.as_str()).map(|v| v.to_string()).ok_or_else(|| {
                    ExporterError::schema_violation(format!(
                        "metric '{}' is missing label '{}'",
                        self.fq_name, name
                    ))
                })
            })
            .collect()
    }
}

fn is_valid_metric_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

fn is_valid_label_name(name: &str) -> bool {
    if name.starts_with("__") {
        return false;
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
