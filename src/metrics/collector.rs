//! Collector capability
//!
//! A collector owns a fixed set of instruments. The registry calls
//! [`Collector::describe`] once at registration and [`Collector::collect`]
//! on every scrape; both stream into a channel owned by the caller.

use std::sync::Arc;

use crossbeam_channel::Sender;

use super::desc::Desc;
use super::instrument::{Instrument, Sample};

pub trait Collector: Send + Sync {
    /// Send the descriptor of every owned instrument, in declaration order.
    /// Must not compute values.
    fn describe(&self, descs: &Sender<Arc<Desc>>);

    /// Refresh the owned instruments, then send their samples.
    /// Runs to completion before returning.
    fn collect(&self, samples: &Sender<Sample>);
}

/// A bare instrument is a collector of itself.
impl<T: Instrument> Collector for T {
    fn describe(&self, descs: &Sender<Arc<Desc>>) {
        describe_instrument(self, descs);
    }

    fn collect(&self, samples: &Sender<Sample>) {
        collect_instrument(self, samples);
    }
}

/// Forward an instrument's descriptor.
pub fn describe_instrument(instrument: &dyn Instrument, descs: &Sender<Arc<Desc>>) {
    // The registry keeps the receiver alive for the whole call.
    let _ = descs.send(Arc::clone(instrument.desc()));
}

/// Forward an instrument's current samples.
pub fn collect_instrument(instrument: &dyn Instrument, samples: &Sender<Sample>) {
    for sample in Instrument::collect(instrument) {
        if samples.send(sample).is_err() {
            return;
        }
    }
}
