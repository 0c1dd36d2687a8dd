//! Multi-producer collection of output records.

use crossbeam_channel::{Receiver, Sender, unbounded};
use tracing::debug;

use super::Record;

/// Funnels records from every worker into one arrival-ordered collection.
///
/// Workers append through [`RecordSink`] handles. [`Aggregator::drain`]
/// returns only once every sink has been dropped, so it cannot observe a
/// worker that is still running.
pub struct Aggregator {
    tx: Sender<Record>,
    rx: Receiver<Record>,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl Aggregator {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    /// A producer handle for one worker.
    pub fn sink(&self) -> RecordSink {
        RecordSink {
            tx: self.tx.clone(),
        }
    }

    /// Block until every sink is gone and return all records, each exactly once.
    pub fn drain(self) -> Vec<Record> {
        let Self { tx, rx } = self;
        drop(tx);
        rx.iter().collect()
    }
}

/// Cloneable append handle held by a stream worker.
#[derive(Clone)]
pub struct RecordSink {
    tx: Sender<Record>,
}

impl RecordSink {
    /// Append a record. Never blocks on other writers.
    pub fn append(&self, record: Record) {
        if let Err(err) = self.tx.send(record) {
            debug!(source = err.0.source_id(), "aggregator gone, record dropped");
        }
    }
}
