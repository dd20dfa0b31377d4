//! Background document loading with last-load-wins semantics.
//!
//! Every load gets a [`LoadTicket`] carrying a generation number. Workers
//! parse on their own thread and push completions into a shared queue; the
//! viewer drains the queue on its own thread and drops any completion whose
//! generation is no longer the newest.
//!
//! A panicking engine still produces a completion, so a load never leaves
//! the viewer stuck in `Loading`.

use super::options::DocumentSource;
use crate::document::{DocumentEngine, LoadedDocument};
use crate::error::{DocumentError, DocumentResult};
use parking_lot::Mutex;
use std::any::Any;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use tracing::{debug, error};

/// Identifies one load request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

pub(crate) struct LoadCompletion {
    pub ticket: LoadTicket,
    pub result: DocumentResult<Box<dyn LoadedDocument>>,
}

/// Read and parse `source`. An engine panic becomes a parse error.
pub(crate) fn read_and_parse(
    engine: &dyn DocumentEngine,
    source: DocumentSource,
) -> DocumentResult<Box<dyn LoadedDocument>> {
    let bytes = source.read()?;
    panic::catch_unwind(AssertUnwindSafe(|| engine.parse(bytes))).unwrap_or_else(|payload| {
        let message = panic_message(payload.as_ref());
        error!("document engine panicked: {}", message);
        Err(DocumentError::Parse(format!("parser panicked: {}", message)))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[derive(Default)]
pub(crate) struct BackgroundLoader {
    generation: u64,
    completed: Arc<Mutex<VecDeque<LoadCompletion>>>,
    in_flight: usize,
}

impl BackgroundLoader {
    /// Start a new generation, making every earlier ticket stale.
    pub fn next_ticket(&mut self) -> LoadTicket {
        self.generation += 1;
        LoadTicket {
            generation: self.generation,
        }
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Make all outstanding tickets stale.
    pub fn invalidate(&mut self) {
        self.generation += 1;
    }

    /// Read and parse `source` on a worker thread.
    pub fn spawn(&mut self, ticket: LoadTicket, engine: Arc<dyn DocumentEngine>, source: DocumentSource) {
        let queue = Arc::clone(&self.completed);
        let task = move || {
            let result = read_and_parse(engine.as_ref(), source);
            queue.lock().push_back(LoadCompletion { ticket, result });
        };

        self.in_flight += 1;
        let spawned = thread::Builder::new()
            .name(format!("fieldboard-load-{}", ticket.generation))
            .spawn(task);
        if let Err(e) = spawned {
            error!("failed to spawn load worker: {}", e);
            self.completed.lock().push_back(LoadCompletion {
                ticket,
                result: Err(e.into()),
            });
        }
    }

    /// Take every completion that arrived since the last call.
    pub fn drain(&mut self) -> Vec<LoadCompletion> {
        let drained: Vec<_> = self.completed.lock().drain(..).collect();
        self.in_flight = self.in_flight.saturating_sub(drained.len());
        if !drained.is_empty() {
            debug!(count = drained.len(), pending = self.in_flight, "drained load completions");
        }
        drained
    }

    /// Loads started but not yet drained
    pub fn pending_count(&self) -> usize {
        self.in_flight
    }
}
