//! Runs one blocking request on a worker thread and hands its outcome back
//! to the interactive loop exactly once.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use crate::requester::{MessageSource, RequestError, RequestOutcome};

const WORKER_LOST: &str = "request worker terminated unexpectedly";

/// Handle to a request running in the background.
///
/// The outcome can be taken at most once.
#[derive(Debug)]
pub struct PendingRequest {
    receiver: Option<Receiver<RequestOutcome>>,
}

impl PendingRequest {
    /// Non-blocking check for the outcome.
    ///
    /// Returns `Some` once when the worker has finished, `None` while it is
    /// still running and on every call after the outcome was taken.
    pub fn try_outcome(&mut self) -> Option<RequestOutcome> {
        let receiver = self.receiver.as_ref()?;
        let outcome = match receiver.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(RequestError::Unknown(WORKER_LOST.to_string())),
        };
        self.receiver = None;
        Some(outcome)
    }

    /// Block until the worker delivers its outcome.
    pub fn wait(mut self) -> RequestOutcome {
        match self.receiver.take() {
            Some(receiver) => receiver
                .recv()
                .unwrap_or_else(|_| Err(RequestError::Unknown(WORKER_LOST.to_string()))),
            None => Err(RequestError::Unknown("outcome already taken".to_string())),
        }
    }
}

/// Start `source.request_message(words)` on its own thread.
pub fn spawn_request(source: Arc<dyn MessageSource>, words: Vec<String>) -> PendingRequest {
    let (sender, receiver) = mpsc::sync_channel(1);

    let spawned = thread::Builder::new()
        .name("godstring-request".to_string())
        .spawn(move || {
            let outcome = source.request_message(&words);
            // The loop may have exited already; nobody is left to tell.
            let _ = sender.send(outcome);
        });

    if let Err(e) = spawned {
        log::error!("failed to spawn request worker: {e}");
        // The closure and its sender are dropped, so the receiver reports
        // a disconnected worker.
    }

    PendingRequest {
        receiver: Some(receiver),
    }
}
