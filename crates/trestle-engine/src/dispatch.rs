//! Serialized script dispatch.
//!
//! The automation target supports no concurrent sessions: one worker thread
//! owns the sink and executes jobs in submission order. Callers block on a
//! per-job reply channel under the configured timeout. Cancellation is
//! advisory — a running call cannot be interrupted, so a timed-out caller
//! walks away, and the late result is discarded when the worker finds the
//! receiver gone. A job abandoned while still queued is skipped before it
//! ever reaches the sink.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::debug;

use trestle_core::errors::{TrestleError, TrestleResult};
use trestle_core::traits::{AutomationSink, SinkError};

use crate::classify::classify;

struct Job {
    source: String,
    reply: Sender<Result<String, SinkError>>,
    abandoned: Arc<AtomicBool>,
}

/// Owns the worker thread and the submission side of the job queue.
///
/// `run` may be called from any thread; the worker applies the calls to the
/// sink strictly one at a time, in submission order.
pub struct Dispatcher {
    jobs: Option<Sender<Job>>,
    worker: Option<JoinHandle<()>>,
    timeout_ms: u64,
}

impl Dispatcher {
    /// Spawn the worker around the injected sink.
    pub fn new(sink: Arc<dyn AutomationSink>, timeout_ms: u64) -> Self {
        let (jobs, queue) = mpsc::channel::<Job>();
        let worker = thread::spawn(move || Self::worker_loop(sink, queue));
        Self {
            jobs: Some(jobs),
            worker: Some(worker),
            timeout_ms,
        }
    }

    /// Wall-clock budget per dispatched call, in milliseconds.
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Execute one script and return its raw output.
    ///
    /// Blocks until the worker replies or the budget elapses. A timed-out
    /// call is abandoned, never retried — the script may still be running
    /// in the target, and a blind retry could duplicate a mutation. Sink
    /// transport failures come back classified into the taxonomy.
    pub fn run(&self, source: String) -> TrestleResult<String> {
        let Some(jobs) = self.jobs.as_ref() else {
            return Err(TrestleError::ExecutionError {
                reason: "dispatcher is shut down".to_owned(),
            });
        };

        let abandoned = Arc::new(AtomicBool::new(false));
        let (reply_tx, reply_rx) = mpsc::channel();
        jobs.send(Job {
            source,
            reply: reply_tx,
            abandoned: Arc::clone(&abandoned),
        })
        .map_err(|_| TrestleError::ExecutionError {
            reason: "dispatch worker has exited".to_owned(),
        })?;

        match reply_rx.recv_timeout(Duration::from_millis(self.timeout_ms)) {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(sink_error)) => Err(classify(&sink_error.message, self.timeout_ms)),
            Err(RecvTimeoutError::Timeout) => {
                abandoned.store(true, Ordering::SeqCst);
                debug!(timeout_ms = self.timeout_ms, "dispatch timed out, abandoning call");
                Err(TrestleError::ScriptTimeout {
                    timeout_ms: self.timeout_ms,
                })
            }
            Err(RecvTimeoutError::Disconnected) => Err(TrestleError::ExecutionError {
                reason: "dispatch worker exited before replying".to_owned(),
            }),
        }
    }

    fn worker_loop(sink: Arc<dyn AutomationSink>, queue: Receiver<Job>) {
        for job in queue {
            if job.abandoned.load(Ordering::SeqCst) {
                debug!("skipping job abandoned while queued");
                continue;
            }
            let outcome = sink.execute(&job.source);
            if job.reply.send(outcome).is_err() {
                // The caller timed out and dropped its receiver.
                debug!("discarding orphaned script result");
            }
        }
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        // Closing the queue lets the worker drain and exit.
        self.jobs.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
