//! Serial print queue.
//!
//! Tasks are queued in order and drained by a single loop. A second `drain`
//! while one is running returns immediately: the running loop re-reads the
//! queue after every task and picks up whatever was added meanwhile.

use std::collections::VecDeque;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use super::PrintError;

/// One queued unit of output.
///
/// The future is not polled until the sequencer reaches the task.
pub struct PrintTask {
    label: String,
    future: BoxFuture<'static, Result<(), PrintError>>,
}

impl PrintTask {
    pub fn new(label: impl Into<String>, future: impl Future<Output = ()> + Send + 'static) -> Self {
        Self::fallible(label, future.map(Ok))
    }

    /// A task whose failure is reported to the sequencer.
    pub fn fallible(
        label: impl Into<String>,
        future: impl Future<Output = Result<(), PrintError>> + Send + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            future: future.boxed(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl std::fmt::Debug for PrintTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrintTask").field("label", &self.label).finish()
    }
}

#[derive(Debug, Default)]
struct QueueState {
    pending: VecDeque<PrintTask>,
    /// True while a drain loop is executing
    running: bool,
}

#[derive(Debug, Default)]
struct Inner {
    state: Mutex<QueueState>,
    idle: Notify,
}

/// Runs print tasks one at a time, in submission order.
#[derive(Debug, Clone, Default)]
pub struct Sequencer {
    inner: Arc<Inner>,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a task to the queue.
    pub fn enqueue(&self, task: PrintTask) {
        trace!(task = task.label(), "print task queued");
        self.inner.state.lock().pending.push_back(task);
    }

    /// Drop every pending task. A task that is already running is left alone.
    ///
    /// Returns the number of discarded tasks.
    pub fn reset(&self) -> usize {
        let discarded = {
            let mut state = self.inner.state.lock();
            let discarded = state.pending.len();
            state.pending.clear();
            discarded
        };
        if discarded > 0 {
            debug!(discarded, "print queue reset");
        }
        self.inner.idle.notify_waiters();
        discarded
    }

    pub fn pending(&self) -> usize {
        self.inner.state.lock().pending.len()
    }

    pub fn is_running(&self) -> bool {
        self.inner.state.lock().running
    }

    /// Run queued tasks until the queue is empty.
    ///
    /// No-op when another drain is already running or nothing is queued.
    /// Failed or panicking tasks are logged and skipped.
    pub async fn drain(&self) {
        {
            let mut state = self.inner.state.lock();
            if state.running || state.pending.is_empty() {
                return;
            }
            state.running = true;
        }
        let mut guard = DrainGuard {
            inner: &self.inner,
            armed: true,
        };

        loop {
            let task = {
                let mut state = self.inner.state.lock();
                match state.pending.pop_front() {
                    Some(task) => task,
                    None => {
                        state.running = false;
                        guard.armed = false;
                        break;
                    }
                }
            };

            let PrintTask { label, future } = task;
            let result = match AssertUnwindSafe(future).catch_unwind().await {
                Ok(result) => result,
                Err(panic) => Err(PrintError::Panicked(panic_message(panic.as_ref()))),
            };
            match result {
                Ok(()) => trace!(task = %label, "print task done"),
                Err(e) => warn!(task = %label, error = %e, "print task failed"),
            }
        }
    }

    /// Spawn a drain onto the current tokio runtime.
    pub fn start(&self) -> JoinHandle<()> {
        let sequencer = self.clone();
        tokio::spawn(async move { sequencer.drain().await })
    }

    /// Wait until nothing is queued and no drain is running.
    ///
    /// Drains in place if tasks are queued but nobody is draining them.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.inner.idle.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            let (running, pending) = {
                let state = self.inner.state.lock();
                (state.running, state.pending.len())
            };
            match (running, pending) {
                (false, 0) => return,
                (false, _) => self.drain().await,
                (true, _) => notified.await,
            }
        }
    }
}

/// Ends a drain: clears the running flag if the loop did not, then wakes
/// `wait_idle`. Runs when the drain future is dropped mid-task as well.
struct DrainGuard<'a> {
    inner: &'a Inner,
    /// Still owns the running flag
    armed: bool,
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            debug!("drain dropped while a task was running");
            self.inner.state.lock().running = false;
        }
        self.inner.idle.notify_waiters();
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
