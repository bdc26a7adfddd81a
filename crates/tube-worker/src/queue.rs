use async_trait::async_trait;
use std::time::Duration;
use tube_worker_core::{Job, Result};

/// Client-side view of the queue, consumed by the worker loop.
///
/// The transport behind it (wire protocol, connection handling, retries) is
/// not modeled here; implementations surface failures as
/// [`QueueError::Transport`](tube_worker_core::QueueError).
///
/// A client connection is owned by exactly one worker loop — implementations
/// may assume no concurrent callers.
#[async_trait]
pub trait QueueClient: Send + Sync {
    /// Restrict subsequent reservations to this tube exclusively, dropping
    /// any previously watched tubes.
    async fn watch_only(&self, tube: &str) -> Result<()>;

    /// Reserve the next ready job, waiting up to `timeout` for one to
    /// arrive. Returns `None` if the timeout elapses with nothing ready.
    async fn reserve(&self, timeout: Duration) -> Result<Option<Job>>;

    /// Permanently remove a reserved job. Fails with `NotReserved` if the
    /// job is not currently reserved by this client.
    async fn delete(&self, job: &Job) -> Result<()>;

    /// Quarantine a reserved job, taking it out of the ready rotation for
    /// manual inspection.
    async fn bury(&self, job: &Job) -> Result<()>;

    /// Return a reserved job to the ready queue for redelivery.
    async fn release(&self, job: &Job) -> Result<()>;
}
