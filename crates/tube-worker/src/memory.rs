use crate::queue::QueueClient;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::{sleep_until, Instant};
use tube_worker_core::{Job, JobId, JobPayload, QueueError, ReservationId, Result};
use uuid::Uuid;

/// Tube watched by fresh clients until `watch_only` replaces the set
pub const DEFAULT_TUBE: &str = "default";

/// In-memory queue for development and tests.
///
/// Jobs live in per-tube FIFO deques. Reserving moves a job into the
/// reservation map under a freshly minted token; delete/bury/release verify
/// that token and fail with `NotReserved` otherwise, matching what a real
/// broker enforces. A real deployment swaps this for a transport-backed
/// [`QueueClient`].
pub struct InMemoryQueue {
    inner: Mutex<Inner>,
    notify: Notify,
}

struct Inner {
    next_id: JobId,
    ready: HashMap<String, VecDeque<StoredJob>>,
    watched: Vec<String>,
    reserved: HashMap<JobId, Reservation>,
    buried: Vec<StoredJob>,
}

struct StoredJob {
    id: JobId,
    payload: JobPayload,
    tube: String,
}

struct Reservation {
    token: ReservationId,
    job: StoredJob,
}

impl InMemoryQueue {
    pub fn new() -> Self {
        InMemoryQueue {
            inner: Mutex::new(Inner {
                next_id: 1,
                ready: HashMap::new(),
                watched: vec![DEFAULT_TUBE.to_string()],
                reserved: HashMap::new(),
                buried: Vec::new(),
            }),
            notify: Notify::new(),
        }
    }

    /// Enqueue a job on the default tube
    pub fn put(&self, payload: impl Into<JobPayload>) -> JobId {
        self.put_in_tube(DEFAULT_TUBE, payload)
    }

    /// Enqueue a job on a named tube
    pub fn put_in_tube(&self, tube: &str, payload: impl Into<JobPayload>) -> JobId {
        let id = {
            let mut inner = self.inner.lock();
            let id = inner.next_id;
            inner.next_id += 1;
            inner
                .ready
                .entry(tube.to_string())
                .or_default()
                .push_back(StoredJob {
                    id,
                    payload: payload.into(),
                    tube: tube.to_string(),
                });
            id
        };
        self.notify.notify_one();
        id
    }

    /// Jobs currently ready across all tubes
    pub fn ready_count(&self) -> usize {
        let inner = self.inner.lock();
        inner.ready.values().map(|q| q.len()).sum()
    }

    /// Jobs currently reserved and awaiting acknowledgment
    pub fn reserved_count(&self) -> usize {
        self.inner.lock().reserved.len()
    }

    /// Identifiers of quarantined jobs, in burial order
    pub fn buried_ids(&self) -> Vec<JobId> {
        self.inner.lock().buried.iter().map(|j| j.id).collect()
    }

    fn try_reserve(&self) -> Option<Job> {
        let mut inner = self.inner.lock();
        let tube = inner
            .watched
            .iter()
            .find(|t| inner.ready.get(*t).is_some_and(|q| !q.is_empty()))?
            .clone();

        let stored = inner.ready.get_mut(&tube)?.pop_front()?;
        let token = Uuid::new_v4();
        let job = Job::new(stored.id, stored.payload.clone(), token);
        inner.reserved.insert(stored.id, Reservation { token, job: stored });
        Some(job)
    }

    fn take_reserved(&self, job: &Job) -> Result<StoredJob> {
        let mut inner = self.inner.lock();
        match inner.reserved.entry(job.id) {
            Entry::Occupied(entry) if entry.get().token == job.reservation => {
                Ok(entry.remove().job)
            }
            _ => Err(QueueError::NotReserved(job.id)),
        }
    }
}

impl Default for InMemoryQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QueueClient for InMemoryQueue {
    async fn watch_only(&self, tube: &str) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.watched = vec![tube.to_string()];
        Ok(())
    }

    async fn reserve(&self, timeout: Duration) -> Result<Option<Job>> {
        let deadline = Instant::now() + timeout;

        loop {
            // Grab the wakeup future before checking, so a put that lands
            // between the check and the await is not missed.
            let notified = self.notify.notified();

            if let Some(job) = self.try_reserve() {
                return Ok(Some(job));
            }

            tokio::select! {
                _ = notified => {}
                _ = sleep_until(deadline) => return Ok(None),
            }
        }
    }

    async fn delete(&self, job: &Job) -> Result<()> {
        self.take_reserved(job)?;
        Ok(())
    }

    async fn bury(&self, job: &Job) -> Result<()> {
        let stored = self.take_reserved(job)?;
        self.inner.lock().buried.push(stored);
        Ok(())
    }

    async fn release(&self, job: &Job) -> Result<()> {
        let stored = self.take_reserved(job)?;
        {
            let mut inner = self.inner.lock();
            let tube = stored.tube.clone();
            inner.ready.entry(tube).or_default().push_back(stored);
        }
        self.notify.notify_one();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_and_reserve_fifo() {
        let queue = InMemoryQueue::new();
        let first = queue.put(b"one".to_vec());
        let second = queue.put(b"two".to_vec());

        let job1 = queue.reserve(Duration::from_millis(10)).await.unwrap().unwrap();
        let job2 = queue.reserve(Duration::from_millis(10)).await.unwrap().unwrap();

        assert_eq!(job1.id, first);
        assert_eq!(job2.id, second);
        assert_eq!(job1.payload, b"one");
    }

    #[tokio::test]
    async fn test_reserve_times_out_when_empty() {
        let queue = InMemoryQueue::new();
        let result = queue.reserve(Duration::from_millis(20)).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_watch_only_is_exclusive() {
        let queue = InMemoryQueue::new();
        queue.put(b"default job".to_vec());
        let wanted = queue.put_in_tube("emails", b"email job".to_vec());

        queue.watch_only("emails").await.unwrap();

        let job = queue.reserve(Duration::from_millis(10)).await.unwrap().unwrap();
        assert_eq!(job.id, wanted);

        // The default tube is no longer watched
        let none = queue.reserve(Duration::from_millis(10)).await.unwrap();
        assert!(none.is_none());
        assert_eq!(queue.ready_count(), 1);
    }

    #[tokio::test]
    async fn test_delete_removes_job() {
        let queue = InMemoryQueue::new();
        queue.put(b"data".to_vec());

        let job = queue.reserve(Duration::from_millis(10)).await.unwrap().unwrap();
        queue.delete(&job).await.unwrap();

        assert_eq!(queue.ready_count(), 0);
        assert_eq!(queue.reserved_count(), 0);
        assert!(queue.buried_ids().is_empty());
    }

    #[tokio::test]
    async fn test_bury_quarantines_job() {
        let queue = InMemoryQueue::new();
        let id = queue.put(b"data".to_vec());

        let job = queue.reserve(Duration::from_millis(10)).await.unwrap().unwrap();
        queue.bury(&job).await.unwrap();

        assert_eq!(queue.buried_ids(), vec![id]);
        // Buried jobs are out of the ready rotation
        let none = queue.reserve(Duration::from_millis(10)).await.unwrap();
        assert!(none.is_none());
    }

    #[tokio::test]
    async fn test_release_requeues_job() {
        let queue = InMemoryQueue::new();
        let id = queue.put(b"data".to_vec());

        let job = queue.reserve(Duration::from_millis(10)).await.unwrap().unwrap();
        queue.release(&job).await.unwrap();

        let again = queue.reserve(Duration::from_millis(10)).await.unwrap().unwrap();
        assert_eq!(again.id, id);
        // Redelivery carries a fresh reservation token
        assert_ne!(again.reservation, job.reservation);
    }

    #[tokio::test]
    async fn test_acknowledge_unreserved_job_fails() {
        let queue = InMemoryQueue::new();
        queue.put(b"data".to_vec());

        let job = queue.reserve(Duration::from_millis(10)).await.unwrap().unwrap();
        queue.delete(&job).await.unwrap();

        let err = queue.delete(&job).await.unwrap_err();
        assert!(matches!(err, QueueError::NotReserved(id) if id == job.id));
    }

    #[tokio::test]
    async fn test_reserve_wakes_on_put() {
        use std::sync::Arc;

        let queue = Arc::new(InMemoryQueue::new());
        let reserver = {
            let queue = queue.clone();
            tokio::spawn(async move { queue.reserve(Duration::from_secs(5)).await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        let id = queue.put(b"late arrival".to_vec());

        let job = reserver.await.unwrap().unwrap().unwrap();
        assert_eq!(job.id, id);
    }
}
