use crate::config::WorkerConfig;
use crate::handler::JobHandler;
use crate::queue::QueueClient;
use crate::reporter::Reporter;
use crate::shutdown::ShutdownFlag;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tube_worker_core::{Job, Outcome, Result};

/// Lifecycle state of a worker loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Reserving and processing jobs
    Running,
    /// Stop requested; finishing the in-flight job, no new reservations
    Terminating,
    /// Loop has exited
    Stopped,
}

/// Runtime options for one worker loop
#[derive(Debug, Clone)]
pub struct WorkerOptions {
    /// Tube to watch exclusively; `None` keeps the client's default watch set
    pub tube: Option<String>,

    /// How long the worker runs before retiring itself; zero means forever
    pub ttl: Duration,

    /// Bounded wait per reservation attempt
    pub reserve_timeout: Duration,
}

impl From<&WorkerConfig> for WorkerOptions {
    fn from(config: &WorkerConfig) -> Self {
        WorkerOptions {
            tube: config.tube.clone(),
            ttl: Duration::from_secs(config.ttl_secs),
            reserve_timeout: Duration::from_secs(config.reserve_timeout_secs),
        }
    }
}

/// Drives the reserve–validate–process–acknowledge cycle until told to stop.
///
/// Single job in flight at a time; every reserved job receives exactly one
/// acknowledgment (delete, bury, or release) before the loop checks whether
/// it should keep going. Termination is cooperative: the shared
/// [`ShutdownFlag`] is polled before each reservation attempt and never
/// interrupts an in-progress job.
pub struct WorkerLoop {
    queue: Arc<dyn QueueClient>,
    handler: Arc<dyn JobHandler>,
    reporter: Arc<dyn Reporter>,
    options: WorkerOptions,
    shutdown: ShutdownFlag,
    state: WorkerState,
}

impl WorkerLoop {
    pub fn new(
        queue: Arc<dyn QueueClient>,
        handler: Arc<dyn JobHandler>,
        reporter: Arc<dyn Reporter>,
        options: WorkerOptions,
        shutdown: ShutdownFlag,
    ) -> Self {
        WorkerLoop {
            queue,
            handler,
            reporter,
            options,
            shutdown,
            state: WorkerState::Running,
        }
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Run until a termination request or TTL retirement.
    ///
    /// Queue errors are not recovered here; they propagate and are fatal to
    /// the process.
    pub async fn run(&mut self) -> Result<()> {
        if let Some(tube) = self.options.tube.clone() {
            self.queue.watch_only(&tube).await?;
        }

        self.reporter.info("Watching queue");

        // Computed once; immutable for the life of the loop
        let deadline = if self.options.ttl.is_zero() {
            None
        } else {
            Some(Instant::now() + self.options.ttl)
        };

        self.state = WorkerState::Running;

        loop {
            if self.shutdown.is_requested() {
                self.state = WorkerState::Terminating;
            }
            if self.state != WorkerState::Running {
                break;
            }

            if let Some(job) = self.queue.reserve(self.options.reserve_timeout).await? {
                self.handle(&job).await?;
            }

            if self.state == WorkerState::Running {
                if let Some(deadline) = deadline {
                    if Instant::now() >= deadline {
                        self.reporter.info("Worker TTL reached, retiring");
                        self.state = WorkerState::Terminating;
                    }
                }
            }
        }

        self.state = WorkerState::Stopped;
        self.reporter.info("Stopping worker");
        Ok(())
    }

    async fn handle(&mut self, job: &Job) -> Result<()> {
        self.reporter.comment(&format!("Found job id: {}", job.id));

        let outcome = if !self.handler.is_valid(job) {
            self.reporter.comment("Invalid job, skipping");
            Some(Outcome::Bury)
        } else {
            self.reporter.comment(&self.handler.start_message(job));

            match self.handler.process(job).await {
                Ok(outcome) => {
                    self.reporter.comment("Job processed");
                    Some(outcome)
                }
                Err(err) => {
                    // A processing failure buries the job and stops the
                    // whole worker, not just the job. Preserved policy; a
                    // transient/fatal split would replace this branch.
                    self.reporter.error(&format!("Processing failed: {}", err));
                    self.queue.bury(job).await?;
                    self.state = WorkerState::Terminating;
                    None
                }
            }
        };

        // The error path above has already buried the job; everything else
        // gets exactly one acknowledgment here.
        if let Some(outcome) = outcome {
            self.acknowledge(job, outcome).await?;
            self.reporter.info("Waiting for next job...");
        }

        Ok(())
    }

    async fn acknowledge(&self, job: &Job, outcome: Outcome) -> Result<()> {
        match outcome {
            Outcome::Delete => self.queue.delete(job).await,
            Outcome::Bury => self.queue.bury(job).await,
            Outcome::Release => self.queue.release(job).await,
        }
    }
}
