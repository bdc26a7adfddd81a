use crate::reporter::Reporter;
use async_trait::async_trait;
use std::sync::Arc;
use tube_worker_core::{Job, Outcome, ProcessingError};

/// Capability contract for job handlers.
///
/// The worker loop owns the lifecycle; a handler only answers three
/// questions: is this payload something I can process, what should be
/// announced when processing starts, and what happened to the job.
#[async_trait]
pub trait JobHandler: Send + Sync {
    /// Check the job data is valid for this handler
    fn is_valid(&self, job: &Job) -> bool;

    /// Message to display when processing starts (display-only)
    fn start_message(&self, job: &Job) -> String;

    /// Process the job, deciding its acknowledgment outcome
    async fn process(&self, job: &Job) -> std::result::Result<Outcome, ProcessingError>;
}

/// Example handler that prints a message carried in a JSON payload.
///
/// Payload shape: `{"message": "..."}`. A payload whose message is the
/// literal `"error"` fails processing, exercising the bury-and-stop path.
pub struct MessageHandler {
    reporter: Arc<dyn Reporter>,
}

impl MessageHandler {
    pub fn new(reporter: Arc<dyn Reporter>) -> Self {
        MessageHandler { reporter }
    }

    fn message_of(job: &Job) -> Option<String> {
        let value: serde_json::Value = serde_json::from_slice(&job.payload).ok()?;
        value.get("message")?.as_str().map(|s| s.to_string())
    }
}

#[async_trait]
impl JobHandler for MessageHandler {
    fn is_valid(&self, job: &Job) -> bool {
        Self::message_of(job).is_some()
    }

    fn start_message(&self, _job: &Job) -> String {
        "Starting send message job".to_string()
    }

    async fn process(&self, job: &Job) -> std::result::Result<Outcome, ProcessingError> {
        let message =
            Self::message_of(job).ok_or_else(|| ProcessingError::new("payload has no message"))?;

        if message == "error" {
            return Err(ProcessingError::new("example error thrown from worker"));
        }

        self.reporter.comment(&message);
        Ok(Outcome::Delete)
    }
}
