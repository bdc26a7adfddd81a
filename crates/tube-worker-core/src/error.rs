use thiserror::Error;

use crate::JobId;

/// Queue transport failures.
///
/// Not recovered by the worker loop: a queue error propagates out of `run()`
/// and is fatal to the process. Reconnection belongs to the transport layer.
#[derive(Error, Debug)]
pub enum QueueError {
    #[error("job {0} is not reserved by this client")]
    NotReserved(JobId),

    #[error("transport error: {0}")]
    Transport(String),
}

/// Failure raised by a handler's `process` call.
///
/// The worker buries the job and stops on this error; see the worker loop
/// for the policy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ProcessingError {
    message: String,
}

impl ProcessingError {
    pub fn new(message: impl Into<String>) -> Self {
        ProcessingError {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub type Result<T> = std::result::Result<T, QueueError>;
