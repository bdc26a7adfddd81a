mod error;
mod job;
mod outcome;

pub use error::{ProcessingError, QueueError, Result};
pub use job::{Job, JobId, JobPayload, ReservationId};
pub use outcome::Outcome;
