use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a job, assigned by the queue
pub type JobId = u64;

/// Job payload (arbitrary bytes)
pub type JobPayload = Vec<u8>;

/// Opaque token proving a reservation, minted by the queue at reserve time.
/// Acknowledgment calls (delete/bury/release) require it.
pub type ReservationId = Uuid;

/// A reserved job handed to the worker for processing.
///
/// Owned exclusively by the worker loop between reservation and
/// acknowledgment; no other component holds or mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Queue-assigned identifier
    pub id: JobId,

    /// Job payload (arbitrary bytes; handlers decide the encoding)
    pub payload: JobPayload,

    /// Reservation token for this delivery
    pub reservation: ReservationId,
}

impl Job {
    pub fn new(id: JobId, payload: JobPayload, reservation: ReservationId) -> Self {
        Job {
            id,
            payload,
            reservation,
        }
    }

    /// Payload as UTF-8, lossy. Display-only convenience for reporting.
    pub fn payload_lossy(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }
}
