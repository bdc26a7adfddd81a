/// Acknowledgment decision for a processed job.
///
/// Exactly one outcome is produced per reserved job — never zero, never
/// multiple. The worker loop maps each variant to the matching queue call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Job completed, remove it permanently
    Delete,
    /// Job is invalid or failed fatally, quarantine it for inspection
    Bury,
    /// Transient failure, return the job to the ready queue for retry
    Release,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Delete => "delete",
            Outcome::Bury => "bury",
            Outcome::Release => "release",
        }
    }
}
