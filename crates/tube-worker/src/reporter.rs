use tracing::{error, info};

/// Sink for human-readable progress lines.
///
/// Pure output: implementations must never fail. The worker loop routes all
/// of its operator-facing output through this trait so alternative sinks
/// (and tests) can capture it.
pub trait Reporter: Send + Sync {
    /// Lifecycle-level line (watching, stopping)
    fn info(&self, text: &str);

    /// Per-job progress line
    fn comment(&self, text: &str);

    /// Failure line
    fn error(&self, text: &str);
}

/// Reporter backed by the `tracing` stack
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn info(&self, text: &str) {
        info!("{}", text);
    }

    fn comment(&self, text: &str) {
        info!("{}", text);
    }

    fn error(&self, text: &str) {
        error!("{}", text);
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Reporter;
    use parking_lot::Mutex;

    /// Captures reported lines for assertions
    pub struct RecordingReporter {
        lines: Mutex<Vec<String>>,
    }

    impl RecordingReporter {
        pub fn new() -> Self {
            RecordingReporter {
                lines: Mutex::new(Vec::new()),
            }
        }

        pub fn lines(&self) -> Vec<String> {
            self.lines.lock().clone()
        }
    }

    impl Reporter for RecordingReporter {
        fn info(&self, text: &str) {
            self.lines.lock().push(format!("info: {}", text));
        }

        fn comment(&self, text: &str) {
            self.lines.lock().push(format!("comment: {}", text));
        }

        fn error(&self, text: &str) {
            self.lines.lock().push(format!("error: {}", text));
        }
    }
}
