use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Tube to watch exclusively; `None` keeps the client's default watch set
    pub tube: Option<String>,

    /// Seconds before the worker retires itself; 0 runs indefinitely
    pub ttl_secs: u64,

    /// Bounded wait per reservation attempt. Also bounds how long a
    /// termination request can go unnoticed while the queue is idle.
    pub reserve_timeout_secs: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        WorkerConfig {
            tube: None,
            ttl_secs: 3600,
            reserve_timeout_secs: 5,
        }
    }
}

impl WorkerConfig {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: WorkerConfig = serde_yaml::from_str(&contents)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = WorkerConfig::default();
        assert_eq!(config.tube, None);
        assert_eq!(config.ttl_secs, 3600);
        assert_eq!(config.reserve_timeout_secs, 5);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "tube: emails").unwrap();
        writeln!(file, "ttl_secs: 120").unwrap();
        writeln!(file, "reserve_timeout_secs: 2").unwrap();

        let config = WorkerConfig::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.tube.as_deref(), Some("emails"));
        assert_eq!(config.ttl_secs, 120);
        assert_eq!(config.reserve_timeout_secs, 2);
    }
}
