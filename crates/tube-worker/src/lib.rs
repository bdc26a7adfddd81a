pub mod config;
pub mod handler;
pub mod memory;
pub mod queue;
pub mod reporter;
pub mod shutdown;
pub mod worker;

pub use config::WorkerConfig;
pub use handler::{JobHandler, MessageHandler};
pub use memory::InMemoryQueue;
pub use queue::QueueClient;
pub use reporter::{LogReporter, Reporter};
pub use shutdown::ShutdownFlag;
pub use worker::{WorkerLoop, WorkerOptions, WorkerState};
