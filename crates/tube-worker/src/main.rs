use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tube_worker::memory::DEFAULT_TUBE;
use tube_worker::shutdown::spawn_signal_listener;
use tube_worker::{
    InMemoryQueue, LogReporter, MessageHandler, ShutdownFlag, WorkerConfig, WorkerLoop,
    WorkerOptions,
};

#[derive(Parser, Debug)]
#[command(name = "tube-worker")]
#[command(about = "Single-tube queue worker scaffold", long_about = None)]
struct Args {
    /// Tube to watch exclusively (default watch set if omitted)
    #[arg(short, long)]
    tube: Option<String>,

    /// Seconds before the worker retires itself (0 = run forever)
    #[arg(long)]
    ttl: Option<u64>,

    /// Seconds each reservation attempt waits for a job
    #[arg(long)]
    reserve_timeout: Option<u64>,

    /// Path to configuration file
    #[arg(long)]
    config: Option<String>,

    /// JSON payload to seed the demo queue with (repeatable)
    #[arg(long = "job", value_name = "JSON")]
    jobs: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let mut config = if let Some(config_path) = &args.config {
        WorkerConfig::from_file(config_path)?
    } else {
        WorkerConfig::default()
    };

    // Override with CLI args
    if let Some(tube) = args.tube {
        config.tube = Some(tube);
    }
    if let Some(ttl) = args.ttl {
        config.ttl_secs = ttl;
    }
    if let Some(reserve_timeout) = args.reserve_timeout {
        config.reserve_timeout_secs = reserve_timeout;
    }

    // The in-memory queue stands in for a broker connection, which is out
    // of scope here. Seed it from --job arguments so the example handler
    // has something to drain.
    let queue = Arc::new(InMemoryQueue::new());
    let seed_tube = config.tube.clone().unwrap_or_else(|| DEFAULT_TUBE.to_string());
    for payload in &args.jobs {
        let id = queue.put_in_tube(&seed_tube, payload.as_bytes().to_vec());
        tracing::info!("Seeded job {} on tube {}", id, seed_tube);
    }

    let shutdown = ShutdownFlag::new();
    spawn_signal_listener(shutdown.clone());

    let reporter = Arc::new(LogReporter);
    let handler = Arc::new(MessageHandler::new(reporter.clone()));
    let options = WorkerOptions::from(&config);

    let mut worker = WorkerLoop::new(queue, handler, reporter, options, shutdown);
    worker.run().await?;

    Ok(())
}
