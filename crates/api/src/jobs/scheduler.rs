//! Interval-driven runner for recurring background work.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

/// A unit of recurring background work.
#[async_trait::async_trait]
pub trait Job: Send + Sync + 'static {
    /// Name used in log lines.
    fn name(&self) -> &'static str;

    /// Time between runs. The first run happens one full interval after
    /// startup, never immediately.
    fn interval(&self) -> Duration;

    async fn run(&self) -> anyhow::Result<()>;
}

/// Owns one spawned task per job and a shared shutdown signal.
pub struct JobScheduler {
    jobs: Vec<Arc<dyn Job>>,
    handles: Vec<JoinHandle<()>>,
    shutdown: watch::Sender<bool>,
}

impl JobScheduler {
    pub fn new() -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            jobs: Vec::new(),
            handles: Vec::new(),
            shutdown,
        }
    }

    pub fn register<J: Job>(&mut self, job: J) {
        self.jobs.push(Arc::new(job));
    }

    /// Spawn one task per registered job.
    pub fn start(&mut self) {
        info!(jobs = self.jobs.len(), "Starting background jobs");
        for job in self.jobs.drain(..) {
            let rx = self.shutdown.subscribe();
            self.handles.push(tokio::spawn(drive(job, rx)));
        }
    }

    /// Tell all job tasks to stop. Returns without waiting.
    pub fn shutdown(&self) {
        let _ = self.shutdown.send(true);
    }

    /// Wait for every job task to exit, up to `timeout`.
    pub async fn wait_for_shutdown(self, timeout: Duration) {
        let drain = async {
            for handle in self.handles {
                if let Err(e) = handle.await {
                    warn!("Job task panicked: {}", e);
                }
            }
        };

        if tokio::time::timeout(timeout, drain).await.is_err() {
            warn!("Jobs still running after {:?}, abandoning them", timeout);
        }
    }
}

impl Default for JobScheduler {
    fn default() -> Self {
        Self::new()
    }
}

async fn drive(job: Arc<dyn Job>, mut shutdown: watch::Receiver<bool>) {
    let mut ticker = tokio::time::interval(job.interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The interval fires once at zero; swallow it so runs start one full
    // interval in.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let started = std::time::Instant::now();
                match job.run().await {
                    Ok(()) => info!(
                        job = job.name(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Job run finished"
                    ),
                    Err(e) => error!(job = job.name(), error = %e, "Job run failed"),
                }
            }
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    info!(job = job.name(), "Job stopping");
                    return;
                }
            }
        }
    }
}
