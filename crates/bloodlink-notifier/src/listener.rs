//! Event listener that subscribes to blood-request creation events from
//! the job queue and drives the notification fan-out.

use crate::service::NotifierService;
use bloodlink_core::{Job, JobQueue};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Listens for request-created jobs and hands them to the notifier.
///
/// Constructed once at startup with explicit dependencies; there is no
/// lazily-initialized global state.
pub struct RequestEventListener {
    notifier: Arc<NotifierService>,
    queue: Arc<dyn JobQueue>,
    running: Arc<RwLock<bool>>,
    task_handle: Arc<RwLock<Option<JoinHandle<()>>>>,
}

impl RequestEventListener {
    pub fn new(notifier: Arc<NotifierService>, queue: Arc<dyn JobQueue>) -> Self {
        Self {
            notifier,
            queue,
            running: Arc::new(RwLock::new(false)),
            task_handle: Arc::new(RwLock::new(None)),
        }
    }

    /// Start listening to request events from the queue
    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut running = self.running.write().await;
        if *running {
            info!("✅ Request event listener already running");
            return Ok(());
        }
        *running = true;
        drop(running);

        info!("🚀 Starting request event listener");

        let mut receiver = self.queue.subscribe();
        let notifier = self.notifier.clone();
        let running = self.running.clone();

        let handle = tokio::spawn(async move {
            while *running.read().await {
                match receiver.recv().await {
                    Ok(job) => {
                        debug!("📨 Received job from queue: {}", job);
                        Self::process_job(&notifier, &job).await;
                    }
                    Err(e) => {
                        error!("⚠️ Failed to receive job from queue: {}", e);
                        // Continue loop to keep trying
                        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
                    }
                }
            }
            info!("🛑 Request event listener task stopped");
        });

        *self.task_handle.write().await = Some(handle);

        info!("✅ Request event listener started successfully");
        Ok(())
    }

    /// Stop the event listener
    pub async fn stop(&self) {
        let mut running = self.running.write().await;
        *running = false;
        drop(running);

        if let Some(handle) = self.task_handle.write().await.take() {
            handle.abort();
            let _ = handle.await;
        }

        info!("Stopped request event listener");
    }

    /// Check if the listener is running
    pub async fn is_running(&self) -> bool {
        *self.running.read().await
    }

    /// Process a single job. The notifier reacts only to creation events;
    /// status changes and donor registrations are ignored.
    async fn process_job(notifier: &NotifierService, job: &Job) {
        match job {
            Job::BloodRequestCreated(event) => {
                debug!(
                    "Processing BloodRequestCreated event for request {}",
                    event.request_id
                );
                match notifier.notify_donors(event).await {
                    Ok(summary) => {
                        debug!(
                            "Fan-out for request {} complete: {} notified, {} skipped, {} failed",
                            event.request_id,
                            summary.notified,
                            summary.skipped_no_email,
                            summary.failed
                        );
                    }
                    Err(e) => {
                        // Terminal for this invocation; nothing was written.
                        error!(
                            "❌ Donor lookup failed for request {}: {}",
                            event.request_id, e
                        );
                    }
                }
            }
            _ => {
                // Ignore other job types
            }
        }
    }
}
