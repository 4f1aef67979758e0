//! Serve command: wires the database, job queue, notification listener and
//! HTTP API together. All dependencies are constructed exactly once here
//! and injected explicitly.

use anyhow::Context;
use bloodlink_api::{configure_routes, ApiState};
use bloodlink_core::AppSettings;
use bloodlink_notifier::{NotifierService, RequestEventListener, SeaOrmMailOutbox};
use bloodlink_queue::BroadcastQueueService;
use clap::Args;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Args)]
pub struct ServeCommand {
    /// Address to bind the server to
    #[arg(long, default_value = "127.0.0.1:3000", env = "BLOODLINK_ADDRESS")]
    pub address: String,

    /// Database connection URL
    #[arg(long, env = "BLOODLINK_DATABASE_URL")]
    pub database_url: String,

    /// Organization name used in notification emails
    #[arg(long, default_value = "BloodLink", env = "BLOODLINK_ORG_NAME")]
    pub org_name: String,

    /// Broadcast queue capacity
    #[arg(long, default_value_t = 1000, env = "BLOODLINK_QUEUE_CAPACITY")]
    pub queue_capacity: usize,
}

impl ServeCommand {
    pub fn execute(self) -> anyhow::Result<()> {
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(self.run())
    }

    async fn run(self) -> anyhow::Result<()> {
        let settings = AppSettings::default()
            .with_org_name(self.org_name.clone())
            .with_queue_capacity(self.queue_capacity);

        info!("Initializing database connection...");
        let db = bloodlink_database::establish_connection(&self.database_url)
            .await
            .context("Failed to establish database connection")?;

        let (queue, keep_alive) =
            BroadcastQueueService::create_job_queue_arc_with_receiver(settings.queue_capacity);

        let outbox = Arc::new(SeaOrmMailOutbox::new(db.clone()));
        let notifier = Arc::new(NotifierService::new(
            db.clone(),
            outbox,
            settings.org_name.clone(),
        ));

        let listener = RequestEventListener::new(notifier, queue.clone());
        listener
            .start()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to start request event listener: {}", e))?;
        // The listener holds its own subscription now.
        drop(keep_alive);

        let state = Arc::new(ApiState::new(db, queue));
        let app = configure_routes(state)
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive());

        let tcp_listener = tokio::net::TcpListener::bind(&self.address)
            .await
            .with_context(|| format!("Failed to bind {}", self.address))?;
        info!("🚀 Starting BloodLink server on {}", self.address);

        axum::serve(tcp_listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                info!("Shutdown signal received");
            })
            .await?;

        listener.stop().await;
        Ok(())
    }
}
