use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use voxsure::application::ports::JobRepository;
use voxsure::application::services::{
    AdmissionGate, ProcessingWorker, VoxelJobService, spawn_retention_sweeper,
};
use voxsure::infrastructure::observability::{TracingConfig, init_tracing};
use voxsure::infrastructure::persistence::InMemoryJobRepository;
use voxsure::infrastructure::storage::StagingStoreFactory;
use voxsure::infrastructure::voxelization::GridVoxelizer;
use voxsure::presentation::{AppState, Environment, Settings, create_router};

const WORKER_DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load configuration")?;

    let tracing_config = TracingConfig::new(
        environment.as_str(),
        settings.logging.level.as_deref(),
        settings.logging.enable_json,
    );
    init_tracing(&tracing_config, settings.server.port);

    let job_repository: Arc<dyn JobRepository> = Arc::new(InMemoryJobRepository::new());
    let staging_store = StagingStoreFactory::create(&settings.storage)
        .context("Failed to initialize upload staging")?;
    let gate = AdmissionGate::exclusive();

    let (sender, receiver) = mpsc::channel(settings.jobs.queue_capacity.max(1));
    let worker = ProcessingWorker::new(
        receiver,
        gate.clone(),
        Arc::new(GridVoxelizer),
        Arc::clone(&job_repository),
        Arc::clone(&staging_store),
        settings.storage.delete_after_processing,
    );
    let worker_handle = tokio::spawn(worker.run());

    let sweeper = settings.jobs.retention().map(|retention| {
        spawn_retention_sweeper(
            Arc::clone(&job_repository),
            retention,
            settings.jobs.sweep_interval(),
        )
    });

    let job_service = Arc::new(VoxelJobService::new(
        Arc::clone(&job_repository),
        staging_store,
        sender,
        settings.voxelization.limits(),
    ));

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}", settings.server.host))?;

    let state = AppState {
        job_service,
        job_repository,
        gate: gate.clone(),
        settings,
    };
    let router = create_router(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Queued jobs fail fast; the job holding the gate runs to completion.
    gate.close();
    if let Some(sweeper) = sweeper {
        sweeper.abort();
    }
    match tokio::time::timeout(WORKER_DRAIN_TIMEOUT, worker_handle).await {
        Ok(Err(e)) => tracing::error!(error = %e, "Processing worker terminated abnormally"),
        Err(_) => tracing::warn!("Processing worker still busy at shutdown"),
        Ok(Ok(())) => {}
    }
    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
