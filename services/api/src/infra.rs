use hirepath::config::StorageConfig;
use hirepath::hiring::{HiringSnapshot, InMemoryHiringStore, SeedError};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Hydrate the store from the configured snapshot, or the bundled demo data.
pub(crate) fn build_store(config: &StorageConfig) -> Result<InMemoryHiringStore, SeedError> {
    let snapshot = match &config.seed_path {
        Some(path) => {
            info!(path = %path.display(), "loading hiring snapshot");
            HiringSnapshot::from_path(path)?
        }
        None => {
            info!("no seed file configured; using demo data");
            HiringSnapshot::demo()
        }
    };

    InMemoryHiringStore::from_snapshot(snapshot)
}
