#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::sync::Arc;

    use task_planner::{MemoryProjectStore, ProjectStore, ServerConfig, http_api, telemetry};
    use tracing::info;

    telemetry::init_tracing();
    let config = ServerConfig::from_env()?;

    let store: Arc<dyn ProjectStore> = match &config.db_path {
        #[cfg(feature = "sqlite")]
        Some(path) => {
            info!(path = %path.display(), "using sqlite store");
            Arc::new(task_planner::SqliteProjectStore::new(path)?)
        }
        #[cfg(not(feature = "sqlite"))]
        Some(path) => {
            tracing::warn!(
                path = %path.display(),
                "sqlite support not compiled in; using memory store"
            );
            Arc::new(MemoryProjectStore::new())
        }
        None => {
            info!("using in-memory store");
            Arc::new(MemoryProjectStore::new())
        }
    };

    http_api::serve(config.addr, store).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
