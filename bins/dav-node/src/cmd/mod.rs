pub mod publish;
pub mod watch;

use std::sync::Arc;

use dav_api::Config;
use dav_engine::{Coordinator, HttpRegistrar, MemoryLog};

use crate::error::NodeError;

/// Load config and wire a coordinator over the in-process log and the
/// HTTP registrar.
pub(crate) fn bootstrap(config_path: &str) -> Result<(Coordinator, Arc<MemoryLog>), NodeError> {
    let config = Arc::new(Config::load(config_path)?);
    tracing::info!(config = %config_path, seed = ?config.api_seed_urls.first(), "loaded config");

    let log = Arc::new(MemoryLog::new());
    let coordinator = Coordinator::new(config, log.clone(), Arc::new(HttpRegistrar::new()))?;
    Ok((coordinator, log))
}
