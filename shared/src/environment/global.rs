//! The process-wide environment record.
//!
//! Call [`init`] (or [`install`]) once during startup, before anything reads
//! the value; after that every reader shares the same frozen record.

use log::{info, warn};
use once_cell::sync::OnceCell;

use super::{loader, EnvironmentConfig};
use crate::error::{ConfigError, Result};

static ENVIRONMENT: OnceCell<EnvironmentConfig> = OnceCell::new();

/// Loads the record from the environment and freezes it.
pub fn init() -> Result<&'static EnvironmentConfig> {
    if ENVIRONMENT.get().is_some() {
        return Err(ConfigError::AlreadyInitialized);
    }
    install(loader::load()?)
}

/// Validates and freezes an explicitly built record.
pub fn install(config: EnvironmentConfig) -> Result<&'static EnvironmentConfig> {
    config.check()?;
    let variant = config.variant();
    let frozen = ENVIRONMENT
        .try_insert(config)
        .map_err(|_| ConfigError::AlreadyInitialized)?;
    info!("Environment configuration frozen ({})", variant);
    Ok(frozen)
}

/// The frozen record. If startup never initialized it, the bundled
/// development record is frozen on first read.
pub fn get() -> &'static EnvironmentConfig {
    ENVIRONMENT.get_or_init(|| {
        warn!("Environment configuration read before init; using the development record");
        EnvironmentConfig::development()
    })
}

pub fn is_initialized() -> bool {
    ENVIRONMENT.get().is_some()
}

/// Prefix for every backend request.
pub fn api_base_url() -> &'static str {
    get().api_server_url.as_str()
}
