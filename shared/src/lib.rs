pub mod environment;
pub mod error;

// Re-export commonly used items
pub use environment::global::{get, init, install};
pub use environment::{Auth0Config, EnvironmentConfig, Variant};
pub use error::{ConfigError, Result};
