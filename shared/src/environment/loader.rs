//! Selects a variant and builds its record from the process environment.
//!
//! Precedence for every key: process environment, then `.env`, then
//! `.env.<variant>` (dotenv never overwrites a variable that is already set).
//! `ENV_FILE_PATH` replaces both files with a single explicit one.

use std::env;
use std::path::PathBuf;

use log::{debug, info, warn};

use super::{Auth0Config, EnvironmentConfig, Variant};
use crate::error::{ConfigError, Result};

pub const RUST_ENV: &str = "RUST_ENV";
pub const ENV_FILE_PATH: &str = "ENV_FILE_PATH";

pub const API_SERVER_URL: &str = "API_SERVER_URL";
pub const AUTH0_URL: &str = "AUTH0_URL";
pub const AUTH0_AUDIENCE: &str = "AUTH0_AUDIENCE";
pub const AUTH0_CLIENT_ID: &str = "AUTH0_CLIENT_ID";
pub const AUTH0_CALLBACK_URL: &str = "AUTH0_CALLBACK_URL";

/// Loads env files, then builds and validates the record selected by
/// `RUST_ENV`.
pub fn load() -> Result<EnvironmentConfig> {
    load_env_files()?;
    load_from(|key| env::var(key).ok())
}

/// Loads `ENV_FILE_PATH`, or `.env` followed by the file of the variant
/// named in `RUST_ENV`.
pub fn load_env_files() -> Result<()> {
    load_env_files_with(None)
}

/// Same as [`load_env_files`], but `.env.<variant>` follows the given
/// variant instead of `RUST_ENV`.
pub fn load_env_files_for(variant: Variant) -> Result<()> {
    load_env_files_with(Some(variant))
}

fn load_env_files_with(variant: Option<Variant>) -> Result<()> {
    if let Some(path) = env::var(ENV_FILE_PATH).ok().filter(|p| !p.is_empty()) {
        info!("Loading environment from {}: {}", ENV_FILE_PATH, path);
        let path = PathBuf::from(path);
        dotenv::from_path(&path).map_err(|source| ConfigError::EnvFile { path, source })?;
        return Ok(());
    }

    match dotenv::dotenv() {
        Ok(path) => debug!("Loaded {}", path.display()),
        Err(e) if e.not_found() => debug!("No .env file found"),
        Err(e) => warn!("Ignoring unreadable .env file: {}", e),
    }

    let variant = match variant {
        Some(variant) => variant,
        None => match env::var(RUST_ENV) {
            Ok(raw) if !raw.trim().is_empty() => raw.parse::<Variant>()?,
            _ => Variant::default(),
        },
    };
    let env_file = variant.env_file();
    match dotenv::from_filename(&env_file) {
        Ok(path) => debug!("Loaded {}", path.display()),
        Err(e) if e.not_found() => debug!("No {} file found", env_file),
        Err(e) => warn!("Ignoring unreadable {} file: {}", env_file, e),
    }

    Ok(())
}

/// Builds the record for the variant named by `RUST_ENV` in `lookup`,
/// defaulting to development.
pub fn load_from<F>(lookup: F) -> Result<EnvironmentConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let variant = match non_blank(&lookup, RUST_ENV) {
        Some(raw) => raw.parse()?,
        None => Variant::default(),
    };
    load_variant(variant, lookup)
}

pub fn load_variant<F>(variant: Variant, lookup: F) -> Result<EnvironmentConfig>
where
    F: Fn(&str) -> Option<String>,
{
    info!("Loading environment configuration for variant: {}", variant);

    let config = match variant {
        Variant::Development => development_config(&lookup),
        Variant::Production => production_config(&lookup)?,
    };

    config.check()?;
    log_configuration(&config);

    Ok(config)
}

fn development_config<F>(lookup: &F) -> EnvironmentConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = EnvironmentConfig::development();
    override_field(lookup, API_SERVER_URL, &mut config.api_server_url);
    override_field(lookup, AUTH0_URL, &mut config.auth0.url);
    override_field(lookup, AUTH0_AUDIENCE, &mut config.auth0.audience);
    override_field(lookup, AUTH0_CLIENT_ID, &mut config.auth0.client_id);
    override_field(lookup, AUTH0_CALLBACK_URL, &mut config.auth0.callback_url);
    config
}

fn production_config<F>(lookup: &F) -> Result<EnvironmentConfig>
where
    F: Fn(&str) -> Option<String>,
{
    Ok(EnvironmentConfig {
        production: true,
        api_server_url: require(lookup, API_SERVER_URL)?,
        auth0: Auth0Config {
            url: require(lookup, AUTH0_URL)?,
            audience: require(lookup, AUTH0_AUDIENCE)?,
            client_id: require(lookup, AUTH0_CLIENT_ID)?,
            callback_url: require(lookup, AUTH0_CALLBACK_URL)?,
        },
    })
}

fn override_field<F>(lookup: &F, key: &str, field: &mut String)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = non_blank(lookup, key) {
        debug!("{} overridden from environment", key);
        *field = value;
    }
}

fn require<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    non_blank(lookup, key).ok_or_else(|| ConfigError::MissingVar(key.to_string()))
}

fn non_blank<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn log_configuration(config: &EnvironmentConfig) {
    info!("Environment configuration loaded");
    info!("Variant: {}", config.variant());
    info!("API server: {}", config.api_server_url);
    info!(
        "Auth0 tenant: {} (audience: {})",
        config.auth0.tenant_domain(),
        config.auth0.audience
    );
    info!("Auth0 callback: {}", config.auth0.callback_url);

    if !config.production {
        warn!("Running with the development environment configuration");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use test_log::test;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    fn production_vars() -> Vec<(&'static str, &'static str)> {
        vec![
            (RUST_ENV, "production"),
            (API_SERVER_URL, "https://api.coffeeshop.test"),
            (AUTH0_URL, "coffeeshop-prod.us"),
            (AUTH0_AUDIENCE, "coffeeshop"),
            (AUTH0_CLIENT_ID, "prod-client-id"),
            (AUTH0_CALLBACK_URL, "https://coffeeshop.test"),
        ]
    }

    #[test]
    fn test_empty_environment_yields_development_record() {
        let config = load_from(lookup_from(&[])).unwrap();
        assert_eq!(config, EnvironmentConfig::development());
        assert!(!config.production);
        assert_eq!(config.api_server_url, "http://127.0.0.1:5000");
    }

    #[test]
    fn test_development_overrides() {
        let config = load_from(lookup_from(&[
            (RUST_ENV, "dev"),
            (API_SERVER_URL, "http://10.0.0.5:5000"),
            (AUTH0_CLIENT_ID, "local-client"),
        ]))
        .unwrap();
        assert!(!config.production);
        assert_eq!(config.api_server_url, "http://10.0.0.5:5000");
        assert_eq!(config.auth0.client_id, "local-client");
        assert_eq!(config.auth0.callback_url, "http://localhost:8100");
    }

    #[test]
    fn test_blank_override_is_ignored() {
        let config = load_from(lookup_from(&[(AUTH0_AUDIENCE, "   ")])).unwrap();
        assert_eq!(config.auth0.audience, "coffeeshop");
    }

    #[test]
    fn test_invalid_override_fails_fast() {
        let result = load_from(lookup_from(&[(API_SERVER_URL, "not a url")]));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_unknown_variant_fails() {
        let result = load_from(lookup_from(&[(RUST_ENV, "staging")]));
        assert!(matches!(result, Err(ConfigError::UnknownVariant(_))));
    }

    #[test]
    fn test_production_from_environment() {
        let config = load_from(lookup_from(&production_vars())).unwrap();
        assert!(config.production);
        assert_eq!(config.api_server_url, "https://api.coffeeshop.test");
        assert_eq!(config.auth0.client_id, "prod-client-id");
        assert_eq!(config.auth0.tenant_domain(), "coffeeshop-prod.us.auth0.com");
    }

    #[test]
    fn test_production_requires_every_variable() {
        for missing in [
            API_SERVER_URL,
            AUTH0_URL,
            AUTH0_AUDIENCE,
            AUTH0_CLIENT_ID,
            AUTH0_CALLBACK_URL,
        ] {
            let vars: Vec<_> = production_vars()
                .into_iter()
                .filter(|(k, _)| *k != missing)
                .collect();
            match load_from(lookup_from(&vars)) {
                Err(ConfigError::MissingVar(name)) => assert_eq!(name, missing),
                other => panic!("expected MissingVar({missing}), got {other:?}"),
            }
        }
    }

    #[test]
    fn test_production_does_not_fall_back_to_development_literals() {
        let result = load_variant(Variant::Production, lookup_from(&[]));
        assert!(matches!(result, Err(ConfigError::MissingVar(_))));
    }

    #[test]
    fn test_production_rejects_loopback_api() {
        let mut vars = production_vars();
        vars.retain(|(k, _)| *k != API_SERVER_URL);
        vars.push((API_SERVER_URL, "http://127.0.0.1:5000"));
        let result = load_from(lookup_from(&vars));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_explicit_variant_ignores_rust_env() {
        let config = load_variant(Variant::Development, lookup_from(&production_vars())).unwrap();
        assert!(!config.production);
        assert_eq!(config.api_server_url, "https://api.coffeeshop.test");
    }
}
