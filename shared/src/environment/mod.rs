//! Environment configuration consumed by the frontend: the API base URL, the
//! build-mode flag and the Auth0 client settings.
//!
//! A record is built once (see [`loader`]), frozen in [`global`], and read
//! through shared references for the rest of the process lifetime.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::{Host, Url};
use validator::{Validate, ValidationError};

use crate::error::{ConfigError, Result};

pub mod global;
pub mod loader;
pub mod variants;

/// Build target a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    #[default]
    Development,
    Production,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Development => "development",
            Variant::Production => "production",
        }
    }

    /// Name of the dotenv file holding overrides for this variant.
    pub fn env_file(&self) -> String {
        format!(".env.{}", self.as_str())
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "dev" | "development" => Ok(Variant::Development),
            "prod" | "production" => Ok(Variant::Production),
            _ => Err(ConfigError::UnknownVariant(s.to_string())),
        }
    }
}

/// The configuration record. Field names serialize to the shape the frontend
/// bundle expects (`apiServerUrl`, `auth0.clientId`, `auth0.callbackURL`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentConfig {
    pub production: bool,
    /// Base address of the backend API. Every request path is appended to it.
    #[validate(url, custom = "validate_absolute_url")]
    pub api_server_url: String,
    #[validate]
    pub auth0: Auth0Config,
}

/// Auth0 client settings used to start the login flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Auth0Config {
    /// Tenant prefix (e.g. `gzs-fsnd.eu`) or a full `*.auth0.com` domain.
    #[validate(custom = "validate_not_blank")]
    pub url: String,
    #[validate(custom = "validate_not_blank")]
    pub audience: String,
    /// Public client identifier; not a secret.
    #[validate(custom = "validate_not_blank")]
    pub client_id: String,
    /// Where Auth0 redirects after login. Must be registered with the tenant.
    #[validate(url, custom = "validate_absolute_url")]
    #[serde(rename = "callbackURL")]
    pub callback_url: String,
}

fn validate_not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("not_blank");
        err.message = Some(Cow::from("is required and cannot be blank"));
        return Err(err);
    }
    Ok(())
}

fn validate_absolute_url(value: &str) -> std::result::Result<(), ValidationError> {
    let parsed = Url::parse(value).map_err(|_| ValidationError::new("url"))?;
    let web_scheme = matches!(parsed.scheme(), "http" | "https");
    if !web_scheme || parsed.host_str().map_or(true, str::is_empty) {
        let mut err = ValidationError::new("absolute_url");
        err.message = Some(Cow::from("must be an absolute http(s) URL with a host"));
        return Err(err);
    }
    Ok(())
}

fn is_loopback(value: &str) -> bool {
    match Url::parse(value).ok().as_ref().and_then(Url::host) {
        Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(Host::Ipv4(ip)) => ip.is_loopback(),
        Some(Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}

pub(crate) fn parse_url(value: &str) -> Result<Url> {
    Url::parse(value).map_err(|source| ConfigError::Url {
        value: value.to_string(),
        source,
    })
}

impl EnvironmentConfig {
    pub fn variant(&self) -> Variant {
        if self.production {
            Variant::Production
        } else {
            Variant::Development
        }
    }

    /// Runs field validation, then the production-only rules.
    pub fn check(&self) -> Result<()> {
        self.validate()?;

        if self.production {
            if is_loopback(&self.api_server_url) {
                return Err(ConfigError::Invalid(format!(
                    "Production API server URL cannot point at a loopback host: {}",
                    self.api_server_url
                )));
            }
            if is_loopback(&self.auth0.callback_url) {
                return Err(ConfigError::Invalid(format!(
                    "Production callback URL cannot point at a loopback host: {}",
                    self.auth0.callback_url
                )));
            }
        }

        Ok(())
    }

    /// Full URL of a backend endpoint, e.g. `endpoint("/drinks")`.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let joined = format!(
            "{}/{}",
            self.api_server_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        parse_url(&joined)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Auth0Config {
    /// Fully qualified tenant domain, e.g. `gzs-fsnd.eu.auth0.com`.
    pub fn tenant_domain(&self) -> String {
        let raw = self.url.trim();
        let host = Url::parse(raw)
            .ok()
            .and_then(|parsed| parsed.host_str().map(str::to_string))
            .unwrap_or_else(|| raw.trim_end_matches('/').to_string());
        if host.ends_with(".auth0.com") {
            host
        } else {
            format!("{host}.auth0.com")
        }
    }

    /// Expected `iss` claim of tokens issued by the tenant.
    pub fn issuer(&self) -> Result<Url> {
        parse_url(&format!("https://{}/", self.tenant_domain()))
    }

    pub fn jwks_url(&self) -> Result<Url> {
        parse_url(&format!(
            "https://{}/.well-known/jwks.json",
            self.tenant_domain()
        ))
    }

    /// Authorize link the frontend sends the browser to. `callback_path` is
    /// appended to `callback_url` to form the redirect target.
    pub fn login_url(&self, callback_path: &str) -> Result<Url> {
        let mut url = parse_url(&format!("https://{}/authorize", self.tenant_domain()))?;
        let redirect_uri = format!("{}{}", self.callback_url, callback_path);
        url.query_pairs_mut()
            .append_pair("audience", &self.audience)
            .append_pair("response_type", "token")
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &redirect_uri);
        Ok(url)
    }
}
