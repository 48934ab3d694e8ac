//! Records bundled into the artifact. Only the development record carries
//! literals; production values always come from the environment.

use super::{Auth0Config, EnvironmentConfig};

/// Local Flask API server.
pub const DEVELOPMENT_API_SERVER_URL: &str = "http://127.0.0.1:5000";
pub const DEVELOPMENT_AUTH0_URL: &str = "gzs-fsnd.eu";
pub const DEVELOPMENT_AUTH0_AUDIENCE: &str = "coffeeshop";
pub const DEVELOPMENT_AUTH0_CLIENT_ID: &str = "VkdjlM0f4n7dhZCg9x9j91Hi5Yp34Q32";
/// Base URL of the locally served Ionic app.
pub const DEVELOPMENT_AUTH0_CALLBACK_URL: &str = "http://localhost:8100";

impl EnvironmentConfig {
    pub fn development() -> Self {
        EnvironmentConfig {
            production: false,
            api_server_url: DEVELOPMENT_API_SERVER_URL.to_string(),
            auth0: Auth0Config {
                url: DEVELOPMENT_AUTH0_URL.to_string(),
                audience: DEVELOPMENT_AUTH0_AUDIENCE.to_string(),
                client_id: DEVELOPMENT_AUTH0_CLIENT_ID.to_string(),
                callback_url: DEVELOPMENT_AUTH0_CALLBACK_URL.to_string(),
            },
        }
    }
}
