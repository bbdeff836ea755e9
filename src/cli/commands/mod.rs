pub mod auth;
pub mod file;
pub mod note;
pub mod server;
pub mod workspace;

use crate::cli::client::ApiClient;
use crate::cli::config::load_environment_config;

/// Client for the configured server carrying the saved session token
pub(crate) fn client() -> anyhow::Result<ApiClient> {
    Ok(ApiClient::from_config(&load_environment_config()?))
}
