use std::sync::Arc;

use thiserror::Error;

use crate::config::AppConfig;
use crate::state::AppState;
use aniscope_infra::catalog::CatalogClient;

#[derive(Debug, Error)]
pub enum WiringError {
    #[error("http client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

pub fn build_state(config: AppConfig) -> Result<AppState, WiringError> {
    let client = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .user_agent(concat!("aniscope/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let catalog = CatalogClient::new(client, config.base_url.clone());
    Ok(AppState {
        config: Arc::new(config),
        catalog: Arc::new(catalog),
    })
}
