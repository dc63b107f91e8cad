use std::sync::Arc;

use crate::config::AppConfig;
use aniscope_core::domain::provider::CatalogProvider;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub catalog: Arc<dyn CatalogProvider>,
}
