//! Shared application state for the web server.

use std::sync::Arc;

use pneumoscan_client::{InferenceApi, InferenceClient};
use pneumoscan_config::Config;

use crate::templates::Templates;

/// Shared state injected into every Axum handler. Immutable after startup;
/// all per-page view state lives in the request.
pub struct AppState {
    pub config: Config,
    pub inference: Arc<dyn InferenceApi>,
    pub templates: Templates,
}

impl AppState {
    /// State backed by the real HTTP inference client.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let client = InferenceClient::new(&config.inference)?;
        Self::with_inference(config, Arc::new(client))
    }

    pub fn with_inference(
        config: Config,
        inference: Arc<dyn InferenceApi>,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            config,
            inference,
            templates: Templates::new()?,
        })
    }
}

pub type SharedState = Arc<AppState>;
