use std::sync::Arc;

use crate::config::Config;
use crate::layout::CapacityModel;
use crate::llm_client::LlmClient;
use crate::measure::SurfaceHost;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// `None` when no API key is configured; generation then answers 503.
    pub llm: Option<LlmClient>,
    pub config: Config,
    /// Page geometry; handlers apply the request's age range to a copy.
    pub capacity: CapacityModel,
    /// Where measurement surfaces come from. Default: `MetricSurfaceHost`.
    pub surface_host: Arc<dyn SurfaceHost>,
}
