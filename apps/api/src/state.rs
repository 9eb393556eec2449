use std::sync::Arc;

use crate::metadata::pipeline::MetadataPipeline;
use crate::metadata::retry::CancelSignal;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Immutable after startup; shared by every concurrent request.
    pub pipeline: Arc<MetadataPipeline>,
    /// Fires on shutdown so in-flight generations stop at their next attempt boundary.
    pub shutdown: CancelSignal,
}
