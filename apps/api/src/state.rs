use std::sync::Arc;

use crate::backend_client::MatchBackend;
use crate::matching::grouping::ChunkGrouper;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Where match responses come from. Default: HTTP `BackendClient`.
    pub backend: Arc<dyn MatchBackend>,
    /// Pluggable chunk grouping. Default: `HeuristicGrouper`.
    pub grouper: Arc<dyn ChunkGrouper>,
}
