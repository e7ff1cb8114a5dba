use std::sync::Arc;

use crate::pipeline::Screener;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Process-wide screening context; its caches and limiters are shared by
    /// every request.
    pub screener: Arc<Screener>,
}
