//! Application state for the web layer.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::dashboard::LiveDashboard;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Running dashboard
    pub dashboard: Arc<LiveDashboard>,

    /// Station reference table
    pub catalog: Arc<Catalog>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(dashboard: Arc<LiveDashboard>, catalog: Arc<Catalog>) -> Self {
        Self { dashboard, catalog }
    }
}
