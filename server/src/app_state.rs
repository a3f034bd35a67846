//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;

use crate::proxy::BackendProxy;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub proxy: Arc<BackendProxy>,
}

impl AppState {
    pub fn new(proxy: BackendProxy) -> Self {
        Self {
            proxy: Arc::new(proxy),
        }
    }
}

impl FromRef<AppState> for Arc<BackendProxy> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.proxy.clone()
    }
}
