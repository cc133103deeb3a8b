//! Shared handler state, injected into every request's depot.

use std::sync::Arc;

use storefront_app::context::AppContext;

#[derive(Clone)]
pub(crate) struct State {
    /// One handle per domain service.
    pub(crate) app: AppContext,
}

impl State {
    #[must_use]
    pub(crate) fn from_app_context(app: AppContext) -> Arc<Self> {
        Arc::new(Self { app })
    }
}
