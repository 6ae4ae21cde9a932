use engine::DashboardContext;

/// Shared across all connections; holds nothing mutable.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) ctx: DashboardContext,
}
