pub mod cli;
pub mod config;
pub mod error;
pub mod observability;
pub mod routes;
pub mod server;

pub use config::Config;
pub use routes::AppState;

/// Create app router for testing
///
/// Builds the full router around `state` without binding a listener, useful
/// for integration tests that drive it with `tower::ServiceExt::oneshot`.
pub fn create_app(state: AppState) -> axum::Router {
    server::app(state)
}
