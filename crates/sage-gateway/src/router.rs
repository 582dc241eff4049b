use axum::Router;
use axum::routing::{get, post};
use sage_llm::LlmProvider;
use tower_http::limit::RequestBodyLimitLayer;

use super::handlers::{answer_handler, health_handler};
use super::server::AppState;

pub(crate) fn build_router<P>(state: AppState<P>, max_body_size: usize) -> Router
where
    P: LlmProvider + 'static,
{
    Router::new()
        .route("/health", get(health_handler::<P>))
        .route("/api/", post(answer_handler::<P>))
        .layer(RequestBodyLimitLayer::new(max_body_size))
        .with_state(state)
}
