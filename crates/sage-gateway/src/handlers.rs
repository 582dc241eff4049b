use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sage_llm::LlmProvider;

use super::server::AppState;

#[derive(serde::Deserialize)]
pub(crate) struct AnswerRequest {
    pub question: String,
    /// Reserved for future multimodal use; accepted but ignored.
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(serde::Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
}

pub(crate) async fn answer_handler<P: LlmProvider>(
    State(state): State<AppState<P>>,
    Json(payload): Json<AnswerRequest>,
) -> impl IntoResponse {
    if payload.image.is_some() {
        tracing::debug!("image attachment ignored");
    }

    match state.engine.answer(&payload.question).await {
        Ok(answer) => Json(answer).into_response(),
        Err(e) => {
            tracing::error!("answer request failed: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub(crate) async fn health_handler<P: LlmProvider>(
    State(state): State<AppState<P>>,
) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}
