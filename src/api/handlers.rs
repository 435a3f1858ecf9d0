use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use super::HealthResponse;
use crate::api::routes::AppState;
use crate::error::AppError;
use crate::relay::SynthesisRequest;

pub async fn synthesize(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Response, AppError> {
    let request = SynthesisRequest::from_slice(&body)?;
    tracing::info!(
        chars = request.text.chars().count(),
        sample_rate = request.sample_rate.hertz(),
        "Synthesizing"
    );

    let audio = state.relay.synthesize(request).await?;

    // Raw PCM, sent as-is
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_LENGTH, audio.len().to_string()),
        ],
        audio,
    )
        .into_response())
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        voice: state.relay.voice().name.clone(),
    })
}
