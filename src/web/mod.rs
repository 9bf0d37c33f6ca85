use std::sync::Arc;

use anyhow::Result;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

use crate::client::ANALYZE_PATH;
use crate::completion::{CompletionApi, OpenAiClient, SYSTEM_PROMPT};
use crate::config::ServerConfig;
use crate::wire::{AnalyzeRequest, AnalyzeResponse, ErrorResponse};

#[derive(Clone)]
struct AppState {
    completion: Arc<dyn CompletionApi>,
}

#[derive(Debug, thiserror::Error)]
enum ApiError {
    #[error("Failed to get advice")]
    AdviceUnavailable,
    #[error("Invalid request body")]
    InvalidRequest,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::AdviceUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InvalidRequest => StatusCode::BAD_REQUEST,
        };
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

pub async fn serve(config: ServerConfig) -> Result<()> {
    info!(addr = %config.addr, model = %config.completion.model, "starting advice proxy");
    let app = router(Arc::new(OpenAiClient::new(config.completion)));
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Builds the proxy around any completion backend.
pub fn router(completion: Arc<dyn CompletionApi>) -> Router {
    let state = AppState { completion };

    Router::new()
        .route("/healthz", get(health))
        .route(ANALYZE_PATH, post(analyze_poker_hand))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn analyze_poker_hand(
    State(state): State<AppState>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let Json(req) = body.map_err(|rejection| {
        warn!(%rejection, "rejecting analyze request");
        ApiError::InvalidRequest
    })?;

    let span = info_span!("analyze", request_id = %Uuid::new_v4());
    async move {
        debug!(situation = %req.gpt_string_content, "forwarding situation");
        match state
            .completion
            .complete(SYSTEM_PROMPT, &req.gpt_string_content)
            .await
        {
            Ok(advice) => {
                debug!(%advice, "advice received");
                Ok(Json(AnalyzeResponse { advice }))
            }
            Err(err) => {
                error!(error = %err, "completion failed");
                Err(ApiError::AdviceUnavailable)
            }
        }
    }
    .instrument(span)
    .await
}
