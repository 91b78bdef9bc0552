//! HTTP Endpoints
//!
//! `POST /evaluate` takes an audio upload, `POST /evaluate/transcript` a
//! diarized transcript. Both classify speakers, build the role-labelled
//! transcript and run the evaluator.

use std::path::Path;
use std::time::{Duration, Instant};

use axum::{
    extract::{multipart::Multipart, rejection::JsonRejection, DefaultBodyLimit, State},
    http::HeaderValue,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use call_eval_core::{EvaluationReport, RawTranscript, Transcript};

use crate::metrics::{self, metrics_handler};
use crate::state::AppState;
use crate::ServerError;

/// Audio formats accepted by `/evaluate`
pub const ALLOWED_EXTENSIONS: [&str; 7] = ["wav", "mp3", "m4a", "flac", "ogg", "webm", "mp4"];

/// Case-insensitive extension check on an upload's file name
pub fn is_allowed_extension(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let server = &state.config.server;

    let mut router = Router::new()
        .route("/evaluate", post(evaluate_audio))
        .route("/evaluate/transcript", post(evaluate_transcript))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics_handler))
        .layer(DefaultBodyLimit::max(server.max_upload_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(server.timeout_seconds)))
        .layer(TraceLayer::new_for_http());

    if server.cors_enabled {
        router = router.layer(cors_layer(&server.cors_origins));
    }

    router.with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if parsed.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(parsed)
    }
}

/// Classify speakers, build the transcript and score it
async fn run_pipeline(state: &AppState, raw: RawTranscript) -> Result<EvaluationReport, ServerError> {
    let started = Instant::now();

    let result = async {
        let roles = state.classifier.classify(&raw.dialogue_text()).await?;
        let transcript = Transcript::from_raw(&raw, &roles)?;
        state.evaluator.evaluate(transcript.into_shared()).await
    }
    .await;

    let elapsed = started.elapsed().as_secs_f64();
    match &result {
        Ok(report) => {
            metrics::record_evaluation(elapsed, Some(report.final_score));
            for (kind, value) in report.score_breakdown.iter() {
                metrics::record_sub_score(kind, value);
            }
        }
        Err(_) => metrics::record_evaluation(elapsed, None),
    }

    result.map_err(ServerError::from)
}

/// Evaluate an uploaded audio file
async fn evaluate_audio(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<EvaluationReport>, ServerError> {
    metrics::record_request("evaluate");

    let transcriber = state
        .transcriber
        .clone()
        .ok_or_else(|| ServerError::Unavailable("audio transcription is not configured".to_string()))?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::InvalidRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        if !is_allowed_extension(&file_name) {
            return Err(ServerError::InvalidRequest(format!(
                "unsupported file type {:?}; allowed: {}",
                file_name,
                ALLOWED_EXTENSIONS.join(", ")
            )));
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ServerError::InvalidRequest(e.to_string()))?;
        upload = Some((file_name, bytes));
        break;
    }

    let (file_name, bytes) =
        upload.ok_or_else(|| ServerError::InvalidRequest("missing multipart field \"file\"".to_string()))?;
    if bytes.is_empty() {
        return Err(ServerError::InvalidRequest("uploaded file is empty".to_string()));
    }

    tracing::info!(file_name = %file_name, bytes = bytes.len(), "Received audio upload");

    let started = Instant::now();
    let raw = transcriber.transcribe(bytes.to_vec(), &file_name).await?;
    metrics::record_transcription_latency(started.elapsed().as_secs_f64());

    let report = run_pipeline(&state, raw).await?;
    Ok(Json(report))
}

/// Evaluate a diarized transcript
async fn evaluate_transcript(
    State(state): State<AppState>,
    payload: Result<Json<RawTranscript>, JsonRejection>,
) -> Result<Json<EvaluationReport>, ServerError> {
    metrics::record_request("evaluate_transcript");

    let Json(raw) = payload.map_err(|e| ServerError::InvalidRequest(e.body_text()))?;
    tracing::info!(utterances = raw.utterances.len(), "Received transcript");

    let report = run_pipeline(&state, raw).await?;
    Ok(Json(report))
}

/// Health check
async fn health_check() -> impl IntoResponse {
    metrics::record_request("health");
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Readiness check
async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    metrics::record_request("ready");
    let ctx = state.evaluator.context();

    Json(serde_json::json!({
        "status": "ready",
        "speaker_classifier": state.classifier.name(),
        "empathy_grader": state.evaluator.grader_name(),
        "transcription": state.transcriber.as_ref().map(|t| t.name().to_string()),
        "phrase_sets_cached": ctx.bank.len(),
        "phrase_cache_hit_rate": ctx.bank.stats.hit_rate(),
    }))
}
