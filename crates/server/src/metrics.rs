//! Prometheus metrics
//!
//! The recorder is installed at most once per process; every helper is a
//! no-op until then.

use std::sync::OnceLock;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use call_eval_core::MetricKind;

use crate::state::AppState;

static METRICS_HANDLE: OnceLock<Option<PrometheusHandle>> = OnceLock::new();

/// Install the Prometheus recorder, or return the one already installed
pub fn init_metrics() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                register_default_metrics();
                Some(handle)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install Prometheus recorder");
                None
            }
        })
        .as_ref()
}

pub fn get_metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get().and_then(Option::as_ref)
}

fn register_default_metrics() {
    for endpoint in ["evaluate", "evaluate_transcript", "health", "ready"] {
        counter!("call_eval_requests_total", "endpoint" => endpoint).absolute(0);
    }
    for outcome in ["success", "failure"] {
        counter!("call_eval_evaluations_total", "outcome" => outcome).absolute(0);
    }
    for error_type in ["bad_input", "upstream", "internal", "unavailable"] {
        counter!("call_eval_errors_total", "type" => error_type).absolute(0);
    }
}

pub fn record_request(endpoint: &'static str) {
    counter!("call_eval_requests_total", "endpoint" => endpoint).increment(1);
}

/// Record a finished evaluation and, on success, its final score
pub fn record_evaluation(duration_secs: f64, final_score: Option<f64>) {
    histogram!("call_eval_evaluation_duration_seconds").record(duration_secs);
    match final_score {
        Some(score) => {
            counter!("call_eval_evaluations_total", "outcome" => "success").increment(1);
            histogram!("call_eval_final_score").record(score);
        }
        None => {
            counter!("call_eval_evaluations_total", "outcome" => "failure").increment(1);
        }
    }
}

/// Per-metric sub-score distribution
pub fn record_sub_score(kind: MetricKind, value: f64) {
    histogram!("call_eval_sub_score", "metric" => kind.as_str()).record(value);
}

pub fn record_transcription_latency(duration_secs: f64) {
    histogram!("call_eval_transcription_duration_seconds").record(duration_secs);
}

pub fn record_error(error_type: &'static str) {
    counter!("call_eval_errors_total", "type" => error_type).increment(1);
}

/// Metrics endpoint handler
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    if !state.config.observability.metrics_enabled {
        return (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "text/plain")],
            "Metrics disabled".to_string(),
        );
    }

    match get_metrics_handle() {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
            handle.render(),
        ),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            [(header::CONTENT_TYPE, "text/plain")],
            "Metrics not initialized".to_string(),
        ),
    }
}
