use crate::infra::AppState;
use crate::report::{assess_batch, AssessmentReport, BatchReport};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use dcm_advisor::error::AppError;
use dcm_advisor::workflows::intake::PatientCsvImporter;
use dcm_advisor::workflows::myelopathy::{PatientInput, PatientRecord};
use serde::Deserialize;
use serde_json::json;
use std::io::Cursor;
use tracing::warn;

#[derive(Debug, Deserialize)]
pub(crate) struct BatchRequest {
    pub(crate) csv: String,
    #[serde(default)]
    pub(crate) include_rows: bool,
}

pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/assessments", post(assessment_endpoint))
        .route("/api/v1/assessments/batch", post(batch_endpoint))
        .layer(Extension(state))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn assessment_endpoint(
    Extension(state): Extension<AppState>,
    Json(input): Json<PatientInput>,
) -> Result<Json<AssessmentReport>, AppError> {
    let parsed = PatientRecord::from_input(&input, state.fallback_policy)?;
    for fallback in &parsed.fallbacks {
        warn!(field = %fallback.field, "{}", fallback);
    }

    Ok(Json(AssessmentReport {
        result: state.engine.assess(&parsed.record),
        fallbacks: parsed.fallbacks,
    }))
}

pub(crate) async fn batch_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<BatchRequest>,
) -> Result<Json<BatchReport>, AppError> {
    let BatchRequest { csv, include_rows } = payload;

    let reader = Cursor::new(csv.into_bytes());
    let batch = PatientCsvImporter::from_reader(reader, state.fallback_policy)?;
    Ok(Json(assess_batch(&state.engine, batch, include_rows)))
}
