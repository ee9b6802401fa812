use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::error::GatewayError;
use super::state::HandlerState;
use super::status_headers;
use crate::constants::MAX_SCAN_TEXT_BYTES;
use crate::pipeline::ScanRequest;
use crate::resilience::contain_panic;
use crate::resolver::IngredientRecord;
use crate::scoring::{PatternScoringEngine, ScoreFactor};

const STATUS_SCORED: &str = "scored";
const STATUS_RESOLVED: &str = "resolved";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// One resolved ingredient with the factors it would contribute to a scan.
pub struct ResolveResponse {
    pub record: IngredientRecord,
    pub factors: Vec<ScoreFactor>,
}

/// Rejects oversized text and out-of-range confidence values.
pub(crate) fn validate_scan_request(request: &ScanRequest) -> Result<(), GatewayError> {
    let size = request.text.len();
    if size > MAX_SCAN_TEXT_BYTES {
        return Err(GatewayError::PayloadTooLarge {
            size,
            limit: MAX_SCAN_TEXT_BYTES,
        });
    }

    if let Some(confidence) = request.confidence
        && !(confidence.is_finite() && (0.0..=100.0).contains(&confidence))
    {
        return Err(GatewayError::InvalidRequest(format!(
            "confidence must be between 0 and 100, got {confidence}"
        )));
    }

    Ok(())
}

#[instrument(skip(state, request))]
pub async fn scan_handler(
    State(state): State<HandlerState>,
    Json(request): Json<serde_json::Value>,
) -> Result<Response, GatewayError> {
    let request: ScanRequest = serde_json::from_value(request)
        .map_err(|e| GatewayError::InvalidRequest(format!("Invalid request schema: {}", e)))?;
    validate_scan_request(&request)?;

    debug!(text_len = request.text.len(), "Processing scan request");

    let report = contain_panic("scan", state.pipeline.scan(&request))
        .await
        .map_err(|e| GatewayError::InternalError(e.to_string()))?;

    Ok((StatusCode::OK, status_headers(STATUS_SCORED), Json(report)).into_response())
}

#[instrument(skip(state, request))]
pub async fn resolve_handler(
    State(state): State<HandlerState>,
    Json(request): Json<serde_json::Value>,
) -> Result<Response, GatewayError> {
    let request: ResolveRequest = serde_json::from_value(request)
        .map_err(|e| GatewayError::InvalidRequest(format!("Invalid request schema: {}", e)))?;

    let record = state.resolver().resolve(&request.name).await?;
    let factors = PatternScoringEngine::new().analyze(&record);

    Ok((
        StatusCode::OK,
        status_headers(STATUS_RESOLVED),
        Json(ResolveResponse { record, factors }),
    )
        .into_response())
}
