//! HTTP request handlers for the tax engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::calculate_for_documents;
use crate::error::{EngineError, EngineResult};
use crate::extraction::extract_document;
use crate::models::NormalizedDocument;

use super::request::{CalculationRequest, DocumentRequest, ExtractRequest};
use super::response::{ApiError, ApiErrorResponse, CalculationResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/extract", post(extract_handler))
        .route("/normalize", post(normalize_handler))
        .route("/calculate", post(calculate_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, error)
}

fn error_response(correlation_id: Uuid, err: EngineError) -> Response {
    warn!(correlation_id = %correlation_id, error = %err, "Request rejected");
    ApiErrorResponse::from(err).into_response()
}

/// Handler for POST /extract.
///
/// Returns the detected form type, label/value pairs and identifiers found in the
/// document text, without mapping them to canonical fields.
async fn extract_handler(payload: Result<Json<ExtractRequest>, JsonRejection>) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let extracted = extract_document(&request.text, request.document_type);
    info!(
        correlation_id = %correlation_id,
        document_type = %extracted.document_type,
        pairs = extracted.pairs.len(),
        "Extraction completed"
    );
    json_response(StatusCode::OK, extracted)
}

/// Handler for POST /normalize.
///
/// Maps one document onto canonical fields and reports every mapping decision.
async fn normalize_handler(payload: Result<Json<DocumentRequest>, JsonRejection>) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    match request.normalize(0) {
        Ok(doc) => {
            info!(
                correlation_id = %correlation_id,
                document_type = %doc.document_type(),
                mapped = doc.mappings().len(),
                "Normalization completed"
            );
            json_response(StatusCode::OK, doc)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /calculate.
///
/// Normalizes every document, aggregates them and calculates the filer's federal
/// tax, refund or amount due.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing calculation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    let documents: EngineResult<Vec<NormalizedDocument>> = request
        .documents
        .iter()
        .enumerate()
        .map(|(index, doc)| doc.normalize(index))
        .collect();
    let documents = match documents {
        Ok(documents) => documents,
        Err(err) => return error_response(correlation_id, err),
    };

    let (totals, result) =
        calculate_for_documents(&documents, &request.filer, state.config().config());
    let duration_us = u64::try_from(start_time.elapsed().as_micros()).unwrap_or(u64::MAX);

    info!(
        correlation_id = %correlation_id,
        documents = documents.len(),
        result_type = ?result.result_type,
        result_amount = %result.result_amount,
        duration_us,
        "Calculation completed successfully"
    );

    json_response(
        StatusCode::OK,
        CalculationResponse {
            calculation_id: correlation_id,
            timestamp: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            duration_us,
            totals,
            result,
        },
    )
}
