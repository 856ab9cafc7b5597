//! Integration tests for the tax engine HTTP API.
//!
//! This suite covers:
//! - End-to-end scenarios (W-2 refund, 1099-NEC tax due, empty documents)
//! - Text and structured-field document inputs
//! - Multi-document aggregation
//! - Self-employment base isolation
//! - Filer options and fallbacks
//! - The extract and normalize endpoints
//! - Error cases

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;
use tower::ServiceExt;

use tax_engine::api::{AppState, create_router};
use tax_engine::config::ConfigLoader;

// =============================================================================
// Test Helpers
// =============================================================================

fn create_router_for_test() -> Router {
    let config = ConfigLoader::load("./config/irs_2024").expect("Failed to load config");
    create_router(AppState::new(config))
}

/// Normalize decimal string by removing trailing zeros after decimal point
fn normalize_decimal(s: &str) -> String {
    Decimal::from_str(s).unwrap().normalize().to_string()
}

async fn post_json(uri: &str, body: String) -> (StatusCode, Value) {
    let response = create_router_for_test()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

async fn post_calculate(body: Value) -> (StatusCode, Value) {
    post_json("/calculate", body.to_string()).await
}

fn assert_amount(value: &Value, expected: &str) {
    let actual = value
        .as_str()
        .unwrap_or_else(|| panic!("expected a decimal string, got {value}"));
    assert_eq!(
        normalize_decimal(actual),
        normalize_decimal(expected),
        "Expected {}, got {}",
        expected,
        actual
    );
}

fn warning_codes(response: &Value) -> Vec<String> {
    response["result"]["audit_trace"]["warnings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["code"].as_str().unwrap().to_string())
        .collect()
}

const W2_TEXT: &str = "\
Form W-2 Wage and Tax Statement 2024
Employee SSN: 123-45-6789
Employer EIN: 12-3456789
Box 1 Wages, tips, other comp.    50,000.00
Box 2 - Federal income tax withheld: $6,000.00
Box 4 - Social security tax withheld: $3,100.00
Box 6 - Medicare tax withheld: $725.00";

const NEC_TEXT: &str = "\
Form 1099-NEC Nonemployee Compensation
PAYER 98-7654321 RECIPIENT 987-65-4321
Nonemployee compensation - $75,000";

// =============================================================================
// SECTION 1: End-to-End Scenarios
// =============================================================================

#[tokio::test]
async fn test_single_w2_refund_from_text() {
    let (status, response) = post_calculate(json!({
        "documents": [{ "text": W2_TEXT }],
        "filer": { "filing_status": "Single" }
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    let result = &response["result"];
    assert_amount(&result["income"]["total_income"], "50000");
    assert_amount(&result["taxable_income"], "35400");
    assert_amount(&result["federal_tax"], "4016.00");
    assert_amount(&result["total_tax_liability"], "4016.00");
    assert_amount(&result["withholding"]["federal_income_tax_withheld"], "6000");
    assert_amount(&result["withholding"]["total_withheld"], "9825");
    assert_amount(&result["refund_or_due"], "1984.00");
    assert_eq!(result["result_type"], "Refund");
    assert_amount(&result["result_amount"], "1984.00");
    assert_amount(&result["income"]["by_source"]["W-2"], "50000");
}

#[tokio::test]
async fn test_nec_only_tax_due_from_text() {
    let (status, response) = post_calculate(json!({
        "documents": [{ "text": NEC_TEXT }]
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    let result = &response["result"];
    assert_amount(&result["self_employment_tax"], "10597.16");
    assert_amount(&result["taxable_income"], "60400");
    assert_amount(&result["federal_tax"], "8341.00");
    assert_amount(&result["total_tax_liability"], "18938.16");
    assert_amount(&result["refund_or_due"], "-18938.16");
    assert_eq!(result["result_type"], "Tax Due");
    assert_amount(&result["result_amount"], "18938.16");
}

#[tokio::test]
async fn test_all_zero_documents() {
    let (status, response) = post_calculate(json!({
        "documents": [{ "document_type": "W-2", "fields": { "Wages": "0" } }]
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    let result = &response["result"];
    assert_amount(&result["total_tax_liability"], "0");
    assert_amount(&result["refund_or_due"], "0");
    assert_eq!(result["result_type"], "Zero");
    assert!(warning_codes(&response).contains(&"LOW_EXTRACTION_QUALITY".to_string()));
}

#[tokio::test]
async fn test_no_documents_calculates_on_zero_income() {
    let (status, response) = post_calculate(json!({ "documents": [] })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["totals"]["documents_processed"], 0);
    assert_eq!(response["result"]["result_type"], "Zero");
}

// =============================================================================
// SECTION 2: Multi-Document Aggregation
// =============================================================================

#[tokio::test]
async fn test_w2_and_nec_combined() {
    let (status, response) = post_calculate(json!({
        "documents": [{ "text": W2_TEXT }, { "text": NEC_TEXT }]
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    let result = &response["result"];
    assert_amount(&result["income"]["total_income"], "125000");
    assert_amount(&result["income"]["self_employment_income"], "75000");
    assert_amount(&result["taxable_income"], "110400");
    // 17168.50 + (110400 - 100525) x 0.24
    assert_amount(&result["federal_tax"], "19538.50");
    assert_amount(&result["self_employment_tax"], "10597.16");
    assert_eq!(response["totals"]["documents_processed"], 2);
}

#[tokio::test]
async fn test_keep_larger_within_document_sum_across_documents() {
    let w2 = json!({
        "document_type": "W-2",
        "fields": { "Wages": "100", "Box 1 Wages, tips, other comp.": "23,500.00" }
    });
    let (status, response) = post_calculate(json!({ "documents": [w2.clone(), w2] })).await;

    assert_eq!(status, StatusCode::OK);
    assert_amount(&response["totals"]["amounts"]["wages"], "47000");
    assert_amount(&response["result"]["income"]["total_income"], "47000");
}

#[tokio::test]
async fn test_other_income_does_not_feed_self_employment_tax() {
    let (_, nec) = post_calculate(json!({
        "documents": [{ "document_type": "1099-NEC", "fields": { "nonemployee_compensation": 6750 } }]
    }))
    .await;
    let (_, misc) = post_calculate(json!({
        "documents": [{ "document_type": "1099-MISC", "fields": { "other_income": 6750 } }]
    }))
    .await;

    assert_amount(&nec["result"]["self_employment_tax"], "953.74");
    assert_amount(&misc["result"]["self_employment_tax"], "0");
    assert_amount(&misc["result"]["income"]["total_income"], "6750");
}

#[tokio::test]
async fn test_non_taxable_misc_boxes_are_reported_not_taxed() {
    let (status, response) = post_calculate(json!({
        "documents": [{
            "document_type": "1099-MISC",
            "fields": { "Box 2 Royalties": "1,000", "Box 6 Medical and health care payments": "4,000" }
        }]
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_amount(&response["result"]["income"]["total_income"], "1000");
    assert_amount(&response["result"]["income"]["non_taxable_total"], "4000");
}

// =============================================================================
// SECTION 3: Filer Options
// =============================================================================

#[tokio::test]
async fn test_married_jointly_with_dependents() {
    let (status, response) = post_calculate(json!({
        "documents": [{ "document_type": "W-2", "fields": { "wages": "80000", "federal_income_tax_withheld": "5000" } }],
        "filer": { "filing_status": "Married Filing Jointly", "num_dependents": 2 }
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    let result = &response["result"];
    assert_amount(&result["deduction"]["amount"], "29200");
    assert_amount(&result["taxable_income"], "50800");
    // 2320 + (50800 - 23200) x 0.12
    assert_amount(&result["federal_tax"], "5632.00");
    assert_amount(&result["credits"]["child_tax_credit"], "4000");
    assert_amount(&result["total_tax_liability"], "1632.00");
    assert_amount(&result["refund_or_due"], "3368.00");
}

#[tokio::test]
async fn test_itemized_deduction() {
    let (_, response) = post_calculate(json!({
        "documents": [{ "document_type": "W-2", "fields": { "wages": "50000" } }],
        "filer": { "deduction_type": "itemized", "itemized_amount": "20000" }
    }))
    .await;

    assert_eq!(response["result"]["deduction"]["deduction_type"], "itemized");
    assert_amount(&response["result"]["taxable_income"], "30000");
}

#[tokio::test]
async fn test_unknown_filing_status_warns_and_uses_single() {
    let (status, response) = post_calculate(json!({
        "documents": [{ "document_type": "W-2", "fields": { "wages": "50000" } }],
        "filer": { "filing_status": "Domestic Partner" }
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["result"]["filing_status"], "Single");
    assert!(warning_codes(&response).contains(&"INVALID_CONFIG".to_string()));
}

#[tokio::test]
async fn test_unmapped_label_warning() {
    let (_, response) = post_calculate(json!({
        "documents": [{ "document_type": "W-2", "fields": { "wages": "50000", "Control number": "A1" } }]
    }))
    .await;

    assert_eq!(warning_codes(&response), vec!["UNMAPPED_LABEL".to_string()]);
}

// =============================================================================
// SECTION 4: Extract and Normalize Endpoints
// =============================================================================

#[tokio::test]
async fn test_extract_endpoint() {
    let body = json!({ "text": NEC_TEXT }).to_string();
    let (status, response) = post_json("/extract", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["document_type"], "1099-NEC");
    assert_amount(&response["pairs"]["nonemployee_compensation"], "75000");
    assert_eq!(response["identifiers"]["eins"][0], "98-7654321");
    assert_eq!(response["identifiers"]["ssns"][0], "987-65-4321");
}

#[tokio::test]
async fn test_normalize_endpoint_reports_mappings() {
    let body = json!({
        "document_type": "W-2",
        "fields": { "Box 1 Wages, tips, other comp.": "23500", "Wages": "100" }
    })
    .to_string();
    let (status, response) = post_json("/normalize", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["document_type"], "W-2");
    assert_amount(&response["amounts"]["wages"], "23500");
    let mappings = response["mappings"].as_array().unwrap();
    assert_eq!(mappings.len(), 2);
    assert!(mappings.iter().all(|m| m["field"] == "wages"));
}

// =============================================================================
// SECTION 5: Error Cases
// =============================================================================

#[tokio::test]
async fn test_malformed_json() {
    let (status, response) = post_json("/calculate", "{ not json".to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["code"], "MALFORMED_JSON");
}

#[tokio::test]
async fn test_missing_documents_field() {
    let (status, response) = post_calculate(json!({ "filer": {} })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_document_without_text_or_fields() {
    let (status, response) = post_calculate(json!({
        "documents": [{ "text": W2_TEXT }, { "document_type": "W-2" }]
    }))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["code"], "INVALID_DOCUMENT");
    assert!(response["message"].as_str().unwrap().contains("index 1"));
}

#[tokio::test]
async fn test_amounts_beyond_range_are_skipped_not_fatal() {
    let body = r#"{"documents": [
        {"document_type": "W-2", "fields": {"wages": 50000000000000000000000000000}},
        {"document_type": "W-2", "fields": {"wages": "50000000000000000000000000000", "federal_income_tax_withheld": 100}}
    ]}"#;
    let (status, response) = post_json("/calculate", body.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_amount(&response["result"]["income"]["total_income"], "0");
    assert_amount(&response["result"]["refund_or_due"], "100");
    let codes = warning_codes(&response);
    assert_eq!(codes.iter().filter(|c| *c == "EXTRACTION_GAP").count(), 2);
}

// =============================================================================
// SECTION 6: Audit Trace & Response Field Validation
// =============================================================================

#[tokio::test]
async fn test_response_envelope_fields() {
    let (status, response) = post_calculate(json!({ "documents": [{ "text": W2_TEXT }] })).await;

    assert_eq!(status, StatusCode::OK);
    assert!(response["calculation_id"].is_string());
    assert!(response["timestamp"].is_string());
    assert_eq!(response["engine_version"], env!("CARGO_PKG_VERSION"));
    assert!(response["duration_us"].is_u64());
    assert_eq!(response["result"]["tax_year"], 2024);
}

#[tokio::test]
async fn test_audit_trace_steps() {
    let (_, response) = post_calculate(json!({ "documents": [{ "text": W2_TEXT }] })).await;

    let steps = response["result"]["audit_trace"]["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 10);
    let federal = steps
        .iter()
        .find(|s| s["rule_id"] == "federal_income_tax")
        .unwrap();
    assert_eq!(federal["irs_reference"], "Form 1040, line 16");
    assert_eq!(federal["output"]["federal_tax"], "4016");
    assert!(steps.iter().all(|s| s["reasoning"].as_str().is_some_and(|r| !r.is_empty())));
}
