//! HTTP request handlers for the distribution engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{compute_with_precision, FIXED_SHARE_RULES};
use crate::config::ConfigLoader;
use crate::error::EngineResult;
use crate::models::{DistributionRequest, HeirType, Language};

use super::request::{CalculationRequest, LanguageQuery};
use super::response::{
    ApiError, ApiErrorResponse, CalculationResponse, CurrencyInfo, HeirInfo, RuleRow,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/calculate", post(calculate_handler))
        .route("/rules", get(rules_handler))
        .route("/heirs", get(heirs_handler))
        .with_state(state)
}

/// Handler for POST /calculate endpoint.
///
/// Accepts a distribution request and returns the computed shares.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing calculation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    if body_text.contains("missing field") || body_text.contains("unknown variant")
                    {
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
            return (
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "application/json")],
                Json(error),
            )
                .into_response();
        }
    };

    let config = state.config();
    let currency = match resolve_currency(config, request.currency.as_deref(), request.language) {
        Ok(currency) => currency,
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                currency = ?request.currency,
                "Currency not found"
            );
            return error_response(err.into());
        }
    };

    let heir_count = request.heirs.len();
    let distribution: DistributionRequest = request.into();

    let start_time = Instant::now();
    match compute_with_precision(&distribution, currency.minor_units) {
        Ok(result) => {
            let duration = start_time.elapsed();
            info!(
                correlation_id = %correlation_id,
                heirs = heir_count,
                estate = %result.total_estate,
                resolution = ?result.resolution,
                duration_us = duration.as_micros(),
                "Calculation completed successfully"
            );
            let response = CalculationResponse {
                calculation_id: correlation_id,
                timestamp: Utc::now(),
                engine_version: config.metadata().version.clone(),
                currency,
                duration_us: u64::try_from(duration.as_micros()).unwrap_or(u64::MAX),
                result,
            };
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(response),
            )
                .into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Calculation failed"
            );
            error_response(err.into())
        }
    }
}

/// Handler for GET /rules endpoint.
///
/// Lists the fixed-share table in the requested language.
async fn rules_handler(Query(query): Query<LanguageQuery>) -> impl IntoResponse {
    let rows: Vec<RuleRow> = FIXED_SHARE_RULES
        .iter()
        .map(|rule| RuleRow {
            heir_type: rule.heir,
            heir: rule.heir.label(query.lang).to_string(),
            condition: rule.condition.description(query.lang),
            share: rule.allotment.description(query.lang),
            source_ref: rule.source_ref.to_string(),
        })
        .collect();

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(rows),
    )
}

/// Handler for GET /heirs endpoint.
async fn heirs_handler(Query(query): Query<LanguageQuery>) -> impl IntoResponse {
    let heirs: Vec<HeirInfo> = HeirType::ALL
        .iter()
        .map(|&heir_type| HeirInfo {
            heir_type,
            label: heir_type.label(query.lang).to_string(),
            max_count: heir_type.max_count(),
        })
        .collect();

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(heirs),
    )
}

/// Looks up the requested currency, falling back to the configured default.
fn resolve_currency(
    config: &ConfigLoader,
    code: Option<&str>,
    language: Language,
) -> EngineResult<CurrencyInfo> {
    let (code, currency) = match code {
        Some(code) => (code.to_uppercase(), config.get_currency(code)?),
        None => config.default_currency()?,
    };

    let name = match language {
        Language::En => &currency.name_en,
        Language::Ar => &currency.name_ar,
    };

    Ok(CurrencyInfo {
        code,
        name: name.clone(),
        minor_units: currency.minor_units,
    })
}

fn error_response(api_error: ApiErrorResponse) -> axum::response::Response {
    (
        api_error.status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(api_error.error),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::Fraction;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::json;
    use tower::ServiceExt;

    fn create_test_state() -> AppState {
        let config = ConfigLoader::load("./config/faraid").expect("Failed to load config");
        AppState::new(config)
    }

    async fn send(request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let router = create_router(create_test_state());
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    fn post_json(body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/calculate")
            .header("Content-Type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_request_returns_200() {
        let body = json!({
            "estate_value": "1000",
            "heirs": [{"type": "wife", "count": 1}, {"type": "daughter", "count": 1}]
        });

        let (status, bytes) = send(post_json(body.to_string())).await;
        assert_eq!(status, StatusCode::OK);

        let response: CalculationResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(response.engine_version, "0.1.0");
        assert_eq!(response.currency.code, "EGP");
        let daughter = response.result.share_for(HeirType::Daughter).unwrap();
        assert_eq!(daughter.fraction, Fraction::new(7, 8));
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let (status, bytes) = send(post_json("{invalid json".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let error: ApiError = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_missing_heirs_returns_validation_error() {
        let (status, bytes) = send(post_json(json!({"estate_value": 10}).to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let error: ApiError = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(error.code, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_unknown_currency_returns_400() {
        let body = json!({
            "estate_value": "1000",
            "heirs": [{"type": "son", "count": 1}],
            "currency": "XYZ"
        });

        let (status, bytes) = send(post_json(body.to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let error: ApiError = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(error.code, "CURRENCY_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_rules_lists_fixed_share_table() {
        let request = Request::builder()
            .uri("/rules?lang=en")
            .body(Body::empty())
            .unwrap();

        let (status, bytes) = send(request).await;
        assert_eq!(status, StatusCode::OK);

        let rows: Vec<RuleRow> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(rows.len(), FIXED_SHARE_RULES.len());
        assert_eq!(rows[0].heir, "Husband");
        assert_eq!(rows[0].share, "1/4");
    }
}
