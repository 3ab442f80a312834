//! HTTP request handlers for the withholding API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Form, Json, Router,
    extract::{
        State,
        rejection::{FormRejection, JsonRejection},
    },
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::calculate_withholding;
use crate::config::TaxYearTables;
use crate::error::{EngineError, EngineResult};
use crate::models::{CalculationResult, WithholdingInputs};

use super::form::WithholdingForm;
use super::page::{FormPage, render_form_page};
use super::request::WithholdingRequest;
use super::response::{ApiError, ApiErrorResponse, TaxYearsResponse, error_status};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(form_page_handler).post(form_submit_handler))
        .route("/calculate", post(calculate_handler))
        .route("/tax-years", get(tax_years_handler))
        .with_state(state)
}

/// Handler for POST /calculate endpoint.
///
/// Accepts a withholding request and returns the calculation result.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<WithholdingRequest>, JsonRejection>,
) -> Response {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing calculation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    // The body text carries serde's description of the problem
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
            return ApiErrorResponse::bad_request(error).into_response();
        }
    };

    match perform_calculation(&state, &request, correlation_id) {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Calculation rejected"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Validates a JSON request and runs the calculation.
fn perform_calculation(
    state: &AppState,
    request: &WithholdingRequest,
    correlation_id: Uuid,
) -> EngineResult<CalculationResult> {
    let inputs = WithholdingInputs::try_from(request)?;
    let tables = state.tables(request.tax_year)?;
    build_result(&inputs, tables, correlation_id)
}

fn build_result(
    inputs: &WithholdingInputs,
    tables: &TaxYearTables,
    correlation_id: Uuid,
) -> EngineResult<CalculationResult> {
    let start_time = Instant::now();
    let calculation = calculate_withholding(inputs, tables)?;

    info!(
        correlation_id = %correlation_id,
        tax_year = calculation.tax_year,
        filing_status = %inputs.filing_status.as_str(),
        total_tax = %calculation.result.total_tax,
        duration_us = start_time.elapsed().as_micros(),
        "Calculation completed successfully"
    );

    Ok(calculation.into_result())
}

/// Handler for GET / endpoint.
async fn form_page_handler(State(state): State<AppState>) -> Html<String> {
    let form = WithholdingForm::default();
    Html(render_form_page(&FormPage::blank(state.default_tax_year(), &form)))
}

/// Handler for POST / endpoint.
///
/// Re-renders the form with either the six results or the rejected field.
async fn form_submit_handler(
    State(state): State<AppState>,
    payload: Result<Form<WithholdingForm>, FormRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing form submission");

    let form = match payload {
        Ok(Form(form)) => form,
        Err(rejection) => {
            warn!(
                correlation_id = %correlation_id,
                error = %rejection.body_text(),
                "Form rejected"
            );
            let form = WithholdingForm::default();
            let error = EngineError::invalid_input("form", rejection.body_text());
            let page = FormPage {
                error: Some(&error),
                ..FormPage::blank(state.default_tax_year(), &form)
            };
            return (StatusCode::BAD_REQUEST, Html(render_form_page(&page))).into_response();
        }
    };

    // Title year for the re-rendered page
    let tax_year = match form.tax_year() {
        Ok(Some(year)) if state.tables(Some(year)).is_ok() => year,
        _ => state.default_tax_year(),
    };

    let outcome = form.tax_year().and_then(|year| {
        let inputs = WithholdingInputs::try_from(&form)?;
        let tables = state.tables(year)?;
        build_result(&inputs, tables, correlation_id)
    });

    match outcome {
        Ok(result) => {
            let page = FormPage {
                display: Some(&result.display),
                ..FormPage::blank(result.tax_year, &form)
            };
            Html(render_form_page(&page)).into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Form calculation rejected"
            );
            let status = error_status(&err);
            let page = FormPage {
                error: Some(&err),
                ..FormPage::blank(tax_year, &form)
            };
            (status, Html(render_form_page(&page))).into_response()
        }
    }
}

/// Handler for GET /tax-years endpoint.
async fn tax_years_handler(State(state): State<AppState>) -> Json<TaxYearsResponse> {
    let config = state.config();
    Json(TaxYearsResponse {
        publication: config.publication().clone(),
        default_tax_year: state.default_tax_year(),
        tax_years: config.years().cloned().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use axum::body::Body;
    use axum::http::Request;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use tower::ServiceExt;

    fn create_test_state() -> AppState {
        let config = ConfigLoader::load("./config/irs_15t").expect("Failed to load config");
        AppState::new(config)
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn json_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/calculate")
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_bytes(response: Response) -> axum::body::Bytes {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
    }

    /// API-001: a valid request returns 200 with the full result
    #[tokio::test]
    async fn test_api_001_valid_request_returns_200() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(json_request(
                r#"{ "gross_annual_salary": 100000, "filing_status": "single" }"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers().get("content-type").unwrap();
        assert_eq!(content_type, "application/json");

        let result: CalculationResult = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(result.tax_year, 2024);
        assert_eq!(result.result.federal_tax, dec("17400"));
        assert_eq!(result.result.total_tax, dec("25050"));
        assert_eq!(result.display.net_income, "$74,950");
        assert_eq!(result.display.effective_rate, "25.05%");
        assert_eq!(result.audit_trace.steps.len(), 6);
    }

    /// API-002: malformed JSON returns 400
    #[tokio::test]
    async fn test_api_002_malformed_json_returns_400() {
        let router = create_router(create_test_state());

        let response = router.oneshot(json_request("{invalid json")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    /// API-003: a missing salary is a validation error
    #[tokio::test]
    async fn test_api_003_missing_salary_returns_400() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(json_request(r#"{ "filing_status": "single" }"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(error.code, "VALIDATION_ERROR");
        assert!(
            error.message.contains("gross_annual_salary"),
            "Expected error message to name the field, got: {}",
            error.message
        );
    }

    /// API-004: an unknown tax year returns 400
    #[tokio::test]
    async fn test_api_004_unknown_tax_year_returns_400() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(json_request(
                r#"{ "gross_annual_salary": 1, "filing_status": "single", "tax_year": 1990 }"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(error.code, "TAX_YEAR_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_get_form_page() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = String::from_utf8(body_bytes(response).await.to_vec()).unwrap();
        assert!(html.contains("IRS 15-T Withholding Calculator (2024)"));
        assert!(html.contains("name=\"filing_status\""));
    }

    #[tokio::test]
    async fn test_tax_years_lists_loaded_years() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(Request::builder().uri("/tax-years").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: TaxYearsResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body.default_tax_year, 2024);
        assert_eq!(body.publication.code, "15-T");
        assert_eq!(body.tax_years.len(), 1);
        assert_eq!(body.tax_years[0].payroll.social_security_wage_base, dec("168600"));
    }
}
