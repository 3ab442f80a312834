//! Response types for the withholding API.
//!
//! This module defines the error response structures and error handling
//! for the HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::config::{PublicationMetadata, TaxYearTables};
use crate::error::EngineError;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response carrying `error`.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

/// The HTTP status an engine error maps to.
///
/// Input and tax-year errors are the caller's fault; configuration errors
/// are the server's.
pub fn error_status(error: &EngineError) -> StatusCode {
    match error {
        EngineError::InvalidInput { .. } | EngineError::TaxYearNotFound { .. } => {
            StatusCode::BAD_REQUEST
        }
        EngineError::ConfigNotFound { .. }
        | EngineError::ConfigParseError { .. }
        | EngineError::InvalidSchedule { .. }
        | EngineError::InvalidPayrollRates { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let status = error_status(&error);
        let error = match error {
            EngineError::InvalidInput { field, message } => ApiError::with_details(
                "INVALID_INPUT",
                format!("Invalid input '{}': {}", field, message),
                field,
            ),
            EngineError::TaxYearNotFound { year } => ApiError::with_details(
                "TAX_YEAR_NOT_FOUND",
                format!("Tax year not found: {}", year),
                format!("No withholding tables are loaded for {}", year),
            ),
            EngineError::ConfigNotFound { path } => ApiError::with_details(
                "CONFIG_ERROR",
                "Configuration error",
                format!("Configuration file not found: {}", path),
            ),
            EngineError::ConfigParseError { path, message } => ApiError::with_details(
                "CONFIG_ERROR",
                "Configuration parse error",
                format!("Failed to parse {}: {}", path, message),
            ),
            err @ EngineError::InvalidSchedule { .. } => ApiError::with_details(
                "CONFIG_ERROR",
                "Invalid withholding schedule",
                err.to_string(),
            ),
            err @ EngineError::InvalidPayrollRates { .. } => ApiError::with_details(
                "CONFIG_ERROR",
                "Invalid payroll rates",
                err.to_string(),
            ),
        };
        ApiErrorResponse { status, error }
    }
}

/// Body of `GET /tax-years`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxYearsResponse {
    /// Publication the tables come from.
    pub publication: PublicationMetadata,
    /// Year used when a request does not specify one.
    pub default_tax_year: i32,
    /// Every loaded year, oldest first.
    pub tax_years: Vec<TaxYearTables>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details")); // Should be skipped when None
    }

    #[test]
    fn test_api_error_with_details_serialization() {
        let error = ApiError::with_details("TEST_ERROR", "Test message", "Some details");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"details\":\"Some details\""));
    }

    #[test]
    fn test_invalid_input_names_field() {
        let api_error: ApiErrorResponse =
            EngineError::invalid_input("step4b_deductions", "must not be negative").into();
        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.error.code, "INVALID_INPUT");
        assert!(api_error.error.message.contains("step4b_deductions"));
        assert_eq!(api_error.error.details.as_deref(), Some("step4b_deductions"));
    }

    #[test]
    fn test_unknown_tax_year_is_bad_request() {
        let api_error: ApiErrorResponse = EngineError::TaxYearNotFound { year: 1999 }.into();
        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.error.code, "TAX_YEAR_NOT_FOUND");
    }

    #[test]
    fn test_config_errors_are_server_errors() {
        let api_error: ApiErrorResponse = EngineError::InvalidSchedule {
            tax_year: 2024,
            filing_status: "Single".to_string(),
            message: "bad base".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_error.error.code, "CONFIG_ERROR");
    }

    #[test]
    fn test_payroll_rate_errors_are_server_errors() {
        let api_error: ApiErrorResponse = EngineError::InvalidPayrollRates {
            tax_year: 2024,
            message: "medicare_rate 2 is outside [0, 1]".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_error.error.code, "CONFIG_ERROR");
        assert_eq!(api_error.error.message, "Invalid payroll rates");
    }
}
