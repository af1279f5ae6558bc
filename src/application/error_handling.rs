// src/application/error_handling.rs
//
// Error Handling for Commands
//
// ARCHITECTURE:
// - Maps internal errors → user-facing responses
// - Provides a consistent error format for plain and JSON output
// - Never exposes storage internals
// - Logs errors for debugging

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::integrations::SearchError;
use crate::services::StoreError;

/// Standard error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error_type: ErrorType,
    pub message: String,
    pub details: Option<String>,
}

/// Error categories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// Movie not found
    NotFound,

    /// Invalid input
    Validation,

    /// Domain invariant violation
    DomainError,

    /// Store contract violation (duplicate id)
    Conflict,

    /// Database/persistence error
    Database,

    /// Movie provider error
    ExternalService,

    /// File system error
    FileSystem,

    /// Other/unknown error
    Internal,
}

impl ErrorResponse {
    fn new(error_type: ErrorType, message: impl Into<String>, details: Option<String>) -> Self {
        Self {
            success: false,
            error_type,
            message: message.into(),
            details,
        }
    }

    /// Create error response from AppError
    pub fn from_app_error(error: AppError) -> Self {
        match error {
            AppError::NotFound(id) => Self::not_found(&id),

            AppError::Domain(domain_error) => Self::new(
                ErrorType::DomainError,
                "Domain validation failed",
                Some(domain_error.to_string()),
            ),

            AppError::View(view_error) => Self::validation(view_error.to_string()),

            AppError::Store(StoreError::DuplicateId(id)) => Self::new(
                ErrorType::Conflict,
                "Movie is already in the collection",
                Some(id),
            ),

            AppError::Store(store_error) => Self::validation(store_error.to_string()),

            AppError::Search(SearchError::EmptyQuery) => Self::validation("Enter a keyword."),

            AppError::Search(search_error) => Self::new(
                ErrorType::ExternalService,
                "Movie provider error",
                Some(search_error.to_string()),
            ),

            AppError::Database(db_error) => {
                log::error!("Database error: {:?}", db_error);
                Self::new(
                    ErrorType::Database,
                    "Database operation failed",
                    Some("Check logs for details".to_string()),
                )
            }

            AppError::Pool(pool_error) => {
                log::error!("Connection pool error: {}", pool_error);
                Self::new(ErrorType::Database, "Database connection failed", None)
            }

            AppError::Serialization(serde_error) => {
                log::error!("Serialization error: {:?}", serde_error);
                Self::new(ErrorType::Internal, "Data serialization failed", None)
            }

            AppError::Io(io_error) => {
                log::error!("IO error: {:?}", io_error);
                Self::new(
                    ErrorType::FileSystem,
                    "File system operation failed",
                    Some(io_error.to_string()),
                )
            }

            AppError::Other(message) => {
                log::error!("Other error: {}", message);
                Self::new(ErrorType::Internal, message, None)
            }
        }
    }

    /// Create validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorType::Validation, message, None)
    }

    /// Create not found error
    pub fn not_found(id: &str) -> Self {
        Self::new(
            ErrorType::NotFound,
            "Movie not found",
            Some(id.to_string()),
        )
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "Internal error".to_string())
    }
}

/// Helper trait to convert Results to ErrorResponse
pub trait ToErrorResponse<T> {
    fn to_error_response(self) -> Result<T, ErrorResponse>;
}

impl<T> ToErrorResponse<T> for Result<T, AppError> {
    fn to_error_response(self) -> Result<T, ErrorResponse> {
        self.map_err(ErrorResponse::from_app_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DomainError, ViewError};

    #[test]
    fn test_not_found_error() {
        let error = ErrorResponse::from_app_error(AppError::NotFound("tt1".to_string()));
        assert_eq!(error.error_type, ErrorType::NotFound);
        assert_eq!(error.message, "Movie not found");
        assert_eq!(error.details.as_deref(), Some("tt1"));
    }

    #[test]
    fn test_validation_error() {
        let error = ErrorResponse::validation("Invalid input");
        assert_eq!(error.error_type, ErrorType::Validation);
        assert_eq!(error.message, "Invalid input");
    }

    #[test]
    fn test_category_mapping() {
        let cases = vec![
            (
                AppError::View(ViewError::InvalidFilter("x".to_string())),
                ErrorType::Validation,
            ),
            (
                AppError::Domain(DomainError::RatingOutOfRange(11)),
                ErrorType::DomainError,
            ),
            (
                AppError::Store(StoreError::DuplicateId("tt1".to_string())),
                ErrorType::Conflict,
            ),
            (
                AppError::Store(StoreError::IndexOutOfRange { index: 9, len: 2 }),
                ErrorType::Validation,
            ),
            (
                AppError::Search(SearchError::Network("reset".to_string())),
                ErrorType::ExternalService,
            ),
            (AppError::Search(SearchError::EmptyQuery), ErrorType::Validation),
            (AppError::Pool("timeout".to_string()), ErrorType::Database),
        ];

        for (error, expected) in cases {
            assert_eq!(ErrorResponse::from_app_error(error).error_type, expected);
        }
    }

    #[test]
    fn test_serialization() {
        let json = ErrorResponse::not_found("tt1").to_json();
        assert!(json.contains("not_found"));
        assert!(json.contains("Movie not found"));
    }

    #[test]
    fn test_result_conversion() {
        let result: Result<(), AppError> = Err(AppError::Other("boom".to_string()));
        let error = result.to_error_response().unwrap_err();
        assert_eq!(error.error_type, ErrorType::Internal);
    }
}
