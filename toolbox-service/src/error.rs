use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Main service error type
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0}")]
    Database(#[from] DatabaseError),

    #[error("{0}")]
    InvalidTool(#[from] ToolError),

    #[error("{message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Database errors
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database connection failed: {0}")]
    Connection(#[source] rusqlite::Error),

    #[error("Cannot create database directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Query failed: {0}")]
    Query(#[source] rusqlite::Error),

    #[error("Migration failed: {message}")]
    Migration { message: String },

    #[error("Serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("Stored document is not valid JSON: {0}")]
    CorruptDocument(#[source] serde_json::Error),
}

/// Errors raised while turning a raw store document into a [`crate::tools::Tool`]
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Tool document must be a JSON object")]
    NotAnObject,

    #[error("Invalid tool document: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("Tool name must not be empty")]
    EmptyName,
}

/// API error body.
///
/// `detail` carries the error's display string, the same field web clients of
/// this API already read for failures.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub detail: String,
    pub code: String,
}

impl ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ServiceError::Database(_) => "database_error",
            ServiceError::InvalidTool(_) => "invalid_tool",
            ServiceError::Validation { .. } => "validation_error",
            ServiceError::Config { .. } => "config_error",
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let response = ErrorResponse {
            detail: self.to_string(),
            code: self.error_code().to_string(),
        };

        (status, Json(response)).into_response()
    }
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
