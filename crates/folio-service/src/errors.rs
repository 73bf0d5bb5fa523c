use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::validation::ValidationError;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("Could not open document store: {0}")]
    Connection(#[from] diesel::ConnectionError),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Document {collection}/{id} has a malformed body: {source}")]
    MalformedDocument {
        collection: String,
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Document store connection is poisoned")]
    Poisoned,

    #[error("Document store unavailable: {0}")]
    Unavailable(String),
}

/// Rejected service construction.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Field `{0}` cannot be empty")]
    EmptyField(&'static str),

    #[error("Route must start with '/' and carry no query string: {0}")]
    InvalidRoute(String),

    #[error("Duplicate id in mock data: {0}")]
    DuplicateMockId(String),

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Unknown {key} value: {value}")]
    UnknownValue { key: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP status {code}: {body}")]
    HttpStatus { code: u16, body: String },

    #[error("Could not decode {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Document store error: {0}")]
    Store(#[from] StoreError),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Missing field in response: {0}")]
    MissingField(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::HttpStatus { code, .. } => *code == 404,
            _ => false,
        }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Document store error: {0}")]
    StoreError(#[from] StoreError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found")]
    NotFound,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::BadRequest(ref message) => (StatusCode::BAD_REQUEST, message.clone()),
            ApiError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::StoreError(ref err) => {
                // Log the detailed error but don't expose it to the client
                error!(error = %err, "Document store error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
