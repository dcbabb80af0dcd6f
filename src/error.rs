use std::io;

use http::status::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Error as JsonError;
use thiserror::Error;
use url::ParseError as UrlParseError;

pub type Result<T> = std::result::Result<T, CivicError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
pub enum CivicError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("File System error: {0}")]
    Io(String),
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),
    #[error("Expected {field} attribute for {record_type}, none found.")]
    MissingField { field: String, record_type: String },
    #[error("Record of type {0} cannot be fetched by id")]
    NotFetchable(String),
    #[error("(De)Serialization error: {0}")]
    Serialization(String),
    #[error("Transport error{}: {message}", status_suffix(.status))]
    Transport {
        status: Option<u16>,
        message: String,
    },
    #[error("{record_type} has no attribute {field}")]
    UnknownField { field: String, record_type: String },
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({s})")).unwrap_or_default()
}

impl CivicError {
    pub fn missing_field(field: &str, record_type: &str) -> Self {
        CivicError::MissingField {
            field: field.to_string(),
            record_type: record_type.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            CivicError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CivicError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CivicError::MalformedPayload(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CivicError::MissingField { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            CivicError::NotFetchable(_) => StatusCode::BAD_REQUEST,
            CivicError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CivicError::Transport { status, .. } => status
                .and_then(|s| StatusCode::from_u16(s).ok())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            CivicError::UnknownField { .. } => StatusCode::NOT_FOUND,
        }
    }

    /// True for failures raised by the remote fetcher rather than by record construction.
    pub fn is_transport(&self) -> bool {
        matches!(self, CivicError::Transport { .. })
    }
}

impl From<toml::de::Error> for CivicError {
    fn from(src: toml::de::Error) -> CivicError {
        CivicError::Config(format!("Toml deserialization error: {src}"))
    }
}

impl From<JsonError> for CivicError {
    fn from(src: JsonError) -> CivicError {
        CivicError::Serialization(format!("JSON (de)serialization error: {src}"))
    }
}

impl From<UrlParseError> for CivicError {
    fn from(src: UrlParseError) -> CivicError {
        CivicError::Config(format!("Invalid URL: {src}"))
    }
}

impl From<reqwest::Error> for CivicError {
    fn from(src: reqwest::Error) -> CivicError {
        CivicError::Transport {
            status: src.status().map(|s| s.as_u16()),
            message: format!("{src}"),
        }
    }
}

impl From<io::Error> for CivicError {
    fn from(x: io::Error) -> Self {
        CivicError::Io(format!("IOError: {}: {x}", x.kind()))
    }
}
