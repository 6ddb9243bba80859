//! Error types for the sequence authority service.
//!
//! This module defines the central `Error` enum for the authority side of
//! the protocol and its conversion into HTTP responses. Domain rejections
//! (duplicates) answer HTTP 200 with `success: false` so clients can tell
//! them apart from transport failures; malformed requests and persistence
//! failures map to 4xx/5xx.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::SubmitResponse;

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for the sequence authority.
#[derive(Clone, thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
    /// The request was malformed or exceeded configured bounds.
    #[error("invalid request: {reason}")]
    InvalidRequest { reason: String },

    /// A submitted identifier is already recorded.
    #[error("duplicate identifier {uid}")]
    DuplicateIdentifier { uid: u64 },

    /// Writing the state file failed.
    #[error("state persistence failed: {context}")]
    Persistence { context: String },
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            // Domain rejection: protocol answers 200 + success: false.
            Error::DuplicateIdentifier { .. } => StatusCode::OK,
            Error::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            Error::Persistence { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(SubmitResponse::rejected(self.to_string()))).into_response()
    }
}
