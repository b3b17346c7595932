//! Error responses.
//!
//! # Responsibilities
//! - Map store error kinds to HTTP status codes
//! - Map extractor rejections (bad JSON, wrong content type, oversized body)
//! - Log failed requests at a level matching their status
//!
//! # Status Mapping
//! - NotFound → 404, InvalidInput → 400, Internal → 500
//! - Missing JSON content type → 415, body over the limit → 413

use axum::{
    extract::rejection::{BytesRejection, JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::store::StoreError;

/// Error returned by request handlers.
#[derive(Debug)]
pub enum ApiError {
    Store(StoreError),
    Rejected { status: StatusCode, message: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            ApiError::Store(StoreError::Internal(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Rejected { status, .. } => *status,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(e) => StoreError::invalid(e.body_text()).into(),
            JsonRejection::JsonSyntaxError(e) => StoreError::invalid(e.body_text()).into(),
            other => ApiError::Rejected {
                status: other.status(),
                message: other.body_text(),
            },
        }
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        StoreError::invalid(rejection.body_text()).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::Store(err) => err.to_string(),
            ApiError::Rejected { message, .. } => message,
        };

        if status.is_server_error() {
            tracing::error!(status = %status, error = %message, "Request failed");
        } else {
            tracing::warn!(status = %status, error = %message, "Request rejected");
        }

        (status, message).into_response()
    }
}
