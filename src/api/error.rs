use crate::core::error::ServiceError;
use crate::core::validation::ValidationError;
use crate::infrastructure::database::StoreError;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("malformed request: {0}")]
    Malformed(String),

    #[error("message not found")]
    NotFound,

    #[error("content rejected: {0}")]
    Rejected(String),

    #[error(transparent)]
    Store(StoreError),
}

#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub detail: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Malformed(_) | ApiError::Rejected(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound => ApiError::NotFound,
            ServiceError::Rejected(reason) => ApiError::Rejected(reason),
            ServiceError::Store(err) => ApiError::Store(err),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Malformed(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(ErrorBody {
                detail: self.to_string(),
            }),
        )
            .into_response()
    }
}
