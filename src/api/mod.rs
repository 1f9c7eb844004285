use crate::api::error::ApiError;
use crate::core::validation::{Page, validate_page};
use async_trait::async_trait;
use axum::Router;
use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::Deserialize;

pub mod error;
pub mod messages;
pub mod stats;

/// All poll routes, relative to the mount point.
pub fn router() -> Router {
    Router::new()
        .merge(stats::router())
        .merge(messages::router())
}

#[derive(Deserialize, Debug, Default)]
struct PageQuery {
    limit: Option<String>,
    offset: Option<String>,
}

/// Validated `limit`/`offset` query parameters.
#[derive(Debug)]
pub struct ExtractPage(pub Page);

#[async_trait]
impl<S> FromRequestParts<S> for ExtractPage
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, ApiError> {
        let Query(query) = Query::<PageQuery>::try_from_uri(&parts.uri)
            .map_err(|rejection| ApiError::Malformed(rejection.body_text()))?;

        let page = validate_page(query.limit.as_deref(), query.offset.as_deref())?;
        Ok(ExtractPage(page))
    }
}
