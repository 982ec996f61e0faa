//! Custom Axum extractors

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use super::error::ApiError;
use crate::models::SnippetId;

/// Extract a snippet id from the path.
///
/// Anything that is not a positive integer is answered with 404, the same
/// as an id that was never inserted.
pub struct ValidSnippetId(pub SnippetId);

impl<S> FromRequestParts<S> for ValidSnippetId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| not_found(String::new()))?;

        SnippetId::parse(&raw)
            .map(Self)
            .map_err(|_| not_found(raw))
    }
}

fn not_found(id: String) -> ApiError {
    ApiError::NotFound {
        resource: "snippet",
        id,
    }
}
