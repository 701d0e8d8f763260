use axum::extract::rejection::QueryRejection;
use axum::extract::{FromRequestParts, Query as AxumQuery};
use axum::http::request::Parts;
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;

use crate::handler::{Error, ErrorKind};

/// Tracing target for query extraction.
const TRACING_TARGET: &str = "cdb_server::extract::query";

/// Query parameter extractor with improved error handling.
///
/// ```rust,no_run
/// use cdb_server::extract::Query;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct SearchParams {
///     search: Option<String>,
///     page: Option<i64>,
/// }
///
/// // Route: /computers?search=apple&page=2
/// async fn search(Query(params): Query<SearchParams>) {
///     let _ = (params.search, params.page);
/// }
/// ```
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct Query<T>(pub T);

impl<T> Query<T> {
    /// Creates a new [`Query`] wrapper around the provided query parameters.
    #[inline]
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    /// Consumes the wrapper and returns the inner query parameters.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match AxumQuery::<T>::from_request_parts(parts, state).await {
            Ok(AxumQuery(query)) => Ok(Query(query)),
            Err(rejection) => Err(enhance_query_error(rejection)),
        }
    }
}

/// Converts a query rejection into an API error naming the offending parameter.
fn enhance_query_error(rejection: QueryRejection) -> Error<'static> {
    tracing::debug!(
        target: TRACING_TARGET,
        error = %rejection,
        "query parameter parsing failed"
    );

    match rejection {
        QueryRejection::FailedToDeserializeQueryString(err) => {
            let error_message = err.body_text();

            if error_message.contains("invalid digit") || error_message.contains("invalid type") {
                ErrorKind::BadRequest
                    .with_message("Invalid query parameter type")
                    .with_context(error_message)
            } else if error_message.contains("duplicate field") {
                let field_name = extract_field_name_from_error(&error_message);
                ErrorKind::BadRequest
                    .with_message("Duplicate query parameter")
                    .with_context(format!(
                        "The query parameter '{}' was provided multiple times",
                        field_name.unwrap_or("unknown")
                    ))
            } else {
                ErrorKind::BadRequest
                    .with_message("Invalid query parameters")
                    .with_context(error_message)
            }
        }
        _ => ErrorKind::BadRequest.with_message("Invalid query parameters"),
    }
}

/// Extracts the field name quoted in a serde error message.
fn extract_field_name_from_error(error_message: &str) -> Option<&str> {
    let start = error_message.find('`')?;
    let end = error_message[start + 1..].find('`')?;
    Some(&error_message[start + 1..start + 1 + end])
}

impl<T> aide::OperationInput for Query<T>
where
    T: schemars::JsonSchema,
{
    fn operation_input(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) {
        <AxumQuery<T> as aide::OperationInput>::operation_input(ctx, operation);
    }

    fn inferred_early_responses(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Vec<(Option<u16>, aide::openapi::Response)> {
        <AxumQuery<T> as aide::OperationInput>::inferred_early_responses(ctx, operation)
    }
}
