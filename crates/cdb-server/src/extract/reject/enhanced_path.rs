use axum::extract::rejection::PathRejection;
use axum::extract::{FromRequestParts, Path as AxumPath};
use axum::http::request::Parts;
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;

use super::sanitize_error_message;
use crate::handler::{Error, ErrorKind};

/// Path parameter extractor with improved error handling.
///
/// A non-numeric id in `/computers/{computerId}` becomes a `400` API error.
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct Path<T>(pub T);

impl<T> Path<T> {
    /// Creates a new instance of [`Path`].
    #[inline]
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    /// Returns the inner path parameters.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let extractor =
            <AxumPath<T> as FromRequestParts<S>>::from_request_parts(parts, state).await;
        extractor.map(|x| Self(x.0)).map_err(Into::into)
    }
}

impl From<PathRejection> for Error<'static> {
    fn from(rejection: PathRejection) -> Self {
        match rejection {
            PathRejection::FailedToDeserializePathParams(err) => {
                let error_message = err.body_text();
                ErrorKind::BadRequest
                    .with_message("Invalid path parameter format")
                    .with_context(format!(
                        "Path parameter deserialization failed: {}. {}",
                        sanitize_error_message(&error_message, 2, 150),
                        describe_deserialization_error(&error_message)
                    ))
            }
            PathRejection::MissingPathParams(err) => ErrorKind::MissingPathParam
                .with_message("Required path parameter missing")
                .with_context(sanitize_error_message(&err.body_text(), 2, 150)),
            _ => ErrorKind::InternalServerError
                .with_message("Path processing failed")
                .with_context("Unexpected error during path parameter processing"),
        }
    }
}

/// Adds type-specific guidance to a deserialization error.
fn describe_deserialization_error(error_message: &str) -> &'static str {
    let error_lower = error_message.to_lowercase();

    if error_lower.contains("invalid digit") || error_lower.contains("cannot parse") {
        "Identifiers must be whole numbers"
    } else {
        "Check that the parameter format matches the expected type definition"
    }
}

impl<T> aide::OperationInput for Path<T>
where
    T: schemars::JsonSchema,
{
    fn operation_input(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) {
        <AxumPath<T> as aide::OperationInput>::operation_input(ctx, operation);
    }

    fn inferred_early_responses(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Vec<(Option<u16>, aide::openapi::Response)> {
        <AxumPath<T> as aide::OperationInput>::inferred_early_responses(ctx, operation)
    }
}
