//! Response types for HTTP handlers.

use aide::generate::GenContext;
use aide::openapi::Operation;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use cdb_postgres::types;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::extract::Json;

mod companies;
mod computers;
mod errors;
mod monitors;

pub use companies::*;
pub use computers::*;
pub use errors::*;
pub use monitors::*;

/// Generic paginated response wrapper.
///
/// Pages are zero-based; `totalPages` is zero for an empty listing.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[schemars(rename = "{T}Page")]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items in this page.
    pub elements: Vec<T>,
    /// Zero-based number of this page.
    pub current_page: i64,
    /// Number of pages in the whole listing.
    pub total_pages: i64,
    /// Number of items across all pages.
    pub total_elements: i64,
}

impl<T> Page<T> {
    /// Creates a page from a listing page, mapping items using the provided function.
    pub fn from_page<M, F>(page: types::Page<M>, f: F) -> Self
    where
        F: FnMut(M) -> T,
    {
        let page = page.map(f);
        Self {
            elements: page.elements,
            current_page: page.current_page,
            total_pages: page.total_pages,
            total_elements: page.total_elements,
        }
    }
}

/// `201 Created` response with a `Location` header and a JSON body.
#[must_use]
#[derive(Debug, Clone)]
pub struct Created<T> {
    location: String,
    body: T,
}

impl<T> Created<T> {
    /// Creates a response pointing at the created resource.
    pub fn new(location: impl Into<String>, body: T) -> Self {
        Self {
            location: location.into(),
            body,
        }
    }
}

impl<T> IntoResponse for Created<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        match HeaderValue::try_from(self.location) {
            Ok(location) => (
                StatusCode::CREATED,
                [(header::LOCATION, location)],
                Json(self.body),
            )
                .into_response(),
            Err(_) => (StatusCode::CREATED, Json(self.body)).into_response(),
        }
    }
}

impl<T> aide::OperationOutput for Created<T>
where
    T: JsonSchema + Serialize,
{
    type Inner = T;

    fn operation_response(
        ctx: &mut GenContext,
        operation: &mut Operation,
    ) -> Option<aide::openapi::Response> {
        <Json<T> as aide::OperationOutput>::operation_response(ctx, operation)
    }

    fn inferred_responses(
        ctx: &mut GenContext,
        operation: &mut Operation,
    ) -> Vec<(Option<u16>, aide::openapi::Response)> {
        <Self as aide::OperationOutput>::operation_response(ctx, operation)
            .map(|response| vec![(Some(201), response)])
            .unwrap_or_default()
    }
}
