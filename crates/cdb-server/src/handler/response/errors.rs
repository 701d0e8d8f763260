use std::borrow::Cow;
use std::collections::HashMap;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use schemars::JsonSchema;
use serde::Serialize;
use validator::ValidationErrors;

/// Tracing target for error responses.
const TRACING_TARGET: &str = "cdb_server::handler::response";

/// Validation error details for field-specific errors.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct ValidationErrorDetail {
    /// Field name that failed validation
    pub field: String,
    /// Error code for the validation failure
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Additional parameters related to the validation error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<HashMap<String, serde_json::Value>>,
}

impl ValidationErrorDetail {
    /// Creates a detail without parameters.
    pub fn new(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
            params: None,
        }
    }
}

/// HTTP error response body.
///
/// The context and status are kept for logging and never serialized.
#[must_use = "error responses do nothing unless serialized"]
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse<'a> {
    /// The error name/type identifier
    pub name: Cow<'a, str>,
    /// User-friendly error message safe for client display
    pub message: Cow<'a, str>,
    /// The resource that the error relates to (optional, set by handler)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<Cow<'a, str>>,
    /// Helpful suggestion for resolving the error (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<Cow<'a, str>>,
    /// Validation error details for field-specific errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<Vec<ValidationErrorDetail>>,

    /// Internal context for debugging (optional, not exposed to client)
    #[serde(skip)]
    pub context: Option<Cow<'a, str>>,
    /// HTTP status code (not serialized in JSON)
    #[serde(skip)]
    pub status: StatusCode,
}

impl<'a> ErrorResponse<'a> {
    // 4xx Client Errors
    pub const BAD_REQUEST: Self = Self::new(
        "bad_request",
        "Invalid request data.",
        StatusCode::BAD_REQUEST,
    );
    pub const MISSING_PATH_PARAM: Self = Self::new(
        "missing_path_param",
        "Missing path parameter.",
        StatusCode::BAD_REQUEST,
    );
    pub const NOT_FOUND: Self =
        Self::new("not_found", "Resource not found.", StatusCode::NOT_FOUND);
    pub const PAYLOAD_TOO_LARGE: Self = Self::new(
        "payload_too_large",
        "Payload too large.",
        StatusCode::PAYLOAD_TOO_LARGE,
    );
    pub const UNSUPPORTED_MEDIA_TYPE: Self = Self::new(
        "unsupported_media_type",
        "Unsupported media type.",
        StatusCode::UNSUPPORTED_MEDIA_TYPE,
    );
    pub const VALIDATION_ERROR: Self = Self::new(
        "validation_error",
        "Validation failed.",
        StatusCode::BAD_REQUEST,
    );
    // 5xx Server Errors
    pub const GATEWAY_TIMEOUT: Self = Self::new(
        "gateway_timeout",
        "Request timed out.",
        StatusCode::GATEWAY_TIMEOUT,
    );
    pub const INTERNAL_SERVER_ERROR: Self = Self::new(
        "internal_server_error",
        "Internal server error.",
        StatusCode::INTERNAL_SERVER_ERROR,
    );

    /// Creates a new error response.
    #[inline]
    pub const fn new(name: &'a str, message: &'a str, status: StatusCode) -> Self {
        Self {
            name: Cow::Borrowed(name),
            message: Cow::Borrowed(message),
            resource: None,
            context: None,
            suggestion: None,
            validation: None,
            status,
        }
    }

    /// Sets the resource, appending to an existing one with a `/`.
    pub fn with_resource(mut self, resource: impl Into<Cow<'a, str>>) -> Self {
        let new_resource = resource.into();
        self.resource = Some(match self.resource {
            Some(existing) => Cow::Owned(format!("{}/{}", existing, new_resource)),
            None => new_resource,
        });
        self
    }

    /// Appends a sentence to the message.
    pub fn with_message(mut self, message: impl Into<Cow<'a, str>>) -> Self {
        let new_message = message.into();
        let base = self.message.trim_end_matches('.');
        self.message = Cow::Owned(format!("{}. {}", base, new_message));
        self
    }

    /// Attaches context, appending to an existing one with a `;`.
    pub fn with_context(mut self, context: impl Into<Cow<'a, str>>) -> Self {
        let new_context = context.into();
        self.context = Some(match self.context {
            Some(existing) => Cow::Owned(format!("{}; {}", existing, new_context)),
            None => new_context,
        });
        self
    }

    /// Attaches a suggestion, appending to an existing one with a `;`.
    pub fn with_suggestion(mut self, suggestion: impl Into<Cow<'a, str>>) -> Self {
        let new_suggestion = suggestion.into();
        self.suggestion = Some(match self.suggestion {
            Some(existing) => Cow::Owned(format!("{}; {}", existing, new_suggestion)),
            None => new_suggestion,
        });
        self
    }

    /// Adds validation errors to the error response.
    pub fn with_validation_errors(mut self, errors: Vec<ValidationErrorDetail>) -> Self {
        self.validation = Some(errors);
        self
    }

    /// Creates an error response from validator ValidationErrors.
    pub fn from_validation_errors(validation_errors: &ValidationErrors) -> Self {
        Self::VALIDATION_ERROR.with_validation_errors(validation_details(validation_errors))
    }
}

/// Flattens `validator` errors into per-field details.
pub fn validation_details(validation_errors: &ValidationErrors) -> Vec<ValidationErrorDetail> {
    let mut error_details = Vec::new();

    for (field, field_errors) in validation_errors.field_errors() {
        for error in field_errors {
            let params: HashMap<String, serde_json::Value> = error
                .params
                .iter()
                .map(|(key, value)| (key.to_string(), value.clone()))
                .collect();

            error_details.push(ValidationErrorDetail {
                field: field.to_string(),
                code: error.code.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Validation failed for field '{}'", field)),
                params: (!params.is_empty()).then_some(params),
            });
        }
    }

    error_details
}

impl Default for ErrorResponse<'_> {
    #[inline]
    fn default() -> Self {
        Self::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for ErrorResponse<'_> {
    fn into_response(self) -> Response {
        // Server errors are logged where they happen: the store and the recovery layer.
        tracing::debug!(
            target: TRACING_TARGET,
            status = %self.status,
            name = %self.name,
            message = %self.message,
            resource = ?self.resource,
            context = ?self.context,
            "HTTP error response"
        );

        (self.status, Json(self)).into_response()
    }
}
