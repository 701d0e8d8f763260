//! HTTP error handling with builder pattern for dynamic error responses.

use std::borrow::Cow;
use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::handler::response::{ErrorResponse, ValidationErrorDetail};

/// The error type for HTTP handlers in the server.
///
/// Carries the status family through its [`ErrorKind`], plus an optional
/// message, resource, internal context and per-field validation details.
#[derive(Clone)]
#[must_use = "errors do nothing unless serialized"]
pub struct Error<'a> {
    kind: ErrorKind,
    context: Option<Cow<'a, str>>,
    message: Option<Cow<'a, str>>,
    resource: Option<Cow<'a, str>>,
    validation: Option<Vec<ValidationErrorDetail>>,
}

impl Error<'static> {
    /// Creates a new [`Error`] with the specified kind.
    #[inline]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
            message: None,
            resource: None,
            validation: None,
        }
    }
}

impl<'a> Error<'a> {
    /// Attaches context information to the error.
    ///
    /// Context is logged but never sent to the client.
    #[inline]
    pub fn with_context(self, context: impl Into<Cow<'a, str>>) -> Self {
        Self {
            context: Some(context.into()),
            ..self
        }
    }

    /// Sets a custom user-friendly message for the error.
    #[inline]
    pub fn with_message(self, message: impl Into<Cow<'a, str>>) -> Self {
        Self {
            message: Some(message.into()),
            ..self
        }
    }

    /// Sets the resource that caused the error.
    #[inline]
    pub fn with_resource(self, resource: impl Into<Cow<'a, str>>) -> Self {
        Self {
            resource: Some(resource.into()),
            ..self
        }
    }

    /// Attaches per-field validation details.
    #[inline]
    pub fn with_validation(self, validation: Vec<ValidationErrorDetail>) -> Self {
        Self {
            validation: Some(validation),
            ..self
        }
    }

    /// Returns the error kind.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the context if present.
    #[inline]
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Returns the custom message if present.
    #[inline]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns the resource if present.
    #[inline]
    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    /// Returns the validation details if present.
    #[inline]
    pub fn validation(&self) -> Option<&[ValidationErrorDetail]> {
        self.validation.as_deref()
    }

    /// Converts this error into a static version by cloning all borrowed data.
    pub fn into_static(self) -> Error<'static> {
        Error {
            kind: self.kind,
            context: self.context.map(|c| Cow::Owned(c.into_owned())),
            message: self.message.map(|m| Cow::Owned(m.into_owned())),
            resource: self.resource.map(|r| Cow::Owned(r.into_owned())),
            validation: self.validation,
        }
    }
}

impl Default for Error<'static> {
    #[inline]
    fn default() -> Self {
        Self::new(ErrorKind::default())
    }
}

impl fmt::Debug for Error<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let response = self.kind.response();

        let mut debug_struct = f.debug_struct("Error");
        debug_struct
            .field("kind", &self.kind)
            .field("name", &response.name)
            .field("status", &response.status);

        if let Some(ref context) = self.context {
            debug_struct.field("context", context);
        }

        if let Some(ref message) = self.message {
            debug_struct.field("message", message);
        }

        if let Some(ref resource) = self.resource {
            debug_struct.field("resource", resource);
        }

        if let Some(ref validation) = self.validation {
            debug_struct.field("validation", validation);
        }

        debug_struct.finish()
    }
}

impl fmt::Display for Error<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let response = self.kind.response();
        let message = self.message.as_deref().unwrap_or("Unknown error");

        write!(f, "{} ({}): {}", response.name, response.status, message)?;

        if let Some(ref context) = self.context {
            write!(f, " - {}", context)?;
        }

        if let Some(ref resource) = self.resource {
            write!(f, " [resource: {}]", resource)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error<'_> {}

impl IntoResponse for Error<'_> {
    fn into_response(self) -> Response {
        let mut response = self.kind.response();

        if let Some(message) = self.message {
            response = response.with_message(message);
        }

        if let Some(resource) = self.resource {
            response = response.with_resource(resource);
        }

        if let Some(context) = self.context {
            response = response.with_context(context);
        }

        if let Some(validation) = self.validation {
            response = response.with_validation_errors(validation);
        }

        response.into_response()
    }
}

impl aide::OperationOutput for Error<'_> {
    type Inner = ErrorResponse<'static>;
}

impl From<ErrorKind> for Error<'static> {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

/// A specialized [`Result`] type for HTTP handlers.
///
/// [`Result`]: std::result::Result
pub type Result<T, E = Error<'static>> = std::result::Result<T, E>;

/// Enumeration of the HTTP error kinds the API produces.
#[must_use = "error kinds do nothing unless used to create errors"]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    // 4xx Client Errors
    /// 400 Bad Request - Missing required path parameter
    MissingPathParam,
    /// 400 Bad Request - Invalid request data
    BadRequest,
    /// 400 Bad Request - Business rules rejected the submitted record
    Validation,
    /// 404 Not Found - Resource not found
    NotFound,
    /// 413 Payload Too Large - Request body exceeds the limit
    PayloadTooLarge,
    /// 415 Unsupported Media Type - Body is not JSON
    UnsupportedMediaType,

    // 5xx Server Errors
    /// 500 Internal Server Error - Unexpected server error
    #[default]
    InternalServerError,
    /// 504 Gateway Timeout - The request took too long
    GatewayTimeout,
}

impl ErrorKind {
    /// Converts this error kind into a full [`Error`].
    #[inline]
    pub fn into_error(self) -> Error<'static> {
        Error::new(self)
    }

    /// Creates an [`Error`] with the specified context.
    #[inline]
    pub fn with_context<'a>(self, context: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error::new(self).with_context(context)
    }

    /// Creates an [`Error`] with the specified message.
    #[inline]
    pub fn with_message<'a>(self, message: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error::new(self).with_message(message)
    }

    /// Creates an [`Error`] with the specified resource.
    #[inline]
    pub fn with_resource<'a>(self, resource: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error::new(self).with_resource(resource)
    }

    /// Returns the HTTP status code for this error kind.
    #[inline]
    pub fn status_code(self) -> StatusCode {
        self.response().status
    }

    /// Returns the response template of this error kind.
    #[inline]
    pub fn response(self) -> ErrorResponse<'static> {
        match self {
            Self::MissingPathParam => ErrorResponse::MISSING_PATH_PARAM,
            Self::BadRequest => ErrorResponse::BAD_REQUEST,
            Self::Validation => ErrorResponse::VALIDATION_ERROR,
            Self::NotFound => ErrorResponse::NOT_FOUND,
            Self::PayloadTooLarge => ErrorResponse::PAYLOAD_TOO_LARGE,
            Self::UnsupportedMediaType => ErrorResponse::UNSUPPORTED_MEDIA_TYPE,
            Self::InternalServerError => ErrorResponse::INTERNAL_SERVER_ERROR,
            Self::GatewayTimeout => ErrorResponse::GATEWAY_TIMEOUT,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.response().name.as_ref())
    }
}

impl IntoResponse for ErrorKind {
    #[inline]
    fn into_response(self) -> Response {
        self.response().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_http_error() {
        let error = Error::default();
        assert_eq!(error.kind(), ErrorKind::InternalServerError);
        assert_eq!(
            error.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn error_builder_chaining() {
        let error = ErrorKind::NotFound
            .with_message("Computer 7 does not exist")
            .with_resource("computer")
            .with_context("id: 7");

        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert_eq!(error.message(), Some("Computer 7 does not exist"));
        assert_eq!(error.resource(), Some("computer"));
        assert_eq!(error.context(), Some("id: 7"));
        assert_eq!(error.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn std_fmt_display() {
        let error = ErrorKind::NotFound
            .with_message("Computer 7 does not exist")
            .with_resource("computer");

        let display = error.to_string();
        assert!(display.contains("not_found"));
        assert!(display.contains("404"));
        assert!(display.contains("Computer 7 does not exist"));
        assert!(display.contains("computer"));
    }

    #[test]
    fn validation_errors_are_bad_requests() {
        let error = ErrorKind::Validation.into_error().with_validation(vec![
            ValidationErrorDetail::new("name", "invalid", "Name should be filled!"),
        ]);

        assert_eq!(error.validation().map(<[_]>::len), Some(1));
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn error_into_static() {
        let error = ErrorKind::BadRequest
            .with_message("Test message".to_string())
            .with_resource("test_resource".to_string())
            .with_context("Test context".to_string());

        let static_error = error.into_static();
        assert_eq!(static_error.message(), Some("Test message"));
        assert_eq!(static_error.resource(), Some("test_resource"));
        assert_eq!(static_error.context(), Some("Test context"));
    }

    #[test]
    fn all_error_kinds_have_responses() {
        let kinds = [
            ErrorKind::MissingPathParam,
            ErrorKind::BadRequest,
            ErrorKind::Validation,
            ErrorKind::NotFound,
            ErrorKind::PayloadTooLarge,
            ErrorKind::UnsupportedMediaType,
            ErrorKind::InternalServerError,
            ErrorKind::GatewayTimeout,
        ];

        for kind in kinds {
            let response = kind.response();
            assert!(!response.name.is_empty());
            assert!(response.status.as_u16() >= 400);
            assert_eq!(kind.into_response().status(), response.status);
        }
    }
}
