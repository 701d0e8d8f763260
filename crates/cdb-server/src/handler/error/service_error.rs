//! Service error to HTTP error conversion.
//!
//! Store failures are already logged by the store with their operation, so
//! only configuration failures are logged at error level here.

use super::http_error::{Error as HttpError, ErrorKind};
use crate::handler::response::ValidationErrorDetail;
use crate::service::ValidationResult;

/// Tracing target for service error conversions.
const TRACING_TARGET: &str = "cdb_server::handler::service";

impl From<crate::Error> for HttpError<'static> {
    fn from(error: crate::Error) -> Self {
        use crate::ErrorKind as ServiceErrorKind;

        match error.kind() {
            ServiceErrorKind::Caller => {
                tracing::debug!(target: TRACING_TARGET, error = %error, "rejected request");
                ErrorKind::BadRequest.with_message(error.message().to_owned())
            }
            ServiceErrorKind::NotFound => {
                tracing::debug!(target: TRACING_TARGET, error = %error, "resource not found");
                ErrorKind::NotFound.with_message(error.message().to_owned())
            }
            ServiceErrorKind::Store => {
                tracing::debug!(target: TRACING_TARGET, error = %error, "store operation failed");
                ErrorKind::InternalServerError
                    .with_message("Store operation failed")
                    .with_context(error.message().to_owned())
            }
            ServiceErrorKind::Config => {
                tracing::error!(target: TRACING_TARGET, error = %error, "invalid service configuration");
                ErrorKind::InternalServerError
                    .with_message("Invalid service configuration")
                    .with_context(error.message().to_owned())
            }
        }
    }
}

impl From<ValidationResult> for HttpError<'static> {
    fn from(result: ValidationResult) -> Self {
        let details = result
            .iter()
            .map(|(field, message)| ValidationErrorDetail::new(field, "invalid", message))
            .collect();

        ErrorKind::Validation
            .with_resource("computer")
            .with_validation(details)
    }
}
