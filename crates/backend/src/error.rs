//! Response envelopes and fault reporting.
//!
//! Every failure leaves the service as a `{success:false, message}` JSON
//! body with an operation-specific status code; the message strings are part
//! of the compatibility surface the storefront client depends on. Faults
//! (store, codec, issuer) are additionally logged and captured to Sentry -
//! the client only ever sees the generic message.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// JSON envelope for negative outcomes.
#[derive(Debug, Serialize)]
pub struct ApiMessage {
    pub success: bool,
    pub message: String,
}

/// Build a negative-outcome response.
///
/// Used for validation failures and business outcomes; these are expected
/// traffic and are deliberately not logged.
pub fn failure(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ApiMessage {
            success: false,
            message: message.to_owned(),
        }),
    )
        .into_response()
}

/// Build a generic-fault response, logging the underlying error.
///
/// The caller sees only `message`; the error detail goes to tracing and
/// Sentry.
pub fn fault<E>(status: StatusCode, message: &str, err: &E) -> Response
where
    E: std::error::Error + ?Sized,
{
    let event_id = sentry::capture_error(err);
    tracing::error!(
        error = %err,
        sentry_event_id = %event_id,
        "request failed"
    );
    failure(status, message)
}
