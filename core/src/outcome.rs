//! Terminal result of a request.
//!
//! # Design
//! Every request ends in exactly one `Outcome`: success, an HTTP error status
//! with its decoded `ApiError`, or an internal `Error`. Callers either match on
//! the value or hand three callbacks to `Outcome::dispatch`, which calls
//! exactly one of them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;
use crate::http::HttpResponse;

/// Error payload of a response with status 300 or above.
///
/// The wire format is `{"error": <kind>, "status": <code>, "message": <text>}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(rename = "error")]
    pub kind: String,
    pub status: u16,
    pub message: String,
}

/// Error body as it appears on the wire; any field may be missing.
#[derive(Deserialize)]
struct WireError {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    status: Option<u16>,
    #[serde(default)]
    message: Option<String>,
}

impl ApiError {
    /// Decode the error payload of `response`.
    ///
    /// Fields missing from a JSON body fall back to the response status and
    /// its reason phrase. A body that is not a JSON error object yields the
    /// response status, the raw body text as message and the reason phrase as
    /// kind.
    pub fn from_response(response: &HttpResponse) -> Self {
        // Only a JSON object counts as an error body; serde would otherwise
        // accept an array as a tuple of the struct's fields.
        let decoded = serde_json::from_slice::<Map<String, Value>>(&response.body)
            .and_then(|object| serde_json::from_value::<WireError>(Value::Object(object)));
        match decoded {
            Ok(wire) => Self {
                kind: wire.error.unwrap_or_else(|| response.reason.clone()),
                status: wire.status.unwrap_or(response.status),
                message: wire.message.unwrap_or_else(|| response.reason.clone()),
            },
            Err(_) => Self {
                kind: response.reason.clone(),
                status: response.status,
                message: response.text().into_owned(),
            },
        }
    }
}

/// How a request ended.
#[derive(Debug)]
#[must_use]
pub enum Outcome {
    /// Status below 300 and the body, if any, decoded into the target.
    Success,
    /// Status 300 or above.
    HttpError(ApiError),
    /// The request failed before or after the HTTP exchange.
    InternalError(Error),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }

    pub fn http_error(&self) -> Option<&ApiError> {
        match self {
            Outcome::HttpError(error) => Some(error),
            _ => None,
        }
    }

    pub fn internal_error(&self) -> Option<&Error> {
        match self {
            Outcome::InternalError(error) => Some(error),
            _ => None,
        }
    }

    /// Invoke the callback matching this outcome.
    ///
    /// `on_http_error` receives `(status, message, kind)`.
    pub fn dispatch<S, H, I>(self, on_success: S, on_http_error: H, on_internal_error: I)
    where
        S: FnOnce(),
        H: FnOnce(u16, String, String),
        I: FnOnce(Error),
    {
        match self {
            Outcome::Success => on_success(),
            Outcome::HttpError(error) => on_http_error(error.status, error.message, error.kind),
            Outcome::InternalError(error) => on_internal_error(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[test]
    fn decodes_full_error_body() {
        let response = HttpResponse::new(
            404,
            r#"{"error":"not_found","status":404,"message":"missing"}"#,
        );
        let error = ApiError::from_response(&response);
        assert_eq!(
            error,
            ApiError {
                kind: "not_found".to_string(),
                status: 404,
                message: "missing".to_string(),
            }
        );
    }

    #[test]
    fn missing_fields_fall_back_to_status_line() {
        let response = HttpResponse::new(422, r#"{"message":"title is required"}"#);
        let error = ApiError::from_response(&response);
        assert_eq!(error.status, 422);
        assert_eq!(error.message, "title is required");
        assert_eq!(error.kind, "Unprocessable Entity");
    }

    #[test]
    fn non_json_body_becomes_message() {
        let response = HttpResponse::new(500, "boom");
        let error = ApiError::from_response(&response);
        assert_eq!(error.status, 500);
        assert_eq!(error.message, "boom");
        assert_eq!(error.kind, "Internal Server Error");
    }

    #[test]
    fn wrongly_typed_field_uses_raw_fallback() {
        let response = HttpResponse::new(400, r#"{"status":"bad"}"#);
        let error = ApiError::from_response(&response);
        assert_eq!(error.status, 400);
        assert_eq!(error.message, r#"{"status":"bad"}"#);
        assert_eq!(error.kind, "Bad Request");
    }

    #[test]
    fn array_body_is_not_an_error_object() {
        for body in ["[]", r#"["not_found",404,"missing"]"#] {
            let error = ApiError::from_response(&HttpResponse::new(500, body));
            assert_eq!(error.status, 500);
            assert_eq!(error.message, body);
            assert_eq!(error.kind, "Internal Server Error");
        }
    }

    #[test]
    fn dispatch_calls_exactly_one_callback() {
        let calls = RefCell::new(Vec::new());
        let outcome = Outcome::HttpError(ApiError {
            kind: "not_found".to_string(),
            status: 404,
            message: "missing".to_string(),
        });
        outcome.dispatch(
            || calls.borrow_mut().push("success".to_string()),
            |status, message, kind| calls.borrow_mut().push(format!("{status} {message} {kind}")),
            |err| calls.borrow_mut().push(format!("internal {err}")),
        );
        assert_eq!(calls.into_inner(), vec!["404 missing not_found".to_string()]);
    }

    #[test]
    fn accessors_match_variant() {
        assert!(Outcome::Success.is_success());
        assert!(Outcome::Success.http_error().is_none());
        let internal = Outcome::InternalError(Error::Middleware("nope".into()));
        assert!(internal.internal_error().is_some());
        assert!(!internal.is_success());
    }
}
