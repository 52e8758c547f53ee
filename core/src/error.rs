//! Error types for the JSON API client.
//!
//! # Design
//! `Error` covers every failure that is not an HTTP error status: the request
//! could not be built, a middleware refused it, the transport failed, or a
//! successful response did not decode. HTTP error statuses are not errors in
//! this sense; they are reported as `Outcome::HttpError` with a decoded
//! `ApiError` payload.

use thiserror::Error;

/// Boxed error returned by middleware and custom transports.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Internal failures of a single request.
#[derive(Debug, Error)]
pub enum Error {
    /// `base_url + path + query` is not a valid absolute URL, or contains
    /// characters an HTTP request line cannot carry.
    #[error("invalid URL `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: BoxError,
    },

    /// The request payload could not be serialized to JSON.
    #[error("request serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// A middleware in the chain rejected the request.
    #[error("middleware rejected request: {0}")]
    Middleware(#[source] BoxError),

    /// The transport failed before a complete response was received.
    #[error("transport failed: {0}")]
    Transport(#[from] TransportError),

    /// A successful response body could not be deserialized into the target.
    #[error("response deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),
}

/// Errors raised by a `Transport`.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request could not be expressed as an HTTP message.
    #[error("invalid request: {0}")]
    Build(#[from] ureq::http::Error),

    /// Connection, DNS, TLS or timeout failure.
    #[error("request failed: {0}")]
    Request(#[source] ureq::Error),

    /// The response body could not be read to the end.
    #[error("reading response body failed: {0}")]
    Body(#[source] ureq::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Failure reported by a transport other than `UreqTransport`.
    #[error("{0}")]
    Custom(#[source] BoxError),
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn middleware_error_keeps_its_source() {
        let err = Error::Middleware("token expired".into());
        assert_eq!(err.to_string(), "middleware rejected request: token expired");
        assert_eq!(err.source().unwrap().to_string(), "token expired");
    }

    #[test]
    fn transport_error_converts_into_error() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err: Error = TransportError::from(io).into();
        assert!(matches!(err, Error::Transport(TransportError::Io(_))));
        assert_eq!(err.to_string(), "transport failed: refused");
    }

    #[test]
    fn invalid_url_names_the_url() {
        let source = url::Url::parse("not a url").unwrap_err();
        let err = Error::InvalidUrl {
            url: "not a url".to_string(),
            source: source.into(),
        };
        assert!(err.to_string().starts_with("invalid URL `not a url`"));
    }
}
