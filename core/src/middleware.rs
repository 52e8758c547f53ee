//! Request middleware.
//!
//! A middleware takes the outgoing request by value and returns it, possibly
//! rewritten, or an error that aborts the request before it reaches the
//! transport. The chain is a fold over the registered middleware in
//! registration order that stops at the first error.

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::error::BoxError;
use crate::http::HttpRequest;

/// Header stamped by `RequestId`.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// A step run against every outgoing request before dispatch.
pub trait Middleware: Send + Sync {
    fn handle(&self, request: HttpRequest) -> Result<HttpRequest, BoxError>;
}

/// Run `chain` in order, stopping at the first failure.
pub(crate) fn run_chain(
    chain: &[Arc<dyn Middleware>],
    request: HttpRequest,
) -> Result<HttpRequest, BoxError> {
    chain
        .iter()
        .try_fold(request, |request, middleware| middleware.handle(request))
}

/// Middleware built from a closure. See [`from_fn`].
#[derive(Clone)]
pub struct FromFn<F> {
    f: F,
}

impl<F> fmt::Debug for FromFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FromFn").finish_non_exhaustive()
    }
}

/// Wrap a closure as middleware.
///
/// ```
/// use jsonapi_core::middleware::from_fn;
///
/// let tenant = from_fn(|request| Ok(request.with_header("x-tenant", "acme")));
/// # let _ = tenant;
/// ```
pub fn from_fn<F>(f: F) -> FromFn<F>
where
    F: Fn(HttpRequest) -> Result<HttpRequest, BoxError> + Send + Sync,
{
    FromFn { f }
}

impl<F> Middleware for FromFn<F>
where
    F: Fn(HttpRequest) -> Result<HttpRequest, BoxError> + Send + Sync,
{
    fn handle(&self, request: HttpRequest) -> Result<HttpRequest, BoxError> {
        (self.f)(request)
    }
}

/// Stamps `x-request-id` with a random v4 UUID unless the request has one.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestId;

impl Middleware for RequestId {
    fn handle(&self, mut request: HttpRequest) -> Result<HttpRequest, BoxError> {
        if request.header(REQUEST_ID_HEADER).is_none() {
            request.set_header(REQUEST_ID_HEADER, Uuid::new_v4().to_string());
        }
        Ok(request)
    }
}

/// Sets `authorization: Bearer <token>`. An empty token rejects the request.
#[derive(Clone)]
pub struct BearerAuth {
    token: String,
}

impl BearerAuth {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl fmt::Debug for BearerAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerAuth").field("token", &"<redacted>").finish()
    }
}

impl Middleware for BearerAuth {
    fn handle(&self, mut request: HttpRequest) -> Result<HttpRequest, BoxError> {
        if self.token.trim().is_empty() {
            return Err("bearer token is empty".into());
        }
        request.set_header("authorization", format!("Bearer {}", self.token));
        Ok(request)
    }
}
