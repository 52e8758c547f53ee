//! JSON API client: base URL, static headers, middleware and a transport.
//!
//! # Design
//! `Client` holds cross-request configuration only. Each verb method borrows
//! the client immutably, so one client can serve many threads at once;
//! configuration changes (`use_middleware`) need `&mut self` and therefore
//! happen before the client is shared.
//!
//! The transport is injected, never global. Clients that should share a
//! connection pool share one `Arc<dyn Transport>`.
//!
//! Response bodies decode into a caller-owned target. Pass
//! `&mut serde::de::IgnoredAny` when the body does not matter.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::executor::{self, Call};
use crate::http::HttpMethod;
use crate::middleware::Middleware;
use crate::outcome::Outcome;
use crate::params::Params;
use crate::transport::Transport;

/// Client for a JSON REST API rooted at `base_url`.
#[derive(Clone)]
pub struct Client {
    base_url: String,
    headers: BTreeMap<String, String>,
    middleware: Vec<Arc<dyn Middleware>>,
    transport: Arc<dyn Transport>,
}

impl Client {
    /// Client with no static headers and no middleware. A trailing `/` on
    /// `base_url` is dropped so paths can start with `/`.
    pub fn new(base_url: &str, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            headers: BTreeMap::new(),
            middleware: Vec::new(),
            transport,
        }
    }

    /// Add a header sent with every request. Overrides per-call headers and
    /// any earlier client header of the same name, ignoring case.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert_header(name.into(), value.into());
        self
    }

    pub fn with_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in headers {
            self.insert_header(name.into(), value.into());
        }
        self
    }

    fn insert_header(&mut self, name: String, value: String) {
        self.headers.retain(|key, _| !key.eq_ignore_ascii_case(&name));
        self.headers.insert(name, value);
    }

    pub fn with_middleware<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.use_middleware(middleware);
        self
    }

    /// Append `middleware` to the chain. Middleware runs in the order it was
    /// added; adding the same middleware twice runs it twice.
    pub fn use_middleware<M: Middleware + 'static>(&mut self, middleware: M) -> &mut Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub(crate) fn middleware(&self) -> &[Arc<dyn Middleware>] {
        &self.middleware
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// URL a request for `path` with `params` is sent to.
    pub fn url_for(&self, path: &str, params: &Params) -> String {
        executor::compose_url(&self.base_url, path, params)
    }

    /// Start a request with one-off headers.
    pub fn request(&self) -> RequestBuilder<'_> {
        RequestBuilder {
            client: self,
            headers: Vec::new(),
        }
    }

    pub fn get<T: DeserializeOwned>(&self, path: &str, params: &Params, target: &mut T) -> Outcome {
        self.request().get(path, params, target)
    }

    pub fn put<B, T>(&self, path: &str, params: &Params, body: &B, target: &mut T) -> Outcome
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request().put(path, params, body, target)
    }

    pub fn post<B, T>(&self, path: &str, params: &Params, body: &B, target: &mut T) -> Outcome
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request().post(path, params, body, target)
    }

    pub fn delete<T: DeserializeOwned>(&self, path: &str, params: &Params, target: &mut T) -> Outcome {
        self.request().delete(path, params, target)
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .field("middleware", &self.middleware.len())
            .finish_non_exhaustive()
    }
}

/// A single request bound to a `Client`, carrying extra headers.
///
/// Client headers are merged after these and win on a name collision.
#[derive(Debug)]
#[must_use]
pub struct RequestBuilder<'a> {
    client: &'a Client,
    headers: Vec<(String, String)>,
}

impl RequestBuilder<'_> {
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn get<T: DeserializeOwned>(self, path: &str, params: &Params, target: &mut T) -> Outcome {
        self.send::<(), T>(HttpMethod::Get, path, params, None, target)
    }

    pub fn put<B, T>(self, path: &str, params: &Params, body: &B, target: &mut T) -> Outcome
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(HttpMethod::Put, path, params, Some(body), target)
    }

    pub fn post<B, T>(self, path: &str, params: &Params, body: &B, target: &mut T) -> Outcome
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(HttpMethod::Post, path, params, Some(body), target)
    }

    pub fn delete<T: DeserializeOwned>(self, path: &str, params: &Params, target: &mut T) -> Outcome {
        self.send::<(), T>(HttpMethod::Delete, path, params, None, target)
    }

    fn send<B, T>(
        self,
        method: HttpMethod,
        path: &str,
        params: &Params,
        body: Option<&B>,
        target: &mut T,
    ) -> Outcome
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let call = Call {
            method,
            path,
            params,
            headers: self.headers,
            body,
        };
        executor::execute(self.client, call, target)
    }
}
