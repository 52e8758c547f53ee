//! One full request/response cycle.
//!
//! # Design
//! `execute` walks a request through a fixed sequence: compose and validate
//! the URL, serialize the payload, merge headers, run middleware, dispatch,
//! then classify the response. Every step before dispatch that fails ends the
//! cycle with `Outcome::InternalError` and the transport is never called.
//!
//! Header precedence, lowest to highest: executor defaults (`accept`,
//! `content-type`), per-call headers from `RequestBuilder`, client headers.
//! Middleware sees the merged set and may change anything.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::client::Client;
use crate::error::{BoxError, Error};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::middleware;
use crate::outcome::{ApiError, Outcome};
use crate::params::Params;

const JSON: &str = "application/json";

/// Everything that varies between two calls on the same client.
pub(crate) struct Call<'a, B: ?Sized> {
    pub method: HttpMethod,
    pub path: &'a str,
    pub params: &'a Params,
    pub headers: Vec<(String, String)>,
    pub body: Option<&'a B>,
}

pub(crate) fn execute<B, T>(client: &Client, call: Call<'_, B>, target: &mut T) -> Outcome
where
    B: Serialize + ?Sized,
    T: DeserializeOwned,
{
    let request = match prepare(client, call) {
        Ok(request) => request,
        Err(err) => return Outcome::InternalError(err),
    };

    debug!("HTTP {}: {}", request.method, request.url);
    let response = match client.transport().execute(&request) {
        Ok(response) => response,
        Err(err) => {
            warn!("HTTP {} {} failed: {}", request.method, request.url, err);
            return Outcome::InternalError(Error::Transport(err));
        }
    };

    classify(response, target)
}

/// `base_url + path + "?" + encoded params`.
pub(crate) fn compose_url(base_url: &str, path: &str, params: &Params) -> String {
    format!("{base_url}{path}?{}", params.encode())
}

/// Reject URLs that either parser would refuse. `Url` catches a missing
/// scheme or host; `Uri` is what the transport builds the request line from
/// and refuses characters such as spaces that `Url` silently escapes.
fn validate_url(url: &str) -> Result<(), BoxError> {
    url::Url::parse(url)?;
    ureq::http::Uri::try_from(url)?;
    Ok(())
}

fn prepare<B>(client: &Client, call: Call<'_, B>) -> Result<HttpRequest, Error>
where
    B: Serialize + ?Sized,
{
    let url = compose_url(client.base_url(), call.path, call.params);
    if let Err(source) = validate_url(&url) {
        return Err(Error::InvalidUrl { url, source });
    }

    let body = call
        .body
        .map(|body| serde_json::to_vec(body))
        .transpose()
        .map_err(Error::Serialization)?;

    let mut request = HttpRequest::new(call.method, url);
    request.set_header("accept", JSON);
    if body.is_some() {
        request.set_header("content-type", JSON);
    }
    request.body = body;

    for (name, value) in call.headers {
        request.set_header(name, value);
    }
    for (name, value) in client.headers() {
        request.set_header(name.as_str(), value.as_str());
    }

    middleware::run_chain(client.middleware(), request).map_err(|err| {
        warn!("middleware rejected {} {}: {}", call.method, call.path, err);
        Error::Middleware(err)
    })
}

fn classify<T: DeserializeOwned>(response: HttpResponse, target: &mut T) -> Outcome {
    if response.is_error() {
        let error = ApiError::from_response(&response);
        debug!(
            "HTTP error {} ({}): {}",
            error.status, error.kind, error.message
        );
        return Outcome::HttpError(error);
    }

    if response.body.is_empty() {
        return Outcome::Success;
    }

    match serde_json::from_slice(&response.body) {
        Ok(value) => {
            *target = value;
            Outcome::Success
        }
        Err(err) => Outcome::InternalError(Error::Deserialization(err)),
    }
}
