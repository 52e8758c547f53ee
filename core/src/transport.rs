//! The seam between the executor and the network.
//!
//! # Design
//! `Transport` is a blocking, object-safe trait so a single instance can be
//! shared behind an `Arc` by any number of clients and threads. Tests swap in
//! in-memory implementations; production code uses `UreqTransport`.
//!
//! A transport returns every status code as data. Deciding what counts as an
//! error is the executor's job.

use tracing::debug;

use crate::config::HttpConfig;
use crate::error::TransportError;
use crate::http::{canonical_reason, HttpRequest, HttpResponse};

/// Performs one HTTP round trip.
///
/// Implementations must read the response body to the end and release the
/// connection before returning.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Blocking transport backed by a pooled `ureq::Agent`.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    max_response_bytes: u64,
}

impl UreqTransport {
    pub fn new(config: &HttpConfig) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(config.timeout))
            .timeout_connect(Some(config.connect_timeout))
            .user_agent(config.user_agent.as_str())
            .max_redirects(config.max_redirects)
            .build()
            .new_agent();

        Self {
            agent,
            max_response_bytes: config.max_response_bytes,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(&HttpConfig::default())
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = ureq::http::Request::builder()
            .method(request.method.as_str())
            .uri(request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let sent = match &request.body {
            Some(body) => self.agent.run(builder.body(body.as_slice())?),
            None => self.agent.run(builder.body(())?),
        };
        let mut response = sent.map_err(TransportError::Request)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .with_config()
            .limit(self.max_response_bytes)
            .read_to_vec()
            .map_err(TransportError::Body)?;

        debug!("HTTP {} {} -> {} ({} bytes)", request.method, request.url, status, body.len());

        Ok(HttpResponse {
            status,
            reason: canonical_reason(status).to_string(),
            headers,
            body,
        })
    }
}
