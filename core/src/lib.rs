//! Blocking JSON REST client.
//!
//! # Overview
//! A `Client` issues GET/PUT/POST/DELETE requests against a base URL,
//! serializes request payloads to JSON, decodes JSON responses into a
//! caller-supplied target and reports exactly one `Outcome` per request:
//! success, an HTTP error status with its decoded `ApiError`, or an internal
//! `Error`.
//!
//! # Design
//! - The network sits behind the `Transport` trait. `UreqTransport` is the
//!   production implementation; tests substitute in-memory transports.
//! - Middleware rewrites or rejects each outgoing request after headers are
//!   merged and before dispatch.
//! - Calls are synchronous. No retries; timeouts belong to the transport
//!   (`HttpConfig`).
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use jsonapi_core::{Client, Outcome, Params, UreqTransport};
//!
//! let client = Client::new("http://localhost:3000", Arc::new(UreqTransport::with_defaults()))
//!     .with_header("x-api-key", "k-123");
//!
//! let mut notes = Vec::<serde_json::Value>::new();
//! match client.get("/notes", &Params::new().with("q", "milk"), &mut notes) {
//!     Outcome::Success => println!("{} notes", notes.len()),
//!     Outcome::HttpError(err) => eprintln!("{} {}: {}", err.status, err.kind, err.message),
//!     Outcome::InternalError(err) => eprintln!("request failed: {err}"),
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
mod executor;
pub mod http;
pub mod middleware;
pub mod outcome;
pub mod params;
pub mod transport;

pub use client::{Client, RequestBuilder};
pub use config::HttpConfig;
pub use error::{BoxError, Error, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use middleware::{from_fn, BearerAuth, Middleware, RequestId};
pub use outcome::{ApiError, Outcome};
pub use params::Params;
pub use transport::{Transport, UreqTransport};
