//! Verify URL composition and error decoding against JSON test vectors stored
//! in `test-vectors/`.
//!
//! Each request is sent through an in-memory transport that records what it
//! was given and replies with the vector's canned response, so these tests
//! cover the whole executor without touching the network.

use std::sync::{Arc, Mutex};

use jsonapi_core::{
    Client, HttpMethod, HttpRequest, HttpResponse, Outcome, Params, Transport, TransportError,
};
use serde::de::IgnoredAny;
use serde::Deserialize;

/// Replies with `status` and `body`, remembering the last request.
struct CannedTransport {
    status: u16,
    body: String,
    last: Mutex<Option<HttpRequest>>,
}

impl CannedTransport {
    fn new(status: u16, body: &str) -> Arc<Self> {
        Arc::new(Self {
            status,
            body: body.to_string(),
            last: Mutex::new(None),
        })
    }
}

impl Transport for CannedTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        *self.last.lock().unwrap() = Some(request.clone());
        Ok(HttpResponse::new(self.status, self.body.as_bytes()))
    }
}

#[derive(Deserialize)]
struct Vectors<T> {
    cases: Vec<T>,
}

// ---------------------------------------------------------------------------
// URL composition
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct UrlCase {
    name: String,
    base_url: String,
    path: String,
    params: Params,
    expected_url: String,
}

#[test]
fn url_test_vectors() {
    let raw = include_str!("../../test-vectors/urls.json");
    let vectors: Vectors<UrlCase> = serde_json::from_str(raw).unwrap();

    for case in vectors.cases {
        let name = &case.name;
        let transport = CannedTransport::new(204, "");
        let client = Client::new(&case.base_url, transport.clone());

        assert_eq!(client.url_for(&case.path, &case.params), case.expected_url, "{name}: url_for");

        let outcome = client.get(&case.path, &case.params, &mut IgnoredAny);
        assert!(outcome.is_success(), "{name}: {outcome:?}");

        let sent = transport.last.lock().unwrap().clone().unwrap();
        assert_eq!(sent.method, HttpMethod::Get, "{name}: method");
        assert_eq!(sent.url, case.expected_url, "{name}: url");
        assert!(sent.body.is_none(), "{name}: body");
    }
}

// ---------------------------------------------------------------------------
// Error decoding
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ErrorCase {
    name: String,
    status: u16,
    body: String,
    expected: ExpectedError,
}

#[derive(Deserialize)]
struct ExpectedError {
    status: u16,
    message: String,
    kind: String,
}

#[test]
fn error_test_vectors() {
    let raw = include_str!("../../test-vectors/errors.json");
    let vectors: Vectors<ErrorCase> = serde_json::from_str(raw).unwrap();

    for case in vectors.cases {
        let name = &case.name;
        let client = Client::new("http://localhost:3000", CannedTransport::new(case.status, &case.body));

        let mut fired = Vec::new();
        client
            .delete("/notes/1", &Params::new(), &mut IgnoredAny)
            .dispatch(
                || panic!("{name}: success must not fire"),
                |status, message, kind| fired.push((status, message, kind)),
                |err| panic!("{name}: internal error must not fire: {err}"),
            );

        let expected = &case.expected;
        assert_eq!(
            fired,
            vec![(expected.status, expected.message.clone(), expected.kind.clone())],
            "{name}"
        );
    }
}

#[test]
fn success_statuses_never_report_http_error() {
    for status in [200u16, 201, 202, 204, 299] {
        let client = Client::new("http://localhost:3000", CannedTransport::new(status, ""));
        let outcome = client.put("/notes/1", &Params::new(), &serde_json::json!({}), &mut IgnoredAny);
        assert!(matches!(outcome, Outcome::Success), "{status}: {outcome:?}");
    }
}
