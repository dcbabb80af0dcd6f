//! Shared test utilities for integration tests.
//!
//! Import from integration test files as:
//! ```ignore
//! mod common;
//! ```

use civic_core::{record::Record, schema::RecordKind};
use serde_json::Value;
use std::{
    io::Read,
    thread::{self, JoinHandle},
};
use tiny_http::{Header, Response, Server};

#[path = "../../src/tests/fixtures.rs"]
mod fixtures;
#[allow(unused_imports)]
pub use fixtures::{full_payload, id_stub};

/// Initialize tracing for tests, respecting RUST_LOG env var.
///
/// Safe to call multiple times; subsequent calls are no-ops.
#[allow(dead_code)]
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

/// What the server saw of the one request it answered.
#[allow(dead_code)]
#[derive(Debug)]
pub struct ReceivedRequest {
    pub method: String,
    pub url: String,
    pub body: String,
}

/// A loopback HTTP server that answers exactly one request with a fixed JSON response.
///
/// `base_url` is `http://127.0.0.1:<port>/api`. [`OneShotServer::request`] waits for the server
/// thread and returns the request it received.
#[allow(dead_code)]
pub struct OneShotServer {
    pub base_url: String,
    handle: JoinHandle<ReceivedRequest>,
}

#[allow(dead_code)]
impl OneShotServer {
    pub fn respond(status: u16, body: Value) -> Self {
        init_logging();
        let server = Server::http("127.0.0.1:0").expect("bind loopback server");
        let addr = server
            .server_addr()
            .to_ip()
            .expect("loopback server has an IP address");
        let handle = thread::spawn(move || {
            let mut request = server.recv().expect("receive request");
            let mut received = ReceivedRequest {
                method: request.method().to_string(),
                url: request.url().to_string(),
                body: String::new(),
            };
            request
                .as_reader()
                .read_to_string(&mut received.body)
                .expect("read request body");
            let content_type = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
                .expect("valid header");
            let response = Response::from_string(body.to_string())
                .with_status_code(status)
                .with_header(content_type);
            request.respond(response).expect("send response");
            received
        });
        OneShotServer {
            base_url: format!("http://{addr}/api"),
            handle,
        }
    }

    pub fn request(self) -> ReceivedRequest {
        self.handle.join().expect("server thread")
    }
}

/// Ids of the records in `records`, in order.
#[allow(dead_code)]
pub fn ids(records: &[Record]) -> Vec<Option<i64>> {
    records.iter().map(|r| r.id()).collect()
}
