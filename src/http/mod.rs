//! HTTP transport used to talk to the GitHub API.

mod client;

pub use client::{HttpClient, HttpResponse, Transport, build_http_client};

#[cfg(test)]
pub use client::MockTransport;
