//! # contract: the HTTP capability the publishing pipeline depends on
//!
//! This module defines a single trait (`Transport`) and the plain data types
//! that flow through it. Everything above this seam (token exchange, data
//! source registration, the submission strategy, health reports) builds
//! [`ApiRequest`] values and interprets [`ApiResponse`] values; nothing above
//! it knows about reqwest.
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall`, so tests can script the registry
//!   with `MockTransport` and assert on exactly which requests were sent.
//! - The production implementation lives in [`crate::transport`].

use async_trait::async_trait;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use crate::error::TransportError;

/// Header naming the record API version expected by the discovered-apis endpoints.
pub const RECORD_API_VERSION_HEADER: &str = "x-ibm-record-api-version";
pub const RECORD_API_VERSION: &str = "1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request payload.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    /// Serialized text sent with an explicit content type.
    Text { content: String, content_type: String },
    /// A zip archive sent as the `zip` field of a multipart form.
    Zip { file_name: String, bytes: Vec<u8> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    /// Bearer token; `None` only for the token exchange itself.
    pub bearer: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        ApiRequest {
            method,
            url: url.into(),
            bearer: None,
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn bearer(mut self, token: &str) -> Self {
        self.bearer = Some(token.to_string());
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn json(self, content: String) -> Self {
        self.text(content, "application/json")
    }

    pub fn text(mut self, content: String, content_type: &str) -> Self {
        self.body = RequestBody::Text {
            content,
            content_type: content_type.to_string(),
        };
        self
    }

    pub fn zip(mut self, file_name: &str, bytes: Vec<u8>) -> Self {
        self.body = RequestBody::Zip {
            file_name: file_name.to_string(),
            bytes,
        };
        self
    }
}

/// Status line and raw body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        ApiResponse {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs one HTTPS request and returns its status and body.
///
/// Implementations must not interpret status codes: a 4xx or 5xx answer is
/// still `Ok`. `Err` is reserved for failures to complete the exchange.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}
