#![doc = "reqwest-backed implementation of the Transport contract used against the live discovery service."]
//
//! # Transport (core <-> network)
//!
//! [`HttpTransport`] is the only place that talks HTTP. It maps an
//! [`ApiRequest`] onto a reqwest request, sends it, and hands back the status
//! and body untouched. Status interpretation is left to the callers.
//!
//! TLS certificate verification is on unless the client is built with
//! `insecure_skip_tls_verify`; the choice is per client, never process wide.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use crate::contract::{ApiRequest, ApiResponse, Method, RequestBody, Transport};
use crate::error::TransportError;

pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(insecure_skip_tls_verify: bool) -> Result<Self, TransportError> {
        if insecure_skip_tls_verify {
            tracing::warn!("TLS certificate verification disabled for discovery requests");
        }
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(insecure_skip_tls_verify)
            .build()
            .map_err(|e| {
                tracing::error!(error = ?e, "Failed to build HTTP client");
                e
            })?;
        Ok(HttpTransport { client })
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        HttpTransport { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
        };
        let mut builder = self.client.request(method, &request.url);
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Text {
                content,
                content_type,
            } => builder
                .header(reqwest::header::CONTENT_TYPE, content_type)
                .body(content),
            RequestBody::Zip { file_name, bytes } => {
                let part = Part::bytes(bytes)
                    .file_name(file_name)
                    .mime_str("application/zip")?;
                builder.multipart(Form::new().part("zip", part))
            }
        };

        tracing::debug!(method = %request.method, url = %request.url, "Sending HTTP request");
        let response = builder.send().await.map_err(|e| {
            tracing::error!(error = ?e, url = %request.url, "HTTP request failed");
            e
        })?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        tracing::debug!(status, url = %request.url, "Received HTTP response");
        Ok(ApiResponse { status, body })
    }
}
