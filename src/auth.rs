//! Token exchange: trades the long-lived API key for a bearer token.

use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::contract::{ApiRequest, Method, Transport};
use crate::endpoints::DiscoveryEndpoints;
use crate::error::Error;

/// Identity provider realm used when none is configured.
pub const DEFAULT_REALM: &str = "provider/default-idp-2";

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

/// Requests a fresh bearer token. Called exactly once per run; never retried.
pub async fn acquire_token<T>(
    transport: &T,
    endpoints: &DiscoveryEndpoints,
    api_key: &str,
    realm: &str,
) -> Result<String, Error>
where
    T: Transport + ?Sized,
{
    let body = json!({
        "grant_type": "api_key",
        "api_key": api_key,
        "realm": realm,
    });
    let request = ApiRequest::new(Method::Post, endpoints.token())
        .header("Accept", "application/json")
        .json(body.to_string());

    info!(url = %request.url, realm, "[AUTH] Requesting bearer token");
    let response = transport.send(request).await.map_err(|e| {
        error!(error = %e, "[AUTH] Token request failed");
        Error::Transport(e)
    })?;

    if !response.is_success() {
        error!(status = response.status, "[AUTH] Token request rejected");
        return Err(Error::Auth(format!(
            "status {}: {}",
            response.status, response.body
        )));
    }

    let parsed: TokenResponse = serde_json::from_str(&response.body)
        .map_err(|e| Error::Auth(format!("unreadable token response: {e}")))?;
    let token = parsed
        .access_token
        .filter(|token| !token.is_empty())
        .ok_or_else(|| Error::Auth("response carried no access_token".to_string()))?;

    info!(token_len = token.len(), "[AUTH] Bearer token acquired");
    Ok(token)
}
