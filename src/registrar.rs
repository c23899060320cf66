//! Data source registration: makes sure the registry knows where the
//! documents come from before anything is submitted.

use serde_json::{json, Value};
use tracing::{info, warn};

use crate::contract::{ApiRequest, ApiResponse, Method, Transport};
use crate::endpoints::{sanitize_data_source_id, DiscoveryEndpoints};
use crate::format::COLLECTOR_TYPE;
use crate::result::SubmissionResult;

/// True when the lookup answered "not found".
///
/// The registry reports a missing data source inside the body
/// (`{"status": 404, ...}`); a plain 404 status line counts as well.
fn is_not_found(response: &ApiResponse) -> bool {
    if response.status == 404 {
        return true;
    }
    serde_json::from_str::<Value>(&response.body)
        .ok()
        .and_then(|body| body.get("status").and_then(Value::as_u64))
        == Some(404)
}

/// Looks the data source up and creates it when absent.
///
/// Returns 200 when it already exists, the creation status when it was
/// created, and a status-500 result when the exchange itself failed. The
/// caller may ignore the result; a failure here never stops a run.
pub async fn ensure_registered<T>(
    transport: &T,
    endpoints: &DiscoveryEndpoints,
    token: &str,
    org: &str,
    data_source_id: &str,
) -> SubmissionResult
where
    T: Transport + ?Sized,
{
    let sanitized = sanitize_data_source_id(data_source_id);
    let lookup = ApiRequest::new(Method::Get, endpoints.data_source(org, data_source_id))
        .bearer(token)
        .header("Accept", "application/json");

    info!(data_source = %sanitized, "[REGISTER] Checking data source");
    let response = match transport.send(lookup).await {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, data_source = %sanitized, "[REGISTER] Lookup failed");
            return SubmissionResult::internal(e);
        }
    };

    if !is_not_found(&response) {
        info!(data_source = %sanitized, "[REGISTER] Data source already registered");
        return SubmissionResult::new(200, format!("data source {sanitized} already exists"));
    }

    let body = json!({ "title": sanitized, "collector_type": COLLECTOR_TYPE });
    let create = ApiRequest::new(Method::Post, endpoints.data_sources(org))
        .bearer(token)
        .header("Accept", "application/json")
        .json(body.to_string());

    info!(data_source = %sanitized, "[REGISTER] Creating data source");
    match transport.send(create).await {
        Ok(created) if created.is_success() => {
            info!(data_source = %sanitized, status = created.status, "[REGISTER] Data source created");
            SubmissionResult::new(created.status, format!("data source {sanitized} created"))
        }
        Ok(rejected) => {
            warn!(status = rejected.status, data_source = %sanitized, "[REGISTER] Creation rejected");
            SubmissionResult::from_error_body(rejected.status, &rejected.body)
        }
        Err(e) => {
            warn!(error = %e, data_source = %sanitized, "[REGISTER] Creation failed");
            SubmissionResult::internal(e)
        }
    }
}
