//! Health reporting: marks the data source unhealthy after a failed submission.

use serde_json::json;
use tracing::{info, warn};

use crate::contract::{ApiRequest, Method, Transport};
use crate::endpoints::{sanitize_data_source_id, DiscoveryEndpoints};
use crate::result::SubmissionResult;

/// PATCHes `{state: "unhealthy", message}` onto the data source.
///
/// Failures are logged and returned, never raised.
pub async fn report_unhealthy<T>(
    transport: &T,
    endpoints: &DiscoveryEndpoints,
    token: &str,
    org: &str,
    data_source_id: &str,
    message: &str,
) -> SubmissionResult
where
    T: Transport + ?Sized,
{
    let sanitized = sanitize_data_source_id(data_source_id);
    let body = json!({ "state": "unhealthy", "message": message });
    let request = ApiRequest::new(Method::Patch, endpoints.data_source(org, data_source_id))
        .bearer(token)
        .header("Accept", "application/json")
        .json(body.to_string());

    info!(data_source = %sanitized, reason = message, "[HEALTH] Reporting data source unhealthy");
    match transport.send(request).await {
        Ok(response) if response.is_success() => {
            SubmissionResult::new(response.status, "data source state updated")
        }
        Ok(response) => {
            warn!(status = response.status, data_source = %sanitized, "[HEALTH] State update rejected");
            SubmissionResult::from_error_body(response.status, &response.body)
        }
        Err(e) => {
            warn!(error = %e, data_source = %sanitized, "[HEALTH] State update failed");
            SubmissionResult::internal(e)
        }
    }
}
