//! The uniform `{status, message}` shape returned by every network-facing operation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of a submission, registration or health update.
///
/// Status codes carry the meaning: 200/201 success, 304 skipped,
/// 409 conflict, anything else is a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub status: u16,
    pub message: Vec<String>,
}

impl SubmissionResult {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        SubmissionResult {
            status,
            message: vec![message.into()],
        }
    }

    /// A status-500 result carrying the error's display text.
    pub fn internal(error: impl std::fmt::Display) -> Self {
        SubmissionResult::new(500, error.to_string())
    }

    /// Builds a result from a non-success HTTP response.
    ///
    /// The registry answers errors with a JSON body whose `message` is either
    /// a list of strings or a single string; anything else keeps the raw body.
    pub fn from_error_body(status: u16, body: &str) -> Self {
        let message = match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(map)) => match map.get("message") {
                Some(Value::Array(items)) => items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect(),
                Some(Value::String(s)) => vec![s.clone()],
                Some(other) => vec![other.to_string()],
                None => vec![body.to_string()],
            },
            _ => vec![body.to_string()],
        };
        SubmissionResult { status, message }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, 200 | 201)
    }

    /// Success or a deliberate skip; the only statuses that pass a CI run.
    pub fn is_acceptable(&self) -> bool {
        matches!(self.status, 200 | 201 | 304)
    }

    pub fn first_message(&self) -> &str {
        self.message.first().map(String::as_str).unwrap_or("")
    }

    /// The line recorded as the action's `action-result` output.
    pub fn summary(&self) -> String {
        format!(
            "response: status: {}, message: {}",
            self.status,
            self.first_message()
        )
    }
}
