//! GitHub Actions output plumbing: step outputs and failure annotations.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use tracing::{info, warn};

/// Name of the step output carrying the run summary.
pub const ACTION_RESULT: &str = "action-result";

/// Appends `name=value` to the file named by `GITHUB_OUTPUT`, if any, and
/// prints the value so it shows up in the job log.
pub fn set_output(name: &str, value: &str) -> std::io::Result<()> {
    info!(output = name, value, "Setting action output");
    println!("{name}: {value}");
    match std::env::var_os("GITHUB_OUTPUT") {
        Some(path) if !path.is_empty() => append_output(Path::new(&path), name, value),
        _ => Ok(()),
    }
}

pub fn append_output(path: &Path, name: &str, value: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    // Values are single line; newlines would need the heredoc form.
    let value = value.replace(['\r', '\n'], " ");
    writeln!(file, "{name}={value}")
}

/// Emits an `::error::` workflow command; the caller sets the exit status.
pub fn set_failed(message: &str) {
    warn!(reason = message, "Marking action as failed");
    println!("::error::{}", escape_data(message));
}

fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
