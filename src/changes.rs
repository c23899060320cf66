//! Changed-files gate: skips publishing when the commit touched none of the
//! configured API files or folders.

use tracing::debug;

/// Decides whether a run should publish.
///
/// `changed_files` is the space separated list produced by the workflow's
/// diff step. An empty list always publishes. In folder mode a changed path
/// matches when it contains the folder name; in file mode it must equal
/// the configured file.
pub fn should_publish(changed_files: &str, location: &str, is_folder: bool) -> bool {
    if changed_files.trim().is_empty() || location.trim().is_empty() {
        return true;
    }

    let changed: Vec<&str> = changed_files.split_whitespace().collect();
    let matched = location
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .any(|name| {
            if is_folder {
                changed.iter().any(|file| file.contains(name))
            } else {
                changed.contains(&name)
            }
        });

    debug!(matched, changed = changed.len(), is_folder, "Checked changed files");
    matched
}
