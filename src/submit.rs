//! Submission strategy: decides how the configured documents reach the registry.
//!
//! A run goes through these steps:
//!   - guard clauses (no location → 400, no API key → 304), before any request
//!   - one token exchange
//!   - optional data source registration
//!   - one of three paths:
//!       * single small file: POST the document, PATCH it once on a 409 conflict
//!       * single large file, several files or folders: zip everything and POST
//!         the archive to `/bulk`
//!   - a health report against the data source when the outcome is not 200/201
//!
//! Every path ends in a [`SubmissionResult`]. Only file system, parse and
//! token exchange failures surface as [`Error`].

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, error, info, warn};

use crate::archive::{ArchiveBuilder, ARCHIVE_FILE_NAME};
use crate::auth::acquire_token;
use crate::config::DiscoveryConfig;
use crate::contract::{
    ApiRequest, ApiResponse, Method, Transport, RECORD_API_VERSION, RECORD_API_VERSION_HEADER,
};
use crate::endpoints::DiscoveryEndpoints;
use crate::error::{Error, TransportError};
use crate::format::{format_document, FormattedDocument};
use crate::health::report_unhealthy;
use crate::registrar::ensure_registered;
use crate::result::SubmissionResult;

/// Single files above this size go through the bulk path.
pub const BULK_THRESHOLD_BYTES: u64 = 1_048_576;

static CONFLICT_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\w{8}-\w{4}-\w{4}-\w{4}-\w{12}").expect("conflict id pattern is valid")
});

/// What the location input names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionTarget {
    Files(Vec<String>),
    Folders(Vec<String>),
}

impl SubmissionTarget {
    /// Splits a comma separated location list; blank entries are dropped.
    pub fn parse(location: &str, is_folder: bool) -> Self {
        let entries: Vec<String> = location
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect();
        if is_folder {
            SubmissionTarget::Folders(entries)
        } else {
            SubmissionTarget::Files(entries)
        }
    }

    pub fn entries(&self) -> &[String] {
        match self {
            SubmissionTarget::Files(entries) | SubmissionTarget::Folders(entries) => entries,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, SubmissionTarget::Folders(_))
    }

    pub fn is_multiple(&self) -> bool {
        self.entries().len() > 1
    }
}

/// The path a run takes, with every document resolved against the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionPlan {
    Single(PathBuf),
    Bulk(Vec<PathBuf>),
}

/// Chooses between the single and bulk paths.
///
/// Folder mode wins over everything else. Folder entries are listed one
/// level deep; nested directories are skipped.
pub fn plan_submission(target: &SubmissionTarget, workspace: &Path) -> Result<SubmissionPlan, Error> {
    match target {
        SubmissionTarget::Folders(folders) => {
            let mut documents = Vec::new();
            for folder in folders {
                documents.extend(list_folder(&workspace.join(folder))?);
            }
            Ok(SubmissionPlan::Bulk(documents))
        }
        SubmissionTarget::Files(files) if files.len() > 1 => Ok(SubmissionPlan::Bulk(
            files.iter().map(|file| workspace.join(file)).collect(),
        )),
        SubmissionTarget::Files(files) => {
            let file = files
                .first()
                .ok_or_else(|| Error::Config("no API file given".to_string()))?;
            let path = workspace.join(file);
            let size = std::fs::metadata(&path)
                .map_err(|e| Error::io(&path, e))?
                .len();
            if size > BULK_THRESHOLD_BYTES {
                info!(path = %path.display(), size, "[PUBLISH] File exceeds single upload limit, using bulk path");
                Ok(SubmissionPlan::Bulk(vec![path]))
            } else {
                Ok(SubmissionPlan::Single(path))
            }
        }
    }
}

fn list_folder(folder: &Path) -> Result<Vec<PathBuf>, Error> {
    let mut documents = Vec::new();
    for entry in std::fs::read_dir(folder).map_err(|e| Error::io(folder, e))? {
        let entry = entry.map_err(|e| Error::io(folder, e))?;
        let path = entry.path();
        if path.is_dir() {
            debug!(path = %path.display(), "[BULK] Skipping nested directory");
            continue;
        }
        documents.push(path);
    }
    documents.sort();
    Ok(documents)
}

/// Pulls the existing record's id out of a conflict message.
///
/// Takes the first match of the id pattern that is also a well-formed UUID.
pub fn extract_conflict_id(message: &str) -> Option<String> {
    CONFLICT_ID
        .find_iter(message)
        .map(|m| m.as_str())
        .find(|candidate| uuid::Uuid::parse_str(candidate).is_ok())
        .map(str::to_string)
}

fn interpret(method: Method, outcome: Result<ApiResponse, TransportError>) -> SubmissionResult {
    match outcome {
        Ok(response) if matches!(response.status, 200 | 201) => SubmissionResult::new(
            response.status,
            format!("{method} operation on api has been successful"),
        ),
        Ok(response) => SubmissionResult::from_error_body(response.status, &response.body),
        Err(e) => {
            error!(error = %e, %method, "[PUBLISH] Request to discovery service failed");
            SubmissionResult::internal(e)
        }
    }
}

fn discovered_api_request(method: Method, url: String, token: &str) -> ApiRequest {
    ApiRequest::new(method, url)
        .bearer(token)
        .header("Accept", "application/json")
        .header(RECORD_API_VERSION_HEADER, RECORD_API_VERSION)
}

async fn send_document<T>(
    transport: &T,
    url: String,
    token: &str,
    method: Method,
    document: &FormattedDocument,
) -> SubmissionResult
where
    T: Transport + ?Sized,
{
    info!(%url, %method, "[PUBLISH] Sending API document");
    let request = discovered_api_request(method, url, token)
        .text(document.body.clone(), document.content_type);
    interpret(method, transport.send(request).await)
}

async fn submit_single<T>(
    transport: &T,
    endpoints: &DiscoveryEndpoints,
    config: &DiscoveryConfig,
    token: &str,
    path: &Path,
) -> Result<SubmissionResult, Error>
where
    T: Transport + ?Sized,
{
    let document = format_document(path, &config.data_source_location, None)?
        .ok_or_else(|| Error::Config(format!("{} produced no body", path.display())))?;
    let collection = endpoints.discovered_apis(&config.provider_org);

    let created = send_document(transport, collection, token, Method::Post, &document).await;
    if created.status != 409 {
        return Ok(created);
    }

    match extract_conflict_id(created.first_message()) {
        Some(id) => {
            info!(id = %id, "[PUBLISH] API already exists, updating it");
            let url = endpoints.discovered_api(&config.provider_org, &id);
            Ok(send_document(transport, url, token, Method::Patch, &document).await)
        }
        None => {
            warn!(reason = created.first_message(), "[PUBLISH] Conflict response carried no record id");
            Ok(created)
        }
    }
}

async fn submit_bulk<T>(
    transport: &T,
    endpoints: &DiscoveryEndpoints,
    config: &DiscoveryConfig,
    token: &str,
    documents: &[PathBuf],
) -> Result<SubmissionResult, Error>
where
    T: Transport + ?Sized,
{
    let mut archive = ArchiveBuilder::new();
    for path in documents {
        format_document(path, &config.data_source_location, Some(&mut archive))?;
    }
    let scratch = archive.write_scratch(&config.workspace)?;

    let url = endpoints.bulk(&config.provider_org);
    info!(%url, entries = archive.len(), "[BULK] Uploading archive");
    let request = discovered_api_request(Method::Post, url, token)
        .zip(ARCHIVE_FILE_NAME, scratch.bytes().to_vec());
    let result = interpret(Method::Post, transport.send(request).await);

    scratch.remove()?;
    Ok(result)
}

/// Publishes the configured documents using the endpoints derived from `config`.
pub async fn create_or_update_discovered_api<T>(
    transport: &T,
    config: &DiscoveryConfig,
) -> Result<SubmissionResult, Error>
where
    T: Transport + ?Sized,
{
    let endpoints = config.endpoints();
    create_or_update_discovered_api_at(transport, &endpoints, config).await
}

/// Publishes the configured documents against an explicit service root.
pub async fn create_or_update_discovered_api_at<T>(
    transport: &T,
    endpoints: &DiscoveryEndpoints,
    config: &DiscoveryConfig,
) -> Result<SubmissionResult, Error>
where
    T: Transport + ?Sized,
{
    let Some(location) = config
        .apis_location
        .as_deref()
        .filter(|location| !location.trim().is_empty())
    else {
        warn!("[PUBLISH] No API files or folders configured");
        return Ok(SubmissionResult::new(
            400,
            "Error: create Or Update Discovered Api not run as API files or API folders parameter is missing or Empty",
        ));
    };

    let Some(api_key) = config.api_key.as_deref().filter(|key| !key.is_empty()) else {
        warn!("[PUBLISH] No API key configured, skipping");
        return Ok(SubmissionResult::new(
            304,
            "Warning: create Or Update Discovered Api not run as apikey is missing",
        ));
    };

    let target = SubmissionTarget::parse(location, config.is_folder);
    let plan = plan_submission(&target, &config.workspace)?;
    info!(
        folder = target.is_folder(),
        multiple = target.is_multiple(),
        plan = ?plan,
        "[PUBLISH] Submission plan selected"
    );

    let token = acquire_token(transport, endpoints, api_key, &config.realm).await?;

    if config.resync_check {
        let registration = ensure_registered(
            transport,
            endpoints,
            &token,
            &config.provider_org,
            &config.data_source_location,
        )
        .await;
        if !registration.is_success() {
            warn!(
                status = registration.status,
                reason = registration.first_message(),
                "[REGISTER] Data source registration did not succeed, continuing"
            );
        }
    }

    let result = match &plan {
        SubmissionPlan::Single(path) => {
            submit_single(transport, endpoints, config, &token, path).await?
        }
        SubmissionPlan::Bulk(documents) => {
            submit_bulk(transport, endpoints, config, &token, documents).await?
        }
    };

    if !result.is_success() {
        error!(status = result.status, reason = result.first_message(), "[PUBLISH] Submission failed");
        let health = report_unhealthy(
            transport,
            endpoints,
            &token,
            &config.provider_org,
            &config.data_source_location,
            result.first_message(),
        )
        .await;
        if !health.is_success() {
            warn!(status = health.status, "[HEALTH] Could not mark data source unhealthy");
        }
    } else {
        info!(status = result.status, "[PUBLISH] Submission succeeded");
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_id_is_taken_from_message() {
        let message = "Discovered API abcdefab-1234-5678-9abc-def012345678 already exists";
        assert_eq!(
            extract_conflict_id(message).as_deref(),
            Some("abcdefab-1234-5678-9abc-def012345678")
        );
    }

    #[test]
    fn conflict_id_skips_word_runs_that_are_not_uuids() {
        let message = "name_abc-defg-hijk-lmno-pqrstuvwxyz0 clashes with 00000000-1111-2222-3333-444444444444";
        assert_eq!(
            extract_conflict_id(message).as_deref(),
            Some("00000000-1111-2222-3333-444444444444")
        );
        assert_eq!(extract_conflict_id("already exists"), None);
    }

    #[test]
    fn target_flags_follow_input_shape() {
        let files = SubmissionTarget::parse("a.json, b.yaml", false);
        assert!(files.is_multiple());
        assert!(!files.is_folder());
        assert_eq!(files.entries(), ["a.json", "b.yaml"]);

        let folder = SubmissionTarget::parse("APIfolder", true);
        assert!(folder.is_folder());
        assert!(!folder.is_multiple());
    }

    #[test]
    fn single_folder_is_always_bulk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let folder = dir.path().join("apis");
        std::fs::create_dir_all(folder.join("nested")).expect("mkdir");
        std::fs::write(folder.join("one.json"), "{}").expect("write");

        let plan = plan_submission(&SubmissionTarget::parse("apis", true), dir.path())
            .expect("plan");
        assert_eq!(plan, SubmissionPlan::Bulk(vec![folder.join("one.json")]));
    }

    #[test]
    fn missing_single_file_is_fatal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = plan_submission(&SubmissionTarget::parse("nope.json", false), dir.path())
            .expect_err("missing file must fail");
        assert!(matches!(err, Error::Io { .. }));
    }
}
