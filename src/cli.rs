/// # apic-discovery CLI Interface (Module)
///
/// This module implements the CLI for apic-discovery: argument parsing, the
/// mapping from GitHub Actions inputs to flags, and the async [`run`]
/// entrypoint shared by `main()` and the integration tests.
///
/// Every flag falls back to the environment variable GitHub Actions sets for
/// the corresponding action input (`INPUT_API_HOST`, `INPUT_API_KEY`, ...),
/// and then to the optional `--config` YAML file.
use crate::action_output::{set_output, ACTION_RESULT};
use crate::changes::should_publish;
use crate::load_config::{load_config, ActionInputs};
use crate::submit::create_or_update_discovered_api;
use crate::transport::HttpTransport;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Recorded as the action result when the diff touched none of the configured paths.
pub const NO_CHANGES_MESSAGE: &str =
    "No files changed from the previous commit to send to Discovery Service";

/// CLI for apic-discovery: publish API descriptions to a discovery registry.
#[derive(Parser)]
#[clap(
    name = "apic-discovery",
    version,
    about = "Publish API description files from a CI workspace to an API discovery service"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Send the configured API files or folders to the discovery service
    Publish(PublishArgs),
}

#[derive(Debug, Default, Args)]
pub struct PublishArgs {
    /// Optional YAML file supplying any input not given as a flag or env var
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Host of the API Connect instance, without the platform prefix
    #[clap(long, env = "INPUT_API_HOST")]
    pub api_host: Option<String>,

    /// API key exchanged for a bearer token; the run is skipped without one
    #[clap(long, env = "INPUT_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Provider organization owning the discovered APIs
    #[clap(long, env = "INPUT_PROVIDER_ORG")]
    pub provider_org: Option<String>,

    /// Register the data source before publishing when it does not exist
    #[clap(long, env = "INPUT_RESYNC_CHECK")]
    pub resync_check: Option<String>,

    /// Comma separated API files, relative to the workspace
    #[clap(long, env = "INPUT_API_FILES")]
    pub api_files: Option<String>,

    /// Comma separated folders of API files, relative to the workspace
    #[clap(long, env = "INPUT_API_FOLDERS")]
    pub api_folders: Option<String>,

    /// Space separated list of files changed by the triggering commit
    #[clap(long, env = "INPUT_GIT_DIFF")]
    pub git_diff: Option<String>,

    /// Host prefix of the platform API (default: platform-api)
    #[clap(long, env = "INPUT_PLATFORM_API_PREFIX")]
    pub platform_api_prefix: Option<String>,

    /// Skip TLS certificate verification
    #[clap(long, env = "INPUT_INSECURE_SKIP_TLS_VERIFY")]
    pub insecure_skip_tls_verify: Option<String>,

    /// Identity provider realm used for the token exchange
    #[clap(long, env = "INPUT_REALM")]
    pub realm: Option<String>,

    #[clap(long, env = "GITHUB_SERVER_URL")]
    pub github_server_url: Option<String>,

    #[clap(long, env = "GITHUB_REPOSITORY")]
    pub github_repository: Option<String>,

    /// Checkout directory the API paths are relative to
    #[clap(long, env = "GITHUB_WORKSPACE")]
    pub workspace: Option<PathBuf>,
}

impl PublishArgs {
    pub fn to_inputs(&self) -> ActionInputs {
        ActionInputs {
            api_host: self.api_host.clone(),
            api_key: self.api_key.clone(),
            provider_org: self.provider_org.clone(),
            resync_check: self.resync_check.clone(),
            api_files: self.api_files.clone(),
            api_folders: self.api_folders.clone(),
            git_diff: self.git_diff.clone(),
            platform_api_prefix: self.platform_api_prefix.clone(),
            insecure_skip_tls_verify: self.insecure_skip_tls_verify.clone(),
            realm: self.realm.clone(),
            github_server_url: self.github_server_url.clone(),
            github_repository: self.github_repository.clone(),
            workspace: self.workspace.clone(),
        }
    }
}

/// Extracted async CLI logic entrypoint for integration tests and main()
///
/// Returns `Err` when the run must be marked failed: a fatal error, or a
/// final status outside 200/201/304.
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Publish(args) => publish(args).await,
    }
}

async fn publish(args: PublishArgs) -> Result<()> {
    let file_inputs = match &args.config {
        Some(path) => load_config(path)?,
        None => ActionInputs::default(),
    };
    let run = args.to_inputs().overlay(file_inputs).resolve()?;
    let config = run.config;

    let location = config.apis_location.as_deref().unwrap_or("");
    if !should_publish(&run.git_diff, location, config.is_folder) {
        tracing::info!(command = "publish", "No configured API changed, nothing to send");
        set_output(ACTION_RESULT, NO_CHANGES_MESSAGE).context("failed to write action output")?;
        return Ok(());
    }

    config.trace_loaded();
    let transport = HttpTransport::new(config.insecure_skip_tls_verify)
        .map_err(|e| anyhow::anyhow!("failed to construct HTTP client: {e}"))?;

    let result = create_or_update_discovered_api(&transport, &config).await?;
    tracing::info!(
        command = "publish",
        status = result.status,
        detail = result.first_message(),
        "Publishing finished"
    );
    set_output(ACTION_RESULT, &result.summary()).context("failed to write action output")?;

    if !result.is_acceptable() {
        return Err(anyhow::Error::msg(result.first_message().to_string()));
    }
    Ok(())
}
