#![doc = "apic-discovery: publish API description files from a CI workspace to an API discovery service."]

//! The library holds the whole publishing pipeline; the binary only maps
//! GitHub Actions inputs onto it.
//!
//! # Navigation
//! - Main entrypoint: [`submit::create_or_update_discovered_api`]
//! - HTTP seam: [`contract::Transport`], implemented by [`transport::HttpTransport`]
//! - Building blocks: [`format`], [`archive`], [`auth`], [`registrar`], [`health`]

pub mod action_output;
pub mod archive;
pub mod auth;
pub mod changes;
pub mod cli;
pub mod config;
pub mod contract;
pub mod endpoints;
pub mod error;
pub mod format;
pub mod health;
pub mod load_config;
pub mod registrar;
pub mod result;
pub mod submit;
pub mod transport;

pub use cli::{run, Cli, Commands};
pub use config::DiscoveryConfig;
pub use error::Error;
pub use result::SubmissionResult;
pub use submit::create_or_update_discovered_api;
