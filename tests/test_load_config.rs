use std::fs::write;
use std::path::PathBuf;

use apic_discovery::load_config::{data_source_location, load_config, parse_flag, ActionInputs};
use tempfile::NamedTempFile;

/// A config file on its own resolves into a complete discovery config.
#[test]
fn test_load_config_resolves_file_inputs() {
    let config_yaml = r#"
api_host: apic.example.com
provider_org: porg
api_folders: "APIfolder, APIfiles"
resync_check: true
platform_api_prefix: api
insecure_skip_tls_verify: "true"
github_server_url: https://github.example.com
github_repository: acme/apis
workspace: /tmp/workspace
"#;
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), config_yaml).unwrap();

    let inputs = load_config(config_file.path()).expect("Config should load");
    let run = inputs.resolve().expect("Config should resolve");
    let config = run.config;

    assert_eq!(config.api_host, "apic.example.com");
    assert_eq!(config.platform_api_prefix, "api");
    assert_eq!(config.apis_location.as_deref(), Some("APIfolder, APIfiles"));
    assert!(config.is_folder);
    assert!(config.resync_check);
    assert!(config.insecure_skip_tls_verify);
    assert_eq!(config.data_source_location, "github.example.com/acme/apis");
    assert_eq!(config.workspace, PathBuf::from("/tmp/workspace"));
    assert_eq!(config.api_key, None);
    assert_eq!(
        config.endpoints().token(),
        "https://api.apic.example.com/discovery/token"
    );
}

/// Command line and environment inputs win over the file; blanks fall through.
#[test]
fn test_cli_inputs_overlay_file_inputs() {
    let file = ActionInputs {
        api_host: Some("file.example.com".to_string()),
        api_key: Some("file-key".to_string()),
        api_files: Some("file.json".to_string()),
        provider_org: Some("file-org".to_string()),
        ..Default::default()
    };
    let cli = ActionInputs {
        api_host: Some("cli.example.com".to_string()),
        api_key: Some("   ".to_string()),
        ..Default::default()
    };

    let run = cli.overlay(file).resolve().expect("resolve");
    assert_eq!(run.config.api_host, "cli.example.com");
    assert_eq!(run.config.api_key.as_deref(), Some("file-key"));
    assert_eq!(run.config.provider_org, "file-org");
    assert_eq!(run.config.platform_api_prefix, "platform-api");
    assert_eq!(run.config.realm, "provider/default-idp-2");
    assert_eq!(run.config.data_source_location, "github.com");
}

#[test]
fn test_api_files_take_precedence_over_folders() {
    let inputs = ActionInputs {
        api_files: Some("a.json".to_string()),
        api_folders: Some("APIfolder".to_string()),
        ..Default::default()
    };
    let config = inputs.resolve().unwrap().config;
    assert_eq!(config.apis_location.as_deref(), Some("a.json"));
    assert!(!config.is_folder);
}

#[test]
fn test_flags_and_server_url_parsing() {
    assert!(parse_flag("resync_check", Some("TRUE")).unwrap());
    assert!(!parse_flag("resync_check", Some("false")).unwrap());
    assert!(!parse_flag("resync_check", None).unwrap());
    assert!(parse_flag("resync_check", Some("maybe")).is_err());

    assert_eq!(
        data_source_location("https://github.com", "acme/apis").unwrap(),
        "github.com/acme/apis"
    );
    assert!(data_source_location("not a url", "acme/apis").is_err());
}

#[test]
fn test_load_config_errors_for_invalid_file() {
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), b"not-yaml: [:::").unwrap();

    let err = load_config(config_file.path()).unwrap_err();
    let msg = err.to_string();
    assert!(
        msg.contains("parse") || msg.contains("YAML"),
        "Parse error expected, got: {msg}"
    );
}

#[test]
fn test_load_config_rejects_unknown_keys() {
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), "api_hots: typo.example.com\n").unwrap();

    assert!(load_config(config_file.path()).is_err());
}

#[test]
fn test_empty_config_file_is_allowed() {
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), "").unwrap();

    let inputs = load_config(config_file.path()).expect("empty file loads");
    assert!(inputs.api_host.is_none());
}
