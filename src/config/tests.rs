// rcloadenv: Runtime Config environment loader
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::Config;
use super::loader::ConfigLoader;
use super::types::DEFAULT_ENDPOINT;
use crate::auth::RUNTIMECONFIG_SCOPE;
use crate::logging::LogLevel;
use std::io::Write;
use std::path::PathBuf;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.api.endpoint, DEFAULT_ENDPOINT);
    assert!(config.api.project.is_empty());
    assert_eq!(config.api.page_size, 0);
    assert_eq!(config.credentials.scopes, vec![RUNTIMECONFIG_SCOPE.to_string()]);
    assert!(config.credentials.metadata);
    assert!(!config.merge.override_existing);
    assert_eq!(config.global.output_log_level, LogLevel::INFO);
    assert!(config.validate().is_ok());
}

#[test]
fn test_parse_full_config() {
    let config = Config::parse(
        r#"
        [global]
        output_log_level = 4
        file_log_level = 5
        log_file = "rcloadenv.log"

        [api]
        endpoint = "http://localhost:8080"
        project = "my-proj"
        page_size = 50

        [credentials]
        scopes = ["https://www.googleapis.com/auth/cloud-platform"]
        metadata = false
        metadata_host = "127.0.0.1:9000"
        token_uri = "http://localhost:8081/token"

        [merge]
        override_existing = true
        only = ["db-*"]
        except = ["db-password"]
        "#,
    )
    .unwrap();

    assert_eq!(config.global.output_log_level, LogLevel::DEBUG);
    assert_eq!(config.global.file_log_level, LogLevel::TRACE);
    assert_eq!(config.global.log_file, Some(PathBuf::from("rcloadenv.log")));
    assert_eq!(config.api.endpoint, "http://localhost:8080");
    assert_eq!(config.api.project, "my-proj");
    assert_eq!(config.api.page_size, 50);
    assert!(!config.credentials.metadata);
    assert_eq!(config.credentials.metadata_host, "127.0.0.1:9000");

    let options = config.merge_options().unwrap();
    assert!(options.override_existing());
    assert!(options.filter().allows("db-host"));
    assert!(!options.filter().allows("db-password"));
}

#[test]
fn test_partial_config_keeps_defaults() {
    let config = Config::parse("[api]\nproject = \"p\"\n").unwrap();
    assert_eq!(config.api.project, "p");
    assert_eq!(config.api.endpoint, DEFAULT_ENDPOINT);
    assert!(config.credentials.metadata);
}

#[test]
fn test_unknown_key_rejected() {
    assert!(Config::parse("[api]\nendpont = \"typo\"\n").is_err());
    assert!(Config::parse("[nope]\nkey = 1\n").is_err());
}

#[test]
fn test_invalid_log_level_rejected() {
    assert!(Config::parse("[global]\noutput_log_level = 9\n").is_err());
}

#[test]
fn test_invalid_endpoint_rejected() {
    let err = Config::parse("[api]\nendpoint = \"not a url\"\n").unwrap_err();
    assert!(format!("{err:#}").contains("endpoint"));
}

#[test]
fn test_empty_scopes_rejected() {
    assert!(Config::parse("[credentials]\nscopes = []\n").is_err());
}

#[test]
fn test_invalid_pattern_rejected() {
    let err = Config::parse("[merge]\nonly = [\"db-[\"]\n").unwrap_err();
    assert!(format!("{err:#}").contains("invalid pattern"));
}

#[test]
fn test_later_file_wins() {
    let mut first = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
    writeln!(first, "[api]\nproject = \"first\"\npage_size = 10").unwrap();
    let mut second = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
    writeln!(second, "[api]\nproject = \"second\"").unwrap();

    let loader = ConfigLoader::new()
        .add_toml_file(first.path())
        .add_toml_file(second.path());
    assert_eq!(loader.format_loaded_files().len(), 2);

    let config = loader.build().unwrap();
    assert_eq!(config.api.project, "second");
    assert_eq!(config.api.page_size, 10);
}

#[test]
fn test_missing_required_file() {
    let result = ConfigLoader::new()
        .add_toml_file("/definitely/not/here/rcloadenv.toml")
        .build();
    assert!(result.is_err());
}

#[test]
fn test_missing_optional_file_is_skipped() {
    let loader = ConfigLoader::new().add_toml_file_optional("/definitely/not/here/rcloadenv.toml");
    assert!(loader.format_loaded_files().is_empty());
    assert!(loader.build().is_ok());
}

#[test]
fn test_overrides_win_over_files() {
    let config = ConfigLoader::new()
        .add_toml_str("[merge]\noverride_existing = false\nonly = [\"a\"]\n")
        .set("merge.override_existing", true)
        .unwrap()
        .set("merge.only", vec!["b".to_string(), "c".to_string()])
        .unwrap()
        .build()
        .unwrap();

    assert!(config.merge.override_existing);
    assert_eq!(config.merge.only, vec!["b", "c"]);
}

#[test]
fn test_format_loaded_files() {
    let loader = ConfigLoader::new().add_toml_str("");
    insta::assert_debug_snapshot!(loader.format_loaded_files(), @r#"
    [
        "1. [string] <string>",
    ]
    "#);
}
