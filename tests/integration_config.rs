// rcloadenv: Runtime Config environment loader
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for configuration loading.
//!
//! Tests the Config module with realistic TOML files and CLI layering.

use clap::Parser;
use rcloadenv::auth::SessionOptions;
use rcloadenv::cli::Cli;
use rcloadenv::config::Config;
use rcloadenv::logging::LogLevel;
use std::path::Path;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path.display().to_string()
}

// =============================================================================
// Loading from TOML files
// =============================================================================

#[test]
fn config_from_file() {
    let dir = TempDir::new().unwrap();
    let path = write(
        dir.path(),
        "rcloadenv.toml",
        r#"
[api]
project = "file-proj"
page_size = 100

[credentials]
metadata_host = "127.0.0.1:8989"
"#,
    );

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.api.project, "file-proj");
    assert_eq!(config.api.page_size, 100);

    let options = SessionOptions::from_config(&config);
    assert_eq!(options.project(), Some("file-proj"));
    assert_eq!(options.metadata_host(), Some("127.0.0.1:8989"));
    assert_eq!(options.token_uri(), None);
    assert!(options.metadata());
}

#[test]
fn config_empty_strings_mean_unset() {
    let config = Config::parse("[api]\nproject = \"\"\n").unwrap();
    let options = SessionOptions::from_config(&config);
    assert_eq!(options.project(), None);
    assert_eq!(options.metadata_host(), None);
}

#[test]
fn config_malformed_toml() {
    assert!(Config::parse("[api\nproject = 1").is_err());
}

#[test]
fn config_wrong_type() {
    assert!(Config::parse("[merge]\noverride_existing = \"yes please\"\n").is_err());
}

// =============================================================================
// CLI layering
// =============================================================================

#[test]
fn cli_flags_override_config_files() {
    let dir = TempDir::new().unwrap();
    let base = write(
        dir.path(),
        "base.toml",
        "[global]\noutput_log_level = 2\n\n[api]\nproject = \"base\"\n\n[merge]\nonly = [\"a\"]\n",
    );
    let extra = write(dir.path(), "extra.toml", "[api]\nproject = \"extra\"\n");

    let cli = Cli::try_parse_from([
        "rcloadenv",
        "-c",
        base.as_str(),
        "-c",
        extra.as_str(),
        "-O",
        "b,c",
        "--",
        "true",
    ])
    .unwrap();
    let config = cli.config_loader().unwrap().build().unwrap();

    assert_eq!(config.global.output_log_level, LogLevel::WARN);
    assert_eq!(config.api.project, "extra");
    assert_eq!(config.merge.only, vec!["b", "c"]);
}

#[test]
fn cli_missing_config_file_fails() {
    let cli = Cli::try_parse_from(["rcloadenv", "-c", "/definitely/missing.toml", "--", "true"])
        .unwrap();
    assert!(cli.config_loader().unwrap().build().is_err());
}

#[test]
fn cli_debug_sets_both_levels() {
    let cli = Cli::try_parse_from(["rcloadenv", "--debug", "--", "true"]).unwrap();
    let config = cli.config_loader().unwrap().build().unwrap();
    assert_eq!(config.global.output_log_level, LogLevel::DEBUG);
    assert_eq!(config.global.file_log_level, LogLevel::DEBUG);
}
