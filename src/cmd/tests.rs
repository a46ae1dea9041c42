// rcloadenv: Runtime Config environment loader
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::ffi::OsString;

use super::run::{RunOutcome, render_exports, run_command, shell_quote};
use crate::cli::run::RunArgs;
use crate::config::Config;
use crate::core::env::container::Env;
use crate::core::env::current_env;
use crate::core::env::merge::{MergeOptions, merge_variables};
use crate::error::LaunchError;
use crate::runtimeconfig::VariableMapping;

#[test]
fn test_shell_quote() {
    assert_eq!(shell_quote("plain"), "'plain'");
    assert_eq!(shell_quote(""), "''");
    assert_eq!(shell_quote("it's"), r"'it'\''s'");
    assert_eq!(shell_quote("$HOME `x`"), "'$HOME `x`'");
}

#[test]
fn test_render_exports_skips_kept_values() {
    let base: Env = [("KEEP", "local")].into_iter().collect();
    let variables: VariableMapping = [
        ("keep".to_string(), "remote".to_string()),
        ("db-host".to_string(), "10.0.0.1".to_string()),
        ("motd".to_string(), "it's up".to_string()),
    ]
    .into_iter()
    .collect();

    let outcome = merge_variables(&base, &variables, &MergeOptions::default());
    insta::assert_snapshot!(render_exports(&outcome).trim_end(), @r"
    export DB_HOST='10.0.0.1'
    export MOTD='it'\''s up'
    ");
}

#[test]
fn test_render_exports_skips_names_shells_reject() {
    let variables: VariableMapping = [
        ("db.host".to_string(), "h".to_string()),
        ("9lives".to_string(), "x".to_string()),
        ("port".to_string(), "1".to_string()),
    ]
    .into_iter()
    .collect();

    let outcome = merge_variables(&Env::new(), &variables, &MergeOptions::default());
    assert_eq!(outcome.env().get("DB.HOST"), Some("h"));
    insta::assert_snapshot!(render_exports(&outcome).trim_end(), @"export PORT='1'");
}

#[cfg(unix)]
#[test]
fn test_rendered_exports_can_be_sourced() {
    let variables: VariableMapping = [
        ("db.host".to_string(), "h".to_string()),
        ("port".to_string(), "1".to_string()),
    ]
    .into_iter()
    .collect();
    let outcome = merge_variables(&Env::new(), &variables, &MergeOptions::default());
    let script = format!("{}printf %s \"$PORT\"", render_exports(&outcome));

    let output = std::process::Command::new("sh")
        .args(["-c", script.as_str()])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "1");
}

#[tokio::test]
async fn test_without_config_name_exports_nothing() {
    let args = RunArgs {
        export: true,
        ..RunArgs::default()
    };
    let outcome = run_command(&args, &Config::default(), &Env::new()).await.unwrap();

    let RunOutcome::Exported(text) = outcome else {
        panic!("expected exported text");
    };
    assert!(text.is_empty());
}

#[tokio::test]
async fn test_empty_config_name_is_ignored() {
    let args = RunArgs {
        config_name: Some(String::new()),
        export: true,
        ..RunArgs::default()
    };
    let outcome = run_command(&args, &Config::default(), &Env::new()).await.unwrap();
    assert!(matches!(outcome, RunOutcome::Exported(text) if text.is_empty()));
}

#[tokio::test]
async fn test_missing_command() {
    let err = run_command(&RunArgs::default(), &Config::default(), &Env::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LaunchError>(),
        Some(LaunchError::NoCommand)
    ));
}

#[tokio::test]
async fn test_missing_command_fails_before_loading() {
    // No credentials are available, so reaching the loader would fail differently.
    let mut config = Config::default();
    config.credentials.metadata = false;
    let args = RunArgs {
        config_name: Some("app-config".to_string()),
        ..RunArgs::default()
    };

    let err = run_command(&args, &config, &Env::new()).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LaunchError>(),
        Some(LaunchError::NoCommand)
    ));
}

#[cfg(unix)]
#[tokio::test]
async fn test_without_config_name_launches_unchanged_env() {
    let ambient = current_env();
    let args = RunArgs {
        command: vec![OsString::from("sh"), OsString::from("-c"), OsString::from("true")],
        ..RunArgs::default()
    };

    let outcome = run_command(&args, &Config::default(), &ambient).await.unwrap();
    let RunOutcome::Launch(plan) = outcome else {
        panic!("expected a launch plan");
    };
    assert_eq!(plan.env(), &ambient);
    assert!(plan.program().ends_with("sh"));
    assert_eq!(plan.args(), &[OsString::from("-c"), OsString::from("true")]);
}
