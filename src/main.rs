// rcloadenv: Runtime Config environment loader
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Config --> Logging --> run_command
//!   Exported --> stdout
//!   Launch   --> flush logs --> exec
//! ```

use std::process::ExitCode;

use rcloadenv::cli;
use rcloadenv::cmd::run::{RunOutcome, run_command};
use rcloadenv::config::Config;
use rcloadenv::core::env::current_env;
use rcloadenv::logging::{LogConfig, init_logging};
use tracing::debug;

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = cli::parse();

    let loaded = cli.config_loader().and_then(|loader| {
        let sources = loader.format_loaded_files();
        loader.build().map(|config| (config, sources))
    });
    let (config, sources) = match loaded {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Failed to load config: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let log_guard = match init_logging(&build_log_config(&config)) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    for source in &sources {
        debug!("config source {source}");
    }

    let ambient = current_env();
    match run_command(&cli.run, &config, &ambient).await {
        Ok(RunOutcome::Exported(text)) => {
            print!("{text}");
            ExitCode::SUCCESS
        }
        Ok(RunOutcome::Launch(plan)) => {
            // Flush file logs; exec does not run destructors.
            drop(log_guard);
            let Err(e) = plan.launch().await;
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn build_log_config(config: &Config) -> LogConfig {
    LogConfig::builder()
        .with_console_level(config.global.output_log_level)
        .with_file_level(config.global.file_log_level)
        .maybe_with_log_file(
            config
                .global
                .log_file
                .as_ref()
                .filter(|p| !p.as_os_str().is_empty())
                .map(|p| p.display().to_string()),
        )
        .build()
}
