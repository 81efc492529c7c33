//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `landing_audit` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - Inventory source selection
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use landing_audit::initialization::{init_api_client, init_logger_with};
use landing_audit::inventory::{DirectApiSource, FileSource, InventorySource};
use landing_audit::{run_audit, Config, Opt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists), so YANDEX_API_TOKEN and
    // YANDEX_CLIENT_LOGIN can live there instead of being exported manually.
    // Try the current directory first, then the executable's directory.
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let config = Config::from(Opt::parse());

    if let Err(e) = config.validate() {
        eprintln!("landing_audit error: {e}");
        process::exit(1);
    }

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    let source: Box<dyn InventorySource> = match &config.input {
        Some(path) => match FileSource::load(path).await {
            Ok(source) => Box::new(source),
            Err(e) => {
                eprintln!("landing_audit error: {}: {e}", path.display());
                process::exit(1);
            }
        },
        None => {
            let client = init_api_client().context("Failed to initialize API client")?;
            Box::new(DirectApiSource::new(
                client,
                config.api_url.clone(),
                config.token.clone().unwrap_or_default(),
                config.client_login.clone().unwrap_or_default(),
                config.language.clone(),
            ))
        }
    };

    match run_audit(&config, source.as_ref()).await {
        Ok(audit) => {
            let issues = audit.report.total_issues();
            println!(
                "✅ Checked {} link{} in {} campaign{}: {} in {:.1}s",
                audit.metadata.links_checked,
                if audit.metadata.links_checked == 1 { "" } else { "s" },
                audit.metadata.campaigns_total,
                if audit.metadata.campaigns_total == 1 { "" } else { "s" },
                if issues == 0 {
                    "all links are healthy".to_string()
                } else {
                    format!("{issues} problem link(s)")
                },
                audit.metadata.duration.as_secs_f64()
            );
            if audit.output_written {
                println!("Results saved in {}", config.output_file.display());
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("landing_audit error: {:#}", e);
            process::exit(1);
        }
    }
}
