//! Logger initialization.
//!
//! Plain output is one colored line per record, prefixed with the wall-clock time and
//! the module inside this crate that logged it. JSON output emits one object per line.

use std::io::Write;

use chrono::{DateTime, Local, Utc};
use colored::*;
use log::{Level, LevelFilter};

use crate::config::LogFormat;
use crate::error_handling::InitializationError;

/// Dependencies whose debug output drowns the per-link log lines.
const QUIET_MODULES: [&str; 3] = ["reqwest", "hyper", "hyper_util"];

/// Initializes the logger with the specified level and format.
///
/// `RUST_LOG` is read first; `level` then overrides it for this crate, so
/// `RUST_LOG=reqwest=debug landing_audit --log-level warn` still works for
/// per-module debugging. HTTP stack modules are capped at info.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger is already installed.
///
/// # Examples
///
/// ```bash
/// RUST_LOG=debug landing_audit --input links.jsonl
/// landing_audit --input links.jsonl --log-level debug --log-format json
/// ```
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    colored::control::set_override(true);

    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(level);
    for module in QUIET_MODULES {
        builder.filter_module(module, level.min(LevelFilter::Info));
    }
    builder.filter_module(env!("CARGO_CRATE_NAME"), level);

    match format {
        LogFormat::Json => {
            builder.format(|buf, record| {
                let line = json_line(
                    Utc::now(),
                    record.level(),
                    record.target(),
                    &record.args().to_string(),
                );
                writeln!(buf, "{line}")
            });
        }
        LogFormat::Plain => {
            builder.format(|buf, record| {
                let line = plain_line(
                    Local::now(),
                    record.level(),
                    record.target(),
                    &record.args().to_string(),
                );
                writeln!(buf, "{line}")
            });
        }
    }

    builder.try_init().map_err(InitializationError::from)?;

    Ok(())
}

/// Drops the crate prefix from targets inside this crate (`landing_audit::fetch::resolver`
/// becomes `fetch::resolver`); foreign targets are kept whole.
fn short_target(target: &str) -> &str {
    let crate_name = env!("CARGO_CRATE_NAME");
    match target.strip_prefix(crate_name) {
        Some("") => crate_name,
        Some(rest) => rest.strip_prefix("::").unwrap_or(target),
        None => target,
    }
}

fn plain_line(now: DateTime<Local>, level: Level, target: &str, msg: &str) -> String {
    let level_tag = match level {
        Level::Error => "ERROR".red().bold(),
        Level::Warn => "WARN ".yellow(),
        Level::Info => "INFO ".green(),
        Level::Debug => "DEBUG".blue(),
        Level::Trace => "TRACE".purple(),
    };
    format!(
        "{} {} {} {}",
        now.format("%H:%M:%S").to_string().dimmed(),
        level_tag,
        short_target(target).cyan(),
        msg
    )
}

fn json_line(now: DateTime<Utc>, level: Level, target: &str, msg: &str) -> String {
    serde_json::json!({
        "ts": now.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        "level": level.as_str(),
        "module": short_target(target),
        "msg": msg,
    })
    .to_string()
}
