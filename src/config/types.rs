//! Configuration types and CLI options.
//!
//! `Opt` is the command-line surface parsed by `clap`; `Config` is the library
//! configuration that can be built programmatically; `ResolverConfig` is the immutable
//! slice of it threaded through every resolution call.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DEFAULT_API_LANGUAGE, DEFAULT_API_URL, DEFAULT_MAX_CONCURRENCY, DEFAULT_OUTPUT_FILE,
    DEFAULT_RECHECK_ATTEMPTS, DEFAULT_RECHECK_DELAY_SECS, DEFAULT_TIMEOUT_SECS,
    DEFAULT_USER_AGENT,
};
use crate::error_handling::ConfigError;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Command-line options.
///
/// # Examples
///
/// ```bash
/// # Audit every active campaign of a Direct account (credentials from the environment)
/// YANDEX_API_TOKEN=... YANDEX_CLIENT_LOGIN=shop landing_audit
///
/// # Audit links listed in a JSON Lines file, rechecking a timer-gated tracker twice
/// landing_audit --input links.jsonl --recheck-attempts 2 --recheck-host go.tracker.example
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "landing_audit",
    about = "Checks advertising destination links for errors, stubs and unreachable landing pages."
)]
pub struct Opt {
    /// JSON Lines file with links to audit (one {campaign_id, campaign_name, ad_id, url} per line).
    /// When omitted, links are listed from the Direct API.
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// OAuth token for the Direct API
    #[arg(long, env = "YANDEX_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Client login of the Direct account (without @yandex.ru)
    #[arg(long, env = "YANDEX_CLIENT_LOGIN")]
    pub client_login: Option<String>,

    /// Direct API base URL
    #[arg(long, default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Language of Direct API error messages
    #[arg(long, default_value = DEFAULT_API_LANGUAGE)]
    pub language: String,

    /// Text report path
    #[arg(long, default_value = DEFAULT_OUTPUT_FILE)]
    pub output_file: PathBuf,

    /// Optional JSON report path
    #[arg(long)]
    pub json_output: Option<PathBuf>,

    /// Per-fetch timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Pause before each recheck attempt, in seconds
    #[arg(long, default_value_t = DEFAULT_RECHECK_DELAY_SECS)]
    pub recheck_delay: u64,

    /// Number of additional attempts for links that may redirect late (0 disables recheck)
    #[arg(long, default_value_t = DEFAULT_RECHECK_ATTEMPTS)]
    pub recheck_attempts: u32,

    /// Host eligible for recheck (repeatable). When none are given, every host is eligible.
    #[arg(long = "recheck-host")]
    pub recheck_hosts: Vec<String>,

    /// Maximum number of links resolved concurrently
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENCY)]
    pub max_concurrency: usize,

    /// Only audit these campaign IDs (repeatable)
    #[arg(long = "include-campaign")]
    pub include_campaigns: Vec<i64>,

    /// Skip these campaign IDs (repeatable)
    #[arg(long = "exclude-campaign")]
    pub exclude_campaigns: Vec<i64>,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

/// Library configuration (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use landing_audit::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     input: Some(PathBuf::from("links.jsonl")),
///     recheck_attempts: 2,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON Lines inventory file; `None` selects the Direct API source
    pub input: Option<PathBuf>,

    /// Direct API OAuth token
    pub token: Option<String>,

    /// Direct API client login
    pub client_login: Option<String>,

    /// Direct API base URL
    pub api_url: String,

    /// Direct API error language
    pub language: String,

    /// Text report path
    pub output_file: PathBuf,

    /// JSON report path
    pub json_output: Option<PathBuf>,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// Per-fetch timeout in seconds
    pub timeout_seconds: u64,

    /// Pause before each recheck attempt, in seconds
    pub recheck_delay_seconds: u64,

    /// Number of additional attempts
    pub recheck_attempts: u32,

    /// Hosts eligible for recheck (empty = all)
    pub recheck_hosts: Vec<String>,

    /// Maximum concurrent link resolutions
    pub max_concurrency: usize,

    /// Campaign allow list (empty = all)
    pub include_campaigns: Vec<i64>,

    /// Campaign deny list
    pub exclude_campaigns: Vec<i64>,

    /// HTTP User-Agent header value
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: None,
            token: None,
            client_login: None,
            api_url: DEFAULT_API_URL.to_string(),
            language: DEFAULT_API_LANGUAGE.to_string(),
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            json_output: None,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            recheck_delay_seconds: DEFAULT_RECHECK_DELAY_SECS,
            recheck_attempts: DEFAULT_RECHECK_ATTEMPTS,
            recheck_hosts: Vec::new(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            include_campaigns: Vec::new(),
            exclude_campaigns: Vec::new(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl From<Opt> for Config {
    fn from(opt: Opt) -> Self {
        Self {
            input: opt.input,
            token: opt.token,
            client_login: opt.client_login,
            api_url: opt.api_url,
            language: opt.language,
            output_file: opt.output_file,
            json_output: opt.json_output,
            log_level: opt.log_level,
            log_format: opt.log_format,
            timeout_seconds: opt.timeout,
            recheck_delay_seconds: opt.recheck_delay,
            recheck_attempts: opt.recheck_attempts,
            recheck_hosts: opt.recheck_hosts,
            max_concurrency: opt.max_concurrency,
            include_campaigns: opt.include_campaigns,
            exclude_campaigns: opt.exclude_campaigns,
            user_agent: opt.user_agent,
        }
    }
}

impl Config {
    /// Checks the configuration before any resource is created.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingCredentials` when the Direct API source is selected
    /// without a token or client login, and `ConfigError::InvalidValue` for a zero timeout
    /// or zero concurrency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input.is_none() {
            let has_token = self.token.as_deref().is_some_and(|t| !t.trim().is_empty());
            let has_login = self
                .client_login
                .as_deref()
                .is_some_and(|l| !l.trim().is_empty());
            if !has_token || !has_login {
                return Err(ConfigError::MissingCredentials);
            }
        }
        if self.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.max_concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_concurrency",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Builds the immutable resolution settings shared by every link task.
    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig::new(
            Duration::from_secs(self.timeout_seconds),
            Duration::from_secs(self.recheck_delay_seconds),
            self.recheck_attempts,
            &self.recheck_hosts,
        )
    }
}

/// Immutable per-run resolution settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Timeout applied to every single fetch, redirects and body read included
    pub timeout: Duration,
    /// Pause before each recheck attempt
    pub recheck_delay: Duration,
    /// Additional attempts after the first resolution
    pub recheck_attempts: u32,
    /// Lower-cased hosts eligible for recheck; `None` means every host is eligible
    pub recheck_hosts: Option<HashSet<String>>,
}

impl ResolverConfig {
    /// Creates resolution settings. An empty host list is normalized to `None`.
    pub fn new(
        timeout: Duration,
        recheck_delay: Duration,
        recheck_attempts: u32,
        recheck_hosts: &[String],
    ) -> Self {
        let hosts: HashSet<String> = recheck_hosts
            .iter()
            .map(|h| h.trim().trim_end_matches('.').to_ascii_lowercase())
            .filter(|h| !h.is_empty())
            .collect();
        Self {
            timeout,
            recheck_delay,
            recheck_attempts,
            recheck_hosts: if hosts.is_empty() { None } else { Some(hosts) },
        }
    }

    /// Returns true if a URL on `host` may be rechecked.
    pub fn is_recheck_host(&self, host: Option<&str>) -> bool {
        match (&self.recheck_hosts, host) {
            (None, _) => true,
            (Some(hosts), Some(host)) => {
                hosts.contains(host.trim_end_matches('.').to_ascii_lowercase().as_str())
            }
            (Some(_), None) => false,
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self::new(
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            Duration::from_secs(DEFAULT_RECHECK_DELAY_SECS),
            DEFAULT_RECHECK_ATTEMPTS,
            &[],
        )
    }
}
