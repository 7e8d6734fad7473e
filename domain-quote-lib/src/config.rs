//! Configuration file parsing and management.
//!
//! This module handles loading configuration from TOML files, merging
//! several files with proper precedence rules, and reading `DQ_*`
//! environment overrides. Files are only ever read.

use crate::error::DomainQuoteError;
use crate::types::SortKey;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Highest number of decimals the output may use.
pub const MAX_PRECISION: usize = 8;

/// Configuration loaded from TOML files.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FileConfig {
    /// Engine defaults
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,

    /// TLD catalog filtering
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterConfig>,

    /// Result ordering
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sorting: Option<SortingConfig>,

    /// Output formatting preferences
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputConfig>,
}

/// Default engine values that map to CLI options.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DefaultsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,

    /// Per-request timeout ("10s", "1m")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subsidiary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_new_registration: Option<bool>,
}

/// Which catalog TLDs are used to expand bare names.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FilterConfig {
    /// Internationalized (xn--) TLDs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_intl: Option<bool>,

    /// Second-level TLDs such as "co.uk"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_sld: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,

    /// Hide quotes whose first-year price is above this
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_order: Option<Decimal>,

    /// Hide quotes whose renewal price is above this
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_renew: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SortingConfig {
    /// none, alphabetic, price, renew or order (prefixes accepted)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ascending: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct OutputConfig {
    /// Decimals printed for prices
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<usize>,
}

/// Configuration discovery and loading functionality.
#[derive(Debug)]
pub struct ConfigManager {
    /// Whether to log which files were picked up
    pub verbose: bool,
}

impl ConfigManager {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Load and validate configuration from a specific file.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, DomainQuoteError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(DomainQuoteError::file_error(
                path.to_string_lossy(),
                "Configuration file not found",
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            DomainQuoteError::file_error(
                path.to_string_lossy(),
                format!("Failed to read configuration file: {}", e),
            )
        })?;

        let config: FileConfig = toml::from_str(&content).map_err(|e| {
            DomainQuoteError::config(format!("Failed to parse TOML configuration: {}", e))
        })?;

        self.validate_config(&config)?;

        Ok(config)
    }

    /// Discover and load configuration files in precedence order.
    ///
    /// XDG config, then the global file in `$HOME`, then a local file in the
    /// current directory; later files override earlier ones field by field.
    /// A file that fails to parse is skipped with a warning.
    pub fn discover_and_load(&self) -> Result<FileConfig, DomainQuoteError> {
        let mut merged_config = FileConfig::default();

        let candidates = [
            self.get_xdg_config_path(),
            self.get_global_config_path(),
            self.get_local_config_path(),
        ];

        for path in candidates.into_iter().flatten() {
            match self.load_file(&path) {
                Ok(config) => {
                    if self.verbose {
                        debug!(path = %path.display(), "Loaded config file");
                    }
                    merged_config = self.merge_configs(merged_config, config);
                }
                Err(e) => warn!(path = %path.display(), error = %e, "Ignoring config file"),
            }
        }

        Ok(merged_config)
    }

    /// Local configuration file in the current directory.
    fn get_local_config_path(&self) -> Option<PathBuf> {
        ["./domain-quote.toml", "./.domain-quote.toml"]
            .iter()
            .map(Path::new)
            .find(|path| path.exists())
            .map(Path::to_path_buf)
    }

    /// Global configuration file in the user's home directory.
    fn get_global_config_path(&self) -> Option<PathBuf> {
        let home = env::var_os("HOME")?;
        [".domain-quote.toml", "domain-quote.toml"]
            .iter()
            .map(|candidate| Path::new(&home).join(candidate))
            .find(|path| path.exists())
    }

    /// XDG configuration file, following the XDG Base Directory Specification.
    fn get_xdg_config_path(&self) -> Option<PathBuf> {
        let config_dir = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))?;

        let path = config_dir.join("domain-quote").join("config.toml");
        if path.exists() {
            Some(path)
        } else {
            None
        }
    }

    /// Merge two configurations; values from `higher` win.
    pub fn merge_configs(&self, lower: FileConfig, higher: FileConfig) -> FileConfig {
        FileConfig {
            defaults: merge_section(lower.defaults, higher.defaults, |low, high| {
                DefaultsConfig {
                    concurrency: high.concurrency.or(low.concurrency),
                    timeout: high.timeout.or(low.timeout),
                    subsidiary: high.subsidiary.or(low.subsidiary),
                    api_base: high.api_base.or(low.api_base),
                    require_new_registration: high
                        .require_new_registration
                        .or(low.require_new_registration),
                }
            }),
            filter: merge_section(lower.filter, higher.filter, |low, high| FilterConfig {
                include_intl: high.include_intl.or(low.include_intl),
                include_sld: high.include_sld.or(low.include_sld),
                max_length: high.max_length.or(low.max_length),
                max_order: high.max_order.or(low.max_order),
                max_renew: high.max_renew.or(low.max_renew),
            }),
            sorting: merge_section(lower.sorting, higher.sorting, |low, high| SortingConfig {
                key: high.key.or(low.key),
                ascending: high.ascending.or(low.ascending),
            }),
            output: merge_section(lower.output, higher.output, |low, high| OutputConfig {
                precision: high.precision.or(low.precision),
            }),
        }
    }

    /// Validate a configuration for common issues.
    fn validate_config(&self, config: &FileConfig) -> Result<(), DomainQuoteError> {
        if let Some(defaults) = &config.defaults {
            if let Some(concurrency) = defaults.concurrency {
                if concurrency == 0 || concurrency > 100 {
                    return Err(DomainQuoteError::config(
                        "Concurrency must be between 1 and 100",
                    ));
                }
            }

            if let Some(timeout_str) = &defaults.timeout {
                if parse_timeout_string(timeout_str).is_none() {
                    return Err(DomainQuoteError::config(format!(
                        "Invalid timeout format '{}'. Use format like '5s', '30s', '2m'",
                        timeout_str
                    )));
                }
            }

            if let Some(subsidiary) = &defaults.subsidiary {
                if subsidiary.len() != 2 || !subsidiary.chars().all(|c| c.is_ascii_alphabetic()) {
                    return Err(DomainQuoteError::config(format!(
                        "Invalid subsidiary '{}', expected a two-letter code like 'ES'",
                        subsidiary
                    )));
                }
            }
        }

        if let Some(filter) = &config.filter {
            if filter.max_length == Some(0) {
                return Err(DomainQuoteError::config("max_length must be at least 1"));
            }

            let ceilings = [filter.max_order, filter.max_renew];
            if ceilings.iter().flatten().any(|max| max.is_sign_negative()) {
                return Err(DomainQuoteError::config(
                    "max_order and max_renew may not be negative",
                ));
            }
        }

        if let Some(key) = config.sorting.as_ref().and_then(|s| s.key.as_ref()) {
            key.parse::<SortKey>()?;
        }

        if let Some(precision) = config.output.as_ref().and_then(|o| o.precision) {
            if precision > MAX_PRECISION {
                return Err(DomainQuoteError::config(format!(
                    "precision must be at most {}",
                    MAX_PRECISION
                )));
            }
        }

        Ok(())
    }
}

fn merge_section<T>(lower: Option<T>, higher: Option<T>, merge: impl FnOnce(T, T) -> T) -> Option<T> {
    match (lower, higher) {
        (Some(low), Some(high)) => Some(merge(low, high)),
        (low, high) => high.or(low),
    }
}

/// Environment variable configuration that mirrors CLI options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvConfig {
    pub concurrency: Option<usize>,
    pub timeout: Option<String>,
    pub subsidiary: Option<String>,
    pub sort: Option<SortKey>,
    pub ascending: Option<bool>,
    pub config: Option<String>,
}

/// Load configuration from `DQ_*` environment variables.
///
/// Invalid values are ignored (and logged when `verbose`).
pub fn load_env_config(verbose: bool) -> EnvConfig {
    env_config_from(verbose, |name| env::var(name).ok())
}

fn env_config_from(verbose: bool, lookup: impl Fn(&str) -> Option<String>) -> EnvConfig {
    let mut env_config = EnvConfig::default();

    let invalid = |name: &str, value: &str, hint: &str| {
        if verbose {
            warn!("Invalid {}='{}', {}", name, value, hint);
        }
    };

    if let Some(val) = lookup("DQ_CONCURRENCY") {
        match val.parse::<usize>() {
            Ok(concurrency) if (1..=100).contains(&concurrency) => {
                env_config.concurrency = Some(concurrency);
            }
            _ => invalid("DQ_CONCURRENCY", &val, "must be 1-100"),
        }
    }

    if let Some(val) = lookup("DQ_TIMEOUT") {
        if parse_timeout_string(&val).is_some() {
            env_config.timeout = Some(val);
        } else {
            invalid("DQ_TIMEOUT", &val, "use format like '5s', '30s', '2m'");
        }
    }

    if let Some(val) = lookup("DQ_SUBSIDIARY") {
        if !val.trim().is_empty() {
            env_config.subsidiary = Some(val.trim().to_uppercase());
        }
    }

    if let Some(val) = lookup("DQ_SORT") {
        match val.parse::<SortKey>() {
            Ok(key) => env_config.sort = Some(key),
            Err(_) => invalid("DQ_SORT", &val, "use none/alphabetic/price/renew/order"),
        }
    }

    if let Some(val) = lookup("DQ_ASCENDING") {
        match parse_bool(&val) {
            Some(ascending) => env_config.ascending = Some(ascending),
            None => invalid("DQ_ASCENDING", &val, "use true/false"),
        }
    }

    if let Some(val) = lookup("DQ_CONFIG") {
        if !val.trim().is_empty() {
            env_config.config = Some(val);
        }
    }

    if verbose && env_config != EnvConfig::default() {
        debug!(?env_config, "Using DQ_* environment overrides");
    }

    env_config
}

/// Parse the usual spellings of a boolean ("yes", "off", "1", ...).
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "enabled" => Some(true),
        "false" | "0" | "no" | "off" | "disabled" => Some(false),
        _ => None,
    }
}

/// Parse a timeout string like "5s", "30s", "2m" into seconds.
///
/// A bare number is taken as seconds.
pub fn parse_timeout_string(timeout_str: &str) -> Option<u64> {
    let timeout_str = timeout_str.trim().to_lowercase();

    let secs = if let Some(secs) = timeout_str.strip_suffix('s') {
        secs.parse::<u64>().ok()
    } else if let Some(mins) = timeout_str.strip_suffix('m') {
        mins.parse::<u64>().ok().map(|m| m * 60)
    } else {
        timeout_str.parse::<u64>().ok()
    };

    secs.filter(|secs| *secs > 0)
}
