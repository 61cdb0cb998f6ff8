//! Layered configuration.
//!
//! Settings are merged from, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. A TOML file (`--config FILE`, or `config.toml` in the platform config
//!    directory when it exists)
//! 3. `LAZYDUPE_*` environment variables (`LAZYDUPE_MIN_SIZE=10MB`)
//! 4. Command-line flags, applied with [`Config::merge_scan_args`]
//!
//! ```toml
//! min_size = "10MB"
//! report_path = "/var/tmp/dupes.csv"
//! report_format = "csv"
//! retro_hash = false
//! skip_hidden = true
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::cli::{parse_size, ScanArgs, SizeParseError};
use crate::output::ReportFormat;

/// Prefix for configuration environment variables.
pub const ENV_PREFIX: &str = "LAZYDUPE_";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// The file or environment could not be parsed.
    #[error("Invalid configuration: {0}")]
    Parse(#[from] Box<figment::Error>),

    /// `min_size` is not a valid size string.
    #[error("Invalid min_size '{value}': {source}")]
    InvalidSize {
        /// Offending value
        value: String,
        /// Parse failure
        #[source]
        source: SizeParseError,
    },
}

/// Resolved application settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Minimum file size, as a size string (`"1MB"`, `"500KB"`, `"2"`)
    #[serde(deserialize_with = "size_string")]
    pub min_size: String,
    /// Report file; defaults to a per-format name in the working directory
    pub report_path: Option<PathBuf>,
    /// Report format
    pub report_format: ReportFormat,
    /// Hash the first file of a size class once a second one arrives
    pub retro_hash: bool,
    /// Skip hidden files and directories
    pub skip_hidden: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_size: "1MB".to_string(),
            report_path: None,
            report_format: ReportFormat::Text,
            retro_hash: false,
            skip_hidden: false,
        }
    }
}

/// Accept `min_size = "10MB"` as well as a bare `min_size = 10`.
fn size_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawSize {
        Text(String),
        Number(u64),
    }

    Ok(match RawSize::deserialize(deserializer)? {
        RawSize::Text(s) => s,
        RawSize::Number(n) => n.to_string(),
    })
}

impl Config {
    /// Load configuration from `explicit` or the default config path, then
    /// the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `explicit` is missing, a layer fails to
    /// parse, or `min_size` is invalid.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) if !path.exists() => Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => Self::load_from_path(path),
            None => match Self::default_path() {
                Some(path) => Self::load_from_path(&path),
                None => Self::extract(Self::base()),
            },
        }
    }

    /// Load configuration from a specific TOML file (missing files are
    /// skipped), then the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on parse failure or an invalid `min_size`.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        log::debug!("Loading configuration from {}", path.display());
        Self::extract(Self::base().merge(Toml::file(path)))
    }

    fn base() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Config = figment
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .map_err(Box::new)?;
        config.min_size_bytes()?;
        Ok(config)
    }

    /// Platform config file path (`~/.config/lazydupe/config.toml` on Linux).
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "lazydupe").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Apply command-line overrides.
    pub fn merge_scan_args(&mut self, args: &ScanArgs) {
        if let Some(size) = args.size {
            self.min_size = format!("{}bytes", size);
        }
        if let Some(ref report) = args.report {
            self.report_path = Some(report.clone());
        }
        if let Some(format) = args.format {
            self.report_format = format;
        }
        if args.retro_hash {
            self.retro_hash = true;
        }
        if args.skip_hidden {
            self.skip_hidden = true;
        }
    }

    /// `min_size` in bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSize`] if the size string is malformed.
    pub fn min_size_bytes(&self) -> Result<u64, ConfigError> {
        parse_size(&self.min_size).map_err(|source| ConfigError::InvalidSize {
            value: self.min_size.clone(),
            source,
        })
    }

    /// Report path, falling back to the format's default file name.
    #[must_use]
    pub fn resolved_report_path(&self) -> PathBuf {
        self.report_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(self.report_format.default_file_name()))
    }
}
