//! Application configuration management.
//!
//! Configuration is loaded from a YAML file with environment variable overrides. The configuration
//! file path defaults to `config.yaml` but can be specified via `-f` flag or `SHEETCALC_CONFIG`
//! environment variable. A missing file is not an error: every field has a default.
//!
//! ## Loading Priority
//!
//! 1. **YAML config file** - Base configuration (default: `config.yaml`)
//! 2. **Environment variables** - Variables prefixed with `SHEETCALC_` override YAML values
//!
//! For nested config values, use double underscores in environment variables. For example,
//! `SHEETCALC_STORAGE__UPLOADS_DIR=/data/uploads` sets the `storage.uploads_dir` field.
//!
//! ## Usage
//!
//! ```no_run
//! use clap::Parser;
//! use sheetcalc::config::{Args, Config};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let args = Args::parse();
//! let config = Config::load(&args)?;
//!
//! println!("Server will bind to {}:{}", config.host, config.port);
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration Structure
//!
//! - **Server**: `host`, `port` - HTTP server binding configuration
//! - **Storage**: `storage.uploads_dir`, `storage.outputs_dir` - where uploads and results are written
//! - **Limits**: `limits.max_upload_bytes` - upload size ceiling
//! - **Telemetry**: `enable_otel_export` - OTLP trace export toggle
//!
//! ## Environment Variable Examples
//!
//! ```bash
//! SHEETCALC_PORT=8080
//! SHEETCALC_STORAGE__OUTPUTS_DIR=./data/outputs
//! SHEETCALC_LIMITS__MAX_UPLOAD_BYTES=1048576
//! ```

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::errors::Error;

/// Default upload ceiling: 10 MiB
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Simple CLI args - just for specifying config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "SHEETCALC_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate configuration and exit without starting the server.
    #[arg(long)]
    pub validate: bool,
}

/// Main application configuration.
///
/// Loaded from YAML and environment variables. All fields have defaults defined in the
/// `Default` implementation, so an empty (or absent) config file yields a runnable service.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server host to bind to (e.g., "0.0.0.0" for all interfaces)
    pub host: String,
    /// HTTP server port to bind to
    pub port: u16,
    /// Where uploads and generated workbooks are written
    pub storage: StorageConfig,
    /// Request size limits
    pub limits: LimitsConfig,
    /// Enable OpenTelemetry OTLP export for distributed tracing
    pub enable_otel_export: bool,
}

/// Filesystem layout for per-request files.
///
/// Both directories are ephemeral working areas: nothing in the service deletes from them.
/// Point them at a persistent `data/` tree for local use, or leave the defaults under the
/// system temp directory for constrained deployments.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory receiving raw uploads as `<job-id>.xlsx`
    pub uploads_dir: PathBuf,
    /// Directory receiving results as `<job-id>_output.xlsx`
    pub outputs_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let tmp = std::env::temp_dir();
        Self {
            uploads_dir: tmp.join("uploads"),
            outputs_dir: tmp.join("outputs"),
        }
    }
}

/// Resource limits for protecting the service.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsConfig {
    /// Maximum accepted upload size in bytes.
    /// Default: 10MiB
    pub max_upload_bytes: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            storage: StorageConfig::default(),
            limits: LimitsConfig::default(),
            enable_otel_export: false,
        }
    }
}

impl Config {
    #[allow(clippy::result_large_err)]
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let config: Self = Self::figment(args).extract()?;
        config.validate().map_err(|e| figment::Error::from(e.to_string()))?;
        Ok(config)
    }

    /// Validate the configuration for consistency
    pub fn validate(&self) -> Result<(), Error> {
        if self.limits.max_upload_bytes == 0 {
            return Err(Error::Internal {
                operation: "Config validation: limits.max_upload_bytes must be greater than 0".to_string(),
            });
        }

        if self.storage.uploads_dir == self.storage.outputs_dir {
            return Err(Error::Internal {
                operation: format!(
                    "Config validation: storage.uploads_dir and storage.outputs_dir must differ (both are {})",
                    self.storage.uploads_dir.display()
                ),
            });
        }

        Ok(())
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            // Load base config file
            .merge(Yaml::file(&args.config))
            // Environment variables override specific values
            .merge(Env::prefixed("SHEETCALC_").split("__"))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
