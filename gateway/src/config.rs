//! Configuration module for the paygate server.

use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use paygate_local::{InvalidSuccessRate, ItemPolicy, PaymentPolicy};
use paygate_types::catalog::Catalog;

/// Used when `--config` is absent and the file exists.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// CLI arguments for the paygate server.
#[derive(Parser, Debug)]
#[command(name = "paygate")]
#[command(about = "Simulated payment gateway HTTP server")]
struct CliArgs {
    /// Path to the JSON configuration file
    #[arg(long, short, env = "CONFIG")]
    config: Option<PathBuf>,
}

/// Server configuration.
///
/// Fields use serde defaults that fall back to environment variables,
/// then to hardcoded defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "config_defaults::default_port")]
    port: u16,
    #[serde(default = "config_defaults::default_host")]
    host: IpAddr,
    #[serde(default)]
    catalog: Catalog,
    #[serde(default)]
    payment: PaymentConfig,
}

/// The `payment` section.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PaymentConfig {
    /// Probability that a validated payment is approved.
    #[serde(default = "config_defaults::default_success_rate")]
    success_rate: f64,
    /// Only catalog items at their listed price may be bought.
    #[serde(default)]
    catalog_only: bool,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        PaymentConfig {
            success_rate: config_defaults::default_success_rate(),
            catalog_only: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: config_defaults::default_port(),
            host: config_defaults::default_host(),
            catalog: Catalog::default(),
            payment: PaymentConfig::default(),
        }
    }
}

pub mod config_defaults {
    use std::env;
    use std::net::{IpAddr, Ipv4Addr};

    pub const DEFAULT_PORT: u16 = 8080;
    pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
    pub const DEFAULT_SUCCESS_RATE: f64 = 1.0;

    /// Returns the default port value with fallback: $PORT env var -> 8080
    pub fn default_port() -> u16 {
        env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_PORT)
    }

    /// Returns the default host value with fallback: $HOST env var -> "0.0.0.0"
    pub fn default_host() -> IpAddr {
        env::var("HOST")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_HOST)
    }

    /// Returns the default success rate with fallback: $PAYMENT_SUCCESS_RATE env var -> 1.0
    pub fn default_success_rate() -> f64 {
        env::var("PAYMENT_SUCCESS_RATE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_SUCCESS_RATE)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {0}: {1}")]
    FileRead(PathBuf, std::io::Error),
    #[error("Failed to parse config file: {0}")]
    JsonParse(#[from] serde_json::Error),
    #[error("Invalid payment configuration: {0}")]
    InvalidSuccessRate(#[from] InvalidSuccessRate),
}

impl Config {
    /// Get the port value.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Get the host value as an IpAddr.
    pub fn host(&self) -> IpAddr {
        self.host
    }

    /// Get the catalog served by `/api/products`.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Approval policy built from `payment.success_rate`.
    ///
    /// Fails when the rate lies outside `0.0..=1.0`.
    pub fn payment_policy(&self) -> Result<PaymentPolicy, ConfigError> {
        Ok(PaymentPolicy::from_success_rate(self.payment.success_rate)?)
    }

    pub fn item_policy(&self) -> ItemPolicy {
        if self.payment.catalog_only {
            ItemPolicy::CatalogOnly
        } else {
            ItemPolicy::AdHoc
        }
    }

    /// Load configuration from CLI arguments and JSON file.
    ///
    /// The config file path is determined by:
    /// 1. `--config <path>` CLI argument (or `$CONFIG`)
    /// 2. `./config.json` (if it exists)
    ///
    /// Without either, every value comes from environment variables or
    /// defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let cli_args = CliArgs::parse();
        match cli_args.config {
            Some(path) => Self::load_from_path(&path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_PATH);
                if path.exists() {
                    Self::load_from_path(path)
                } else {
                    Ok(Config::default())
                }
            }
        }
    }

    /// Load configuration from a specific path.
    fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|e| ConfigError::FileRead(path.to_path_buf(), e))?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }
}
