//! Configuration module
//!
//! Carrier tariffs and logging settings are read from a TOML file
//! (`~/.config/shipping-tariff/config.toml` by default). Decimal values are
//! written as strings so they are never parsed through binary floats.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::application::RateShop;
use crate::domain::tariff::{CarrierConfiguration, CarrierDefinition};
use crate::support::errors::ConfigurationError;

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "TARIFF_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error(transparent)]
    Carrier(#[from] ConfigurationError),
}

/// Log line encoding on stderr
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Plain,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `trace`, `debug`, `info`, `warn` or `error`; `RUST_LOG` wins when set
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Plain,
        }
    }
}

/// Top-level application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub carriers: Vec<CarrierDefinition>,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let rendered = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, rendered).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Validate every carrier definition and build their configurations.
    pub fn carrier_configurations(&self) -> Result<Vec<CarrierConfiguration>, ConfigError> {
        self.carriers
            .iter()
            .cloned()
            .map(|def| CarrierConfiguration::from_definition(def).map_err(ConfigError::from))
            .collect()
    }

    pub fn build_rate_shop(&self) -> Result<RateShop, ConfigError> {
        let shop = RateShop::from_configurations(self.carrier_configurations()?)?;
        info!(carriers = shop.engines().len(), "Carriers loaded");
        Ok(shop)
    }
}

/// `$TARIFF_CONFIG`, else `~/.config/shipping-tariff/config.toml`
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("shipping-tariff")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tariff::RateDefinition;
    use crate::shared::units::Unit;
    use rust_decimal_macros::dec;
    use std::io::Write;

    const SAMPLE: &str = r#"
[logging]
level = "debug"
format = "json"

[[carriers]]
name = "asendia"
currency = "USD"
mass_unit = "lb"
dimensions_unit = "in"
maximum_weight = "10"
maximum_dimensions = { length = "24", width = "18", height = "12" }
export_countries = [{ code = "US" }]
import_countries = [{ code = "CA", zone = "1" }]

[carriers.rates]
strategy = "price_group"
fuel_subcharge_rate = "0.10"

[[carriers.rates.price_groups]]
name = "1"
weight_breaks = [{ threshold = "10", price = "20.00" }]

[[carriers]]
name = "dhl"
currency = "EUR"
mass_unit = "kg"
dimensions_unit = "cm"
maximum_weight = "30"
maximum_dimensions = { length = "120", width = "80", height = "60" }
export_countries = [{ code = "DE" }]
import_countries = [{ code = "FR", zone = "1" }]
valid_from = "2026-01-01"

[carriers.rates]
strategy = "zone"

[[carriers.rates.zone_calculators]]
name = "1"
pricing = { type = "tiered", breaks = [{ threshold = "2", price = "15.00" }], excess = { step = "1", price_per_step = "2.50" } }
"#;

    #[test]
    fn parses_carriers_and_logging() {
        let cfg = AppConfig::parse(SAMPLE).unwrap();
        assert_eq!(cfg.logging.level, "debug");
        assert_eq!(cfg.logging.format, LogFormat::Json);
        assert_eq!(cfg.carriers.len(), 2);

        let dhl = &cfg.carriers[1];
        assert_eq!(dhl.mass_unit, Unit::Kilogram);
        assert!(matches!(
            dhl.rates,
            RateDefinition::Zone { volumetric_divisor_factor, .. } if volumetric_divisor_factor == dec!(5000)
        ));
    }

    #[test]
    fn shipped_example_config_builds() {
        let cfg = AppConfig::parse(include_str!("../config.example.toml")).unwrap();
        let shop = cfg.build_rate_shop().unwrap();
        assert_eq!(shop.engines().len(), 2);
        assert!(shop.engine("asendia").unwrap().configuration().rates().has_resolver("2"));
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        assert!(AppConfig::parse("[logging]\nformat = \"xml\"\n").is_err());
    }

    #[test]
    fn empty_file_uses_defaults() {
        let cfg = AppConfig::parse("").unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn loads_from_disk_and_builds_rate_shop() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let cfg = AppConfig::load(file.path()).unwrap();
        let shop = cfg.build_rate_shop().unwrap();
        assert_eq!(shop.engines().len(), 2);
        assert!(shop.engine("dhl").is_some());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[[carriers]]\nname = 42\n").unwrap();
        let err = AppConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn invalid_carrier_fails_the_build() {
        let mut cfg = AppConfig::parse(SAMPLE).unwrap();
        cfg.carriers[0].maximum_weight = dec!(-1);
        assert!(matches!(
            cfg.build_rate_shop(),
            Err(ConfigError::Carrier(ConfigurationError::Invalid(_)))
        ));
    }

    #[test]
    fn save_then_load_keeps_carriers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let cfg = AppConfig::parse(SAMPLE).unwrap();
        cfg.save(&path).unwrap();
        assert_eq!(AppConfig::load(&path).unwrap(), cfg);
    }
}
