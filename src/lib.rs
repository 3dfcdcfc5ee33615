//! # Shipping Tariff
//!
//! Exact-decimal shipping cost engine for zone-based and price-group carriers.
//!
//! ## Architecture
//!
//! - **shared**: arithmetic and unit conversion capabilities
//! - **domain**: packages, countries, rate tables, validation rules
//! - **application**: the tariff engine and multi-carrier rate shop
//! - **config**: TOML loading of carrier definitions
//! - **support**: error taxonomy
//!
//! ```no_run
//! use shipping_tariff::{AppConfig, ValidationMode, default_config_path};
//! # fn run(package: shipping_tariff::Package) -> Result<(), Box<dyn std::error::Error>> {
//! let shop = AppConfig::load(&default_config_path())?.build_rate_shop()?;
//! for result in shop.quote_all(&package, ValidationMode::CollectAll) {
//!     println!("{:?} {:?}", result.carrier, result.total_cost);
//! }
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod shared;
pub mod support;
pub mod telemetry;

pub use config::{default_config_path, AppConfig, ConfigError, LogFormat, LoggingConfig};

pub use application::{cheapest, RateShop, TariffEngine};
pub use domain::{
    Address, CalculationResult, CarrierConfiguration, CarrierDefinition, Dimensions, Package,
    Quantity, RateBreakdown, ValidationMode, Violation,
};
pub use shared::{DecimalMath, Math, NumericContext, Unit, UnitConverter};
pub use support::errors::{
    ArithmeticError, ConfigurationError, TariffError, TariffResult, ViolationKind,
};
pub use telemetry::init_tracing;
