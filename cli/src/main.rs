//! Shipping tariff quote CLI
//!
//! Prices one package against every carrier in the configuration file.
//!
//! ```sh
//! # Quote with the default config (~/.config/shipping-tariff/config.toml)
//! tariff-quote --from US --to CA --weight 7.4 --weight-unit lb \
//!     --length 10 --width 8 --height 4 --dimensions-unit in
//!
//! # Single carrier, every violation listed, JSON output
//! tariff-quote --carrier dhl --collect-all --json ...
//!
//! # Validate the configuration file and exit
//! tariff-quote --check
//! ```

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use rust_decimal::Decimal;
use tracing::{error, info};

use shipping_tariff::{
    cheapest, default_config_path, init_tracing, Address, AppConfig, CalculationResult,
    Dimensions, Package, Quantity, Unit, ValidationMode,
};

/// Shipping cost quotes across configured carriers.
#[derive(Parser, Debug)]
#[command(
    name = "tariff-quote",
    version,
    about = "Quote shipping costs for a package",
    long_about = "Prices a package against the carriers defined in the tariff \
                  configuration.\n\n\
                  Default config: ~/.config/shipping-tariff/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "TARIFF_CONFIG")]
    config: Option<PathBuf>,

    /// Only quote this carrier.
    #[arg(long)]
    carrier: Option<String>,

    /// Sender country code.
    #[arg(long, required_unless_present = "check")]
    from: Option<String>,

    /// Recipient country code.
    #[arg(long, required_unless_present = "check")]
    to: Option<String>,

    /// Package weight.
    #[arg(long, required_unless_present = "check")]
    weight: Option<Decimal>,

    #[arg(long, default_value = "kg")]
    weight_unit: Unit,

    #[arg(long, required_unless_present = "check")]
    length: Option<Decimal>,

    #[arg(long, required_unless_present = "check")]
    width: Option<Decimal>,

    #[arg(long, required_unless_present = "check")]
    height: Option<Decimal>,

    #[arg(long, default_value = "cm")]
    dimensions_unit: Unit,

    /// Calculation date (YYYY-MM-DD), defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Report every violation instead of stopping at the first.
    #[arg(long)]
    collect_all: bool,

    /// Print results as JSON.
    #[arg(long)]
    json: bool,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit.
    #[arg(long)]
    check: bool,
}

impl Cli {
    fn package(&self) -> Result<Package, String> {
        fn required<T: Clone>(value: &Option<T>, flag: &str) -> Result<T, String> {
            value.clone().ok_or_else(|| format!("--{} is required", flag))
        }

        let mut package = Package::new(
            Quantity::new(required(&self.weight, "weight")?, self.weight_unit),
            Dimensions::new(
                required(&self.length, "length")?,
                required(&self.width, "width")?,
                required(&self.height, "height")?,
                self.dimensions_unit,
            ),
            Address::new(required(&self.from, "from")?),
            Address::new(required(&self.to, "to")?),
        );
        if let Some(date) = self.date {
            package = package.with_calculation_date(date);
        }
        Ok(package)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);

    let mut config = match AppConfig::load(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("warn"))
                .with_writer(std::io::stderr)
                .init();
            error!("Failed to load config from {}: {}", config_path.display(), e);
            return Err(e.into());
        }
    };

    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    init_tracing(&config.logging)?;
    info!("Configuration loaded from {}", config_path.display());

    let shop = config.build_rate_shop()?;

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        println!("✅ Configuration is valid");
        println!("   Config file : {}", config_path.display());
        for engine in shop.engines() {
            let carrier = engine.configuration();
            println!(
                "   {:<12}: {} rates, {} → {} countries, {}",
                carrier.name(),
                carrier.rates().kind(),
                carrier.registry().export_count(),
                carrier.registry().import_count(),
                carrier.currency()
            );
        }
        return Ok(());
    }

    // ── Quote ──────────────────────────────────────────────────
    let package = cli.package()?;
    let mode = if cli.collect_all {
        ValidationMode::CollectAll
    } else {
        ValidationMode::FailFast
    };

    let results = match cli.carrier.as_deref() {
        Some(name) => match shop.quote_carrier(name, &package, mode) {
            Some(result) => vec![result],
            None => return Err(format!("unknown carrier: {}", name).into()),
        },
        None => shop.quote_all(&package, mode),
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    for result in &results {
        println!("{}", render(result));
    }

    let currency = results.iter().find_map(|r| r.currency.clone());
    if let Some(best) = currency.and_then(|c| cheapest(&results, &c)) {
        if results.len() > 1 {
            println!(
                "cheapest: {}",
                best.carrier.as_deref().unwrap_or_default()
            );
        }
    }

    Ok(())
}

fn render(result: &CalculationResult) -> String {
    let carrier = result.carrier.as_deref().unwrap_or("?");

    if let Some(error) = &result.error {
        return format!("{:<12} error: {}", carrier, error);
    }
    if result.has_violations() {
        let reasons: Vec<_> = result.violations.iter().map(|v| v.message.as_str()).collect();
        return format!("{:<12} rejected: {}", carrier, reasons.join("; "));
    }

    match (&result.total_cost, &result.currency, &result.breakdown) {
        (Some(total), Some(currency), Some(b)) => format!(
            "{:<12} {:>10} {}  (billable {} {}, base {}, fuel {})",
            carrier, total, currency, b.billable_weight, b.mass_unit, b.base_price, b.fuel_surcharge
        ),
        _ => format!("{:<12} no quote", carrier),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn check_needs_no_package_flags() {
        let cli = Cli::try_parse_from(["tariff-quote", "--check", "-c", "carriers.toml"]).unwrap();
        assert!(cli.check);
        assert_eq!(cli.config, Some(PathBuf::from("carriers.toml")));
    }

    #[test]
    fn quote_flags_build_a_package() {
        let cli = Cli::try_parse_from([
            "tariff-quote", "--from", " US", "--to", "CA", "--weight", "7.4", "--weight-unit",
            "lb", "--length", "10", "--width", "8", "--height", "4", "--dimensions-unit", "in",
        ])
        .unwrap();
        let package = cli.package().unwrap();
        assert_eq!(package.sender_address.country_code(), "US");
        assert_eq!(package.weight.unit, Unit::Pound);
    }
}
