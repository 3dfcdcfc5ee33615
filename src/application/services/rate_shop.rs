//! Multi-carrier comparison

use std::collections::HashSet;

use tracing::{debug, info};

use super::engine::TariffEngine;
use crate::domain::package::Package;
use crate::domain::tariff::{CalculationResult, CarrierConfiguration, ValidationMode};
use crate::support::errors::ConfigurationError;

/// Quotes one package against several carriers.
///
/// A failing carrier does not abort the comparison: its error is captured
/// on its own result.
#[derive(Debug, Clone, Default)]
pub struct RateShop {
    engines: Vec<TariffEngine>,
}

impl RateShop {
    /// Carrier names must be unique.
    pub fn new(engines: Vec<TariffEngine>) -> Result<Self, ConfigurationError> {
        let mut seen = HashSet::new();
        for engine in &engines {
            if !seen.insert(engine.name().to_string()) {
                return Err(ConfigurationError::Invalid(format!(
                    "duplicate carrier {}",
                    engine.name()
                )));
            }
        }
        info!(carriers = engines.len(), "Rate shop ready");
        Ok(Self { engines })
    }

    pub fn from_configurations(
        configs: impl IntoIterator<Item = CarrierConfiguration>,
    ) -> Result<Self, ConfigurationError> {
        Self::new(configs.into_iter().map(TariffEngine::new).collect())
    }

    pub fn engines(&self) -> &[TariffEngine] {
        &self.engines
    }

    pub fn engine(&self, carrier: &str) -> Option<&TariffEngine> {
        self.engines.iter().find(|e| e.name() == carrier)
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }

    /// One result per carrier, in configuration order.
    pub fn quote_all(&self, package: &Package, mode: ValidationMode) -> Vec<CalculationResult> {
        self.engines
            .iter()
            .map(|engine| Self::capture(engine, package, mode))
            .collect()
    }

    /// Result of a single named carrier, if configured
    pub fn quote_carrier(
        &self,
        carrier: &str,
        package: &Package,
        mode: ValidationMode,
    ) -> Option<CalculationResult> {
        self.engine(carrier)
            .map(|engine| Self::capture(engine, package, mode))
    }

    fn capture(engine: &TariffEngine, package: &Package, mode: ValidationMode) -> CalculationResult {
        match engine.calculate(package, mode) {
            Ok(result) => result,
            Err(e) => {
                debug!(carrier = engine.name(), error = %e, "Carrier excluded from comparison");
                let mut result = CalculationResult::for_carrier(engine.name());
                result.set_error(e);
                result
            }
        }
    }
}

/// Cheapest successful result billed in `currency`. Amounts in other
/// currencies are not compared.
pub fn cheapest<'a>(
    results: &'a [CalculationResult],
    currency: &str,
) -> Option<&'a CalculationResult> {
    results
        .iter()
        .filter(|r| r.is_success() && r.currency.as_deref() == Some(currency))
        .filter_map(|r| r.breakdown.as_ref().map(|b| (b.total, r)))
        .min_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, r)| r)
}
