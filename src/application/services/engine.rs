//! Tariff engine
//!
//! Runs one package through a carrier configuration:
//!
//! ```text
//! Start → ValidateSender → ValidateRecipient → ValidateDimensions →
//! ValidateWeight → DeriveBillableWeight → ResolveRate → Round → Done
//! ```
//!
//! Any stage can end in `Error`. Violations end the call early in fail-fast
//! mode; in collect-all mode every rule runs and pricing is skipped when any
//! of them failed. Configuration and arithmetic errors are returned in both
//! modes.

use std::fmt;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{debug, trace, warn};

use crate::domain::package::{Package, Quantity};
use crate::domain::services::{Rule, Validator};
use crate::domain::tariff::{
    CalculationResult, CarrierConfiguration, RateBreakdown, ValidationMode, Violation,
};
use crate::shared::NumericContext;
use crate::support::errors::{ConfigurationError, TariffResult};

const MONEY_PRECISION: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    ValidateSender,
    ValidateRecipient,
    ValidateDimensions,
    ValidateWeight,
    DeriveBillableWeight,
    ResolveRate,
    Round,
    Done,
    Error,
}

impl From<Rule> for Stage {
    fn from(rule: Rule) -> Self {
        match rule {
            Rule::Sender => Stage::ValidateSender,
            Rule::Recipient => Stage::ValidateRecipient,
            Rule::Dimensions => Stage::ValidateDimensions,
            Rule::Weight => Stage::ValidateWeight,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Prices packages for one carrier.
///
/// Immutable once built; share it between threads behind an `Arc`.
#[derive(Debug, Clone)]
pub struct TariffEngine {
    config: Arc<CarrierConfiguration>,
    ctx: NumericContext,
}

impl TariffEngine {
    pub fn new(config: CarrierConfiguration) -> Self {
        Self::with_context(config, NumericContext::default())
    }

    /// Use custom arithmetic or unit conversion backends.
    pub fn with_context(config: CarrierConfiguration, ctx: NumericContext) -> Self {
        Self {
            config: Arc::new(config),
            ctx,
        }
    }

    pub fn name(&self) -> &str {
        self.config.name()
    }

    pub fn configuration(&self) -> &CarrierConfiguration {
        &self.config
    }

    /// Validate and price `package`.
    ///
    /// In fail-fast mode the first violation comes back as
    /// `Err(TariffError::Violation)`. In collect-all mode violations are
    /// recorded on the result, which then has no total.
    pub fn calculate(
        &self,
        package: &Package,
        mode: ValidationMode,
    ) -> TariffResult<CalculationResult> {
        self.enter(Stage::Start);
        match self.evaluate(package, mode) {
            Ok(result) => {
                self.enter(Stage::Done);
                Ok(result)
            }
            Err(e) => {
                self.enter(Stage::Error);
                if e.is_fatal() {
                    warn!(carrier = self.name(), error = %e, "Tariff calculation failed");
                } else {
                    debug!(carrier = self.name(), violation = %e, "Package rejected");
                }
                Err(e)
            }
        }
    }

    /// Fail-fast calculation
    pub fn quote(&self, package: &Package) -> TariffResult<CalculationResult> {
        self.calculate(package, ValidationMode::FailFast)
    }

    /// Every violation of `package`, without pricing it.
    pub fn validate(&self, package: &Package) -> TariffResult<Vec<Violation>> {
        self.ensure_effective(package)?;
        let violations = Validator::new(&self.config, &self.ctx).validate_collect_all(package)?;
        Ok(violations.into_iter().map(Violation::from).collect())
    }

    /// Weight the rate would be looked up with, in the carrier's mass unit.
    pub fn billable_weight(&self, package: &Package) -> TariffResult<Quantity> {
        let unit = self.config.mass_unit();
        let weight = self.config.rates().billable_weight(package, unit, &self.ctx)?;
        Ok(Quantity::new(weight, unit))
    }

    fn evaluate(&self, package: &Package, mode: ValidationMode) -> TariffResult<CalculationResult> {
        self.ensure_effective(package)?;

        let mut result = CalculationResult::for_carrier(self.name());
        let violations = Validator::new(&self.config, &self.ctx)
            .run(package, mode, |rule| self.enter(Stage::from(rule)))?;

        if !violations.is_empty() {
            debug!(
                carrier = self.name(),
                violations = violations.len(),
                mode = %mode,
                "Package rejected"
            );
            for violation in violations {
                result.add_violation(violation);
            }
            return Ok(result);
        }

        self.enter(Stage::DeriveBillableWeight);
        let mass_unit = self.config.mass_unit();
        let billable_weight = self
            .config
            .rates()
            .billable_weight(package, mass_unit, &self.ctx)?;

        self.enter(Stage::ResolveRate);
        let zone = &self
            .config
            .registry()
            .resolve_import(package.recipient_address.country_code())?
            .zone;
        let quote = self.config.rates().resolve(zone, billable_weight, &self.ctx)?;

        self.enter(Stage::Round);
        let math = self.ctx.math.as_ref();
        let total = math.round_up(
            math.add(quote.base_price, quote.fuel_surcharge)?,
            MONEY_PRECISION,
        );

        result.set_breakdown(
            RateBreakdown {
                billable_weight,
                mass_unit,
                base_price: quote.base_price,
                fuel_surcharge: quote.fuel_surcharge,
                total,
            },
            self.config.currency(),
        );

        debug!(
            carrier = self.name(),
            zone = zone.as_str(),
            billable_weight = %billable_weight,
            total = %total,
            currency = self.config.currency(),
            "Package priced"
        );

        Ok(result)
    }

    fn ensure_effective(&self, package: &Package) -> TariffResult<()> {
        if !self.config.has_validity_window() {
            return Ok(());
        }
        let date: NaiveDate = package
            .calculation_date
            .unwrap_or_else(|| Utc::now().date_naive());
        if self.config.is_effective_on(date) {
            Ok(())
        } else {
            Err(ConfigurationError::TariffNotEffective {
                carrier: self.name().to_string(),
                date: date.to_string(),
            }
            .into())
        }
    }

    fn enter(&self, stage: Stage) {
        trace!(carrier = self.name(), stage = %stage, "Entering stage");
    }
}

// ── Tests ──────────────────────────────────────────────────────
