//! Rate strategies
//!
//! A carrier prices either by destination zone or by price group. Both share
//! the same validation and orchestration; only billable weight and the raw
//! price lookup differ, so the choice is an enum fixed at configuration time.

use std::collections::HashMap;

use rust_decimal::Decimal;

use super::volumetric::VolumetricWeightCalculator;
use crate::domain::package::Package;
use crate::domain::tariff::price_group::PriceGroup;
use crate::domain::tariff::zone::ZoneCalculator;
use crate::shared::units::Unit;
use crate::shared::NumericContext;
use crate::support::errors::{ConfigurationError, TariffResult};

/// Unrounded price components for one billable weight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateQuote {
    pub base_price: Decimal,
    pub fuel_surcharge: Decimal,
}

/// Zone calculators keyed by zone name, plus the volumetric divisor
#[derive(Debug, Clone)]
pub struct ZoneRate {
    calculators: HashMap<String, ZoneCalculator>,
    volumetric: VolumetricWeightCalculator,
}

impl ZoneRate {
    pub fn new(
        calculators: HashMap<String, ZoneCalculator>,
        volumetric: VolumetricWeightCalculator,
    ) -> Self {
        Self {
            calculators,
            volumetric,
        }
    }

    pub fn volumetric(&self) -> &VolumetricWeightCalculator {
        &self.volumetric
    }

    pub fn calculator(&self, zone: &str) -> Option<&ZoneCalculator> {
        self.calculators.get(zone)
    }
}

/// Price groups keyed by name, plus the fuel rate per whole mass unit
#[derive(Debug, Clone)]
pub struct PriceGroupRate {
    groups: HashMap<String, PriceGroup>,
    fuel_subcharge_rate: Decimal,
}

impl PriceGroupRate {
    pub fn new(groups: HashMap<String, PriceGroup>, fuel_subcharge_rate: Decimal) -> Self {
        Self {
            groups,
            fuel_subcharge_rate,
        }
    }

    pub fn fuel_subcharge_rate(&self) -> Decimal {
        self.fuel_subcharge_rate
    }

    pub fn group(&self, name: &str) -> Option<&PriceGroup> {
        self.groups.get(name)
    }
}

#[derive(Debug, Clone)]
pub enum RateStrategy {
    Zone(ZoneRate),
    PriceGroup(PriceGroupRate),
}

impl RateStrategy {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Zone(_) => "zone",
            Self::PriceGroup(_) => "price_group",
        }
    }

    /// Whether a rate is configured for the import country's rate key
    pub fn has_resolver(&self, key: &str) -> bool {
        match self {
            Self::Zone(z) => z.calculators.contains_key(key),
            Self::PriceGroup(p) => p.groups.contains_key(key),
        }
    }

    /// Zone carriers need a real box for the volumetric weight
    pub fn requires_positive_dimensions(&self) -> bool {
        matches!(self, Self::Zone(_))
    }

    /// Weight the rate is looked up with, in `mass_unit`.
    ///
    /// Zone carriers bill the greater of actual and volumetric weight; the
    /// volumetric weight only wins when strictly heavier.
    pub fn billable_weight(
        &self,
        package: &Package,
        mass_unit: Unit,
        ctx: &NumericContext,
    ) -> TariffResult<Decimal> {
        let actual = ctx
            .converter
            .convert(package.weight.value, package.weight.unit, mass_unit)?;

        match self {
            Self::PriceGroup(_) => Ok(actual),
            Self::Zone(z) => {
                let volumetric = z
                    .volumetric
                    .calculate(&package.dimensions, mass_unit, ctx)?
                    .value;
                if ctx.math.greater_than(volumetric, actual) {
                    Ok(volumetric)
                } else {
                    Ok(actual)
                }
            }
        }
    }

    /// Raw price for `key` at `weight`. Rounding is left to the caller.
    pub fn resolve(
        &self,
        key: &str,
        weight: Decimal,
        ctx: &NumericContext,
    ) -> TariffResult<RateQuote> {
        let math = ctx.math.as_ref();
        match self {
            Self::PriceGroup(p) => {
                let group = p
                    .group(key)
                    .ok_or_else(|| ConfigurationError::MissingPriceGroup(key.to_string()))?;
                let base_price = group.price(weight, math)?;
                let fuel_surcharge =
                    math.mul(math.round_down(weight, 0), p.fuel_subcharge_rate)?;
                Ok(RateQuote {
                    base_price,
                    fuel_surcharge,
                })
            }
            Self::Zone(z) => {
                let calculator = z
                    .calculator(key)
                    .ok_or_else(|| ConfigurationError::MissingZoneCalculator(key.to_string()))?;
                Ok(RateQuote {
                    base_price: calculator.calculate(weight, math)?,
                    fuel_surcharge: Decimal::ZERO,
                })
            }
        }
    }
}
