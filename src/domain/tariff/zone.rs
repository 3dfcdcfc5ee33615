//! Zone pricing
//!
//! A zone carrier bills every destination zone with its own pricing
//! expression. Two expressions ship with the crate ([`ZoneRateTable`]);
//! anything else can be plugged in through [`ZonePricing`].

use std::fmt;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::price_group::{check_breaks, find_break, WeightBreak};
use crate::shared::math::Math;
use crate::support::errors::{ConfigurationError, TariffError};

/// Pricing expression for one zone: billable weight in, amount out.
///
/// The result is rounded by the engine; implementations return the raw
/// amount and must be non-decreasing in `weight`.
pub trait ZonePricing: Send + Sync + fmt::Debug {
    fn price(&self, zone: &str, weight: Decimal, math: &dyn Math) -> Result<Decimal, TariffError>;
}

/// Per-step charge applied beyond the last break of a tiered table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcessRate {
    /// Weight increment billed as one step
    pub step: Decimal,
    pub price_per_step: Decimal,
}

/// Built-in zone pricing expressions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ZoneRateTable {
    /// Weight-break lookup, optionally continued by a per-step excess rate
    Tiered {
        breaks: Vec<WeightBreak>,
        #[serde(default)]
        excess: Option<ExcessRate>,
    },
    /// `base + weight × per_unit`
    Linear { base: Decimal, per_unit: Decimal },
}

impl ZoneRateTable {
    pub fn check(&self, zone: &str) -> Result<(), ConfigurationError> {
        match self {
            Self::Tiered { breaks, excess } => {
                check_breaks(zone, breaks)?;
                if let Some(excess) = excess {
                    if excess.step <= Decimal::ZERO {
                        return Err(ConfigurationError::Invalid(format!(
                            "zone {}: excess step must be positive",
                            zone
                        )));
                    }
                    if excess.price_per_step < Decimal::ZERO {
                        return Err(ConfigurationError::Invalid(format!(
                            "zone {}: excess price must not be negative",
                            zone
                        )));
                    }
                }
                Ok(())
            }
            Self::Linear { base, per_unit } => {
                if *base < Decimal::ZERO || *per_unit < Decimal::ZERO {
                    return Err(ConfigurationError::Invalid(format!(
                        "zone {}: linear rate must not be negative",
                        zone
                    )));
                }
                Ok(())
            }
        }
    }
}

impl ZonePricing for ZoneRateTable {
    fn price(&self, zone: &str, weight: Decimal, math: &dyn Math) -> Result<Decimal, TariffError> {
        match self {
            Self::Tiered { breaks, excess } => match find_break(zone, breaks, weight, math) {
                Ok(b) => Ok(b.price),
                Err(exceeded) => {
                    let (Some(excess), Some(last)) = (excess, breaks.last()) else {
                        return Err(exceeded.into());
                    };
                    let over = math.sub(weight, last.threshold)?;
                    let steps = math.round_up(math.div(over, excess.step)?, 0);
                    let surcharge = math.mul(steps, excess.price_per_step)?;
                    Ok(math.add(last.price, surcharge)?)
                }
            },
            Self::Linear { base, per_unit } => {
                let variable = math.mul(weight, *per_unit)?;
                Ok(math.add(*base, variable)?)
            }
        }
    }
}

/// Raw zone calculator as written in carrier configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ZoneCalculatorDefinition {
    #[validate(length(min = 1, message = "zone name is required"))]
    pub name: String,
    pub pricing: ZoneRateTable,
}

/// Named pricing expression for one zone
#[derive(Debug, Clone)]
pub struct ZoneCalculator {
    name: String,
    pricing: Arc<dyn ZonePricing>,
}

impl ZoneCalculator {
    pub fn new(name: impl Into<String>, pricing: Arc<dyn ZonePricing>) -> Self {
        Self {
            name: name.into(),
            pricing,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn calculate(&self, weight: Decimal, math: &dyn Math) -> Result<Decimal, TariffError> {
        self.pricing.price(&self.name, weight, math)
    }
}

impl TryFrom<ZoneCalculatorDefinition> for ZoneCalculator {
    type Error = ConfigurationError;

    fn try_from(def: ZoneCalculatorDefinition) -> Result<Self, Self::Error> {
        def.pricing.check(&def.name)?;
        Ok(ZoneCalculator::new(def.name, Arc::new(def.pricing)))
    }
}

// ── Tests ──────────────────────────────────────────────────────
