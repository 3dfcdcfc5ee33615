//! Weight-break price tables
//!
//! A price group maps weight ranges to prices. Each break covers weights
//! above the previous threshold up to and including its own threshold.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::shared::math::Math;
use crate::support::errors::ConfigurationError;

/// One step of a weight-indexed price table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightBreak {
    /// Upper bound (inclusive) in the carrier's mass unit
    pub threshold: Decimal,
    pub price: Decimal,
}

impl WeightBreak {
    pub fn new(threshold: Decimal, price: Decimal) -> Self {
        Self { threshold, price }
    }
}

/// Raw price group as written in carrier configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PriceGroupDefinition {
    #[validate(length(min = 1, message = "price group name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "price group needs at least one weight break"))]
    pub weight_breaks: Vec<WeightBreak>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceGroup {
    name: String,
    weight_breaks: Vec<WeightBreak>,
}

impl PriceGroup {
    pub fn new(
        name: impl Into<String>,
        weight_breaks: Vec<WeightBreak>,
    ) -> Result<Self, ConfigurationError> {
        let name = name.into();
        check_breaks(&name, &weight_breaks)?;
        Ok(Self {
            name,
            weight_breaks,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight_breaks(&self) -> &[WeightBreak] {
        &self.weight_breaks
    }

    /// Price for `weight`: the break with the smallest threshold ≥ weight.
    ///
    /// Weights above the last threshold are not extrapolated.
    pub fn price(&self, weight: Decimal, math: &dyn Math) -> Result<Decimal, ConfigurationError> {
        find_break(&self.name, &self.weight_breaks, weight, math).map(|b| b.price)
    }
}

impl TryFrom<PriceGroupDefinition> for PriceGroup {
    type Error = ConfigurationError;

    fn try_from(def: PriceGroupDefinition) -> Result<Self, Self::Error> {
        PriceGroup::new(def.name, def.weight_breaks)
    }
}

/// Thresholds must be positive and strictly increasing; prices non-negative.
pub(crate) fn check_breaks(table: &str, breaks: &[WeightBreak]) -> Result<(), ConfigurationError> {
    if breaks.is_empty() {
        return Err(ConfigurationError::Invalid(format!(
            "rate table {} has no weight breaks",
            table
        )));
    }

    let mut previous = Decimal::ZERO;
    for (i, b) in breaks.iter().enumerate() {
        if b.threshold <= previous {
            return Err(ConfigurationError::Invalid(format!(
                "rate table {}: threshold {} at position {} must be greater than {}",
                table, b.threshold, i, previous
            )));
        }
        if b.price < Decimal::ZERO {
            return Err(ConfigurationError::Invalid(format!(
                "rate table {}: negative price {} at position {}",
                table, b.price, i
            )));
        }
        previous = b.threshold;
    }
    Ok(())
}

pub(crate) fn find_break<'a>(
    table: &str,
    breaks: &'a [WeightBreak],
    weight: Decimal,
    math: &dyn Math,
) -> Result<&'a WeightBreak, ConfigurationError> {
    breaks
        .iter()
        .find(|b| math.greater_or_equal(b.threshold, weight))
        .ok_or_else(|| ConfigurationError::RateTableExceeded {
            table: table.to_string(),
            weight: weight.to_string(),
            last_threshold: breaks
                .last()
                .map(|b| b.threshold.to_string())
                .unwrap_or_default(),
        })
}

// ── Tests ──────────────────────────────────────────────────────
