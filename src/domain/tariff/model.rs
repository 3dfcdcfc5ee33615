//! Calculation result types

use rust_decimal::Decimal;
use serde::Serialize;

use crate::shared::math::format_money;
use crate::shared::units::Unit;
use crate::support::errors::{TariffError, ViolationKind};

/// How the validator reacts to a failed rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Stop at the first violation and return it as an error
    #[default]
    FailFast,
    /// Run every rule and record each violation on the result
    CollectAll,
}

impl std::fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FailFast => write!(f, "FailFast"),
            Self::CollectAll => write!(f, "CollectAll"),
        }
    }
}

/// A failed validation rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub message: String,
}

impl From<ViolationKind> for Violation {
    fn from(kind: ViolationKind) -> Self {
        let message = kind.to_string();
        Self { kind, message }
    }
}

/// Itemised cost behind a total
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateBreakdown {
    /// Weight the rate was looked up with, in `mass_unit`
    pub billable_weight: Decimal,
    pub mass_unit: Unit,
    pub base_price: Decimal,
    /// Zero for carriers without a fuel surcharge
    pub fuel_surcharge: Decimal,
    /// `base_price + fuel_surcharge`, rounded up to cents
    pub total: Decimal,
}

impl RateBreakdown {
    pub fn format_total(&self) -> String {
        format_money(self.total)
    }
}

/// Outcome of one calculation call
#[derive(Debug, Clone, Default, Serialize)]
pub struct CalculationResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carrier: Option<String>,
    /// Fixed-point `DDDD.CC`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_cost: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<RateBreakdown>,
    pub violations: Vec<Violation>,
    /// Failure captured instead of returned (multi-carrier comparisons)
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_error")]
    pub error: Option<TariffError>,
}

impl CalculationResult {
    pub fn for_carrier(carrier: impl Into<String>) -> Self {
        Self {
            carrier: Some(carrier.into()),
            ..Default::default()
        }
    }

    pub fn add_violation(&mut self, violation: impl Into<Violation>) {
        self.violations.push(violation.into());
    }

    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    /// Priced without violations or errors
    pub fn is_success(&self) -> bool {
        self.total_cost.is_some() && self.violations.is_empty() && self.error.is_none()
    }

    pub fn set_breakdown(&mut self, breakdown: RateBreakdown, currency: impl Into<String>) {
        self.total_cost = Some(breakdown.format_total());
        self.currency = Some(currency.into());
        self.breakdown = Some(breakdown);
    }

    pub fn set_error(&mut self, error: TariffError) {
        self.error = Some(error);
    }
}

fn serialize_error<S>(error: &Option<TariffError>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match error {
        Some(e) => serializer.serialize_some(&e.to_string()),
        None => serializer.serialize_none(),
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn breakdown() -> RateBreakdown {
        RateBreakdown {
            billable_weight: dec!(7.40),
            mass_unit: Unit::Pound,
            base_price: dec!(20.00),
            fuel_surcharge: dec!(0.70),
            total: dec!(20.70),
        }
    }

    #[test]
    fn breakdown_sets_total_and_currency() {
        let mut result = CalculationResult::for_carrier("asendia");
        result.set_breakdown(breakdown(), "USD");
        assert_eq!(result.total_cost.as_deref(), Some("20.70"));
        assert_eq!(result.currency.as_deref(), Some("USD"));
        assert!(result.is_success());
    }

    #[test]
    fn violations_carry_their_message() {
        let mut result = CalculationResult::default();
        result.add_violation(ViolationKind::WeightLimitExceeded);
        assert!(result.has_violations());
        assert!(!result.is_success());
        assert_eq!(result.violations[0].message, "Weight limit is exceeded.");
    }

    #[test]
    fn result_serializes_to_json() {
        let mut result = CalculationResult::for_carrier("dhl");
        result.add_violation(ViolationKind::IneligibleRecipient {
            country_code: "JP".into(),
        });
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["carrier"], "dhl");
        assert_eq!(json["violations"][0]["kind"]["code"], "ineligible_recipient");
        assert_eq!(json["violations"][0]["kind"]["country_code"], "JP");
        assert!(json.get("total_cost").is_none());
    }

    #[test]
    fn captured_error_serializes_as_message() {
        let mut result = CalculationResult::for_carrier("dhl");
        result.set_error(TariffError::Violation(ViolationKind::DimensionsLimitExceeded));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["error"], "Dimensions limit is exceeded.");
    }
}
