//! Package domain entity

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::shared::units::Unit;

/// A scalar measurement with its unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: Decimal,
    pub unit: Unit,
}

impl Quantity {
    pub fn new(value: Decimal, unit: Unit) -> Self {
        Self { value, unit }
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}

/// Postal address, reduced to what tariffs look at.
///
/// The country code is trimmed on every construction path, including
/// deserialization; matching is otherwise exact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(deserialize_with = "trimmed")]
    country_code: String,
}

impl Address {
    pub fn new(country_code: impl Into<String>) -> Self {
        let code: String = country_code.into();
        Self {
            country_code: code.trim().to_string(),
        }
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }
}

fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.trim().to_string())
}

/// Box dimensions in a single length unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: Decimal,
    pub width: Decimal,
    pub height: Decimal,
    pub unit: Unit,
}

impl Dimensions {
    pub fn new(length: Decimal, width: Decimal, height: Decimal, unit: Unit) -> Self {
        Self {
            length,
            width,
            height,
            unit,
        }
    }

    pub fn values(&self) -> [Decimal; 3] {
        [self.length, self.width, self.height]
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}x{}x{} {}",
            self.length, self.width, self.height, self.unit
        )
    }
}

/// A shipment as submitted by the caller. Read-only to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub weight: Quantity,
    pub dimensions: Dimensions,
    pub sender_address: Address,
    pub recipient_address: Address,
    /// Date the tariff is evaluated for; today (UTC) when absent
    #[serde(default)]
    pub calculation_date: Option<NaiveDate>,
}

impl Package {
    pub fn new(
        weight: Quantity,
        dimensions: Dimensions,
        sender_address: Address,
        recipient_address: Address,
    ) -> Self {
        Self {
            weight,
            dimensions,
            sender_address,
            recipient_address,
            calculation_date: None,
        }
    }

    pub fn with_calculation_date(mut self, date: NaiveDate) -> Self {
        self.calculation_date = Some(date);
        self
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn address_trims_country_code() {
        assert_eq!(Address::new("  US ").country_code(), "US");
        // Case is preserved: registry lookups are case-sensitive
        assert_eq!(Address::new("us").country_code(), "us");
    }

    #[test]
    fn deserialized_address_is_trimmed_like_new() {
        let address: Address =
            serde_json::from_value(serde_json::json!({ "country_code": " US " })).unwrap();
        assert_eq!(address, Address::new(" US "));
        assert_eq!(address.country_code(), "US");
    }

    #[test]
    fn package_deserializes_from_json() {
        let json = serde_json::json!({
            "weight": { "value": "7.40", "unit": "lb" },
            "dimensions": { "length": "10", "width": "8", "height": "4", "unit": "in" },
            "sender_address": { "country_code": "US" },
            "recipient_address": { "country_code": "CA" },
            "calculation_date": "2026-03-01"
        });
        let package: Package = serde_json::from_value(json).unwrap();
        assert_eq!(package.weight, Quantity::new(dec!(7.40), Unit::Pound));
        assert_eq!(package.dimensions.unit, Unit::Inch);
        assert_eq!(
            package.calculation_date,
            NaiveDate::from_ymd_opt(2026, 3, 1)
        );
    }

    #[test]
    fn dimensions_display() {
        let d = Dimensions::new(dec!(30), dec!(20), dec!(10), Unit::Centimeter);
        assert_eq!(d.to_string(), "30x20x10 cm");
    }
}
