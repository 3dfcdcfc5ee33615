//! Carrier configuration
//!
//! [`CarrierDefinition`] is the plain construction input a loader produces
//! (TOML, JSON or code). [`CarrierConfiguration::from_definition`] is the one
//! validating factory that turns it into the immutable value the engine
//! reads; nothing downstream ever inspects a raw definition again.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;
use validator::Validate;

use super::price_group::{PriceGroup, PriceGroupDefinition};
use super::zone::{ZoneCalculator, ZoneCalculatorDefinition};
use crate::domain::country::{CountryRegistry, ExportCountry, ImportCountry};
use crate::domain::package::Dimensions;
use crate::domain::services::rate::{PriceGroupRate, RateStrategy, ZoneRate};
use crate::domain::services::volumetric::{VolumetricWeightCalculator, DEFAULT_VOLUMETRIC_DIVISOR};
use crate::shared::units::{Unit, UnitKind};
use crate::support::errors::ConfigurationError;

fn default_currency() -> String {
    "USD".to_string()
}

fn default_volumetric_divisor() -> Decimal {
    DEFAULT_VOLUMETRIC_DIVISOR
}

/// Largest accepted box, in the carrier's dimensions unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaximumDimensions {
    pub length: Decimal,
    pub width: Decimal,
    pub height: Decimal,
}

/// Carrier-specific pricing input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum RateDefinition {
    /// Destination zones priced on billable (actual vs volumetric) weight
    Zone {
        zone_calculators: Vec<ZoneCalculatorDefinition>,
        #[serde(default = "default_volumetric_divisor")]
        volumetric_divisor_factor: Decimal,
    },
    /// Price groups plus a fuel surcharge per whole mass unit
    PriceGroup {
        price_groups: Vec<PriceGroupDefinition>,
        fuel_subcharge_rate: Decimal,
    },
}

/// Construction input for one carrier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CarrierDefinition {
    #[validate(length(min = 1, message = "carrier name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "at least one export country is required"), nested)]
    pub export_countries: Vec<ExportCountry>,
    #[validate(length(min = 1, message = "at least one import country is required"), nested)]
    pub import_countries: Vec<ImportCountry>,
    #[serde(default = "default_currency")]
    #[validate(length(equal = 3, message = "currency must be an ISO 4217 code"))]
    pub currency: String,
    pub mass_unit: Unit,
    pub dimensions_unit: Unit,
    pub maximum_weight: Decimal,
    pub maximum_dimensions: MaximumDimensions,
    pub rates: RateDefinition,
    #[serde(default)]
    pub valid_from: Option<NaiveDate>,
    #[serde(default)]
    pub valid_until: Option<NaiveDate>,
    /// Opaque caller data, carried through untouched
    #[serde(default)]
    pub extra_data: Option<serde_json::Value>,
}

/// Immutable, validated carrier configuration
#[derive(Debug, Clone)]
pub struct CarrierConfiguration {
    name: String,
    registry: CountryRegistry,
    currency: String,
    mass_unit: Unit,
    dimensions_unit: Unit,
    maximum_weight: Decimal,
    maximum_dimensions: Dimensions,
    rates: RateStrategy,
    valid_from: Option<NaiveDate>,
    valid_until: Option<NaiveDate>,
    extra_data: Option<serde_json::Value>,
}

impl CarrierConfiguration {
    pub fn from_definition(def: CarrierDefinition) -> Result<Self, ConfigurationError> {
        Self::build(def, Vec::new())
    }

    /// Like [`from_definition`](Self::from_definition), adding zone calculators
    /// with custom pricing that a serialized definition cannot express.
    pub fn from_definition_with_zone_calculators(
        def: CarrierDefinition,
        calculators: Vec<ZoneCalculator>,
    ) -> Result<Self, ConfigurationError> {
        Self::build(def, calculators)
    }

    fn build(
        def: CarrierDefinition,
        custom_calculators: Vec<ZoneCalculator>,
    ) -> Result<Self, ConfigurationError> {
        def.validate().map_err(|errors| {
            ConfigurationError::Invalid(format!("carrier {}: {}", def.name, errors))
        })?;

        let name = def.name.trim().to_string();
        let invalid = |msg: String| ConfigurationError::Invalid(format!("carrier {}: {}", name, msg));

        if def.mass_unit.kind() != UnitKind::Mass {
            return Err(invalid(format!("mass_unit {} is not a mass unit", def.mass_unit)));
        }
        if def.dimensions_unit.kind() != UnitKind::Length {
            return Err(invalid(format!(
                "dimensions_unit {} is not a length unit",
                def.dimensions_unit
            )));
        }
        if def.maximum_weight <= Decimal::ZERO {
            return Err(invalid("maximum_weight must be positive".into()));
        }
        let max = def.maximum_dimensions;
        if [max.length, max.width, max.height]
            .iter()
            .any(|v| *v <= Decimal::ZERO)
        {
            return Err(invalid("maximum_dimensions must be positive".into()));
        }
        if let (Some(from), Some(until)) = (def.valid_from, def.valid_until) {
            if from > until {
                return Err(invalid(format!(
                    "valid_from {} is after valid_until {}",
                    from, until
                )));
            }
        }

        let registry = CountryRegistry::new(def.export_countries, def.import_countries)?;
        let rates = build_rates(&name, def.rates, custom_calculators)?;

        for country in registry.import_countries() {
            if !rates.has_resolver(&country.zone) {
                warn!(
                    carrier = name.as_str(),
                    country_code = country.code.as_str(),
                    zone = country.zone.as_str(),
                    "Import country is mapped to a zone without rates; it will be rejected"
                );
            }
        }

        Ok(Self {
            name,
            registry,
            currency: def.currency.to_ascii_uppercase(),
            mass_unit: def.mass_unit,
            dimensions_unit: def.dimensions_unit,
            maximum_weight: def.maximum_weight,
            maximum_dimensions: Dimensions::new(max.length, max.width, max.height, def.dimensions_unit),
            rates,
            valid_from: def.valid_from,
            valid_until: def.valid_until,
            extra_data: def.extra_data,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn registry(&self) -> &CountryRegistry {
        &self.registry
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn mass_unit(&self) -> Unit {
        self.mass_unit
    }

    pub fn dimensions_unit(&self) -> Unit {
        self.dimensions_unit
    }

    pub fn maximum_weight(&self) -> Decimal {
        self.maximum_weight
    }

    pub fn maximum_dimensions(&self) -> &Dimensions {
        &self.maximum_dimensions
    }

    pub fn rates(&self) -> &RateStrategy {
        &self.rates
    }

    pub fn extra_data(&self) -> Option<&serde_json::Value> {
        self.extra_data.as_ref()
    }

    /// Whether the tariff applies on `date`. Open bounds always match.
    pub fn is_effective_on(&self, date: NaiveDate) -> bool {
        if let Some(from) = self.valid_from {
            if date < from {
                return false;
            }
        }
        if let Some(until) = self.valid_until {
            if date > until {
                return false;
            }
        }
        true
    }

    pub fn has_validity_window(&self) -> bool {
        self.valid_from.is_some() || self.valid_until.is_some()
    }
}

impl TryFrom<CarrierDefinition> for CarrierConfiguration {
    type Error = ConfigurationError;

    fn try_from(def: CarrierDefinition) -> Result<Self, Self::Error> {
        CarrierConfiguration::from_definition(def)
    }
}

fn build_rates(
    carrier: &str,
    def: RateDefinition,
    custom_calculators: Vec<ZoneCalculator>,
) -> Result<RateStrategy, ConfigurationError> {
    match def {
        RateDefinition::Zone {
            zone_calculators,
            volumetric_divisor_factor,
        } => {
            let mut calculators = HashMap::new();
            let mut built = Vec::with_capacity(zone_calculators.len());
            for def in zone_calculators {
                def.validate().map_err(|errors| {
                    ConfigurationError::Invalid(format!("carrier {}: {}", carrier, errors))
                })?;
                built.push(ZoneCalculator::try_from(def)?);
            }
            for calculator in built.into_iter().chain(custom_calculators) {
                let zone = calculator.name().to_string();
                if calculators.insert(zone.clone(), calculator).is_some() {
                    return Err(ConfigurationError::Invalid(format!(
                        "carrier {}: duplicate zone calculator {}",
                        carrier, zone
                    )));
                }
            }
            if calculators.is_empty() {
                return Err(ConfigurationError::Invalid(format!(
                    "carrier {}: no zone calculators configured",
                    carrier
                )));
            }
            let volumetric = VolumetricWeightCalculator::new(volumetric_divisor_factor)?;
            Ok(RateStrategy::Zone(ZoneRate::new(calculators, volumetric)))
        }
        RateDefinition::PriceGroup {
            price_groups,
            fuel_subcharge_rate,
        } => {
            if !custom_calculators.is_empty() {
                return Err(ConfigurationError::Invalid(format!(
                    "carrier {}: zone calculators given for a price-group carrier",
                    carrier
                )));
            }
            if fuel_subcharge_rate < Decimal::ZERO {
                return Err(ConfigurationError::Invalid(format!(
                    "carrier {}: fuel_subcharge_rate must not be negative",
                    carrier
                )));
            }
            let mut groups = HashMap::new();
            for def in price_groups {
                def.validate().map_err(|errors| {
                    ConfigurationError::Invalid(format!("carrier {}: {}", carrier, errors))
                })?;
                let group = PriceGroup::try_from(def)?;
                let name = group.name().to_string();
                if groups.insert(name.clone(), group).is_some() {
                    return Err(ConfigurationError::Invalid(format!(
                        "carrier {}: duplicate price group {}",
                        carrier, name
                    )));
                }
            }
            if groups.is_empty() {
                return Err(ConfigurationError::Invalid(format!(
                    "carrier {}: no price groups configured",
                    carrier
                )));
            }
            Ok(RateStrategy::PriceGroup(PriceGroupRate::new(
                groups,
                fuel_subcharge_rate,
            )))
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::tariff::price_group::WeightBreak;
    use crate::domain::tariff::zone::ZoneRateTable;
    use rust_decimal_macros::dec;

    /// Price-group carrier: US → CA/GB, group "1" = one 10 lb break at 20.00
    pub(crate) fn price_group_definition() -> CarrierDefinition {
        CarrierDefinition {
            name: "asendia".into(),
            export_countries: vec![ExportCountry::new("US")],
            import_countries: vec![ImportCountry::new("CA", "1"), ImportCountry::new("GB", "1")],
            currency: "USD".into(),
            mass_unit: Unit::Pound,
            dimensions_unit: Unit::Inch,
            maximum_weight: dec!(10),
            maximum_dimensions: MaximumDimensions {
                length: dec!(24),
                width: dec!(18),
                height: dec!(12),
            },
            rates: RateDefinition::PriceGroup {
                price_groups: vec![PriceGroupDefinition {
                    name: "1".into(),
                    weight_breaks: vec![WeightBreak::new(dec!(10), dec!(20.00))],
                }],
                fuel_subcharge_rate: dec!(0.10),
            },
            valid_from: None,
            valid_until: None,
            extra_data: None,
        }
    }

    /// Zone carrier: DE → FR (zone 1) / US (zone 2, no rates configured)
    pub(crate) fn zone_definition() -> CarrierDefinition {
        CarrierDefinition {
            name: "dhl".into(),
            export_countries: vec![ExportCountry::new("DE")],
            import_countries: vec![ImportCountry::new("FR", "1"), ImportCountry::new("US", "2")],
            currency: "EUR".into(),
            mass_unit: Unit::Kilogram,
            dimensions_unit: Unit::Centimeter,
            maximum_weight: dec!(30),
            maximum_dimensions: MaximumDimensions {
                length: dec!(120),
                width: dec!(80),
                height: dec!(60),
            },
            rates: RateDefinition::Zone {
                zone_calculators: vec![ZoneCalculatorDefinition {
                    name: "1".into(),
                    pricing: ZoneRateTable::Linear {
                        base: dec!(10),
                        per_unit: dec!(2.50),
                    },
                }],
                volumetric_divisor_factor: dec!(5000),
            },
            valid_from: None,
            valid_until: None,
            extra_data: None,
        }
    }

    #[test]
    fn builds_price_group_carrier() {
        let config = CarrierConfiguration::from_definition(price_group_definition()).unwrap();
        assert_eq!(config.name(), "asendia");
        assert_eq!(config.mass_unit(), Unit::Pound);
        assert_eq!(config.maximum_dimensions().unit, Unit::Inch);
        assert!(config.rates().has_resolver("1"));
        assert!(!config.rates().requires_positive_dimensions());
    }

    #[test]
    fn builds_zone_carrier() {
        let config = CarrierConfiguration::from_definition(zone_definition()).unwrap();
        assert_eq!(config.currency(), "EUR");
        assert!(config.rates().has_resolver("1"));
        assert!(!config.rates().has_resolver("2"));
        assert!(config.rates().requires_positive_dimensions());
    }

    #[test]
    fn currency_is_upper_cased() {
        let mut def = zone_definition();
        def.currency = "eur".into();
        let config = CarrierConfiguration::try_from(def).unwrap();
        assert_eq!(config.currency(), "EUR");
    }

    #[test]
    fn rejects_swapped_unit_kinds() {
        let mut def = zone_definition();
        def.mass_unit = Unit::Centimeter;
        assert!(matches!(
            CarrierConfiguration::from_definition(def),
            Err(ConfigurationError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_structurally_invalid_definitions() {
        let mut def = zone_definition();
        def.currency = "EURO".into();
        def.export_countries.clear();
        let err = CarrierConfiguration::from_definition(def).unwrap_err();
        let ConfigurationError::Invalid(msg) = err else {
            panic!("expected Invalid, got {:?}", err);
        };
        assert!(msg.contains("currency"), "{}", msg);
        assert!(msg.contains("export_countries"), "{}", msg);
    }

    #[test]
    fn rejects_non_positive_limits() {
        let mut def = zone_definition();
        def.maximum_weight = dec!(0);
        assert!(CarrierConfiguration::from_definition(def).is_err());

        let mut def = zone_definition();
        def.maximum_dimensions.height = dec!(-1);
        assert!(CarrierConfiguration::from_definition(def).is_err());
    }

    #[test]
    fn rejects_zero_volumetric_divisor() {
        let mut def = zone_definition();
        if let RateDefinition::Zone {
            volumetric_divisor_factor,
            ..
        } = &mut def.rates
        {
            *volumetric_divisor_factor = dec!(0);
        }
        assert!(CarrierConfiguration::from_definition(def).is_err());
    }

    #[test]
    fn rejects_duplicate_price_groups() {
        let mut def = price_group_definition();
        if let RateDefinition::PriceGroup { price_groups, .. } = &mut def.rates {
            let dup = price_groups[0].clone();
            price_groups.push(dup);
        }
        let err = CarrierConfiguration::from_definition(def).unwrap_err();
        assert!(err.to_string().contains("duplicate price group"));
    }

    #[test]
    fn custom_zone_calculators_are_added() {
        let custom = ZoneCalculator::new(
            "2",
            std::sync::Arc::new(ZoneRateTable::Linear {
                base: dec!(30),
                per_unit: dec!(0),
            }),
        );
        let config =
            CarrierConfiguration::from_definition_with_zone_calculators(zone_definition(), vec![custom])
                .unwrap();
        assert!(config.rates().has_resolver("2"));

        let custom = ZoneCalculator::new(
            "9",
            std::sync::Arc::new(ZoneRateTable::Linear {
                base: dec!(1),
                per_unit: dec!(1),
            }),
        );
        assert!(CarrierConfiguration::from_definition_with_zone_calculators(
            price_group_definition(),
            vec![custom]
        )
        .is_err());
    }

    #[test]
    fn validity_window() {
        let mut def = zone_definition();
        def.valid_from = NaiveDate::from_ymd_opt(2026, 1, 1);
        def.valid_until = NaiveDate::from_ymd_opt(2026, 12, 31);
        let config = CarrierConfiguration::from_definition(def).unwrap();
        assert!(config.has_validity_window());
        assert!(config.is_effective_on(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()));
        assert!(config.is_effective_on(NaiveDate::from_ymd_opt(2026, 12, 31).unwrap()));
        assert!(!config.is_effective_on(NaiveDate::from_ymd_opt(2027, 1, 1).unwrap()));

        let mut def = zone_definition();
        def.valid_from = NaiveDate::from_ymd_opt(2027, 1, 1);
        def.valid_until = NaiveDate::from_ymd_opt(2026, 1, 1);
        assert!(CarrierConfiguration::from_definition(def).is_err());
    }

    #[test]
    fn definition_deserializes_from_json() {
        let json = serde_json::json!({
            "name": "asendia",
            "export_countries": [{ "code": "US" }],
            "import_countries": [{ "code": "CA", "zone": "1" }],
            "mass_unit": "lb",
            "dimensions_unit": "in",
            "maximum_weight": "10",
            "maximum_dimensions": { "length": "24", "width": "18", "height": "12" },
            "rates": {
                "strategy": "price_group",
                "fuel_subcharge_rate": "0.10",
                "price_groups": [
                    { "name": "1", "weight_breaks": [{ "threshold": "10", "price": "20.00" }] }
                ]
            },
            "extra_data": { "account": 42 }
        });
        let def: CarrierDefinition = serde_json::from_value(json).unwrap();
        assert_eq!(def.currency, "USD");
        let config = CarrierConfiguration::from_definition(def).unwrap();
        assert_eq!(config.extra_data().unwrap()["account"], 42);
    }

    #[test]
    fn zone_divisor_defaults_to_5000() {
        let json = serde_json::json!({
            "strategy": "zone",
            "zone_calculators": []
        });
        let def: RateDefinition = serde_json::from_value(json).unwrap();
        assert_eq!(
            def,
            RateDefinition::Zone {
                zone_calculators: vec![],
                volumetric_divisor_factor: dec!(5000),
            }
        );
    }
}
