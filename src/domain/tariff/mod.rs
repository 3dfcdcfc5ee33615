//! Tariff aggregate
//!
//! Carrier configuration, rate tables and calculation result types.

pub mod configuration;
pub mod model;
pub mod price_group;
pub mod zone;

pub use configuration::{CarrierConfiguration, CarrierDefinition, MaximumDimensions, RateDefinition};
pub use model::{CalculationResult, RateBreakdown, ValidationMode, Violation};
pub use price_group::{PriceGroup, PriceGroupDefinition, WeightBreak};
pub use zone::{ExcessRate, ZoneCalculator, ZoneCalculatorDefinition, ZonePricing, ZoneRateTable};
