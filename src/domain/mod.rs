pub mod country;
pub mod package;
pub mod services;
pub mod tariff;

// Re-export commonly used types
pub use country::{CountryRegistry, ExportCountry, ImportCountry};
pub use package::{Address, Dimensions, Package, Quantity};
pub use tariff::{
    CalculationResult, CarrierConfiguration, CarrierDefinition, RateBreakdown, ValidationMode,
    Violation,
};
