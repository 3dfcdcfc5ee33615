use serde::Serialize;
use thiserror::Error;

use crate::shared::units::Unit;

/// A rule failure caused by the package itself. Recoverable per call.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum ViolationKind {
    #[error("Can not send a package from this country: {country_code}")]
    IneligibleSender { country_code: String },

    #[error("Can not send a package to this country: {country_code}")]
    IneligibleRecipient { country_code: String },

    #[error("Dimensions must be greater than zero.")]
    NonPositiveDimensions,

    #[error("Dimensions limit is exceeded.")]
    DimensionsLimitExceeded,

    #[error("Weight must not be negative.")]
    NegativeWeight,

    #[error("Weight limit is exceeded.")]
    WeightLimitExceeded,
}

/// A setup defect: the engine cannot answer for any input in this class.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Duplicate {registry} country code: {code}")]
    DuplicateCountry { registry: &'static str, code: String },

    #[error("Price group does not exist: {0}")]
    MissingPriceGroup(String),

    #[error("Zone calculator does not exist: {0}")]
    MissingZoneCalculator(String),

    #[error("Rate table {table} ends at {last_threshold}, weight {weight} is not covered")]
    RateTableExceeded {
        table: String,
        weight: String,
        last_threshold: String,
    },

    #[error("Can not convert {from} to {to}: units measure different quantities")]
    IncompatibleUnits { from: Unit, to: Unit },

    #[error("Tariff {carrier} is not effective on {date}")]
    TariffNotEffective { carrier: String, date: String },
}

/// Exact-arithmetic failure. Always indicates corrupt configuration or data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArithmeticError {
    #[error("Division by zero")]
    DivisionByZero,

    #[error("Decimal overflow in {0}")]
    Overflow(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TariffError {
    #[error(transparent)]
    Violation(#[from] ViolationKind),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),
}

impl TariffError {
    /// Whether the caller's package caused this error (as opposed to setup).
    pub fn is_violation(&self) -> bool {
        matches!(self, TariffError::Violation(_))
    }

    /// Configuration and arithmetic defects propagate in every validation mode.
    pub fn is_fatal(&self) -> bool {
        !self.is_violation()
    }
}

/// Result type for tariff operations
pub type TariffResult<T> = Result<T, TariffError>;
