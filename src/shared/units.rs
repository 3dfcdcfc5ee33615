//! Units of measure and conversion
//!
//! Units carry their quantity kind, so a mass-to-length request is caught
//! at conversion time instead of producing a meaningless number.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::shared::math::Math;
use crate::support::errors::{ConfigurationError, TariffError};

/// Physical quantity a unit measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    Mass,
    Length,
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mass => write!(f, "mass"),
            Self::Length => write!(f, "length"),
        }
    }
}

/// Supported units. Serialized with their short symbols (`kg`, `lb`, `cm`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "kg")]
    Kilogram,
    #[serde(rename = "g")]
    Gram,
    #[serde(rename = "lb")]
    Pound,
    #[serde(rename = "oz")]
    Ounce,
    #[serde(rename = "cm")]
    Centimeter,
    #[serde(rename = "mm")]
    Millimeter,
    #[serde(rename = "m")]
    Meter,
    #[serde(rename = "in")]
    Inch,
    #[serde(rename = "ft")]
    Foot,
}

impl Unit {
    pub const ALL: [Unit; 9] = [
        Unit::Kilogram,
        Unit::Gram,
        Unit::Pound,
        Unit::Ounce,
        Unit::Centimeter,
        Unit::Millimeter,
        Unit::Meter,
        Unit::Inch,
        Unit::Foot,
    ];

    pub fn kind(&self) -> UnitKind {
        match self {
            Self::Kilogram | Self::Gram | Self::Pound | Self::Ounce => UnitKind::Mass,
            Self::Centimeter | Self::Millimeter | Self::Meter | Self::Inch | Self::Foot => {
                UnitKind::Length
            }
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Kilogram => "kg",
            Self::Gram => "g",
            Self::Pound => "lb",
            Self::Ounce => "oz",
            Self::Centimeter => "cm",
            Self::Millimeter => "mm",
            Self::Meter => "m",
            Self::Inch => "in",
            Self::Foot => "ft",
        }
    }

    /// Exact factor to the base unit of the kind (kilogram, centimeter).
    pub fn base_factor(&self) -> Decimal {
        match self {
            Self::Kilogram => Decimal::ONE,
            Self::Gram => Decimal::new(1, 3),
            Self::Pound => Decimal::new(45_359_237, 8),
            Self::Ounce => Decimal::new(28_349_523_125, 12),
            Self::Centimeter => Decimal::ONE,
            Self::Millimeter => Decimal::new(1, 1),
            Self::Meter => Decimal::ONE_HUNDRED,
            Self::Inch => Decimal::new(254, 2),
            Self::Foot => Decimal::new(3048, 2),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Unit {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Unit::ALL
            .into_iter()
            .find(|unit| unit.symbol() == wanted)
            .ok_or_else(|| ConfigurationError::Invalid(format!("unknown unit: {}", s)))
    }
}

/// Converts a scalar between two units of the same kind.
pub trait UnitConverter: Send + Sync + fmt::Debug {
    fn convert(&self, value: Decimal, from: Unit, to: Unit) -> Result<Decimal, TariffError>;
}

/// Default converter: `value × factor(from) ÷ factor(to)` over [`Unit::base_factor`].
#[derive(Debug, Clone)]
pub struct FactorTableConverter {
    math: Arc<dyn Math>,
}

impl FactorTableConverter {
    pub fn new(math: Arc<dyn Math>) -> Self {
        Self { math }
    }
}

impl UnitConverter for FactorTableConverter {
    fn convert(&self, value: Decimal, from: Unit, to: Unit) -> Result<Decimal, TariffError> {
        if from.kind() != to.kind() {
            return Err(ConfigurationError::IncompatibleUnits { from, to }.into());
        }
        if from == to {
            return Ok(value);
        }

        let in_base = self.math.mul(value, from.base_factor())?;
        Ok(self.math.div(in_base, to.base_factor())?)
    }
}

// ── Tests ──────────────────────────────────────────────────────
