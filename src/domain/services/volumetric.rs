//! Dimensional weight
//!
//! Volume is always computed in centimeters and divided into kilograms, so
//! the divisor keeps its usual industry meaning (cm³ per kg) whatever units
//! the carrier bills in.

use rust_decimal::Decimal;

use crate::domain::package::{Dimensions, Quantity};
use crate::shared::units::Unit;
use crate::shared::NumericContext;
use crate::support::errors::{ConfigurationError, TariffResult};

/// cm³ per kg used when a carrier does not set its own factor
pub const DEFAULT_VOLUMETRIC_DIVISOR: Decimal = Decimal::from_parts(5000, 0, 0, false, 0);

const VOLUME_UNIT: Unit = Unit::Centimeter;
const VOLUMETRIC_MASS_UNIT: Unit = Unit::Kilogram;
const WEIGHT_PRECISION: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumetricWeightCalculator {
    divisor: Decimal,
}

impl VolumetricWeightCalculator {
    pub fn new(divisor: Decimal) -> Result<Self, ConfigurationError> {
        if divisor <= Decimal::ZERO {
            return Err(ConfigurationError::Invalid(format!(
                "volumetric divisor factor must be positive, got {}",
                divisor
            )));
        }
        Ok(Self { divisor })
    }

    pub fn divisor(&self) -> Decimal {
        self.divisor
    }

    /// Volumetric weight of `dimensions` in `target`, rounded up to 3 places.
    pub fn calculate(
        &self,
        dimensions: &Dimensions,
        target: Unit,
        ctx: &NumericContext,
    ) -> TariffResult<Quantity> {
        let math = ctx.math.as_ref();
        let to_cm = |v: Decimal| ctx.converter.convert(v, dimensions.unit, VOLUME_UNIT);

        let volume = math.mul(
            math.mul(to_cm(dimensions.length)?, to_cm(dimensions.width)?)?,
            to_cm(dimensions.height)?,
        )?;
        let kilograms = math.div(volume, self.divisor)?;
        let converted = ctx
            .converter
            .convert(kilograms, VOLUMETRIC_MASS_UNIT, target)?;

        Ok(Quantity::new(
            math.round_up(converted, WEIGHT_PRECISION),
            target,
        ))
    }
}

impl Default for VolumetricWeightCalculator {
    fn default() -> Self {
        Self {
            divisor: DEFAULT_VOLUMETRIC_DIVISOR,
        }
    }
}
