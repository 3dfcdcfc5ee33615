pub mod math;
pub mod units;

use std::sync::Arc;

pub use math::{format_money, DecimalMath, Math};
pub use units::{FactorTableConverter, Unit, UnitConverter, UnitKind};

/// Arithmetic and unit-conversion backends shared by one engine.
#[derive(Debug, Clone)]
pub struct NumericContext {
    pub math: Arc<dyn Math>,
    pub converter: Arc<dyn UnitConverter>,
}

impl NumericContext {
    pub fn new(math: Arc<dyn Math>, converter: Arc<dyn UnitConverter>) -> Self {
        Self { math, converter }
    }
}

impl Default for NumericContext {
    fn default() -> Self {
        let math: Arc<dyn Math> = Arc::new(DecimalMath);
        let converter = Arc::new(FactorTableConverter::new(math.clone()));
        Self { math, converter }
    }
}
