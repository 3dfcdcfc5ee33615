//! Domain services
//!
//! Pure calculation steps shared by every carrier: box normalization,
//! volumetric weight, rate strategies and the validation rules.

pub mod dimensions;
pub mod rate;
pub mod validator;
pub mod volumetric;

pub use dimensions::normalize;
pub use rate::{PriceGroupRate, RateQuote, RateStrategy, ZoneRate};
pub use validator::{Rule, RuleOutcome, Validator};
pub use volumetric::{VolumetricWeightCalculator, DEFAULT_VOLUMETRIC_DIVISOR};
