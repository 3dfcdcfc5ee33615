//! Country entities

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A country packages may be sent from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ExportCountry {
    #[validate(length(min = 1, message = "country code is required"))]
    pub code: String,
}

impl ExportCountry {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

/// A destination country and the rate key it is billed under.
///
/// `zone` names a zone calculator for zone carriers and a price group for
/// price-group carriers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ImportCountry {
    #[validate(length(min = 1, message = "country code is required"))]
    pub code: String,
    #[validate(length(min = 1, message = "zone is required"))]
    pub zone: String,
}

impl ImportCountry {
    pub fn new(code: impl Into<String>, zone: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            zone: zone.into(),
        }
    }
}
