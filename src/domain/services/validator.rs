//! Package validation rules
//!
//! Each rule is a pure check returning a [`RuleOutcome`]; `Err` is reserved
//! for configuration and arithmetic defects. The two drivers differ only in
//! what they do with a violation: stop, or record it and carry on.

use std::fmt;

use rust_decimal::Decimal;

use super::dimensions::normalize;
use crate::domain::package::{Dimensions, Package};
use crate::domain::tariff::{CarrierConfiguration, ValidationMode};
use crate::shared::NumericContext;
use crate::support::errors::{TariffResult, ViolationKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    Pass,
    Violation(ViolationKind),
}

impl RuleOutcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, RuleOutcome::Pass)
    }
}

impl From<Result<(), ViolationKind>> for RuleOutcome {
    fn from(result: Result<(), ViolationKind>) -> Self {
        match result {
            Ok(()) => RuleOutcome::Pass,
            Err(kind) => RuleOutcome::Violation(kind),
        }
    }
}

/// Validation rules, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Sender,
    Recipient,
    Dimensions,
    Weight,
}

impl Rule {
    pub const ORDER: [Rule; 4] = [Rule::Sender, Rule::Recipient, Rule::Dimensions, Rule::Weight];
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Sender => write!(f, "sender"),
            Rule::Recipient => write!(f, "recipient"),
            Rule::Dimensions => write!(f, "dimensions"),
            Rule::Weight => write!(f, "weight"),
        }
    }
}

/// Checks packages against one carrier configuration
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    config: &'a CarrierConfiguration,
    ctx: &'a NumericContext,
}

impl<'a> Validator<'a> {
    pub fn new(config: &'a CarrierConfiguration, ctx: &'a NumericContext) -> Self {
        Self { config, ctx }
    }

    pub fn check(&self, rule: Rule, package: &Package) -> TariffResult<RuleOutcome> {
        match rule {
            Rule::Sender => Ok(self.check_sender(package)),
            Rule::Recipient => Ok(self.check_recipient(package)),
            Rule::Dimensions => self.check_dimensions(package),
            Rule::Weight => self.check_weight(package),
        }
    }

    pub fn check_sender(&self, package: &Package) -> RuleOutcome {
        self.config
            .registry()
            .resolve_export(package.sender_address.country_code())
            .map(|_| ())
            .into()
    }

    /// The recipient must be known and its zone must have a rate.
    pub fn check_recipient(&self, package: &Package) -> RuleOutcome {
        let code = package.recipient_address.country_code();
        match self.config.registry().resolve_import(code) {
            Ok(country) if self.config.rates().has_resolver(&country.zone) => RuleOutcome::Pass,
            Ok(_) => RuleOutcome::Violation(ViolationKind::IneligibleRecipient {
                country_code: code.to_string(),
            }),
            Err(kind) => RuleOutcome::Violation(kind),
        }
    }

    /// Positivity (zone carriers only), then element-wise limits after
    /// both boxes are normalized.
    pub fn check_dimensions(&self, package: &Package) -> TariffResult<RuleOutcome> {
        let math = self.ctx.math.as_ref();
        let dims = &package.dimensions;

        if self.config.rates().requires_positive_dimensions()
            && dims
                .values()
                .iter()
                .any(|v| math.less_or_equal(*v, Decimal::ZERO))
        {
            return Ok(RuleOutcome::Violation(ViolationKind::NonPositiveDimensions));
        }

        let max = normalize(self.config.maximum_dimensions());
        let target = max.unit;
        let convert = |v| self.ctx.converter.convert(v, dims.unit, target);
        let actual = normalize(&Dimensions::new(
            convert(dims.length)?,
            convert(dims.width)?,
            convert(dims.height)?,
            target,
        ));

        let within = actual
            .values()
            .iter()
            .zip(max.values().iter())
            .all(|(a, m)| math.less_or_equal(*a, *m));

        Ok(if within {
            RuleOutcome::Pass
        } else {
            RuleOutcome::Violation(ViolationKind::DimensionsLimitExceeded)
        })
    }

    pub fn check_weight(&self, package: &Package) -> TariffResult<RuleOutcome> {
        let math = self.ctx.math.as_ref();
        let weight = &package.weight;

        if math.less_than(weight.value, Decimal::ZERO) {
            return Ok(RuleOutcome::Violation(ViolationKind::NegativeWeight));
        }

        let converted = self
            .ctx
            .converter
            .convert(weight.value, weight.unit, self.config.mass_unit())?;

        Ok(if math.greater_than(converted, self.config.maximum_weight()) {
            RuleOutcome::Violation(ViolationKind::WeightLimitExceeded)
        } else {
            RuleOutcome::Pass
        })
    }

    /// Evaluate the rules in order, calling `observe` before each one.
    ///
    /// In fail-fast mode the first violation is returned as the error;
    /// otherwise every violation is collected in rule order.
    pub fn run(
        &self,
        package: &Package,
        mode: ValidationMode,
        mut observe: impl FnMut(Rule),
    ) -> TariffResult<Vec<ViolationKind>> {
        let mut violations = Vec::new();
        for rule in Rule::ORDER {
            observe(rule);
            if let RuleOutcome::Violation(kind) = self.check(rule, package)? {
                if mode == ValidationMode::FailFast {
                    return Err(kind.into());
                }
                violations.push(kind);
            }
        }
        Ok(violations)
    }

    pub fn validate_fail_fast(&self, package: &Package) -> TariffResult<()> {
        self.run(package, ValidationMode::FailFast, |_| ()).map(|_| ())
    }

    pub fn validate_collect_all(&self, package: &Package) -> TariffResult<Vec<ViolationKind>> {
        self.run(package, ValidationMode::CollectAll, |_| ())
    }
}
