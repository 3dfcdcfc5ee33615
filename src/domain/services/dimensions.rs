//! Canonical box orientation

use crate::domain::package::Dimensions;

/// Reorder the three sides so that `length ≥ width ≥ height`.
///
/// Returns a copy in the same unit; the input is left as the caller gave it.
pub fn normalize(dimensions: &Dimensions) -> Dimensions {
    let mut sides = dimensions.values();
    sides.sort_unstable_by(|a, b| b.cmp(a));
    Dimensions::new(sides[0], sides[1], sides[2], dimensions.unit)
}
