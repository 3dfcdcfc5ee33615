//! Package aggregate
//!
//! The shipment the caller wants priced: weight, box dimensions and the
//! two country codes.

pub mod model;

pub use model::{Address, Dimensions, Package, Quantity};
