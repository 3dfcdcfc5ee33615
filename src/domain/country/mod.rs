//! Country aggregate
//!
//! Export/import country entities and the registry that resolves them.

pub mod model;
pub mod registry;

pub use model::{ExportCountry, ImportCountry};
pub use registry::CountryRegistry;
