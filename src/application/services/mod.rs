//! Application services

mod engine;
mod rate_shop;

pub use engine::{Stage, TariffEngine};
pub use rate_shop::{cheapest, RateShop};
