//! HTTP handlers for the product catalogue.

pub mod products;
pub use products::*;
