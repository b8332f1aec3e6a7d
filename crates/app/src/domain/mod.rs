//! Shopfront Domain Concerns

pub mod carts;
pub mod orders;
pub mod owners;
pub mod pricing;
pub mod products;
pub mod stock;
