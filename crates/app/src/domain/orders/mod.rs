//! Orders

pub mod errors;
pub mod models;
pub mod numbers;
pub mod repositories;
pub mod service;
pub mod status;

pub use errors::OrdersServiceError;
pub use service::*;
