//! Shopfront domain, persistence and authentication.

pub mod auth;
pub mod context;
pub mod database;
pub mod domain;
pub mod storage;
pub mod uuids;

#[cfg(test)]
mod test;
