//! Core types and trait definitions for the Gauge measurement dashboard.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod measurement;
pub mod series;
pub mod session;
pub mod store;
pub mod user;
pub mod validate;

pub use validate::ValidationError;
