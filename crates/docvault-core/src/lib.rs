//! # docvault-core
//!
//! Core crate for DocVault. Contains boundary traits, configuration
//! schemas, and the unified error system.
//!
//! This crate has **no** internal dependencies on other DocVault crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
