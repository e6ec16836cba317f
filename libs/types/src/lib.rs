//! Types library for the batch disbursement engine
//!
//! This library provides the core type definitions shared across the
//! disbursement system, ensuring type safety and deterministic behavior.
//!
//! # Version
//! v1.0.0 - Frozen interface
//!
//! # Modules
//! - `address`: Account and contract addresses
//! - `asset`: Amounts, token ids, and asset references

// Public modules
pub mod address;
pub mod asset;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::address::*;
    pub use crate::asset::*;
}
