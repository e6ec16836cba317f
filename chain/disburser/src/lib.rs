//! Batch Disbursement Engine
//!
//! This crate implements an atomic multi-recipient payout engine covering
//! three asset kinds: the native ledger currency, fungible balances, and
//! semi-fungible (per-id) balances. One authorized call distributes to many
//! recipients; the whole batch is a single unit of accounting and failure.
//!
//! # Modules
//! - `errors`: Engine error taxonomy
//! - `events`: Audit records emitted by engine operations
//! - `security`: Reentrancy guard, pause guard, owner capability gate
//! - `validate`: Shared batch precondition checks
//! - `ledger`: Monotonic disbursement counters
//! - `journal`: Staged ledger mutations for atomic batches
//! - `ports`: Collaborator interfaces for external asset contracts
//! - `engine`: The disbursement entrypoints, pause controller, and recovery
//!
//! # Version
//! v0.1.0 — Initial implementation

pub mod engine;
pub mod errors;
pub mod events;
pub mod journal;
pub mod ledger;
pub mod ports;
pub mod security;
pub mod validate;

pub use engine::{DisburseEngine, DEFAULT_FORWARD_LIMIT};
pub use errors::{EngineError, Result};

/// Engine interface version — frozen after release
pub const ENGINE_ABI_VERSION: &str = "1.0.0";
