//! Engine error taxonomy
//!
//! Every precondition violation and every collaborator transfer failure
//! aborts the entire enclosing batch; none are locally recovered or
//! retried. Failures surface synchronously with the specific kind below.

use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Disbursement engine errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Parallel arrays differ in length: expected {expected}, got {got}")]
    ArrayLengthMismatch { expected: usize, got: usize },

    #[error("Empty batch: nothing to disburse")]
    EmptyBatch,

    #[error("Insufficient attached value: required {required}, provided {provided}")]
    InsufficientValue { required: u128, provided: u128 },

    #[error("Zero address is not a valid recipient or asset contract")]
    ZeroAddress,

    #[error("Disbursement amount must be positive")]
    ZeroAmount,

    #[error("Reentrant call rejected")]
    ReentrantCall,

    #[error("Engine is paused")]
    OperationPaused,

    #[error("Unauthorized: caller is not the owner")]
    Unauthorized,

    #[error("Native transfer failed: {reason}")]
    NativeTransferFailed { reason: String },

    #[error("Fungible transfer failed: {reason}")]
    FungibleTransferFailed { reason: String },

    #[error("Semi-fungible transfer failed: {reason}")]
    SemiFungibleTransferFailed { reason: String },

    #[error("No asset to withdraw")]
    NoAssetToWithdraw,

    #[error("Arithmetic overflow in amount calculation")]
    Overflow,
}
