//! Collaborator interfaces for external asset contracts
//!
//! The engine never holds balances itself; it moves them through these
//! ports. Each mutating port carries a batch transaction boundary
//! (`begin` / `commit` / `rollback`) so a batch that fails partway can
//! be undone at the collaborator too, keeping the batch atomic end to
//! end.
//!
//! Transfer methods that can run receiver-side logic take the engine by
//! mutable reference: a receive hook gets a real path back into the
//! engine, and the reentrancy guard is what stops it. Test doubles use
//! exactly that path to exercise the guard.

use crate::engine::DisburseEngine;
use thiserror::Error;
use types::prelude::*;

/// Failure surfaced by a collaborator transfer.
///
/// The engine does not interpret the reason; it maps the failure to the
/// transfer-failed error kind of the asset being moved and aborts the
/// batch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct TransferAbort {
    pub reason: String,
}

impl TransferAbort {
    /// Create an abort with a human-readable reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Result of one collaborator transfer.
pub type PortResult = Result<(), TransferAbort>;

/// Value-transfer primitive for the native ledger currency.
pub trait NativePort {
    /// Open a batch transaction.
    fn begin(&mut self);

    /// Make the batch's transfers permanent.
    fn commit(&mut self);

    /// Discard every transfer since `begin`.
    fn rollback(&mut self);

    /// Move `amount` of native currency from the engine's account to
    /// `to`. May run arbitrary receiver logic before returning;
    /// `forward_limit` caps the resources forwarded to that logic.
    fn send(
        &mut self,
        engine: &mut DisburseEngine,
        to: &Address,
        amount: Amount,
        forward_limit: u64,
    ) -> PortResult;

    /// Native balance held by `who`.
    fn balance_of(&self, who: &Address) -> Amount;
}

/// One fungible token contract, pull-based transfer discipline.
pub trait FungiblePort {
    /// Open a batch transaction.
    fn begin(&mut self);

    /// Make the batch's transfers permanent.
    fn commit(&mut self);

    /// Discard every transfer since `begin`.
    fn rollback(&mut self);

    /// Pull `amount` from `from` to `to` against the allowance the
    /// caller granted the engine beforehand.
    fn transfer_from(
        &mut self,
        engine: &mut DisburseEngine,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> PortResult;

    /// Push `amount` out of the engine's own balance to `to` (residual
    /// sweeps and recovery).
    fn transfer(&mut self, to: &Address, amount: Amount) -> PortResult;

    /// Token balance held by `who`.
    fn balance_of(&self, who: &Address) -> Amount;
}

/// One semi-fungible token contract, per-id balances with batched
/// multi-id transfer support.
pub trait SemiFungiblePort {
    /// Open a batch transaction.
    fn begin(&mut self);

    /// Make the batch's transfers permanent.
    fn commit(&mut self);

    /// Discard every transfer since `begin`.
    fn rollback(&mut self);

    /// Move `amount` units of `id` from `from` to `to`. May run
    /// receiver logic before returning.
    fn safe_transfer_from(
        &mut self,
        engine: &mut DisburseEngine,
        from: &Address,
        to: &Address,
        id: TokenId,
        amount: Amount,
    ) -> PortResult;

    /// Move all `(id, amount)` pairs from `from` to `to` in one
    /// collaborator invocation. May run receiver logic before returning.
    fn safe_batch_transfer_from(
        &mut self,
        engine: &mut DisburseEngine,
        from: &Address,
        to: &Address,
        ids: &[TokenId],
        amounts: &[Amount],
    ) -> PortResult;

    /// Balance of `id` held by `who`.
    fn balance_of(&self, who: &Address, id: TokenId) -> Amount;
}
