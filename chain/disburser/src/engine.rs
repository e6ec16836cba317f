//! Disbursement engine — entrypoints, pause controller, recovery
//!
//! One `DisburseEngine` instance owns all mutable engine state: the
//! accounting ledger, the pause flag, the reentrancy guard, the owner
//! capability, and the audit event log. Collaborator ports are passed
//! into each call by the surrounding environment rather than owned by
//! the engine, so one engine can serve any number of asset contracts.
//!
//! Every disbursement entrypoint follows the same discipline:
//!
//! 1. reject while paused;
//! 2. enter the reentrancy guard (held across all collaborator calls);
//! 3. validate the batch shape;
//! 4. open a port transaction, run the transfer loop while journaling
//!    intended ledger increments;
//! 5. on any failure: roll the port back, drop the journal, exit the
//!    guard, surface the error — the batch leaves no trace;
//! 6. on success: apply the journal, commit the port, record one
//!    summary event.

use crate::errors::EngineError;
use crate::events::{
    AssetBatchRecovered, AssetRecovered, EngineEvent, EnginePaused, EngineUnpaused,
    FungibleDisbursed, NativeDisbursed, OwnershipTransferred, SemiFungibleDisbursed,
};
use crate::journal::{BatchJournal, LedgerEntry};
use crate::ledger::AccountingLedger;
use crate::ports::{FungiblePort, NativePort, SemiFungiblePort};
use crate::security::{OwnerGate, PauseGuard, ReentrancyGuard};
use crate::validate::{batch_total, check_asset, check_batch_shape, check_entry, check_id_shape};
use types::prelude::*;
use uuid::Uuid;

/// Default resource limit forwarded to a native receiver: enough to
/// record the receipt, not enough to do real work.
pub const DEFAULT_FORWARD_LIMIT: u64 = 2_300;

/// The batch disbursement engine.
#[derive(Debug)]
pub struct DisburseEngine {
    /// The engine's own account on the surrounding ledger. Collaborator
    /// balances of this address are what recovery sweeps.
    address: Address,
    /// Owner capability for pause, recovery, and handover.
    owner: OwnerGate,
    /// Killswitch consulted by every disbursement entrypoint.
    pause: PauseGuard,
    /// Call-exclusion flag held for each entrypoint's full extent.
    reentrancy: ReentrancyGuard,
    /// Monotonic disbursement counters.
    ledger: AccountingLedger,
    /// Emitted audit records (append-only).
    events: Vec<EngineEvent>,
    /// Resource limit forwarded to native receivers.
    forward_limit: u64,
}

impl DisburseEngine {
    /// Create an engine living at `address`, owned by `owner`.
    pub fn new(address: Address, owner: Address) -> Self {
        Self {
            address,
            owner: OwnerGate::new(owner),
            pause: PauseGuard::new(),
            reentrancy: ReentrancyGuard::new(),
            ledger: AccountingLedger::new(),
            events: Vec::new(),
            forward_limit: DEFAULT_FORWARD_LIMIT,
        }
    }

    /// Override the resource limit forwarded to native receivers.
    pub fn with_forward_limit(mut self, limit: u64) -> Self {
        self.forward_limit = limit;
        self
    }

    // ───────────────────────── Disbursement ─────────────────────────

    /// Disburse native currency to many recipients in one atomic batch.
    ///
    /// `provided_value` is the value the caller attached to the call;
    /// it must cover the batch total, and any excess is returned to the
    /// caller after the loop.
    pub fn disburse_native(
        &mut self,
        port: &mut dyn NativePort,
        caller: &Address,
        recipients: &[Address],
        amounts: &[Amount],
        provided_value: Amount,
    ) -> Result<EngineEvent, EngineError> {
        self.check_active()?;
        self.enter()?;
        let result = self.native_batch(port, caller, recipients, amounts, provided_value);
        self.reentrancy.exit();
        result
    }

    /// Disburse one fungible token to many recipients in one atomic
    /// batch, pulling from the caller's pre-authorized allowance.
    pub fn disburse_fungible(
        &mut self,
        port: &mut dyn FungiblePort,
        asset: &Address,
        caller: &Address,
        recipients: &[Address],
        amounts: &[Amount],
    ) -> Result<EngineEvent, EngineError> {
        self.check_active()?;
        self.enter()?;
        let result = self.fungible_batch(port, asset, caller, recipients, amounts);
        self.reentrancy.exit();
        result
    }

    /// Disburse one semi-fungible token to many recipients in one
    /// atomic batch. A single-recipient batch goes out as one batched
    /// multi-id transfer; anything else goes entry by entry. Both paths
    /// produce identical ledger state for identical logical input.
    pub fn disburse_semi_fungible(
        &mut self,
        port: &mut dyn SemiFungiblePort,
        asset: &Address,
        caller: &Address,
        recipients: &[Address],
        amounts: &[Amount],
        ids: &[TokenId],
    ) -> Result<EngineEvent, EngineError> {
        self.check_active()?;
        self.enter()?;
        let result = self.semi_fungible_batch(port, asset, caller, recipients, amounts, ids);
        self.reentrancy.exit();
        result
    }

    fn native_batch(
        &mut self,
        port: &mut dyn NativePort,
        caller: &Address,
        recipients: &[Address],
        amounts: &[Amount],
        provided_value: Amount,
    ) -> Result<EngineEvent, EngineError> {
        check_batch_shape(recipients, amounts)?;
        let required = batch_total(amounts)?;
        if provided_value < required {
            return Err(EngineError::InsufficientValue {
                required,
                provided: provided_value,
            });
        }

        let limit = self.forward_limit;
        let mut journal = BatchJournal::new();
        port.begin();

        for (to, amount) in recipients.iter().zip(amounts) {
            if let Err(err) = check_entry(to, *amount) {
                port.rollback();
                return Err(err);
            }
            if let Err(abort) = port.send(self, to, *amount, limit) {
                port.rollback();
                return Err(EngineError::NativeTransferFailed {
                    reason: abort.to_string(),
                });
            }
            journal.record(LedgerEntry::Native { amount: *amount });
        }

        // Refund after the loop: the guard forbids the race that could
        // make a pre-loop refund amount stale.
        let refunded = provided_value - required;
        if refunded > 0 {
            if let Err(abort) = port.send(self, caller, refunded, limit) {
                port.rollback();
                return Err(EngineError::NativeTransferFailed {
                    reason: abort.to_string(),
                });
            }
        }

        if let Err(err) = self.ledger.apply(&journal) {
            port.rollback();
            return Err(err);
        }
        port.commit();

        tracing::info!(
            recipients = recipients.len(),
            total = %required,
            refunded = %refunded,
            "native batch disbursed"
        );
        let event = EngineEvent::NativeDisbursed(NativeDisbursed {
            batch_id: Uuid::now_v7(),
            caller: *caller,
            recipients: recipients.to_vec(),
            amounts: amounts.to_vec(),
            refunded,
        });
        self.events.push(event.clone());
        Ok(event)
    }

    fn fungible_batch(
        &mut self,
        port: &mut dyn FungiblePort,
        asset: &Address,
        caller: &Address,
        recipients: &[Address],
        amounts: &[Amount],
    ) -> Result<EngineEvent, EngineError> {
        check_batch_shape(recipients, amounts)?;
        check_asset(asset)?;

        let mut journal = BatchJournal::new();
        port.begin();

        for (to, amount) in recipients.iter().zip(amounts) {
            if let Err(err) = check_entry(to, *amount) {
                port.rollback();
                return Err(err);
            }
            if let Err(abort) = port.transfer_from(self, caller, to, *amount) {
                port.rollback();
                return Err(EngineError::FungibleTransferFailed {
                    reason: abort.to_string(),
                });
            }
            journal.record(LedgerEntry::Fungible {
                token: *asset,
                amount: *amount,
            });
        }

        // Tokens with nonstandard transfer semantics can park a slice of
        // the batch on the engine itself; sweep it back so the engine is
        // never a custodian of residue it did not explicitly receive.
        let swept = port.balance_of(&self.address);
        if swept > 0 {
            if let Err(abort) = port.transfer(caller, swept) {
                port.rollback();
                return Err(EngineError::FungibleTransferFailed {
                    reason: abort.to_string(),
                });
            }
        }

        if let Err(err) = self.ledger.apply(&journal) {
            port.rollback();
            return Err(err);
        }
        port.commit();

        tracing::info!(
            token = %asset,
            recipients = recipients.len(),
            swept = %swept,
            "fungible batch disbursed"
        );
        let event = EngineEvent::FungibleDisbursed(FungibleDisbursed {
            batch_id: Uuid::now_v7(),
            caller: *caller,
            token: *asset,
            recipients: recipients.to_vec(),
            amounts: amounts.to_vec(),
            swept,
        });
        self.events.push(event.clone());
        Ok(event)
    }

    fn semi_fungible_batch(
        &mut self,
        port: &mut dyn SemiFungiblePort,
        asset: &Address,
        caller: &Address,
        recipients: &[Address],
        amounts: &[Amount],
        ids: &[TokenId],
    ) -> Result<EngineEvent, EngineError> {
        check_batch_shape(recipients, amounts)?;
        check_id_shape(recipients, ids)?;
        check_asset(asset)?;

        let mut journal = BatchJournal::new();
        port.begin();

        let batched = recipients.len() == 1;
        if batched {
            // Sole recipient: one batched multi-id collaborator call.
            let to = &recipients[0];
            for amount in amounts {
                if let Err(err) = check_entry(to, *amount) {
                    port.rollback();
                    return Err(err);
                }
            }
            if let Err(abort) = port.safe_batch_transfer_from(self, caller, to, ids, amounts) {
                port.rollback();
                return Err(EngineError::SemiFungibleTransferFailed {
                    reason: abort.to_string(),
                });
            }
            for (id, amount) in ids.iter().zip(amounts) {
                journal.record(LedgerEntry::SemiFungible {
                    token: *asset,
                    id: *id,
                    amount: *amount,
                });
            }
        } else {
            for ((to, amount), id) in recipients.iter().zip(amounts).zip(ids) {
                if let Err(err) = check_entry(to, *amount) {
                    port.rollback();
                    return Err(err);
                }
                if let Err(abort) = port.safe_transfer_from(self, caller, to, *id, *amount) {
                    port.rollback();
                    return Err(EngineError::SemiFungibleTransferFailed {
                        reason: abort.to_string(),
                    });
                }
                journal.record(LedgerEntry::SemiFungible {
                    token: *asset,
                    id: *id,
                    amount: *amount,
                });
            }
        }

        if let Err(err) = self.ledger.apply(&journal) {
            port.rollback();
            return Err(err);
        }
        port.commit();

        tracing::info!(
            token = %asset,
            recipients = recipients.len(),
            batched,
            "semi-fungible batch disbursed"
        );
        let event = EngineEvent::SemiFungibleDisbursed(SemiFungibleDisbursed {
            batch_id: Uuid::now_v7(),
            caller: *caller,
            token: *asset,
            recipients: recipients.to_vec(),
            amounts: amounts.to_vec(),
            ids: ids.to_vec(),
            batched,
        });
        self.events.push(event.clone());
        Ok(event)
    }

    // ───────────────────────── Pause ─────────────────────────

    /// Pause the engine. Owner-only; no-op if already paused.
    pub fn pause(&mut self, caller: &Address) -> Result<(), EngineError> {
        self.owner.require(caller)?;
        if self.pause.is_paused() {
            return Ok(());
        }
        self.pause.pause();
        tracing::warn!(by = %caller, "engine paused");
        self.events
            .push(EngineEvent::EnginePaused(EnginePaused { by: *caller }));
        Ok(())
    }

    /// Unpause the engine. Owner-only; no-op if already active.
    pub fn unpause(&mut self, caller: &Address) -> Result<(), EngineError> {
        self.owner.require(caller)?;
        if !self.pause.is_paused() {
            return Ok(());
        }
        self.pause.unpause();
        tracing::info!(by = %caller, "engine unpaused");
        self.events
            .push(EngineEvent::EngineUnpaused(EngineUnpaused { by: *caller }));
        Ok(())
    }

    /// Check if the engine is paused.
    pub fn is_paused(&self) -> bool {
        self.pause.is_paused()
    }

    // ───────────────────────── Ownership ─────────────────────────

    /// Hand engine ownership to a new principal. Owner-only.
    pub fn transfer_ownership(
        &mut self,
        caller: &Address,
        new_owner: Address,
    ) -> Result<(), EngineError> {
        let previous = *self.owner.owner();
        self.owner.hand_over(caller, new_owner)?;
        tracing::info!(previous = %previous, new_owner = %new_owner, "ownership transferred");
        self.events
            .push(EngineEvent::OwnershipTransferred(OwnershipTransferred {
                previous,
                new_owner,
            }));
        Ok(())
    }

    /// The current owner.
    pub fn owner(&self) -> &Address {
        self.owner.owner()
    }

    /// The engine's own account address.
    pub fn address(&self) -> &Address {
        &self.address
    }

    // ───────────────────────── Recovery ─────────────────────────
    //
    // Recovery stays available while paused: an emergency pause must
    // not lock stranded assets inside the engine. The ledger is never
    // touched here — recovery moves the engine's own balance, not
    // amounts disbursed for callers.

    /// Sweep all native currency held by the engine to the owner.
    /// Owner-only.
    pub fn recover_native(
        &mut self,
        port: &mut dyn NativePort,
        caller: &Address,
    ) -> Result<EngineEvent, EngineError> {
        self.owner.require(caller)?;
        self.enter()?;
        let result = self.native_recovery(port);
        self.reentrancy.exit();
        result
    }

    /// Sweep the engine's whole balance of one fungible token to the
    /// owner. Owner-only.
    pub fn recover_fungible(
        &mut self,
        port: &mut dyn FungiblePort,
        asset: &Address,
        caller: &Address,
    ) -> Result<EngineEvent, EngineError> {
        self.owner.require(caller)?;
        self.enter()?;
        let result = self.fungible_recovery(port, asset);
        self.reentrancy.exit();
        result
    }

    /// Sweep the engine's balance of one semi-fungible `(asset, id)`
    /// pair to the owner. Owner-only.
    pub fn recover_semi_fungible(
        &mut self,
        port: &mut dyn SemiFungiblePort,
        asset: &Address,
        id: TokenId,
        caller: &Address,
    ) -> Result<EngineEvent, EngineError> {
        self.owner.require(caller)?;
        self.enter()?;
        let result = self.semi_fungible_recovery(port, asset, id);
        self.reentrancy.exit();
        result
    }

    /// Sweep the engine's balances of a set of semi-fungible ids to the
    /// owner in one batched transfer. Succeeds when at least one id has
    /// a positive balance; zero-balance ids stay in the call with
    /// amount zero. Owner-only.
    pub fn recover_semi_fungible_batch(
        &mut self,
        port: &mut dyn SemiFungiblePort,
        asset: &Address,
        ids: &[TokenId],
        caller: &Address,
    ) -> Result<EngineEvent, EngineError> {
        self.owner.require(caller)?;
        self.enter()?;
        let result = self.semi_fungible_batch_recovery(port, asset, ids);
        self.reentrancy.exit();
        result
    }

    fn native_recovery(&mut self, port: &mut dyn NativePort) -> Result<EngineEvent, EngineError> {
        let owner = *self.owner.owner();
        let held = port.balance_of(&self.address);
        if held == 0 {
            return Err(EngineError::NoAssetToWithdraw);
        }
        let limit = self.forward_limit;
        port.send(self, &owner, held, limit)
            .map_err(|abort| EngineError::NativeTransferFailed {
                reason: abort.to_string(),
            })?;

        tracing::info!(amount = %held, "native balance recovered");
        let event = EngineEvent::AssetRecovered(AssetRecovered {
            asset: AssetRef::Native,
            id: None,
            to: owner,
            amount: held,
        });
        self.events.push(event.clone());
        Ok(event)
    }

    fn fungible_recovery(
        &mut self,
        port: &mut dyn FungiblePort,
        asset: &Address,
    ) -> Result<EngineEvent, EngineError> {
        let owner = *self.owner.owner();
        let held = port.balance_of(&self.address);
        if held == 0 {
            return Err(EngineError::NoAssetToWithdraw);
        }
        port.transfer(&owner, held)
            .map_err(|abort| EngineError::FungibleTransferFailed {
                reason: abort.to_string(),
            })?;

        tracing::info!(token = %asset, amount = %held, "fungible balance recovered");
        let event = EngineEvent::AssetRecovered(AssetRecovered {
            asset: AssetRef::Fungible(*asset),
            id: None,
            to: owner,
            amount: held,
        });
        self.events.push(event.clone());
        Ok(event)
    }

    fn semi_fungible_recovery(
        &mut self,
        port: &mut dyn SemiFungiblePort,
        asset: &Address,
        id: TokenId,
    ) -> Result<EngineEvent, EngineError> {
        let me = self.address;
        let owner = *self.owner.owner();
        let held = port.balance_of(&me, id);
        if held == 0 {
            return Err(EngineError::NoAssetToWithdraw);
        }
        port.safe_transfer_from(self, &me, &owner, id, held)
            .map_err(|abort| EngineError::SemiFungibleTransferFailed {
                reason: abort.to_string(),
            })?;

        tracing::info!(token = %asset, id = %id, amount = %held, "semi-fungible balance recovered");
        let event = EngineEvent::AssetRecovered(AssetRecovered {
            asset: AssetRef::SemiFungible(*asset),
            id: Some(id),
            to: owner,
            amount: held,
        });
        self.events.push(event.clone());
        Ok(event)
    }

    fn semi_fungible_batch_recovery(
        &mut self,
        port: &mut dyn SemiFungiblePort,
        asset: &Address,
        ids: &[TokenId],
    ) -> Result<EngineEvent, EngineError> {
        if ids.is_empty() {
            return Err(EngineError::EmptyBatch);
        }
        let me = self.address;
        let owner = *self.owner.owner();
        let amounts: Vec<Amount> = ids.iter().map(|id| port.balance_of(&me, *id)).collect();
        if amounts.iter().all(|amount| *amount == 0) {
            return Err(EngineError::NoAssetToWithdraw);
        }
        port.safe_batch_transfer_from(self, &me, &owner, ids, &amounts)
            .map_err(|abort| EngineError::SemiFungibleTransferFailed {
                reason: abort.to_string(),
            })?;

        tracing::info!(token = %asset, ids = ids.len(), "semi-fungible batch recovered");
        let event = EngineEvent::AssetBatchRecovered(AssetBatchRecovered {
            asset: AssetRef::SemiFungible(*asset),
            to: owner,
            ids: ids.to_vec(),
            amounts,
        });
        self.events.push(event.clone());
        Ok(event)
    }

    // ───────────────────────── Read API ─────────────────────────

    /// Total native currency disbursed over the engine's lifetime.
    pub fn total_native_disbursed(&self) -> Amount {
        self.ledger.total_native()
    }

    /// Total units of one fungible token disbursed.
    pub fn total_fungible_disbursed(&self, asset: &Address) -> Amount {
        self.ledger.total_fungible(asset)
    }

    /// Total units of one semi-fungible `(asset, id)` pair disbursed.
    pub fn total_semi_fungible_disbursed(&self, asset: &Address, id: TokenId) -> Amount {
        self.ledger.total_semi_fungible(asset, id)
    }

    /// The configured native receiver resource limit.
    pub fn forward_limit(&self) -> u64 {
        self.forward_limit
    }

    /// Get all emitted events.
    pub fn events(&self) -> &[EngineEvent] {
        &self.events
    }

    /// Drain all events (consume and clear).
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    // ───────────────────────── Internal Guards ─────────────────────────

    fn check_active(&self) -> Result<(), EngineError> {
        if self.pause.is_paused() {
            return Err(EngineError::OperationPaused);
        }
        Ok(())
    }

    fn enter(&mut self) -> Result<(), EngineError> {
        if !self.reentrancy.try_enter() {
            return Err(EngineError::ReentrantCall);
        }
        Ok(())
    }
}
