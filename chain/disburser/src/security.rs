//! Shared security primitives for the engine
//!
//! Reusable guards consulted by every mutating entrypoint: call
//! exclusion (reentrancy), the pause killswitch, and the owner
//! capability gate.

use crate::errors::EngineError;
use types::address::Address;

/// Call-exclusion primitive preventing nested entry into guarded
/// operations.
///
/// An entrypoint enters the guard before any state-changing work and
/// exits it on completion, success or failure. The guard stays held
/// across every external collaborator invocation within the operation,
/// so a receive hook that calls back into the engine is rejected.
#[derive(Debug, Clone, Default)]
pub struct ReentrancyGuard {
    entered: bool,
}

impl ReentrancyGuard {
    /// Create a new, unheld guard.
    pub fn new() -> Self {
        Self { entered: false }
    }

    /// Try to enter the guarded region. Returns `false` when a guarded
    /// operation is already executing (a reentrant call).
    pub fn try_enter(&mut self) -> bool {
        if self.entered {
            return false;
        }
        self.entered = true;
        true
    }

    /// Leave the guarded region. Must run on every exit path.
    pub fn exit(&mut self) {
        self.entered = false;
    }

    /// Whether a guarded operation is currently executing.
    pub fn is_entered(&self) -> bool {
        self.entered
    }
}

/// Owner-toggled killswitch gating every disbursement entrypoint.
///
/// Recovery operations are deliberately not gated so stranded assets
/// stay reachable during an emergency pause.
#[derive(Debug, Clone, Default)]
pub struct PauseGuard {
    paused: bool,
}

impl PauseGuard {
    /// Create a new guard in the active (unpaused) state.
    pub fn new() -> Self {
        Self { paused: false }
    }

    /// Switch to the paused state. Idempotent.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Switch back to the active state. Idempotent.
    pub fn unpause(&mut self) {
        self.paused = false;
    }

    /// Check if currently paused.
    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

/// Single-owner capability gate.
///
/// The owner is fixed at construction and changes only through an
/// explicit handover. Every owner-only operation funnels through
/// [`OwnerGate::require`] so the check and its error kind live in one
/// place.
#[derive(Debug, Clone)]
pub struct OwnerGate {
    owner: Address,
}

impl OwnerGate {
    /// Create a gate held by `owner`.
    pub fn new(owner: Address) -> Self {
        Self { owner }
    }

    /// The current owner.
    pub fn owner(&self) -> &Address {
        &self.owner
    }

    /// Fail with `Unauthorized` unless `caller` is the owner.
    pub fn require(&self, caller: &Address) -> Result<(), EngineError> {
        if caller != &self.owner {
            return Err(EngineError::Unauthorized);
        }
        Ok(())
    }

    /// Hand the capability to a new owner. Owner-only; the zero address
    /// is rejected so the capability cannot be burned by accident.
    pub fn hand_over(&mut self, caller: &Address, new_owner: Address) -> Result<(), EngineError> {
        self.require(caller)?;
        if new_owner.is_zero() {
            return Err(EngineError::ZeroAddress);
        }
        self.owner = new_owner;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- ReentrancyGuard tests ---

    #[test]
    fn test_guard_enter_exit() {
        let mut guard = ReentrancyGuard::new();
        assert!(!guard.is_entered());
        assert!(guard.try_enter());
        assert!(guard.is_entered());
        guard.exit();
        assert!(!guard.is_entered());
    }

    #[test]
    fn test_guard_nested_enter_fails() {
        let mut guard = ReentrancyGuard::new();
        assert!(guard.try_enter());
        assert!(!guard.try_enter(), "Nested enter must fail");
    }

    #[test]
    fn test_guard_reenter_after_exit() {
        let mut guard = ReentrancyGuard::new();
        assert!(guard.try_enter());
        guard.exit();
        assert!(guard.try_enter(), "Should succeed after exit");
    }

    // --- PauseGuard tests ---

    #[test]
    fn test_pause_guard_cycle() {
        let mut pg = PauseGuard::new();
        assert!(!pg.is_paused());
        pg.pause();
        assert!(pg.is_paused());
        pg.unpause();
        assert!(!pg.is_paused());
    }

    #[test]
    fn test_pause_guard_idempotent() {
        let mut pg = PauseGuard::new();
        pg.pause();
        pg.pause();
        assert!(pg.is_paused());
        pg.unpause();
        pg.unpause();
        assert!(!pg.is_paused());
    }

    // --- OwnerGate tests ---

    #[test]
    fn test_owner_gate_require() {
        let owner = Address::from_low_u64(1);
        let stranger = Address::from_low_u64(2);
        let gate = OwnerGate::new(owner);
        assert!(gate.require(&owner).is_ok());
        assert_eq!(gate.require(&stranger), Err(EngineError::Unauthorized));
    }

    #[test]
    fn test_owner_gate_hand_over() {
        let alice = Address::from_low_u64(1);
        let bob = Address::from_low_u64(2);
        let mut gate = OwnerGate::new(alice);
        gate.hand_over(&alice, bob).unwrap();
        assert_eq!(gate.owner(), &bob);
        assert_eq!(gate.require(&alice), Err(EngineError::Unauthorized));
    }

    #[test]
    fn test_owner_gate_hand_over_unauthorized() {
        let alice = Address::from_low_u64(1);
        let eve = Address::from_low_u64(3);
        let mut gate = OwnerGate::new(alice);
        let result = gate.hand_over(&eve, eve);
        assert_eq!(result, Err(EngineError::Unauthorized));
        assert_eq!(gate.owner(), &alice);
    }

    #[test]
    fn test_owner_gate_rejects_zero_owner() {
        let alice = Address::from_low_u64(1);
        let mut gate = OwnerGate::new(alice);
        let result = gate.hand_over(&alice, Address::ZERO);
        assert_eq!(result, Err(EngineError::ZeroAddress));
        assert_eq!(gate.owner(), &alice);
    }
}
