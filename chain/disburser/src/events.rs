//! Audit records emitted by engine operations
//!
//! One summary record per successful batch, plus state-change
//! notifications for pause/unpause, ownership handover, and recovery.
//! Records are consumed by external observers for auditing; the engine
//! never reads them back.

use serde::{Deserialize, Serialize};
use types::prelude::*;
use uuid::Uuid;

/// Native currency batch completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeDisbursed {
    pub batch_id: Uuid,
    pub caller: Address,
    pub recipients: Vec<Address>,
    pub amounts: Vec<Amount>,
    /// Excess attached value returned to the caller.
    pub refunded: Amount,
}

/// Fungible token batch completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FungibleDisbursed {
    pub batch_id: Uuid,
    pub caller: Address,
    pub token: Address,
    pub recipients: Vec<Address>,
    pub amounts: Vec<Amount>,
    /// Residual balance swept back to the caller after the loop.
    pub swept: Amount,
}

/// Semi-fungible token batch completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemiFungibleDisbursed {
    pub batch_id: Uuid,
    pub caller: Address,
    pub token: Address,
    pub recipients: Vec<Address>,
    pub amounts: Vec<Amount>,
    pub ids: Vec<TokenId>,
    /// Whether the single-recipient batched transfer path was taken.
    pub batched: bool,
}

/// Engine entered the paused state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnginePaused {
    pub by: Address,
}

/// Engine returned to the active state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineUnpaused {
    pub by: Address,
}

/// A stranded engine-held balance was swept to the owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecovered {
    pub asset: AssetRef,
    /// Populated for single-id semi-fungible recovery.
    pub id: Option<TokenId>,
    pub to: Address,
    pub amount: Amount,
}

/// A set of semi-fungible ids was swept to the owner in one batched call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetBatchRecovered {
    pub asset: AssetRef,
    pub to: Address,
    pub ids: Vec<TokenId>,
    /// Engine-held balance per id at sweep time; zero-balance ids stay
    /// in the call with amount zero.
    pub amounts: Vec<Amount>,
}

/// Engine ownership handed to a new principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipTransferred {
    pub previous: Address,
    pub new_owner: Address,
}

/// Enum wrapper for all engine events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineEvent {
    NativeDisbursed(NativeDisbursed),
    FungibleDisbursed(FungibleDisbursed),
    SemiFungibleDisbursed(SemiFungibleDisbursed),
    EnginePaused(EnginePaused),
    EngineUnpaused(EngineUnpaused),
    AssetRecovered(AssetRecovered),
    AssetBatchRecovered(AssetBatchRecovered),
    OwnershipTransferred(OwnershipTransferred),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_disbursed_serde() {
        let event = NativeDisbursed {
            batch_id: Uuid::now_v7(),
            caller: Address::from_low_u64(1),
            recipients: vec![Address::from_low_u64(2), Address::from_low_u64(3)],
            amounts: vec![10, 20],
            refunded: 5,
        };
        let json = serde_json::to_string(&event).unwrap();
        let deserialized: NativeDisbursed = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deserialized);
    }

    #[test]
    fn test_semi_fungible_disbursed_serde() {
        let event = SemiFungibleDisbursed {
            batch_id: Uuid::now_v7(),
            caller: Address::from_low_u64(1),
            token: Address::from_low_u64(9),
            recipients: vec![Address::from_low_u64(2)],
            amounts: vec![30, 20],
            ids: vec![TokenId::new(1), TokenId::new(2)],
            batched: true,
        };
        let json = serde_json::to_string(&event).unwrap();
        let deserialized: SemiFungibleDisbursed = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deserialized);
    }

    #[test]
    fn test_engine_event_enum_variant() {
        let event = EngineEvent::AssetRecovered(AssetRecovered {
            asset: AssetRef::Native,
            id: None,
            to: Address::from_low_u64(1),
            amount: 100,
        });
        assert!(matches!(event, EngineEvent::AssetRecovered(_)));
    }

    #[test]
    fn test_batch_recovered_serde() {
        let event = AssetBatchRecovered {
            asset: AssetRef::SemiFungible(Address::from_low_u64(9)),
            to: Address::from_low_u64(1),
            ids: vec![TokenId::new(1), TokenId::new(2)],
            amounts: vec![5, 0],
        };
        let json = serde_json::to_string(&event).unwrap();
        let deserialized: AssetBatchRecovered = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deserialized);
    }
}
