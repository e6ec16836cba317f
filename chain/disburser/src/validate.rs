//! Shared batch precondition checks
//!
//! Every disburser runs the same shape checks before touching a
//! collaborator: parallel sequences pair up, the batch is non-empty,
//! the asset contract is real. Per-entry recipient and amount checks
//! run lazily inside each transfer loop, co-located with the entry
//! being processed.

use crate::errors::EngineError;
use types::prelude::*;

/// Verify that two parallel sequences pair up and the batch is non-empty.
pub fn check_batch_shape(recipients: &[Address], amounts: &[Amount]) -> Result<(), EngineError> {
    if recipients.len() != amounts.len() {
        return Err(EngineError::ArrayLengthMismatch {
            expected: recipients.len(),
            got: amounts.len(),
        });
    }
    if recipients.is_empty() {
        return Err(EngineError::EmptyBatch);
    }
    Ok(())
}

/// Verify that the id sequence pairs with the recipients as well.
pub fn check_id_shape(recipients: &[Address], ids: &[TokenId]) -> Result<(), EngineError> {
    if recipients.len() != ids.len() {
        return Err(EngineError::ArrayLengthMismatch {
            expected: recipients.len(),
            got: ids.len(),
        });
    }
    Ok(())
}

/// Verify that a referenced asset contract address is non-null.
pub fn check_asset(asset: &Address) -> Result<(), EngineError> {
    if asset.is_zero() {
        return Err(EngineError::ZeroAddress);
    }
    Ok(())
}

/// Per-entry check run inside the transfer loop: real recipient,
/// positive amount.
pub fn check_entry(recipient: &Address, amount: Amount) -> Result<(), EngineError> {
    if recipient.is_zero() {
        return Err(EngineError::ZeroAddress);
    }
    if amount == 0 {
        return Err(EngineError::ZeroAmount);
    }
    Ok(())
}

/// Checked sum of a batch's amounts.
pub fn batch_total(amounts: &[Amount]) -> Result<Amount, EngineError> {
    amounts
        .iter()
        .try_fold(0u128, |acc, a| acc.checked_add(*a))
        .ok_or(EngineError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u64) -> Address {
        Address::from_low_u64(n)
    }

    #[test]
    fn test_batch_shape_ok() {
        let recipients = vec![addr(1), addr(2)];
        let amounts = vec![10, 20];
        assert!(check_batch_shape(&recipients, &amounts).is_ok());
    }

    #[test]
    fn test_batch_shape_length_mismatch() {
        let recipients = vec![addr(1), addr(2)];
        let amounts = vec![10];
        assert_eq!(
            check_batch_shape(&recipients, &amounts),
            Err(EngineError::ArrayLengthMismatch {
                expected: 2,
                got: 1
            })
        );
    }

    #[test]
    fn test_batch_shape_empty() {
        assert_eq!(
            check_batch_shape(&[], &[]),
            Err(EngineError::EmptyBatch)
        );
    }

    #[test]
    fn test_id_shape_mismatch() {
        let recipients = vec![addr(1), addr(2)];
        let ids = vec![TokenId::new(1)];
        assert_eq!(
            check_id_shape(&recipients, &ids),
            Err(EngineError::ArrayLengthMismatch {
                expected: 2,
                got: 1
            })
        );
    }

    #[test]
    fn test_check_asset_zero() {
        assert_eq!(check_asset(&Address::ZERO), Err(EngineError::ZeroAddress));
        assert!(check_asset(&addr(5)).is_ok());
    }

    #[test]
    fn test_check_entry_zero_recipient() {
        assert_eq!(
            check_entry(&Address::ZERO, 10),
            Err(EngineError::ZeroAddress)
        );
    }

    #[test]
    fn test_check_entry_zero_amount() {
        assert_eq!(check_entry(&addr(1), 0), Err(EngineError::ZeroAmount));
    }

    #[test]
    fn test_batch_total() {
        assert_eq!(batch_total(&[1, 2, 3]).unwrap(), 6);
    }

    #[test]
    fn test_batch_total_overflow() {
        assert_eq!(
            batch_total(&[u128::MAX, 1]),
            Err(EngineError::Overflow)
        );
    }
}
