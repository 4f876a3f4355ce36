//! Storage slot derivation for accrual records.

use alloy_primitives::{keccak256, Address, B256};

use super::params::SLOT_DOMAIN;

/// Key of `contract`'s accrual record within the system account's storage.
///
/// `keccak256(address_bytes ++ "parameters")`, where `address_bytes` is the
/// 20-byte canonical address. The key indexes the system account's namespace,
/// so a contract cannot reach its own record through `SSTORE`.
pub fn contract_slot(contract: &Address) -> B256 {
    let mut preimage = Vec::with_capacity(contract.len() + SLOT_DOMAIN.len());
    preimage.extend_from_slice(contract.as_slice());
    preimage.extend_from_slice(SLOT_DOMAIN.as_bytes());
    keccak256(&preimage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::b256;

    #[test]
    fn test_slot_matches_manual_preimage() {
        let contract = Address::with_last_byte(1);
        let mut preimage = [0u8; 30];
        preimage[19] = 1;
        preimage[20..].copy_from_slice(b"parameters");

        assert_eq!(contract_slot(&contract), keccak256(preimage));
    }

    #[test]
    fn test_slot_golden_vector() {
        assert_eq!(
            contract_slot(&Address::with_last_byte(1)),
            b256!("338d67ae22a136cd5cb18a455adf762ef8e8bd269e02c92142c187471d8a61ef")
        );
    }

    #[test]
    fn test_slots_differ_per_contract() {
        let a = contract_slot(&Address::with_last_byte(1));
        let b = contract_slot(&Address::with_last_byte(2));
        assert_ne!(a, b);
        assert_ne!(a, B256::ZERO);
    }

    #[test]
    fn test_slot_is_stable() {
        let contract = Address::with_last_byte(7);
        assert_eq!(contract_slot(&contract), contract_slot(&contract));
    }
}
