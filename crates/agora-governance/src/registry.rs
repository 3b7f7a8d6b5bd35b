//! Voter registry: known identities, voting weight, owner flags.

use std::collections::HashMap;

use agora_types::Address;

use crate::error::GovernanceError;

/// A registered voter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voter {
    /// Account address on the hosting ledger
    pub address: Address,
    /// Weight applied when a vote is cast. Zero is valid and models a
    /// delegation-only participant.
    pub voting_power: u128,
    /// Owners may be required to gate registration and proposal creation,
    /// depending on engine policy.
    pub is_owner: bool,
}

/// Registry of known voters.
///
/// Registration is an upsert: re-registering an address overwrites its
/// weight and owner flag. No authorization check lives at this layer.
#[derive(Debug, Default)]
pub struct VoterRegistry {
    voters: HashMap<Address, Voter>,
}

impl VoterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a voter record.
    pub fn register(
        &mut self,
        address: Address,
        voting_power: u128,
        is_owner: bool,
    ) -> Result<(), GovernanceError> {
        if address.is_zero() {
            return Err(GovernanceError::InvalidInput(
                "voter address must not be the zero address".to_string(),
            ));
        }

        self.voters.insert(
            address,
            Voter {
                address,
                voting_power,
                is_owner,
            },
        );

        Ok(())
    }

    /// Get a voter record.
    pub fn get(&self, address: &Address) -> Option<&Voter> {
        self.voters.get(address)
    }

    /// Check whether an address is registered.
    pub fn contains(&self, address: &Address) -> bool {
        self.voters.contains_key(address)
    }

    /// Current voting weight for an address.
    pub fn voting_power(&self, address: &Address) -> Result<u128, GovernanceError> {
        self.voters
            .get(address)
            .map(|v| v.voting_power)
            .ok_or(GovernanceError::UnknownVoter(*address))
    }

    /// Whether an address is a registered owner. Unregistered addresses
    /// are never owners.
    pub fn is_owner(&self, address: &Address) -> bool {
        self.voters.get(address).map(|v| v.is_owner).unwrap_or(false)
    }

    /// Number of registered voters.
    pub fn len(&self) -> usize {
        self.voters.len()
    }

    /// Check whether the registry has no voters.
    pub fn is_empty(&self) -> bool {
        self.voters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_address(n: u8) -> Address {
        let mut addr = [0u8; 20];
        addr[19] = n;
        Address::from_bytes(addr)
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = VoterRegistry::new();
        let alice = test_address(1);

        registry.register(alice, 10, false).unwrap();

        assert!(registry.contains(&alice));
        assert_eq!(registry.voting_power(&alice).unwrap(), 10);
        assert!(!registry.is_owner(&alice));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_zero_address_fails() {
        let mut registry = VoterRegistry::new();

        let result = registry.register(Address::ZERO, 10, false);
        assert!(matches!(result, Err(GovernanceError::InvalidInput(_))));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_reregistration_overwrites() {
        let mut registry = VoterRegistry::new();
        let alice = test_address(1);

        registry.register(alice, 10, false).unwrap();
        registry.register(alice, 25, true).unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.voting_power(&alice).unwrap(), 25);
        assert!(registry.is_owner(&alice));
    }

    #[test]
    fn test_zero_power_voter_is_valid() {
        let mut registry = VoterRegistry::new();
        let alice = test_address(1);

        registry.register(alice, 0, false).unwrap();
        assert_eq!(registry.voting_power(&alice).unwrap(), 0);
    }

    #[test]
    fn test_unknown_voter() {
        let registry = VoterRegistry::new();
        let alice = test_address(1);

        assert!(!registry.contains(&alice));
        assert!(!registry.is_owner(&alice));
        assert!(matches!(
            registry.voting_power(&alice),
            Err(GovernanceError::UnknownVoter(_))
        ));
    }
}
