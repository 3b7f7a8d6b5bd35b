//! Per-proposal vote delegation.
//!
//! A delegation grants one voter the right to cast another voter's single
//! vote for one specific proposal. Chains are resolved transitively, so the
//! delegate at the end of a chain acts for every delegator along it.

use std::collections::{HashMap, HashSet};

use agora_types::Address;

use crate::error::GovernanceError;
use crate::ProposalId;

/// Delegation graph: `(proposal, delegator) -> delegate` edges.
///
/// Identity validity (both ends registered) and proposal openness are
/// enforced by the engine, which owns the registry and proposal store.
#[derive(Debug)]
pub struct DelegationGraph {
    /// (proposal, delegator) -> delegate
    edges: HashMap<(ProposalId, Address), Address>,
    /// (proposal, delegate) -> delegators (reverse lookup)
    delegates: HashMap<(ProposalId, Address), Vec<Address>>,
    /// Maximum chain length followed during resolution
    max_depth: usize,
}

impl DelegationGraph {
    /// Create a new delegation graph.
    pub fn new() -> Self {
        Self {
            edges: HashMap::new(),
            delegates: HashMap::new(),
            max_depth: 10,
        }
    }

    /// Create with custom max chain depth.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Record or overwrite the delegate for `(proposal, from)`.
    ///
    /// # Errors
    /// - `SelfDelegation` if `from == to`
    /// - `DelegationCycle` if the edge would close a delegation loop
    pub fn delegate(
        &mut self,
        proposal: ProposalId,
        from: Address,
        to: Address,
    ) -> Result<(), GovernanceError> {
        if from == to {
            return Err(GovernanceError::SelfDelegation);
        }

        if self.would_create_cycle(proposal, from, to) {
            return Err(GovernanceError::DelegationCycle);
        }

        // Re-delegation overwrites: drop the old reverse-lookup entry first.
        if let Some(previous) = self.edges.insert((proposal, from), to) {
            if let Some(delegators) = self.delegates.get_mut(&(proposal, previous)) {
                delegators.retain(|d| *d != from);
            }
        }

        self.delegates.entry((proposal, to)).or_default().push(from);

        Ok(())
    }

    /// Check whether adding `from -> to` would close a loop for `proposal`.
    fn would_create_cycle(&self, proposal: ProposalId, from: Address, to: Address) -> bool {
        let mut visited = HashSet::new();
        visited.insert(from);

        let mut current = to;
        for _ in 0..self.max_depth {
            if visited.contains(&current) {
                return true;
            }
            visited.insert(current);

            match self.edges.get(&(proposal, current)) {
                Some(next) => current = *next,
                None => break,
            }
        }

        false
    }

    /// Direct delegate for a voter on one proposal, or none.
    pub fn resolve(&self, proposal: ProposalId, voter: &Address) -> Option<Address> {
        self.edges.get(&(proposal, *voter)).copied()
    }

    /// Terminal delegate at the end of the voter's delegation chain.
    ///
    /// Returns `None` when the voter has not delegated for this proposal.
    /// The walk is depth-bounded; `delegate` keeps the graph acyclic.
    pub fn resolve_terminal(&self, proposal: ProposalId, voter: &Address) -> Option<Address> {
        let mut current = self.resolve(proposal, voter)?;

        let mut visited = HashSet::new();
        visited.insert(*voter);

        for _ in 0..self.max_depth {
            if visited.contains(&current) {
                break;
            }
            visited.insert(current);

            match self.edges.get(&(proposal, current)) {
                Some(next) => current = *next,
                None => break,
            }
        }

        Some(current)
    }

    /// Direct delegators of a delegate for one proposal.
    pub fn delegators_of(&self, proposal: ProposalId, delegate: &Address) -> Vec<Address> {
        self.delegates
            .get(&(proposal, *delegate))
            .cloned()
            .unwrap_or_default()
    }

    /// Check whether a voter has delegated for a proposal.
    pub fn is_delegating(&self, proposal: ProposalId, voter: &Address) -> bool {
        self.edges.contains_key(&(proposal, *voter))
    }
}

impl Default for DelegationGraph {
    fn default() -> Self {
        Self::new()
    }
}
