//! Governance engine: the command/query façade over registry, delegation
//! graph and proposal store.
//!
//! One engine instance owns all contract state; there is no process-wide
//! singleton. Mutating commands validate and apply under a single write
//! lock, so a precondition observed during validation cannot become false
//! before the effect lands. Queries read a consistent snapshot.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use agora_types::Address;

use crate::delegation::DelegationGraph;
use crate::error::GovernanceError;
use crate::proposal::{Proposal, ProposalStore, VoteChoice};
use crate::registry::{Voter, VoterRegistry};
use crate::ProposalId;

/// Authorization policy for owner-gated commands.
///
/// The reference deployment leaves registration and proposal creation
/// ungated, so both default to `false`. When registration is gated, the
/// first registration into an empty registry is still allowed so a fresh
/// engine can bootstrap its first owner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GovernancePolicy {
    /// Require `register_voter` callers to be registered owners
    pub owner_gated_registration: bool,
    /// Require `create_proposal` callers to be registered owners
    pub owner_gated_proposals: bool,
}

/// Read-only projection of a proposal returned by [`GovernanceEngine::get_proposal`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalView {
    pub id: ProposalId,
    pub description: String,
    pub deadline: u64,
    pub vote_count: u64,
    pub votes_for: u128,
    pub votes_against: u128,
    pub votes_abstained: u128,
    pub executed: bool,
}

impl ProposalView {
    fn from_proposal(proposal: &Proposal) -> Self {
        Self {
            id: proposal.id,
            description: proposal.description.clone(),
            deadline: proposal.deadline,
            vote_count: proposal.vote_count,
            votes_for: proposal.votes_for,
            votes_against: proposal.votes_against,
            votes_abstained: proposal.votes_abstained,
            executed: proposal.executed,
        }
    }
}

/// Weighted tally expressed as integer percentages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotePercentages {
    pub in_favor: u64,
    pub against: u64,
    pub abstained: u64,
}

#[derive(Debug, Default)]
struct EngineState {
    registry: VoterRegistry,
    delegations: DelegationGraph,
    proposals: ProposalStore,
}

/// The governance state machine behind the dashboard boundary.
///
/// Timestamps are supplied by the caller with every temporal command; the
/// engine never reads a clock, which keeps it deterministic and testable.
#[derive(Debug)]
pub struct GovernanceEngine {
    state: RwLock<EngineState>,
    policy: GovernancePolicy,
}

impl GovernanceEngine {
    /// Create an engine with the permissive default policy.
    pub fn new() -> Self {
        Self::with_policy(GovernancePolicy::default())
    }

    /// Create an engine with an explicit authorization policy.
    pub fn with_policy(policy: GovernancePolicy) -> Self {
        Self {
            state: RwLock::new(EngineState::default()),
            policy,
        }
    }

    /// The policy this engine was constructed with.
    pub fn policy(&self) -> GovernancePolicy {
        self.policy
    }

    /// Register a voter, or overwrite an existing registration.
    pub fn register_voter(
        &self,
        caller: Address,
        address: Address,
        voting_power: u128,
        is_owner: bool,
    ) -> Result<(), GovernanceError> {
        let mut state = self.state.write();

        // An empty registry accepts its first registration even when gated,
        // otherwise no owner could ever exist.
        if self.policy.owner_gated_registration
            && !state.registry.is_empty()
            && !state.registry.is_owner(&caller)
        {
            return Err(GovernanceError::OwnerRequired("registerVoter"));
        }

        state.registry.register(address, voting_power, is_owner)?;
        tracing::info!(
            "Registered voter {} (power {}, owner {})",
            address,
            voting_power,
            is_owner
        );
        Ok(())
    }

    /// Create a proposal and return its id.
    pub fn create_proposal(
        &self,
        caller: Address,
        description: String,
        duration: u64,
        now: u64,
    ) -> Result<ProposalId, GovernanceError> {
        let mut state = self.state.write();

        if self.policy.owner_gated_proposals && !state.registry.is_owner(&caller) {
            return Err(GovernanceError::OwnerRequired("createProposal"));
        }

        let id = state.proposals.create(description, duration, now)?;
        tracing::info!("Created proposal {} with deadline {}", id, now + duration);
        Ok(id)
    }

    /// Cast a direct vote with the voter's registered weight.
    ///
    /// Delegating away does not block a direct vote: whichever action is
    /// recorded first wins, the later one fails `DuplicateVote`.
    pub fn vote(
        &self,
        proposal: ProposalId,
        voter: Address,
        choice: VoteChoice,
        now: u64,
    ) -> Result<(), GovernanceError> {
        let mut state = self.state.write();

        let weight = state.registry.voting_power(&voter)?;
        state
            .proposals
            .get_mut(proposal)?
            .record_vote(voter, choice, weight, now)?;

        tracing::debug!(
            "Recorded vote {} by {} on proposal {} (weight {})",
            choice.value(),
            voter,
            proposal,
            weight
        );
        Ok(())
    }

    /// Delegate `from`'s vote on one proposal to `to`.
    pub fn delegate_vote(
        &self,
        proposal: ProposalId,
        from: Address,
        to: Address,
        now: u64,
    ) -> Result<(), GovernanceError> {
        let mut state = self.state.write();

        if from == to {
            return Err(GovernanceError::SelfDelegation);
        }
        if !state.registry.contains(&from) {
            return Err(GovernanceError::UnknownVoter(from));
        }
        if !state.registry.contains(&to) {
            return Err(GovernanceError::UnknownVoter(to));
        }
        if !state.proposals.get(proposal)?.is_open(now) {
            return Err(GovernanceError::ProposalClosed(proposal));
        }

        state.delegations.delegate(proposal, from, to)?;
        tracing::debug!("Delegated vote of {} to {} on proposal {}", from, to, proposal);
        Ok(())
    }

    /// Cast a vote on behalf of a delegator. The caller must be the
    /// terminal delegate of `on_behalf_of`'s chain for this proposal, and
    /// the ballot is attributed to `on_behalf_of` with their weight.
    pub fn vote_by_delegate(
        &self,
        proposal: ProposalId,
        caller: Address,
        on_behalf_of: Address,
        choice: VoteChoice,
        now: u64,
    ) -> Result<(), GovernanceError> {
        let mut state = self.state.write();

        match state.delegations.resolve_terminal(proposal, &on_behalf_of) {
            Some(delegate) if delegate == caller => {}
            _ => {
                return Err(GovernanceError::NotDelegate {
                    caller,
                    delegator: on_behalf_of,
                })
            }
        }

        let weight = state.registry.voting_power(&on_behalf_of)?;
        state
            .proposals
            .get_mut(proposal)?
            .record_vote(on_behalf_of, choice, weight, now)?;

        tracing::debug!(
            "Recorded delegated vote {} by {} for {} on proposal {}",
            choice.value(),
            caller,
            on_behalf_of,
            proposal
        );
        Ok(())
    }

    /// Mark an expired proposal as executed.
    pub fn execute_proposal(&self, proposal: ProposalId, now: u64) -> Result<(), GovernanceError> {
        let mut state = self.state.write();

        state.proposals.get_mut(proposal)?.execute(now)?;
        tracing::info!("Executed proposal {}", proposal);
        Ok(())
    }

    /// Full proposal record.
    pub fn get_proposal(&self, proposal: ProposalId) -> Result<ProposalView, GovernanceError> {
        let state = self.state.read();
        Ok(ProposalView::from_proposal(state.proposals.get(proposal)?))
    }

    /// Weighted tally as integer percentages.
    pub fn voting_percentages(
        &self,
        proposal: ProposalId,
    ) -> Result<VotePercentages, GovernanceError> {
        let state = self.state.read();
        let (in_favor, against, abstained) = state.proposals.get(proposal)?.percentages();
        Ok(VotePercentages {
            in_favor,
            against,
            abstained,
        })
    }

    /// Registered voter record, if any.
    pub fn get_voter(&self, address: &Address) -> Option<Voter> {
        self.state.read().registry.get(address).cloned()
    }

    /// Number of proposals ever created.
    pub fn proposal_count(&self) -> u64 {
        self.state.read().proposals.count()
    }
}

impl Default for GovernanceEngine {
    fn default() -> Self {
        Self::new()
    }
}
