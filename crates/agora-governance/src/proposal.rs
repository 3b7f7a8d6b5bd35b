//! Proposal records, vote ledger, and tally arithmetic.
//!
//! A proposal moves through phases derived from its deadline and execution
//! flag: Open -> Expired -> Executed. Ballots are accepted only while Open,
//! execution only while Expired.

use std::collections::HashMap;

use agora_types::Address;

use crate::error::GovernanceError;
use crate::ProposalId;

/// Vote choice carried by a ballot.
/// Wire encoding: -1 against, 0 abstain, +1 in favor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteChoice {
    /// Vote in favor
    For,
    /// Vote against
    Against,
    /// Abstain (counted in the tally with the voter's weight)
    Abstain,
}

impl VoteChoice {
    /// Decode the wire value used by the dashboard boundary.
    pub fn from_value(value: i8) -> Result<Self, GovernanceError> {
        match value {
            1 => Ok(VoteChoice::For),
            -1 => Ok(VoteChoice::Against),
            0 => Ok(VoteChoice::Abstain),
            other => Err(GovernanceError::InvalidInput(format!(
                "vote value must be -1, 0 or 1, got {}",
                other
            ))),
        }
    }

    /// Wire encoding of this choice.
    pub fn value(&self) -> i8 {
        match self {
            VoteChoice::For => 1,
            VoteChoice::Against => -1,
            VoteChoice::Abstain => 0,
        }
    }
}

/// A recorded ballot. `weight` is the voter's power at cast time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteRecord {
    /// The voter whose single vote this ballot consumed. For delegated
    /// votes this is the delegator, not the delegate who cast it.
    pub voter: Address,
    /// The cast choice
    pub choice: VoteChoice,
    /// Voting weight snapshot at cast time
    pub weight: u128,
    /// Timestamp supplied with the cast
    pub cast_at: u64,
}

/// Proposal phase derived from deadline and execution flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalPhase {
    /// Accepting votes (`now < deadline`, not executed)
    Open,
    /// Deadline passed, awaiting execution
    Expired,
    /// Executed (terminal)
    Executed,
}

/// A votable proposal with its weighted tally and ballot ledger.
#[derive(Debug, Clone)]
pub struct Proposal {
    /// Unique sequential ID
    pub id: ProposalId,
    /// Free-text description, immutable after creation
    pub description: String,
    /// Timestamp the proposal was created at
    pub created_at: u64,
    /// Absolute deadline: creation time + requested duration
    pub deadline: u64,
    /// Weighted in-favor accumulator
    pub votes_for: u128,
    /// Weighted against accumulator
    pub votes_against: u128,
    /// Weighted abstain accumulator
    pub votes_abstained: u128,
    /// Number of distinct voting actions, regardless of weight
    pub vote_count: u64,
    /// Latched true by a successful execution
    pub executed: bool,
    /// Ballot per voter (the double-vote guard)
    ballots: HashMap<Address, VoteRecord>,
}

impl Proposal {
    fn new(id: ProposalId, description: String, created_at: u64, deadline: u64) -> Self {
        Self {
            id,
            description,
            created_at,
            deadline,
            votes_for: 0,
            votes_against: 0,
            votes_abstained: 0,
            vote_count: 0,
            executed: false,
            ballots: HashMap::new(),
        }
    }

    /// Phase of this proposal at `now`.
    pub fn phase(&self, now: u64) -> ProposalPhase {
        if self.executed {
            ProposalPhase::Executed
        } else if now >= self.deadline {
            ProposalPhase::Expired
        } else {
            ProposalPhase::Open
        }
    }

    /// Check whether the proposal still accepts votes at `now`.
    pub fn is_open(&self, now: u64) -> bool {
        self.phase(now) == ProposalPhase::Open
    }

    /// Check whether a voter already has a ballot on this proposal.
    pub fn has_voted(&self, voter: &Address) -> bool {
        self.ballots.contains_key(voter)
    }

    /// Get a voter's ballot, if any.
    pub fn ballot(&self, voter: &Address) -> Option<&VoteRecord> {
        self.ballots.get(voter)
    }

    /// Record a ballot. Validation happens before any mutation, so a
    /// failing call leaves the proposal untouched.
    pub(crate) fn record_vote(
        &mut self,
        voter: Address,
        choice: VoteChoice,
        weight: u128,
        now: u64,
    ) -> Result<(), GovernanceError> {
        if !self.is_open(now) {
            return Err(GovernanceError::ProposalClosed(self.id));
        }

        if self.has_voted(&voter) {
            return Err(GovernanceError::DuplicateVote {
                proposal: self.id,
                voter,
            });
        }

        match choice {
            VoteChoice::For => self.votes_for = self.votes_for.saturating_add(weight),
            VoteChoice::Against => self.votes_against = self.votes_against.saturating_add(weight),
            VoteChoice::Abstain => {
                self.votes_abstained = self.votes_abstained.saturating_add(weight)
            }
        }

        self.vote_count += 1;
        self.ballots.insert(
            voter,
            VoteRecord {
                voter,
                choice,
                weight,
                cast_at: now,
            },
        );

        Ok(())
    }

    /// Mark the proposal as executed. Only legal once the deadline has
    /// passed, and only once.
    pub(crate) fn execute(&mut self, now: u64) -> Result<(), GovernanceError> {
        if self.executed {
            return Err(GovernanceError::AlreadyExecuted(self.id));
        }

        if now < self.deadline {
            return Err(GovernanceError::VotingStillOpen(self.id));
        }

        self.executed = true;
        Ok(())
    }

    /// Total weight across all ballots.
    pub fn total_weight(&self) -> u128 {
        self.votes_for
            .saturating_add(self.votes_against)
            .saturating_add(self.votes_abstained)
    }

    /// Integer percentages `(for, against, abstained)` of the weighted
    /// tally. All zero when no weight was cast.
    pub fn percentages(&self) -> (u64, u64, u64) {
        let total = self.total_weight();
        if total == 0 {
            return (0, 0, 0);
        }

        (
            (self.votes_for * 100 / total) as u64,
            (self.votes_against * 100 / total) as u64,
            (self.votes_abstained * 100 / total) as u64,
        )
    }
}

/// Store assigning sequential ids and owning every proposal ever created.
/// Proposals are never deleted.
#[derive(Debug)]
pub struct ProposalStore {
    proposals: HashMap<ProposalId, Proposal>,
    next_id: ProposalId,
}

impl ProposalStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            proposals: HashMap::new(),
            next_id: 1,
        }
    }

    /// Create a proposal. `duration` must be at least one time unit.
    pub fn create(
        &mut self,
        description: String,
        duration: u64,
        now: u64,
    ) -> Result<ProposalId, GovernanceError> {
        if duration < 1 {
            return Err(GovernanceError::InvalidInput(
                "proposal duration must be at least 1".to_string(),
            ));
        }

        let id = self.next_id;
        self.next_id += 1;

        self.proposals
            .insert(id, Proposal::new(id, description, now, now + duration));

        Ok(id)
    }

    /// Get a proposal.
    pub fn get(&self, id: ProposalId) -> Result<&Proposal, GovernanceError> {
        self.proposals
            .get(&id)
            .ok_or(GovernanceError::ProposalNotFound(id))
    }

    /// Get a proposal mutably.
    pub(crate) fn get_mut(&mut self, id: ProposalId) -> Result<&mut Proposal, GovernanceError> {
        self.proposals
            .get_mut(&id)
            .ok_or(GovernanceError::ProposalNotFound(id))
    }

    /// Number of proposals ever created.
    pub fn count(&self) -> u64 {
        self.next_id - 1
    }
}

impl Default for ProposalStore {
    fn default() -> Self {
        Self::new()
    }
}
