//! Agora Governance - Voting, delegation and tally state machine.
//!
//! This crate provides:
//! - Voter registration with weight and owner flags
//! - Proposal lifecycle management (Open -> Expired -> Executed)
//! - Per-proposal vote delegation with transitive resolution
//! - Weighted tallies and percentage queries
//!
//! The [`GovernanceEngine`] façade owns all state behind a single handle:
//! every mutating command validates and applies as one atomic transition,
//! and queries observe a consistent snapshot. Time is always supplied by
//! the caller, never read internally.

pub mod command;
pub mod delegation;
pub mod engine;
pub mod error;
pub mod proposal;
pub mod registry;

/// Sequential proposal identifier, assigned from 1.
pub type ProposalId = u64;

pub use command::{Command, CommandOutput};
pub use delegation::DelegationGraph;
pub use engine::{GovernanceEngine, GovernancePolicy, ProposalView, VotePercentages};
pub use error::{ErrorKind, GovernanceError};
pub use proposal::{Proposal, ProposalPhase, ProposalStore, VoteChoice, VoteRecord};
pub use registry::{Voter, VoterRegistry};
