use crate::ProposalId;
use agora_types::Address;
use thiserror::Error;

/// Errors that can occur in governance operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GovernanceError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Proposal not found: {0}")]
    ProposalNotFound(ProposalId),

    #[error("Voter not registered: {0}")]
    UnknownVoter(Address),

    #[error("Voting on proposal {0} is closed")]
    ProposalClosed(ProposalId),

    #[error("Voting on proposal {0} is still open")]
    VotingStillOpen(ProposalId),

    #[error("Proposal {0} already executed")]
    AlreadyExecuted(ProposalId),

    #[error("Voter {voter} already voted on proposal {proposal}")]
    DuplicateVote { proposal: ProposalId, voter: Address },

    #[error("Self-delegation not allowed")]
    SelfDelegation,

    #[error("Delegation cycle detected")]
    DelegationCycle,

    #[error("{caller} is not the delegate of {delegator}")]
    NotDelegate { caller: Address, delegator: Address },

    #[error("Owner privileges required for {0}")]
    OwnerRequired(&'static str),
}

/// Broad failure classes for boundary-layer translation.
///
/// No class is retryable as-is: `InvalidInput` needs different arguments,
/// `Conflict` means the state already forbids the request, and
/// `TemporalViolation` only clears once time advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    Conflict,
    Unauthorized,
    TemporalViolation,
}

impl GovernanceError {
    /// Classify this error into its failure taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GovernanceError::InvalidInput(_) => ErrorKind::InvalidInput,
            GovernanceError::ProposalNotFound(_) | GovernanceError::UnknownVoter(_) => {
                ErrorKind::NotFound
            }
            GovernanceError::DuplicateVote { .. }
            | GovernanceError::AlreadyExecuted(_)
            | GovernanceError::SelfDelegation
            | GovernanceError::DelegationCycle => ErrorKind::Conflict,
            GovernanceError::NotDelegate { .. } | GovernanceError::OwnerRequired(_) => {
                ErrorKind::Unauthorized
            }
            GovernanceError::ProposalClosed(_) | GovernanceError::VotingStillOpen(_) => {
                ErrorKind::TemporalViolation
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GovernanceError::ProposalNotFound(7);
        assert!(err.to_string().contains("7"));

        let err = GovernanceError::DuplicateVote {
            proposal: 1,
            voter: Address::from_bytes([1u8; 20]),
        };
        assert!(err.to_string().contains("already voted"));
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            GovernanceError::InvalidInput("x".to_string()).kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(GovernanceError::ProposalNotFound(1).kind(), ErrorKind::NotFound);
        assert_eq!(GovernanceError::SelfDelegation.kind(), ErrorKind::Conflict);
        assert_eq!(GovernanceError::AlreadyExecuted(1).kind(), ErrorKind::Conflict);
        assert_eq!(
            GovernanceError::OwnerRequired("registerVoter").kind(),
            ErrorKind::Unauthorized
        );
        assert_eq!(GovernanceError::ProposalClosed(1).kind(), ErrorKind::TemporalViolation);
        assert_eq!(GovernanceError::VotingStillOpen(1).kind(), ErrorKind::TemporalViolation);
    }
}
