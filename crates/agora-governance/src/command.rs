//! Typed command surface for the dashboard boundary.
//!
//! The reference front-ends marshalled loosely-typed, JSON-described
//! contract calls; here every operation is a [`Command`] variant carrying a
//! typed payload, dispatched through one exhaustive handler. The boundary
//! supplies the selected account as `caller` and its clock reading as
//! `now` with each dispatch.

use serde::{Deserialize, Serialize};

use agora_types::Address;

use crate::engine::{GovernanceEngine, ProposalView, VotePercentages};
use crate::error::GovernanceError;
use crate::proposal::VoteChoice;
use crate::ProposalId;

/// One variant per operation of the command/query surface.
///
/// Vote values use the wire encoding: -1 against, 0 abstain, +1 in favor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Command {
    RegisterVoter {
        address: Address,
        voting_power: u128,
        is_owner: bool,
    },
    CreateProposal {
        description: String,
        duration: u64,
    },
    Vote {
        proposal_id: ProposalId,
        value: i8,
    },
    DelegateVote {
        proposal_id: ProposalId,
        to: Address,
    },
    VoteByDelegate {
        proposal_id: ProposalId,
        on_behalf_of: Address,
        value: i8,
    },
    ExecuteProposal {
        proposal_id: ProposalId,
    },
    GetProposal {
        proposal_id: ProposalId,
    },
    GetVotingPercentages {
        proposal_id: ProposalId,
    },
}

/// Result of a successfully dispatched command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandOutput {
    /// Mutation applied, nothing to return
    Ack,
    /// Id assigned to a newly created proposal
    ProposalId(ProposalId),
    /// Full proposal record
    Proposal(ProposalView),
    /// Weighted tally percentages
    Percentages(VotePercentages),
}

impl GovernanceEngine {
    /// Dispatch one boundary command against the engine.
    pub fn dispatch(
        &self,
        caller: Address,
        command: Command,
        now: u64,
    ) -> Result<CommandOutput, GovernanceError> {
        match command {
            Command::RegisterVoter {
                address,
                voting_power,
                is_owner,
            } => {
                self.register_voter(caller, address, voting_power, is_owner)?;
                Ok(CommandOutput::Ack)
            }
            Command::CreateProposal {
                description,
                duration,
            } => {
                let id = self.create_proposal(caller, description, duration, now)?;
                Ok(CommandOutput::ProposalId(id))
            }
            Command::Vote { proposal_id, value } => {
                let choice = VoteChoice::from_value(value)?;
                self.vote(proposal_id, caller, choice, now)?;
                Ok(CommandOutput::Ack)
            }
            Command::DelegateVote { proposal_id, to } => {
                self.delegate_vote(proposal_id, caller, to, now)?;
                Ok(CommandOutput::Ack)
            }
            Command::VoteByDelegate {
                proposal_id,
                on_behalf_of,
                value,
            } => {
                let choice = VoteChoice::from_value(value)?;
                self.vote_by_delegate(proposal_id, caller, on_behalf_of, choice, now)?;
                Ok(CommandOutput::Ack)
            }
            Command::ExecuteProposal { proposal_id } => {
                self.execute_proposal(proposal_id, now)?;
                Ok(CommandOutput::Ack)
            }
            Command::GetProposal { proposal_id } => {
                Ok(CommandOutput::Proposal(self.get_proposal(proposal_id)?))
            }
            Command::GetVotingPercentages { proposal_id } => Ok(CommandOutput::Percentages(
                self.voting_percentages(proposal_id)?,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn test_address(n: u8) -> Address {
        let mut addr = [0u8; 20];
        addr[19] = n;
        Address::from_bytes(addr)
    }

    #[test]
    fn test_dispatch_full_flow() {
        let engine = GovernanceEngine::new();
        let alice = test_address(1);
        let bob = test_address(2);

        for (addr, power) in [(alice, 10u128), (bob, 5)] {
            let out = engine
                .dispatch(
                    addr,
                    Command::RegisterVoter {
                        address: addr,
                        voting_power: power,
                        is_owner: false,
                    },
                    0,
                )
                .unwrap();
            assert_eq!(out, CommandOutput::Ack);
        }

        let out = engine
            .dispatch(
                alice,
                Command::CreateProposal {
                    description: "Upgrade".to_string(),
                    duration: 3600,
                },
                1000,
            )
            .unwrap();
        assert_eq!(out, CommandOutput::ProposalId(1));

        engine
            .dispatch(
                alice,
                Command::Vote {
                    proposal_id: 1,
                    value: 1,
                },
                1001,
            )
            .unwrap();
        engine
            .dispatch(bob, Command::DelegateVote { proposal_id: 1, to: alice }, 1002)
            .unwrap();
        engine
            .dispatch(
                alice,
                Command::VoteByDelegate {
                    proposal_id: 1,
                    on_behalf_of: bob,
                    value: -1,
                },
                1003,
            )
            .unwrap();

        let out = engine
            .dispatch(alice, Command::GetProposal { proposal_id: 1 }, 1004)
            .unwrap();
        match out {
            CommandOutput::Proposal(view) => {
                assert_eq!(view.votes_for, 10);
                assert_eq!(view.votes_against, 5);
                assert_eq!(view.vote_count, 2);
            }
            other => panic!("unexpected output: {:?}", other),
        }

        engine
            .dispatch(alice, Command::ExecuteProposal { proposal_id: 1 }, 5000)
            .unwrap();

        let out = engine
            .dispatch(
                alice,
                Command::GetVotingPercentages { proposal_id: 1 },
                5001,
            )
            .unwrap();
        assert_eq!(
            out,
            CommandOutput::Percentages(VotePercentages {
                in_favor: 66,
                against: 33,
                abstained: 0
            })
        );
    }

    #[test]
    fn test_dispatch_rejects_bad_wire_value() {
        let engine = GovernanceEngine::new();
        let alice = test_address(1);

        engine
            .dispatch(
                alice,
                Command::RegisterVoter {
                    address: alice,
                    voting_power: 10,
                    is_owner: false,
                },
                0,
            )
            .unwrap();
        engine
            .dispatch(
                alice,
                Command::CreateProposal {
                    description: "Upgrade".to_string(),
                    duration: 60,
                },
                0,
            )
            .unwrap();

        let err = engine
            .dispatch(
                alice,
                Command::Vote {
                    proposal_id: 1,
                    value: 2,
                },
                1,
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_command_json_shape() {
        let cmd = Command::RegisterVoter {
            address: test_address(1),
            voting_power: 10,
            is_owner: true,
        };

        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("\"op\":\"registerVoter\""));
        assert!(json.contains("votingPower"));
        assert!(json.contains("isOwner"));

        let back: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(cmd, back);
    }

    #[test]
    fn test_vote_command_json_roundtrip() {
        let json = r#"{"op":"vote","proposalId":3,"value":-1}"#;
        let cmd: Command = serde_json::from_str(json).unwrap();
        assert_eq!(
            cmd,
            Command::Vote {
                proposal_id: 3,
                value: -1
            }
        );
    }
}
