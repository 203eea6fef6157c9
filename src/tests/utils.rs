use crate::config::Config;
use crate::coordinator::{ActionCoordinator, CreatePollRequest, VoteRequest};
use crate::verifier::{MembershipVerifier, ProofData, VerificationRequest, VerifierError};
use crate::{Address, Nullifier, PollId, Root};

pub const QUESTION: &str = "Do you love blockchain?";

/// Verifier stub driven entirely by the test scenario.
pub enum MockVerifier
{
    AcceptAll,
    RejectAll,
    Unavailable,
}

impl MembershipVerifier for MockVerifier
{
    fn verify(&self, _request: &VerificationRequest) -> Result<bool, VerifierError>
    {
        match self
        {
            MockVerifier::AcceptAll => Ok(true),
            MockVerifier::RejectAll => Ok(false),
            MockVerifier::Unavailable => Err(VerifierError::Unavailable("oracle offline".into())),
        }
    }
}

pub fn test_root() -> Root
{
    [7; 32]
}

pub fn nullifier(seed: u8) -> Nullifier
{
    [seed; 32]
}

pub fn address(seed: u8) -> Address
{
    [seed; 20]
}

pub fn proof() -> ProofData
{
    ProofData { pi_a: vec![0; 32], pi_b: vec![0; 64], pi_c: vec![0; 32] }
}

/// A coordinator with an accepting verifier and one published root.
pub fn coordinator() -> ActionCoordinator<MockVerifier>
{
    coordinator_with(MockVerifier::AcceptAll)
}

pub fn coordinator_with(verifier: MockVerifier) -> ActionCoordinator<MockVerifier>
{
    let coordinator = ActionCoordinator::new(Config::default(), verifier);
    coordinator.update_root(test_root());
    coordinator
}

pub fn create_request(nullifier_seed: u8) -> CreatePollRequest
{
    CreatePollRequest {
        question: QUESTION.into(),
        choices: vec!["Yes".into(), "No".into()],
        creator: address(1),
        root: test_root(),
        nullifier_hash: nullifier(nullifier_seed),
        proof: proof(),
    }
}

pub fn vote_request(poll_id: PollId, choice_index: u32, nullifier_seed: u8) -> VoteRequest
{
    VoteRequest {
        poll_id,
        choice_index,
        voter: address(2),
        root: test_root(),
        nullifier_hash: nullifier(nullifier_seed),
        proof: proof(),
    }
}
