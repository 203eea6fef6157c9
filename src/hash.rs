//! Keccak based field hashing for scope and signal derivation.
//!
//! The derivations here are part of the proof compatibility surface:
//! provers commit to the same values when generating membership proofs,
//! so any change to an input layout invalidates previously issued
//! proofs.

use sha3::{Digest, Keccak256};

use crate::{Address, ExternalNullifier, HashBytes, PollId};

const CREATE_POLL_TAG: &[u8] = b"create-poll";
const VOTE_TAG: &[u8] = b"vote";

/// The action kinds that derive distinct nullifier scopes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionKind
{
    /// Poll creation. Scoped to the application alone: the target poll
    /// does not exist yet, so one creation slot exists per identity.
    CreatePoll,

    /// Voting. Scoped per poll, so one identity votes once per poll
    /// without its nullifiers being linkable across polls.
    Vote,
}

/// The logical context an identity acts in: one application namespace,
/// one action kind, and the target poll for votes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActionScope<'a>
{
    /// The application namespace.
    pub app_id: &'a str,

    /// The action kind.
    pub kind: ActionKind,

    /// The target poll, for votes.
    pub poll_id: Option<PollId>,
}

impl ActionScope<'_>
{
    /// Derive the external nullifier for this scope: keccak256 over the
    /// namespace, the action tag and, for votes, the poll id, shifted
    /// into the scalar field.
    pub fn external_nullifier(&self) -> ExternalNullifier
    {
        let mut hasher = Keccak256::new();
        hasher.update(self.app_id.as_bytes());
        match self.kind
        {
            ActionKind::CreatePoll => hasher.update(CREATE_POLL_TAG),
            ActionKind::Vote => hasher.update(VOTE_TAG),
        }
        if let Some(poll_id) = self.poll_id
        {
            hasher.update(poll_id.to_be_bytes());
        }
        shift_to_field(hasher.finalize().into())
    }
}

/// Hash arbitrary bytes onto the scalar field: keccak256 shifted right
/// by one byte so the result always fits below the BN254 modulus.
pub fn hash_to_field(input: &[u8]) -> HashBytes
{
    shift_to_field(Keccak256::digest(input).into())
}

/// Commit the public payload of a poll creation: the creator address.
pub fn creation_signal(creator: &Address) -> HashBytes
{
    hash_to_field(creator)
}

/// Commit the public payload of a vote: the voter address and the
/// chosen option index.
pub fn vote_signal(voter: &Address, choice_index: u32) -> HashBytes
{
    let mut input = [0u8; 24];
    input[..20].copy_from_slice(voter);
    input[20..].copy_from_slice(&choice_index.to_be_bytes());
    hash_to_field(&input)
}

fn shift_to_field(digest: HashBytes) -> HashBytes
{
    let mut bytes = [0u8; 32];
    bytes[1..].copy_from_slice(&digest[..31]);
    bytes
}
