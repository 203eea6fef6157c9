//! Orchestration of proof gated actions.
//!
//! Every action passes the same gate sequence: the referenced group
//! root must sit inside the accepted window, the request shape must be
//! valid, the membership proof must verify, and the scope nullifier
//! must be unconsumed. Only then is the mutation applied.
//!
//! Ordering invariants:
//! - the nullifier is reserved only after the proof verifies;
//! - verification runs with no store lock held, so a slow oracle call
//!   never serializes unrelated requests;
//! - for votes, the reservation happens under the target poll's lock
//!   and every precondition is re-checked there first, so the mutation
//!   that follows cannot fail and the reservation commits together
//!   with it. A vote rejected at any gate consumes nothing.
//! - lock order is poll entry, then ledger shard, never the reverse.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::Config;
use crate::error::Error;
use crate::hash::{creation_signal, vote_signal, ActionKind, ActionScope};
use crate::ledger::{Consumption, NullifierLedger};
use crate::poll::{Poll, PollProvider, PollRegistry};
use crate::roots::RootRegistry;
use crate::storage::Snapshot;
use crate::verifier::{MembershipVerifier, ProofData, VerificationRequest, VerifierError};
use crate::{Address, ExternalNullifier, HashBytes, Nullifier, PollId, Root, Timestamp};

/// A request to create a poll, carrying the membership proof material.
#[derive(Clone, Debug)]
pub struct CreatePollRequest
{
    /// The poll question.
    pub question: String,

    /// The ordered vote options.
    pub choices: Vec<String>,

    /// The creator address, committed into the proof as the signal.
    pub creator: Address,

    /// The group root the proof was generated against.
    pub root: Root,

    /// The prover's nullifier for the creation scope.
    pub nullifier_hash: Nullifier,

    /// The membership proof.
    pub proof: ProofData,
}

/// A request to vote on an open poll.
#[derive(Clone, Debug)]
pub struct VoteRequest
{
    /// The target poll.
    pub poll_id: PollId,

    /// The chosen option index.
    pub choice_index: u32,

    /// The voter address, committed into the proof with the choice.
    pub voter: Address,

    /// The group root the proof was generated against.
    pub root: Root,

    /// The prover's nullifier for this poll's vote scope.
    pub nullifier_hash: Nullifier,

    /// The membership proof.
    pub proof: ProofData,
}

/// The proof gated state machine over the three stores.
///
/// Holds no persistent state of its own; it is an orchestration layer
/// over the root registry, the nullifier ledger and the poll registry.
pub struct ActionCoordinator<V>
{
    config: Config,
    verifier: V,
    roots: RootRegistry,
    ledger: NullifierLedger,
    polls: PollRegistry,
}

impl<V: MembershipVerifier> ActionCoordinator<V>
{
    pub fn new(config: Config, verifier: V) -> ActionCoordinator<V>
    {
        let roots = RootRegistry::new(config.root_history_size);
        let ledger = NullifierLedger::new();
        let polls = PollRegistry::new(config.max_vote_options, config.max_question_length);
        ActionCoordinator { config, verifier, roots, ledger, polls }
    }

    /// Consume a root published by the external accumulator feed.
    pub fn update_root(&self, root: Root)
    {
        self.roots.update(root);
    }

    /// Point lookup of a poll.
    pub fn get_poll(&self, poll_id: PollId) -> Option<Poll>
    {
        self.polls.get(poll_id)
    }

    /// The number of polls ever created.
    pub fn poll_count(&self) -> usize
    {
        self.polls.count()
    }

    /// Create a new poll on behalf of a proven group member.
    ///
    /// The creation scope covers the whole application, so each
    /// identity holds a single creation slot.
    pub fn create_poll(&self, request: CreatePollRequest) -> Result<PollId, Error>
    {
        // Root gate.
        if !self.roots.is_accepted(&request.root) { Err(Error::StaleRoot)? }

        // Shape gate, before any nullifier is spent.
        self.polls.validate_creation(&request.question, &request.choices)?;

        let scope = ActionScope {
            app_id: &self.config.app_id,
            kind: ActionKind::CreatePoll,
            poll_id: None,
        };
        let external_nullifier = scope.external_nullifier();

        // Proof gate; no store lock is held across the oracle call.
        self.check_proof(
            request.root,
            creation_signal(&request.creator),
            request.nullifier_hash,
            external_nullifier,
            &request.proof
        )?;

        // Reservation gate.
        if self.ledger.try_consume(external_nullifier, request.nullifier_hash)
            == Consumption::AlreadyUsed
        {
            Err(Error::AlreadyUsed)?
        }

        // The shape was validated above, so the mutation cannot fail
        // and the reservation commits together with it.
        let poll_id = self.polls.create(
            request.question,
            request.choices,
            request.creator,
            now_ms()
        )?;

        tracing::info!(poll_id, "poll created");
        Ok(poll_id)
    }

    /// Record one vote on behalf of a proven group member.
    ///
    /// The vote scope is per poll: the same identity may vote once in
    /// each poll, and its nullifiers are unlinkable across polls.
    pub fn vote(&self, request: VoteRequest) -> Result<(), Error>
    {
        // Root gate.
        if !self.roots.is_accepted(&request.root) { Err(Error::StaleRoot)? }

        // Shape gate: the poll must exist, be open, and carry the
        // chosen option before the oracle is consulted.
        {
            let Some(poll) = self.polls.get(request.poll_id) else { return Err(Error::PollNotFound) };
            if !poll.is_open() { Err(Error::PollClosed)? }
            if request.choice_index as usize >= poll.choices.len() { Err(Error::InvalidChoice)? }
        }

        let scope = ActionScope {
            app_id: &self.config.app_id,
            kind: ActionKind::Vote,
            poll_id: Some(request.poll_id),
        };
        let external_nullifier = scope.external_nullifier();

        // Proof gate; no store lock is held across the oracle call.
        self.check_proof(
            request.root,
            vote_signal(&request.voter, request.choice_index),
            request.nullifier_hash,
            external_nullifier,
            &request.proof
        )?;

        // Atomic phase: re-check under the poll's own lock, reserve the
        // nullifier, and apply the increment before the lock drops.
        let entry = self.polls.entry(request.poll_id)?;
        let mut poll = entry.lock().unwrap_or_else(|e| e.into_inner());

        if !poll.is_open() { Err(Error::PollClosed)? }
        if request.choice_index as usize >= poll.choices.len() { Err(Error::InvalidChoice)? }

        if self.ledger.try_consume(external_nullifier, request.nullifier_hash)
            == Consumption::AlreadyUsed
        {
            Err(Error::AlreadyUsed)?
        }

        poll.record_vote(request.choice_index)?;

        tracing::info!(poll_id = request.poll_id, choice = request.choice_index, "vote recorded");
        Ok(())
    }

    /// Close a poll. Restricted to the creator; not proof gated, since
    /// the creator authenticates by address.
    pub fn close_poll(&self, poll_id: PollId, requester: &Address) -> Result<(), Error>
    {
        self.polls.close(poll_id, requester)?;
        tracing::info!(poll_id, "poll closed");
        Ok(())
    }

    /// Point-in-time image of every persisted store.
    pub fn snapshot(&self) -> Snapshot
    {
        Snapshot {
            polls: self.polls.snapshot(),
            nullifiers: self.ledger.snapshot(),
            roots: self.roots.snapshot(),
        }
    }

    /// Rebuild a coordinator from a snapshot taken with
    /// [`ActionCoordinator::snapshot`].
    pub fn restore(config: Config, verifier: V, snapshot: Snapshot) -> ActionCoordinator<V>
    {
        let roots = RootRegistry::restore(config.root_history_size, snapshot.roots);
        let ledger = NullifierLedger::restore(snapshot.nullifiers);
        let polls = PollRegistry::restore(
            config.max_vote_options,
            config.max_question_length,
            snapshot.polls
        );
        ActionCoordinator { config, verifier, roots, ledger, polls }
    }

    fn check_proof(
        &self,
        root: Root,
        signal_hash: HashBytes,
        nullifier_hash: Nullifier,
        external_nullifier: ExternalNullifier,
        proof: &ProofData
    ) -> Result<(), Error>
    {
        let request = VerificationRequest {
            root,
            signal_hash,
            nullifier_hash,
            external_nullifier,
            proof: proof.clone(),
        };

        match self.verifier.verify(&request)
        {
            Ok(true) => Ok(()),
            Ok(false) =>
            {
                tracing::debug!("membership proof rejected");
                Err(Error::InvalidProof)
            }
            Err(VerifierError::MalformedProof) => Err(Error::InvalidProof),
            Err(fault) =>
            {
                tracing::warn!(%fault, "verifier fault");
                Err(Error::VerifierUnavailable)
            }
        }
    }
}

fn now_ms() -> Timestamp
{
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}
