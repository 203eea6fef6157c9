//! Proof verification capability consumed by the action coordinator.
//!
//! The proving system is external: this module fixes the call contract
//! and leaves the pairing math to implementations. Swapping the proof
//! system means swapping the [`MembershipVerifier`] implementation and
//! nothing else.

pub mod groth16;
pub mod timeout;

pub use groth16::{Groth16Verifier, VerifyKey};
pub use timeout::TimedVerifier;

use crate::{ExternalNullifier, HashBytes, Nullifier, Root};

/// A serialized groth16 proof.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProofData
{
    pub pi_a: Vec<u8>,
    pub pi_b: Vec<u8>,
    pub pi_c: Vec<u8>,
}

/// One proof check as submitted to the oracle.
#[derive(Clone, Debug)]
pub struct VerificationRequest
{
    /// The group root the proof was generated against.
    pub root: Root,

    /// The hash of the committed public signal.
    pub signal_hash: HashBytes,

    /// The nullifier the prover derived for this scope.
    pub nullifier_hash: Nullifier,

    /// The scope derivation the nullifier is bound to.
    pub external_nullifier: ExternalNullifier,

    /// The membership proof.
    pub proof: ProofData,
}

/// Faults raised by a verifier implementation.
#[derive(Debug, thiserror::Error)]
pub enum VerifierError
{
    /// The oracle could not be reached, or the call exceeded its budget.
    #[error("verifier unavailable: {0}")]
    Unavailable(String),

    /// The proof bytes do not describe valid curve points.
    #[error("malformed proof")]
    MalformedProof,

    /// The verifying key bytes do not describe valid curve points.
    #[error("malformed verify key")]
    MalformedVerifyKey,
}

/// Capability for checking zero-knowledge membership proofs.
///
/// Implementations are stateless from the core's perspective and may be
/// slow; the coordinator never holds a store lock across a call. A call
/// either returns a verdict or faults — there are no partial results.
pub trait MembershipVerifier: Send + Sync
{
    fn verify(&self, request: &VerificationRequest) -> Result<bool, VerifierError>;
}
