/// Reasons an action is rejected.
///
/// Every gate failure aborts the whole action with one of these; no
/// failure leaves partial state behind and none is fatal to the process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error
{
    /// The referenced group root is outside the accepted window.
    /// Recoverable: resubmit with a proof against a fresh root.
    #[error("group root is outside the accepted window")]
    StaleRoot,

    /// The membership proof did not verify.
    #[error("membership proof is invalid")]
    InvalidProof,

    /// The verifier oracle faulted or timed out. Retryable.
    #[error("proof verifier is unavailable")]
    VerifierUnavailable,

    /// The nullifier was already consumed for this scope. Terminal:
    /// the identity has spent its action slot.
    #[error("nullifier already used in this scope")]
    AlreadyUsed,

    /// Poll does not exist.
    #[error("poll does not exist")]
    PollNotFound,

    /// Poll has been closed and may no longer be voted on.
    #[error("poll is closed")]
    PollClosed,

    /// Poll was closed by an earlier request.
    #[error("poll is already closed")]
    AlreadyClosed,

    /// The choice index is outside the poll's option range.
    #[error("choice index is out of range")]
    InvalidChoice,

    /// The choice set is smaller than two or larger than the
    /// configured maximum.
    #[error("choice set is invalid")]
    InvalidChoiceSet,

    /// The question is empty or exceeds the configured length bound.
    #[error("question is invalid")]
    InvalidQuestion,

    /// Only the poll creator may close a poll.
    #[error("requester is not the poll creator")]
    NotPollCreator,
}
