use codec::{Decode, Encode};

use crate::error::Error;
use crate::{Address, PollId, Timestamp};

/// Poll lifecycle. Closing is terminal; polls are never deleted.
#[derive(Clone, Copy, Debug, Encode, Decode, PartialEq, Eq)]
pub enum PollStatus
{
    Open,
    Closed,
}

/// Poll storage definition.
#[derive(Clone, Debug, Encode, Decode, PartialEq, Eq)]
pub struct Poll
{
    /// The poll id.
    pub id: PollId,

    /// The poll question.
    pub question: String,

    /// The ordered vote options.
    pub choices: Vec<String>,

    /// The poll creator.
    pub creator: Address,

    /// Vote counts, one per choice.
    pub tally: Vec<u64>,

    /// The poll lifecycle status.
    pub status: PollStatus,

    /// The poll creation time (in ms).
    pub created_at: Timestamp,
}

/// The only mutation path for poll state.
pub trait PollProvider: Sized
{
    fn is_open(&self) -> bool;

    /// Increment exactly one choice's tally.
    fn record_vote(&mut self, choice_index: u32) -> Result<(), Error>;

    /// Terminal transition Open -> Closed, restricted to the creator.
    fn close(&mut self, requester: &Address) -> Result<(), Error>;
}

impl PollProvider for Poll
{
    fn is_open(&self) -> bool
    {
        self.status == PollStatus::Open
    }

    fn record_vote(&mut self, choice_index: u32) -> Result<(), Error>
    {
        if !self.is_open() { Err(Error::PollClosed)? }

        let Some(count) = self.tally.get_mut(choice_index as usize) else { return Err(Error::InvalidChoice) };
        *count += 1;

        Ok(())
    }

    fn close(&mut self, requester: &Address) -> Result<(), Error>
    {
        if self.creator != *requester { Err(Error::NotPollCreator)? }
        if self.status == PollStatus::Closed { Err(Error::AlreadyClosed)? }

        self.status = PollStatus::Closed;

        Ok(())
    }
}
