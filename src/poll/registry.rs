//! Owner of poll entities and sole writer of tallies.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use crate::error::Error;
use crate::poll::{Poll, PollProvider, PollStatus};
use crate::{Address, PollId, Timestamp};

/// Map of ids to polls. Lookups take a short read lock on the map;
/// every poll sits behind its own mutex so tally updates on unrelated
/// polls never contend.
pub struct PollRegistry
{
    polls: RwLock<HashMap<PollId, Arc<Mutex<Poll>>>>,
    max_vote_options: u32,
    max_question_length: usize,
}

impl PollRegistry
{
    pub fn new(max_vote_options: u32, max_question_length: usize) -> PollRegistry
    {
        PollRegistry {
            polls: RwLock::new(HashMap::new()),
            max_vote_options,
            max_question_length,
        }
    }

    /// Check the shape of a creation request without touching state.
    pub(crate) fn validate_creation(&self, question: &str, choices: &[String]) -> Result<(), Error>
    {
        if question.is_empty() || question.len() > self.max_question_length
        {
            Err(Error::InvalidQuestion)?
        }
        if choices.len() < 2 || choices.len() > self.max_vote_options as usize
        {
            Err(Error::InvalidChoiceSet)?
        }
        Ok(())
    }

    /// Create a poll with the next monotonic id and a zeroed tally.
    /// Ids start at 1; polls are never deleted, so the id is derived
    /// from the poll count.
    pub fn create(
        &self,
        question: String,
        choices: Vec<String>,
        creator: Address,
        created_at: Timestamp
    ) -> Result<PollId, Error>
    {
        self.validate_creation(&question, &choices)?;

        let mut polls = self.polls.write().unwrap_or_else(|e| e.into_inner());
        let id = polls.len() as PollId + 1;
        let tally = vec![0; choices.len()];
        polls.insert(id, Arc::new(Mutex::new(Poll {
            id,
            question,
            choices,
            creator,
            tally,
            status: PollStatus::Open,
            created_at,
        })));

        Ok(id)
    }

    /// Increment one choice's tally under the poll's own lock.
    pub fn record_vote(&self, poll_id: PollId, choice_index: u32) -> Result<(), Error>
    {
        let entry = self.entry(poll_id)?;
        let mut poll = entry.lock().unwrap_or_else(|e| e.into_inner());
        poll.record_vote(choice_index)
    }

    /// Close a poll on behalf of its creator.
    pub fn close(&self, poll_id: PollId, requester: &Address) -> Result<(), Error>
    {
        let entry = self.entry(poll_id)?;
        let mut poll = entry.lock().unwrap_or_else(|e| e.into_inner());
        poll.close(requester)
    }

    /// Point lookup of a poll by id.
    pub fn get(&self, poll_id: PollId) -> Option<Poll>
    {
        let polls = self.polls.read().unwrap_or_else(|e| e.into_inner());
        let entry = polls.get(&poll_id)?;
        let result = entry.lock().unwrap_or_else(|e| e.into_inner()).clone();
        Some(result)
    }

    /// The number of polls ever created.
    pub fn count(&self) -> usize
    {
        self.polls.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// The entry handle for a poll, so a caller may hold the poll lock
    /// across a compound transition.
    pub(crate) fn entry(&self, poll_id: PollId) -> Result<Arc<Mutex<Poll>>, Error>
    {
        let polls = self.polls.read().unwrap_or_else(|e| e.into_inner());
        let Some(entry) = polls.get(&poll_id) else { return Err(Error::PollNotFound) };
        Ok(entry.clone())
    }

    /// All polls in id order.
    pub(crate) fn snapshot(&self) -> Vec<Poll>
    {
        let polls = self.polls.read().unwrap_or_else(|e| e.into_inner());
        let mut all: Vec<Poll> = polls
            .values()
            .map(|entry| entry.lock().unwrap_or_else(|e| e.into_inner()).clone())
            .collect();
        all.sort_by_key(|poll| poll.id);
        all
    }

    /// Rebuild a registry from polls previously taken with
    /// [`PollRegistry::snapshot`].
    pub(crate) fn restore(
        max_vote_options: u32,
        max_question_length: usize,
        polls: Vec<Poll>
    ) -> PollRegistry
    {
        let registry = PollRegistry::new(max_vote_options, max_question_length);
        {
            let mut map = registry.polls.write().unwrap_or_else(|e| e.into_inner());
            for poll in polls
            {
                map.insert(poll.id, Arc::new(Mutex::new(poll)));
            }
        }
        registry
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn registry() -> PollRegistry
    {
        PollRegistry::new(32, 256)
    }

    fn choices() -> Vec<String>
    {
        vec!["Yes".into(), "No".into()]
    }

    #[test]
    fn ids_are_monotonic_from_one()
    {
        let registry = registry();
        assert_eq!(registry.create("A?".into(), choices(), [1; 20], 0), Ok(1));
        assert_eq!(registry.create("B?".into(), choices(), [1; 20], 0), Ok(2));
        assert_eq!(registry.count(), 2);
    }

    #[test]
    fn single_choice_sets_are_rejected()
    {
        let registry = registry();
        let result = registry.create("A?".into(), vec!["Yes".into()], [1; 20], 0);
        assert_eq!(result, Err(Error::InvalidChoiceSet));
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn oversized_choice_sets_are_rejected()
    {
        let registry = PollRegistry::new(2, 256);
        let too_many = vec!["A".into(), "B".into(), "C".into()];
        assert_eq!(registry.create("A?".into(), too_many, [1; 20], 0), Err(Error::InvalidChoiceSet));
    }

    #[test]
    fn empty_and_oversized_questions_are_rejected()
    {
        let registry = PollRegistry::new(32, 8);
        assert_eq!(registry.create("".into(), choices(), [1; 20], 0), Err(Error::InvalidQuestion));
        assert_eq!(
            registry.create("way past the bound".into(), choices(), [1; 20], 0),
            Err(Error::InvalidQuestion)
        );
    }

    #[test]
    fn tallies_start_at_zero()
    {
        let registry = registry();
        let id = registry.create("A?".into(), choices(), [1; 20], 7).unwrap();
        let poll = registry.get(id).unwrap();
        assert_eq!(poll.tally, vec![0, 0]);
        assert_eq!(poll.status, PollStatus::Open);
        assert_eq!(poll.created_at, 7);
    }

    #[test]
    fn votes_and_closure_flow_through_the_registry()
    {
        let registry = registry();
        let id = registry.create("A?".into(), choices(), [1; 20], 0).unwrap();

        assert_eq!(registry.record_vote(id, 1), Ok(()));
        assert_eq!(registry.get(id).unwrap().tally, vec![0, 1]);

        assert_eq!(registry.close(id, &[2; 20]), Err(Error::NotPollCreator));
        assert_eq!(registry.close(id, &[1; 20]), Ok(()));
        assert_eq!(registry.record_vote(id, 1), Err(Error::PollClosed));
        assert_eq!(registry.get(id).unwrap().tally, vec![0, 1]);
    }

    #[test]
    fn missing_polls_are_not_found()
    {
        let registry = registry();
        assert_eq!(registry.record_vote(9, 0), Err(Error::PollNotFound));
        assert!(registry.get(9).is_none());
    }

    #[test]
    fn snapshot_round_trips()
    {
        let registry = registry();
        registry.create("A?".into(), choices(), [1; 20], 0).unwrap();
        registry.create("B?".into(), choices(), [2; 20], 0).unwrap();
        registry.record_vote(1, 0).unwrap();

        let restored = PollRegistry::restore(32, 256, registry.snapshot());
        assert_eq!(restored.count(), 2);
        assert_eq!(restored.get(1).unwrap().tally, vec![1, 0]);
        assert_eq!(restored.create("C?".into(), choices(), [3; 20], 0), Ok(3));
    }
}
