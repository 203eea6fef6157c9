//! Write-once ledger of consumed nullifiers.

use std::collections::HashSet;
use std::sync::Mutex;

use crate::{ExternalNullifier, Nullifier};

const SHARDS: usize = 16;

/// Outcome of a reservation attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Consumption
{
    /// The pair was unseen and is now consumed.
    Consumed,

    /// The pair was consumed by an earlier action.
    AlreadyUsed,
}

/// Durable set of consumed (scope, nullifier) pairs. Entries are
/// write-once and never removed; the check-and-insert is atomic under a
/// per-shard lock, so concurrent attempts on one pair yield exactly one
/// [`Consumption::Consumed`].
pub struct NullifierLedger
{
    shards: Vec<Mutex<HashSet<(ExternalNullifier, Nullifier)>>>,
}

impl NullifierLedger
{
    pub fn new() -> NullifierLedger
    {
        NullifierLedger {
            shards: (0..SHARDS).map(|_| Mutex::new(HashSet::new())).collect(),
        }
    }

    /// Atomically reserve `(scope, nullifier)`.
    pub fn try_consume(&self, scope: ExternalNullifier, nullifier: Nullifier) -> Consumption
    {
        let mut shard = self.shard(&nullifier).lock().unwrap_or_else(|e| e.into_inner());
        if shard.insert((scope, nullifier))
        {
            Consumption::Consumed
        }
        else
        {
            Consumption::AlreadyUsed
        }
    }

    /// Returns true iff the pair has been consumed.
    pub fn contains(&self, scope: &ExternalNullifier, nullifier: &Nullifier) -> bool
    {
        let shard = self.shard(nullifier).lock().unwrap_or_else(|e| e.into_inner());
        shard.contains(&(*scope, *nullifier))
    }

    /// The number of consumed pairs.
    pub fn len(&self) -> usize
    {
        self.shards
            .iter()
            .map(|shard| shard.lock().unwrap_or_else(|e| e.into_inner()).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool
    {
        self.len() == 0
    }

    /// Every consumed pair, in no particular order.
    pub(crate) fn snapshot(&self) -> Vec<(ExternalNullifier, Nullifier)>
    {
        self.shards
            .iter()
            .flat_map(|shard| {
                shard.lock().unwrap_or_else(|e| e.into_inner()).iter().copied().collect::<Vec<_>>()
            })
            .collect()
    }

    /// Rebuild a ledger from pairs previously taken with
    /// [`NullifierLedger::snapshot`].
    pub(crate) fn restore(entries: Vec<(ExternalNullifier, Nullifier)>) -> NullifierLedger
    {
        let ledger = NullifierLedger::new();
        for (scope, nullifier) in entries
        {
            ledger.try_consume(scope, nullifier);
        }
        ledger
    }

    fn shard(&self, nullifier: &Nullifier) -> &Mutex<HashSet<(ExternalNullifier, Nullifier)>>
    {
        &self.shards[nullifier[31] as usize % SHARDS]
    }
}

impl Default for NullifierLedger
{
    fn default() -> NullifierLedger
    {
        NullifierLedger::new()
    }
}
