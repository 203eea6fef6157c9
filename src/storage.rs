//! Snapshot persistence for the polling stores.
//!
//! The stores serve point lookups from memory; durability comes from
//! SCALE encoded snapshots loaded at startup and written on demand by
//! the embedding process.

use std::io;
use std::path::Path;

use codec::{Decode, Encode};

use crate::poll::Poll;
use crate::{ExternalNullifier, Nullifier, Root};

/// Faults raised while persisting or restoring a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum StorageError
{
    /// The snapshot file could not be read or written.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The snapshot bytes did not decode.
    #[error("snapshot is corrupted: {0}")]
    Corrupted(codec::Error),
}

/// Point-in-time image of every persisted store.
#[derive(Clone, Debug, Default, Encode, Decode, PartialEq, Eq)]
pub struct Snapshot
{
    /// All polls, in id order.
    pub polls: Vec<Poll>,

    /// Every consumed (scope, nullifier) pair.
    pub nullifiers: Vec<(ExternalNullifier, Nullifier)>,

    /// The accepted root window, current root first.
    pub roots: Vec<Root>,
}

impl Snapshot
{
    /// Write the SCALE encoded snapshot to `path`.
    pub fn save(&self, path: &Path) -> Result<(), StorageError>
    {
        std::fs::write(path, self.encode())?;
        Ok(())
    }

    /// Read a snapshot previously written with [`Snapshot::save`].
    pub fn load(path: &Path) -> Result<Snapshot, StorageError>
    {
        let bytes = std::fs::read(path)?;
        Snapshot::decode(&mut bytes.as_slice()).map_err(StorageError::Corrupted)
    }
}
