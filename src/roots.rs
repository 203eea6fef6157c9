//! Registry of accepted group membership roots.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::Root;

/// Tracks the current accumulator root plus a bounded window of
/// predecessors, so proofs generated against a slightly stale root are
/// not spuriously rejected while the publication feed catches up.
///
/// Until the first root is published nothing is accepted.
pub struct RootRegistry
{
    window: Mutex<RootWindow>,
    capacity: usize,
}

struct RootWindow
{
    /// The most recently published root.
    current: Option<Root>,

    /// Superseded roots, newest first, at most `capacity` entries.
    history: VecDeque<Root>,
}

impl RootRegistry
{
    /// A registry retaining `capacity` historical roots besides the
    /// current one.
    pub fn new(capacity: usize) -> RootRegistry
    {
        RootRegistry {
            window: Mutex::new(RootWindow { current: None, history: VecDeque::new() }),
            capacity,
        }
    }

    /// Consume a newly published root. Idempotent when `new_root`
    /// equals the current root; otherwise the current root moves into
    /// the history window and entries beyond capacity fall out.
    pub fn update(&self, new_root: Root)
    {
        let mut window = self.window.lock().unwrap_or_else(|e| e.into_inner());

        if window.current == Some(new_root)
        {
            return;
        }

        if let Some(superseded) = window.current.replace(new_root)
        {
            window.history.push_front(superseded);
            window.history.truncate(self.capacity);
        }

        tracing::info!(history = window.history.len(), "group root updated");
    }

    /// Returns true iff `root` is the current root or within the
    /// retained window.
    pub fn is_accepted(&self, root: &Root) -> bool
    {
        let window = self.window.lock().unwrap_or_else(|e| e.into_inner());
        window.current.as_ref() == Some(root) || window.history.contains(root)
    }

    /// The most recently published root, if any.
    pub fn current(&self) -> Option<Root>
    {
        self.window.lock().unwrap_or_else(|e| e.into_inner()).current
    }

    /// The retained window, current root first.
    pub(crate) fn snapshot(&self) -> Vec<Root>
    {
        let window = self.window.lock().unwrap_or_else(|e| e.into_inner());
        window.current.iter().copied().chain(window.history.iter().copied()).collect()
    }

    /// Rebuild a registry from a window previously taken with
    /// [`RootRegistry::snapshot`].
    pub(crate) fn restore(capacity: usize, mut roots: Vec<Root>) -> RootRegistry
    {
        let current = if roots.is_empty() { None } else { Some(roots.remove(0)) };
        roots.truncate(capacity);
        RootRegistry {
            window: Mutex::new(RootWindow { current, history: roots.into() }),
            capacity,
        }
    }
}
