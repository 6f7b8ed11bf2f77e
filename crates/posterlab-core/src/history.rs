//! Snapshot-based undo/redo history.

use crate::config::HISTORY_CAPACITY;
use crate::elements::Element;
use std::collections::VecDeque;

/// A full copy of the element collection at one point in time.
pub type Snapshot = Vec<Element>;

/// Bounded sequence of snapshots with a pointer to the current one.
///
/// Entries after the pointer form the redo branch and are dropped on the next
/// commit. When full, the oldest entry is evicted.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<Snapshot>,
    pointer: usize,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(HISTORY_CAPACITY)
    }
}

impl History {
    /// Create an empty history. A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            pointer: 0,
            capacity: capacity.max(1),
        }
    }

    /// Append a snapshot. Returns false if it equals the current entry.
    pub fn commit(&mut self, snapshot: &[Element]) -> bool {
        if self.current().is_some_and(|tip| tip.as_slice() == snapshot) {
            return false;
        }

        if !self.entries.is_empty() {
            self.entries.truncate(self.pointer + 1);
        }
        self.entries.push_back(snapshot.to_vec());
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.pointer = self.entries.len() - 1;

        log::trace!("history commit: {} entries, pointer {}", self.entries.len(), self.pointer);
        true
    }

    /// Step back one entry and return it for restoring.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if !self.can_undo() {
            return None;
        }
        self.pointer -= 1;
        self.entries.get(self.pointer)
    }

    /// Step forward one entry and return it for restoring.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if !self.can_redo() {
            return None;
        }
        self.pointer += 1;
        self.entries.get(self.pointer)
    }

    pub fn can_undo(&self) -> bool {
        self.pointer > 0
    }

    pub fn can_redo(&self) -> bool {
        self.pointer + 1 < self.entries.len()
    }

    /// The entry at the pointer.
    pub fn current(&self) -> Option<&Snapshot> {
        self.entries.get(self.pointer)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every entry, e.g. after loading a different project.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.pointer = 0;
    }
}
