//! Index-stable record arena used while correlating.
//!
//! Merging removes records from the stream while a forward pass is still
//! walking it. Slots are never shifted: a removed record leaves a tombstone,
//! every walk skips tombstones, and [`EventStream::into_records`] compacts the
//! survivors once the pass is over.

use crate::event::EventRecord;

#[derive(Debug, Clone, Default)]
pub struct EventStream {
    slots: Vec<Option<EventRecord>>,
}

impl From<Vec<EventRecord>> for EventStream {
    fn from(records: Vec<EventRecord>) -> Self {
        Self {
            slots: records.into_iter().map(Some).collect(),
        }
    }
}

impl EventStream {
    /// Number of slots, tombstones included.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of records still live.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    #[must_use]
    pub fn get(&self, idx: usize) -> Option<&EventRecord> {
        self.slots.get(idx).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut EventRecord> {
        self.slots.get_mut(idx).and_then(Option::as_mut)
    }

    #[must_use]
    pub fn is_live(&self, idx: usize) -> bool {
        self.get(idx).is_some()
    }

    /// Tombstone the slot and hand back its record.
    pub fn remove(&mut self, idx: usize) -> Option<EventRecord> {
        self.slots.get_mut(idx).and_then(Option::take)
    }

    /// Closest live slot after `idx`.
    #[must_use]
    pub fn next_live(&self, idx: usize) -> Option<usize> {
        self.live_after(idx).next()
    }

    /// Closest live slot before `idx`.
    #[must_use]
    pub fn prev_live(&self, idx: usize) -> Option<usize> {
        self.live_before(idx).next()
    }

    /// Live slots after `idx`, nearest first.
    pub fn live_after(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        (idx.saturating_add(1)..self.slots.len()).filter(|i| self.slots[*i].is_some())
    }

    /// Live slots before `idx`, nearest first.
    pub fn live_before(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        (0..idx.min(self.slots.len()))
            .rev()
            .filter(|i| self.slots[*i].is_some())
    }

    /// Drop the tombstones and return the survivors in order.
    #[must_use]
    pub fn into_records(self) -> Vec<EventRecord> {
        self.slots.into_iter().flatten().collect()
    }
}
