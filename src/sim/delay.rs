//! Fixed-capacity delay line
//!
//! A ring buffer that is always full: every push hands back the entry that
//! was pushed `capacity` pushes earlier. Body segments use it to replay their
//! predecessor's motion with a fixed lag.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelayLine<T> {
    slots: Vec<T>,
    /// Index of the oldest entry
    head: usize,
}

impl<T: Copy> DelayLine<T> {
    /// Create a delay line of `capacity` slots, all holding `fill`
    pub fn new(capacity: usize, fill: T) -> Self {
        Self {
            slots: vec![fill; capacity],
            head: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Push the newest entry and pop the oldest.
    ///
    /// With zero capacity the entry passes straight through.
    pub fn push(&mut self, value: T) -> T {
        if self.slots.is_empty() {
            return value;
        }
        let oldest = std::mem::replace(&mut self.slots[self.head], value);
        self.head = (self.head + 1) % self.slots.len();
        oldest
    }

    /// Entries from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        let (newer, older) = self.slots.split_at(self.head);
        older.iter().chain(newer.iter()).copied()
    }

    /// Change the capacity.
    ///
    /// Shrinking discards the oldest entries; growing repeats the oldest entry
    /// at the front so the lag matches the new capacity.
    pub fn resize(&mut self, capacity: usize) {
        let len = self.slots.len();
        if capacity == len {
            return;
        }
        let ordered: Vec<T> = self.iter().collect();
        self.slots = if capacity < len {
            ordered[len - capacity..].to_vec()
        } else if let Some(&oldest) = ordered.first() {
            let mut grown = vec![oldest; capacity - len];
            grown.extend(ordered);
            grown
        } else {
            // Nothing to repeat; an empty line cannot grow
            Vec::new()
        };
        self.head = 0;
    }
}
