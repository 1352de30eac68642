use cast::i128;
use soroban_sdk::{unwrap::UnwrapOptimized, vec, Env};

use crate::{
    constants::{E6, TW_CAPACITY, TW_ENTRY_PERIOD},
    errors::MathError,
    math::{checked_add, checked_sub},
    storage::{TwEntry, TwIndex},
};

impl TwIndex {
    /// Create an index whose first entry is recorded at `now`
    pub fn new(e: &Env, now: u64) -> Self {
        TwIndex {
            entries: vec![
                e,
                TwEntry {
                    timestamp: now,
                    accumulator: 0,
                },
            ],
            next: 0,
            accumulator: 0,
            last_update: now,
        }
    }

    /// Fold the utilization held since the last update into the accumulator, and record a
    /// new entry if the newest one is at least `TW_ENTRY_PERIOD` old
    ///
    /// ### Arguments
    /// * `now` - The current timestamp
    /// * `utilization_e6` - The utilization held since the last update (6 decimals)
    pub fn update(&mut self, now: u64, utilization_e6: i128) -> Result<(), MathError> {
        if now <= self.last_update {
            return Ok(());
        }
        let elapsed = i128(now - self.last_update);
        self.accumulator = checked_add(self.accumulator, utilization_e6.min(E6) * elapsed)?;
        self.last_update = now;

        if now - self.newest().timestamp >= TW_ENTRY_PERIOD {
            self.push(TwEntry {
                timestamp: now,
                accumulator: self.accumulator,
            });
        }
        Ok(())
    }

    /// Calculate the time weighted utilization from the entry that opens the window at
    /// `start` until `now`
    ///
    /// ### Arguments
    /// * `now` - The current timestamp
    /// * `start` - The requested start of the window
    /// * `guessed_slot` - A hint for the slot of the entry that opens the window
    /// * `utilization_e6` - The utilization held since the last update (6 decimals)
    ///
    /// ### Returns
    /// (time weighted utilization (6 decimals), length of the window in seconds)
    pub fn calc_time_weighted_utilization(
        &self,
        now: u64,
        start: u64,
        guessed_slot: u32,
        utilization_e6: i128,
    ) -> Result<(i128, u64), MathError> {
        let entry = self.entry_at(self.position_of(self.find_window_start(start, guessed_slot)));
        if now <= entry.timestamp {
            return Ok((utilization_e6.min(E6), 0));
        }
        let pending = i128(now.saturating_sub(self.last_update)) * utilization_e6.min(E6);
        let accumulator = checked_add(self.accumulator, pending)?;
        let window = now - entry.timestamp;
        let integral = checked_sub(accumulator, entry.accumulator)?;
        Ok((integral / i128(window), window))
    }

    /// Find the slot of the latest entry recorded at or before `start`. If `start` predates
    /// every entry, the oldest entry's slot is returned.
    ///
    /// The hint is verified before use and a binary search runs if it is wrong.
    pub fn find_window_start(&self, start: u64, guessed_slot: u32) -> u32 {
        if guessed_slot < self.entries.len() && self.is_window_start(guessed_slot, start) {
            return guessed_slot;
        }

        // entries are ordered by timestamp from the oldest position
        let mut low: u32 = 0;
        let mut high: u32 = self.entries.len() - 1;
        while low < high {
            let mid = (low + high + 1) / 2;
            if self.entry_at(mid).timestamp <= start {
                low = mid;
            } else {
                high = mid - 1;
            }
        }
        self.slot_of(low)
    }

    fn is_window_start(&self, slot: u32, start: u64) -> bool {
        let position = self.position_of(slot);
        if position != 0 && self.entry_at(position).timestamp > start {
            return false;
        }
        position == self.entries.len() - 1 || self.entry_at(position + 1).timestamp > start
    }

    fn push(&mut self, entry: TwEntry) {
        if self.entries.len() < TW_CAPACITY {
            self.entries.push_back(entry);
        } else {
            self.entries.set(self.next, entry);
            self.next = (self.next + 1) % TW_CAPACITY;
        }
    }

    fn oldest_slot(&self) -> u32 {
        if self.entries.len() < TW_CAPACITY {
            0
        } else {
            self.next
        }
    }

    fn slot_of(&self, position: u32) -> u32 {
        (self.oldest_slot() + position) % self.entries.len()
    }

    fn position_of(&self, slot: u32) -> u32 {
        let len = self.entries.len();
        (slot + len - self.oldest_slot()) % len
    }

    fn entry_at(&self, position: u32) -> TwEntry {
        self.entries.get(self.slot_of(position)).unwrap_optimized()
    }

    fn newest(&self) -> TwEntry {
        self.entry_at(self.entries.len() - 1)
    }
}
