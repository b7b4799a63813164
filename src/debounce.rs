//! Single-slot delayed task queue used to coalesce bursts of input.
//!
//! Every [`DebounceSlot::arm`] replaces the pending value and bumps the
//! generation. A timer armed for an older generation finds nothing when it
//! fires, so only the last value of a burst is ever delivered.

#[derive(Debug)]
pub struct DebounceSlot<T> {
    generation: u64,
    pending: Option<T>,
}

impl<T> Default for DebounceSlot<T> {
    fn default() -> Self {
        Self {
            generation: 0,
            pending: None,
        }
    }
}

impl<T> DebounceSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` as the pending one and return the generation a timer
    /// must present to collect it.
    pub fn arm(&mut self, value: T) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.pending = Some(value);
        self.generation
    }

    /// Take the pending value if `generation` is still the latest.
    pub fn fire(&mut self, generation: u64) -> Option<T> {
        if generation == self.generation {
            self.pending.take()
        } else {
            None
        }
    }

    /// Drop the pending value; outstanding timers will find nothing.
    pub fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
