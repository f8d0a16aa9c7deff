//! Nullable clock: head-block time that only moves when told to.

use std::cell::Cell;

use warden_types::Timestamp;

pub struct NullClock {
    current: Cell<u32>,
}

impl NullClock {
    pub fn new(initial_secs: u32) -> Self {
        Self {
            current: Cell::new(initial_secs),
        }
    }

    pub fn now(&self) -> Timestamp {
        Timestamp::new(self.current.get())
    }

    pub fn advance(&self, secs: u32) {
        self.current.set(self.current.get().saturating_add(secs));
    }

    pub fn set(&self, secs: u32) {
        self.current.set(secs);
    }
}

impl Default for NullClock {
    fn default() -> Self {
        Self::new(1_700_000_000)
    }
}
