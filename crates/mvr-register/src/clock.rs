//! Per-replica Lamport clock.
//!
//! `tick()` is a side-effect-free peek at the next counter value; the clock
//! only advances when [`LamportClock::sync`] is told about a counter that
//! was actually applied (local or remote). This way a replica's own new
//! operations always observe every op admitted before them.

use crate::id::{ActorId, OpId};

#[derive(Clone, Debug)]
pub struct LamportClock {
    actor: ActorId,
    counter: u64,
}

impl LamportClock {
    pub fn new(actor: ActorId) -> Self {
        Self { actor, counter: 0 }
    }

    /// Returns the `OpId` a new local operation would get, without
    /// advancing the clock.
    pub fn tick(&self) -> OpId {
        OpId::new(self.counter + 1, self.actor.clone())
    }

    /// Advances the clock to `max(counter, remote_counter)`. Call after
    /// admitting any operation (local or remote) with counter
    /// `remote_counter`.
    pub fn sync(&mut self, remote_counter: u64) {
        self.counter = self.counter.max(remote_counter);
    }

    pub fn value(&self) -> u64 {
        self.counter
    }
}
