//! Per-simulation locks
//!
//! Accrual is a read-modify-write on one simulation's aggregate. Events for
//! the same simulation take the same async mutex; events for different
//! simulations never wait on each other.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Table of async mutexes keyed by simulation id
#[derive(Debug, Default)]
pub struct SimulationLocks {
    slots: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl SimulationLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other event holds `simulation_id`
    ///
    /// The lock is released when the returned guard is dropped.
    pub async fn lock(&self, simulation_id: &str) -> OwnedMutexGuard<()> {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            // Slots only referenced by the table are idle
            slots.retain(|_, slot| Arc::strong_count(slot) > 1);
            slots.entry(simulation_id.to_string()).or_default().clone()
        };

        slot.lock_owned().await
    }

    /// Number of simulations with an outstanding lock or waiter
    #[cfg(test)]
    fn active(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|slot| Arc::strong_count(slot) > 1)
            .count()
    }
}
