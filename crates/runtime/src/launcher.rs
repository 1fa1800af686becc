//! Projectiles that travel for a fixed time on the tokio runtime.

use std::time::Duration;

use glam::Vec3;
use log::{debug, warn};
use tokio::runtime::Handle;

use blockshot_core::{arrival_channel, ArrivalSignal, ProjectileLauncher};

use crate::types::BlockId;

/// Spawns one task per projectile that sleeps the travel time, then fires arrival.
#[derive(Debug, Clone)]
pub struct TimedLauncher {
    travel: Duration,
    launched: u32,
}

impl TimedLauncher {
    pub fn new(travel_ms: u32) -> Self {
        Self {
            travel: Duration::from_millis(travel_ms as u64),
            launched: 0,
        }
    }

    pub fn travel(&self) -> Duration {
        self.travel
    }

    pub fn launched(&self) -> u32 {
        self.launched
    }
}

impl ProjectileLauncher for TimedLauncher {
    fn launch(&mut self, target: BlockId, position: Vec3) -> ArrivalSignal {
        self.launched += 1;
        let (notifier, signal) = arrival_channel();

        let Ok(handle) = Handle::try_current() else {
            warn!("no tokio runtime; projectile toward {:?} lands instantly", target);
            notifier.arrive();
            return signal;
        };

        let travel = self.travel;
        debug!("projectile toward {:?} at {:?}", target, position);
        handle.spawn(async move {
            tokio::time::sleep(travel).await;
            notifier.arrive();
        });
        signal
    }
}
