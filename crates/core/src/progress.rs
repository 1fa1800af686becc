//! Level progress derived from the grid's remaining block count.

use log::debug;

use crate::events::GridEvent;
use crate::grid::Grid;

#[derive(Debug, Clone)]
pub struct ProgressTracker {
    total: usize,
    remaining: usize,
    completed: bool,
}

impl ProgressTracker {
    /// Start tracking with the grid's current population as the total.
    pub fn new(grid: &Grid) -> Self {
        let total = grid.remaining_block_count();
        Self {
            total,
            remaining: total,
            completed: false,
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Fraction of the level cleared, in `[0, 1]`
    pub fn progress(&self) -> f32 {
        if self.total == 0 {
            return 1.0;
        }
        1.0 - self.remaining.min(self.total) as f32 / self.total as f32
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// Recount the grid; publishes `ProgressComplete` the first time progress reaches 1.
    pub fn refresh(&mut self, grid: &mut Grid) -> f32 {
        self.remaining = grid.remaining_block_count();
        let progress = self.progress();
        if progress >= 1.0 && !self.completed {
            self.completed = true;
            debug!("level complete ({} blocks cleared)", self.total);
            grid.publish(GridEvent::ProgressComplete);
        }
        progress
    }

    /// React to a grid notification. Returns true when a refresh happened.
    pub fn observe(&mut self, event: &GridEvent, grid: &mut Grid) -> bool {
        match event {
            GridEvent::SettleComplete | GridEvent::GridChanged => {
                self.refresh(grid);
                true
            }
            _ => false,
        }
    }
}
