//! Async play session.
//!
//! Bridges the tick-driven core with the tokio clock: a shot is driven on a
//! fixed interval until the resolver goes idle, and grid notifications are
//! drained after every tick to keep progress current.

use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, info};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};

use blockshot_core::{
    Grid, GridEvent, LevelPattern, ProgressTracker, ProjectileLauncher, ShotPhase, ShotResolver,
};

use crate::config::SessionConfig;
use crate::launcher::TimedLauncher;
use crate::types::BlockColor;

/// Observer called after every tick of [`Session::shoot`].
pub trait FrameSink {
    fn frame(&mut self, session: &Session) -> Result<()>;
}

/// Outcome of one shot sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShotReport {
    pub color: &'static str,
    pub bullets: u32,
    pub bullets_used: u32,
    pub bullets_left: u32,
    /// Blocks hit by projectiles
    pub removed: u32,
    /// Blocks destroyed, including covering blocks discarded with their base
    pub destroyed: u32,
    pub remaining: usize,
    pub progress: f32,
    pub level_complete: bool,
    pub ticks: u32,
}

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    bullets_used: u32,
    destroyed: u32,
    ticks: u32,
}

pub struct Session {
    config: SessionConfig,
    grid: Grid,
    resolver: ShotResolver,
    tracker: ProgressTracker,
    launcher: Box<dyn ProjectileLauncher + Send>,
    events: mpsc::UnboundedReceiver<GridEvent>,
    tally: Tally,
    level_complete: bool,
}

impl Session {
    /// Session with a [`TimedLauncher`] using the configured travel time.
    pub fn new(grid: Grid, config: SessionConfig) -> Self {
        let launcher = TimedLauncher::new(config.travel_ms);
        Self::with_launcher(grid, config, Box::new(launcher))
    }

    pub fn with_launcher(
        mut grid: Grid,
        config: SessionConfig,
        launcher: Box<dyn ProjectileLauncher + Send>,
    ) -> Self {
        let (_, events) = grid.events().subscribe_channel();
        let tracker = ProgressTracker::new(&grid);
        let resolver = ShotResolver::new(config.resolver_config());
        Self {
            config,
            grid,
            resolver,
            tracker,
            launcher,
            events,
            tally: Tally::default(),
            level_complete: false,
        }
    }

    /// Load the level named by `config.level_path`, or `fallback` when unset.
    pub fn from_config(config: SessionConfig, fallback: Option<LevelPattern>) -> Result<Self> {
        let pattern = match (&config.level_path, fallback) {
            (Some(path), _) => LevelPattern::load(path)
                .with_context(|| format!("loading level {}", path.display()))?,
            (None, Some(pattern)) => pattern,
            (None, None) => anyhow::bail!("no level configured (set BLOCKSHOT_LEVEL)"),
        };
        let grid = Grid::from_source(&pattern).context("building grid")?;
        info!(
            "level {}x{} loaded with {} blocks",
            grid.width(),
            grid.height(),
            grid.remaining_block_count()
        );
        Ok(Self::new(grid, config))
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn resolver(&self) -> &ShotResolver {
        &self.resolver
    }

    pub fn tracker(&self) -> &ProgressTracker {
        &self.tracker
    }

    pub fn progress(&self) -> f32 {
        self.tracker.progress()
    }

    pub fn level_complete(&self) -> bool {
        self.level_complete
    }

    /// Start a shot sequence without driving it.
    pub fn begin_shot(&mut self, bullets: u32, color: BlockColor) {
        self.tally = Tally::default();
        self.resolver.shoot(&mut self.grid, bullets, color);
        self.drain_events();
    }

    /// Run one scheduling step.
    pub fn tick(&mut self, elapsed_ms: u32) -> ShotPhase {
        let phase = self
            .resolver
            .tick(&mut self.grid, self.launcher.as_mut(), elapsed_ms);
        self.tally.ticks += 1;
        self.drain_events();
        phase
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                GridEvent::BulletUsed { .. } => self.tally.bullets_used += 1,
                GridEvent::BlockDestroyed { .. } => self.tally.destroyed += 1,
                GridEvent::ProgressComplete => {
                    info!("level complete");
                    self.level_complete = true;
                }
                _ => {}
            }
            // May publish ProgressComplete, which this loop picks up next.
            self.tracker.observe(&event, &mut self.grid);
        }
    }

    /// Report for the sequence started by the last [`Session::begin_shot`].
    pub fn report(&self) -> ShotReport {
        ShotReport {
            color: self.resolver.target_color().map_or("none", |c| c.as_str()),
            bullets: self.resolver.bullets_left() + self.tally.bullets_used,
            bullets_used: self.tally.bullets_used,
            bullets_left: self.resolver.bullets_left(),
            removed: self.resolver.removed(),
            destroyed: self.tally.destroyed,
            remaining: self.grid.remaining_block_count(),
            progress: self.tracker.progress(),
            level_complete: self.level_complete,
            ticks: self.tally.ticks,
        }
    }

    /// Fire a shot and drive it on the tokio clock until it completes.
    pub async fn shoot(
        &mut self,
        bullets: u32,
        color: BlockColor,
        mut sink: Option<&mut dyn FrameSink>,
    ) -> Result<ShotReport> {
        self.begin_shot(bullets, color);

        let mut interval = tokio::time::interval(Duration::from_millis(self.config.tick_ms as u64));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last = Instant::now();

        while !self.resolver.is_idle() {
            interval.tick().await;
            let now = Instant::now();
            let elapsed_ms = now.duration_since(last).as_millis().min(u32::MAX as u128) as u32;
            last = now;

            self.tick(elapsed_ms);
            if let Some(sink) = sink.as_deref_mut() {
                sink.frame(self)?;
            }
        }

        let report = self.report();
        debug!("shot finished: {:?}", report);
        Ok(report)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("grid", &self.grid)
            .field("resolver", &self.resolver)
            .field("tracker", &self.tracker)
            .finish_non_exhaustive()
    }
}
