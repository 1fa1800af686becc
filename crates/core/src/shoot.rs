//! Shot resolver - cooperative scan-and-remove state machine
//!
//! A shot sequence scans the bottom row column by column looking for a block
//! whose topmost color matches the shot color. Each match is resolved one at a
//! time, strictly in increasing column order:
//!
//! 1. take the grid's mutation lease
//! 2. launch a projectile toward the block and wait for its arrival signal
//! 3. remove the block, spend a bullet, compact every column
//! 4. run the settle animation to completion, then release the lease
//!
//! The resolver never blocks. [`ShotResolver::tick`] performs one scheduling
//! step and returns; waiting for the lease, for an arrival or for the
//! animation simply leaves the resolver in the same phase until a later tick.
//!
//! # Termination
//!
//! A sequence ends when bullets run out, or after `max_idle_passes`
//! consecutive full passes over the bottom row without a single match. Either
//! way `ShootComplete { success: true }` is published; unused bullets remain in
//! [`ShotResolver::bullets_left`].
//!
//! # Arrival timeout
//!
//! An arrival that does not fire within `arrival_timeout_ms` of accumulated
//! tick time, or whose notifier is dropped, spends the bullet without removing
//! anything. The lease is released and scanning moves on to the next column.

use std::collections::VecDeque;

use glam::Vec3;
use log::{debug, warn};
use tokio::sync::oneshot::{self, error::TryRecvError};

use crate::animation::SettleAnimation;
use crate::events::GridEvent;
use crate::grid::{Grid, MutationLease};
use crate::stack::BlockStack;
use crate::types::{
    BlockColor, BlockId, DEFAULT_ARRIVAL_TIMEOUT_MS, DEFAULT_MAX_IDLE_PASSES, SHOT_SETTLE_MS,
};

/// Fires the arrival of a projectile.
#[derive(Debug)]
pub struct ArrivalNotifier(oneshot::Sender<()>);

impl ArrivalNotifier {
    pub fn arrive(self) {
        let _ = self.0.send(());
    }
}

/// Completion channel of a launched projectile.
#[derive(Debug)]
pub struct ArrivalSignal(oneshot::Receiver<()>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrivalPoll {
    Pending,
    Arrived,
    /// The notifier was dropped without firing.
    Lost,
}

impl ArrivalSignal {
    /// A signal that has already fired.
    pub fn arrived() -> Self {
        let (notifier, signal) = arrival_channel();
        notifier.arrive();
        signal
    }

    pub fn poll(&mut self) -> ArrivalPoll {
        match self.0.try_recv() {
            Ok(()) => ArrivalPoll::Arrived,
            Err(TryRecvError::Empty) => ArrivalPoll::Pending,
            Err(TryRecvError::Closed) => ArrivalPoll::Lost,
        }
    }
}

pub fn arrival_channel() -> (ArrivalNotifier, ArrivalSignal) {
    let (tx, rx) = oneshot::channel();
    (ArrivalNotifier(tx), ArrivalSignal(rx))
}

/// External effect that travels toward a block and reports arrival.
pub trait ProjectileLauncher {
    fn launch(&mut self, target: BlockId, position: Vec3) -> ArrivalSignal;
}

/// Projectiles that arrive the moment they are launched.
#[derive(Debug, Default)]
pub struct InstantLauncher {
    launched: u32,
}

impl InstantLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn launched(&self) -> u32 {
        self.launched
    }
}

impl ProjectileLauncher for InstantLauncher {
    fn launch(&mut self, _target: BlockId, _position: Vec3) -> ArrivalSignal {
        self.launched += 1;
        ArrivalSignal::arrived()
    }
}

/// Projectiles whose arrival is fired by hand, oldest first.
#[derive(Debug, Default)]
pub struct ManualLauncher {
    in_flight: VecDeque<(BlockId, ArrivalNotifier)>,
}

impl ManualLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Fire the oldest projectile's arrival; returns its target.
    pub fn arrive_next(&mut self) -> Option<BlockId> {
        let (target, notifier) = self.in_flight.pop_front()?;
        notifier.arrive();
        Some(target)
    }

    /// Drop the oldest projectile without firing.
    pub fn lose_next(&mut self) -> Option<BlockId> {
        self.in_flight.pop_front().map(|(target, _)| target)
    }
}

impl ProjectileLauncher for ManualLauncher {
    fn launch(&mut self, target: BlockId, _position: Vec3) -> ArrivalSignal {
        let (notifier, signal) = arrival_channel();
        self.in_flight.push_back((target, notifier));
        signal
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Settle animation duration after each successful removal
    pub settle_ms: u32,
    /// None waits for arrival forever
    pub arrival_timeout_ms: Option<u32>,
    /// Consecutive full passes without a match before giving up (0 acts as 1)
    pub max_idle_passes: u32,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            settle_ms: SHOT_SETTLE_MS,
            arrival_timeout_ms: Some(DEFAULT_ARRIVAL_TIMEOUT_MS),
            max_idle_passes: DEFAULT_MAX_IDLE_PASSES,
        }
    }
}

/// Externally visible phase.
///
/// Locking and resolving happen inside a single tick and are never observed
/// between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotPhase {
    Idle,
    Scanning,
    AwaitingProjectile { target: BlockId },
    Settling,
}

#[derive(Debug)]
enum State {
    Idle,
    Scanning,
    Awaiting {
        target: BlockId,
        signal: ArrivalSignal,
        lease: MutationLease,
        waited_ms: u32,
    },
    Settling {
        anim: SettleAnimation,
        lease: MutationLease,
    },
}

#[derive(Debug)]
pub struct ShotResolver {
    config: ResolverConfig,
    state: State,
    scan_x: usize,
    bullets_left: u32,
    target_color: Option<BlockColor>,
    idle_passes: u32,
    matched_in_pass: bool,
    removed: u32,
}

impl Default for ShotResolver {
    fn default() -> Self {
        Self::new(ResolverConfig::default())
    }
}

impl ShotResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            config,
            state: State::Idle,
            scan_x: 0,
            bullets_left: 0,
            target_color: None,
            idle_passes: 0,
            matched_in_pass: false,
            removed: 0,
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn phase(&self) -> ShotPhase {
        match &self.state {
            State::Idle => ShotPhase::Idle,
            State::Scanning => ShotPhase::Scanning,
            State::Awaiting { target, .. } => ShotPhase::AwaitingProjectile { target: *target },
            State::Settling { .. } => ShotPhase::Settling,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, State::Idle)
    }

    pub fn bullets_left(&self) -> u32 {
        self.bullets_left
    }

    pub fn scan_x(&self) -> usize {
        self.scan_x
    }

    pub fn target_color(&self) -> Option<BlockColor> {
        self.target_color
    }

    /// Blocks removed by the current (or last) sequence
    pub fn removed(&self) -> u32 {
        self.removed
    }

    /// Start a new shot sequence.
    ///
    /// Any sequence still in flight is abandoned: its settle animation is
    /// snapped to completion and its lease released. With zero bullets the
    /// sequence completes immediately.
    pub fn shoot(&mut self, grid: &mut Grid, bullets: u32, color: BlockColor) {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::Settling { mut anim, lease } => {
                warn!("shot preempted while settling; snapping animation");
                grid.finish_settle(&mut anim);
                lease.release();
            }
            State::Awaiting { target, .. } => {
                warn!("shot preempted while awaiting projectile toward {:?}", target);
            }
            State::Scanning => debug!("shot preempted while scanning"),
            State::Idle => {}
        }

        self.bullets_left = bullets;
        self.target_color = Some(color);
        self.scan_x = 0;
        self.idle_passes = 0;
        self.matched_in_pass = false;
        self.removed = 0;

        if bullets == 0 {
            grid.publish(GridEvent::ShootComplete { success: true });
            return;
        }
        debug!("shoot {} x {}", bullets, color.as_str());
        self.state = State::Scanning;
    }

    /// Run one scheduling step. Returns the phase after the step.
    pub fn tick<L: ProjectileLauncher + ?Sized>(
        &mut self,
        grid: &mut Grid,
        launcher: &mut L,
        elapsed_ms: u32,
    ) -> ShotPhase {
        self.state = match std::mem::replace(&mut self.state, State::Idle) {
            State::Idle => State::Idle,
            State::Scanning => self.scan_step(grid, launcher),
            State::Awaiting {
                target,
                signal,
                lease,
                waited_ms,
            } => self.await_arrival(
                grid,
                target,
                signal,
                lease,
                waited_ms.saturating_add(elapsed_ms),
            ),
            State::Settling { mut anim, lease } => {
                if grid.advance_settle(&mut anim, elapsed_ms) {
                    lease.release();
                    self.scan_x += 1;
                    State::Scanning
                } else {
                    State::Settling { anim, lease }
                }
            }
        };
        self.phase()
    }

    fn scan_step<L: ProjectileLauncher + ?Sized>(
        &mut self,
        grid: &mut Grid,
        launcher: &mut L,
    ) -> State {
        if self.bullets_left == 0 {
            return self.complete(grid);
        }
        if grid.is_busy() {
            return State::Scanning;
        }

        if self.scan_x >= grid.width() {
            self.scan_x = 0;
            if self.matched_in_pass {
                self.matched_in_pass = false;
                self.idle_passes = 0;
            } else {
                self.idle_passes += 1;
                if self.idle_passes >= self.config.max_idle_passes.max(1) {
                    debug!(
                        "no match after {} passes; {} bullets unused",
                        self.idle_passes, self.bullets_left
                    );
                    return self.complete(grid);
                }
            }
            return State::Scanning;
        }

        let x = self.scan_x;
        let target = grid
            .stack(x, 0)
            .and_then(BlockStack::topmost)
            .and_then(|id| grid.block(id))
            .filter(|block| Some(block.color) == self.target_color)
            .map(|block| (block.id, block.position));

        let Some((target, position)) = target else {
            self.scan_x += 1;
            return State::Scanning;
        };
        let Some(lease) = grid.try_lease() else {
            return State::Scanning;
        };

        self.matched_in_pass = true;
        debug!("column {} matches; launching toward {:?}", x, target);
        let signal = launcher.launch(target, position);
        self.await_arrival(grid, target, signal, lease, 0)
    }

    fn await_arrival(
        &mut self,
        grid: &mut Grid,
        target: BlockId,
        mut signal: ArrivalSignal,
        lease: MutationLease,
        waited_ms: u32,
    ) -> State {
        match signal.poll() {
            ArrivalPoll::Arrived => self.resolve(grid, target, lease),
            ArrivalPoll::Lost => {
                warn!("projectile toward {:?} was lost before arrival", target);
                self.spend_without_removal(grid, lease)
            }
            ArrivalPoll::Pending => match self.config.arrival_timeout_ms {
                Some(limit) if waited_ms >= limit => {
                    warn!(
                        "projectile toward {:?} timed out after {}ms",
                        target, waited_ms
                    );
                    self.spend_without_removal(grid, lease)
                }
                _ => State::Awaiting {
                    target,
                    signal,
                    lease,
                    waited_ms,
                },
            },
        }
    }

    fn resolve(&mut self, grid: &mut Grid, target: BlockId, lease: MutationLease) -> State {
        let removed = match grid.leased(&lease) {
            Ok(mut view) => view.remove_specific_block(target),
            Err(err) => {
                warn!("cannot resolve hit on {:?}: {}", target, err);
                false
            }
        };
        self.spend_bullet(grid);

        if !removed {
            warn!("{:?} no longer in grid; skipping compaction", target);
            lease.release();
            self.scan_x += 1;
            return State::Scanning;
        }

        self.removed += 1;
        if let Ok(mut view) = grid.leased(&lease) {
            view.compact_all();
        }
        let anim = grid.animate_settle(self.config.settle_ms);
        State::Settling { anim, lease }
    }

    fn spend_without_removal(&mut self, grid: &mut Grid, lease: MutationLease) -> State {
        self.spend_bullet(grid);
        lease.release();
        self.scan_x += 1;
        State::Scanning
    }

    fn spend_bullet(&mut self, grid: &mut Grid) {
        self.bullets_left = self.bullets_left.saturating_sub(1);
        grid.publish(GridEvent::BulletUsed {
            remaining: self.bullets_left,
        });
    }

    fn complete(&mut self, grid: &mut Grid) -> State {
        debug!(
            "shot complete: {} removed, {} bullets left",
            self.removed, self.bullets_left
        );
        grid.publish(GridEvent::ShootComplete { success: true });
        State::Idle
    }
}
