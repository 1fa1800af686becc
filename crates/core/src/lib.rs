//! Core puzzle logic - pure, deterministic, and testable
//!
//! This crate contains the block-stack grid, the shot resolver and the settle
//! animation. It never renders and never awaits; tokio is used only for its
//! channel types. That makes it:
//!
//! - **Deterministic**: every step is driven by an explicit `tick(elapsed_ms)`
//! - **Testable**: scenarios run tick by tick with instant or manual projectiles
//! - **Portable**: the same core runs headless, in the terminal, or under tokio
//!
//! # Module Structure
//!
//! - [`stack`]: the up-to-two-layer content of a single cell
//! - [`grid`]: the `[column][row]` grid with removal, compaction and the mutation lease
//! - [`level`]: level sources and JSON level patterns
//! - [`animation`]: frame-stepped settle animation with smoothstep easing
//! - [`shoot`]: the scan-and-resolve shot state machine
//! - [`progress`]: level completion derived from the remaining block count
//! - [`events`]: grid notifications and subscriber registry
//! - [`snapshot`]: serializable copy of the grid for observers
//!
//! # Example
//!
//! ```
//! use blockshot_core::{Grid, InstantLauncher, LevelPattern, ShotPhase, ShotResolver};
//! use blockshot_types::{BlockColor, TICK_MS};
//!
//! // One row: red, red, blue
//! let level = LevelPattern::from_rows(&[&[(1, 0), (1, 0), (3, 0)]]);
//! let mut grid = Grid::from_source(&level).unwrap();
//!
//! let mut resolver = ShotResolver::default();
//! let mut launcher = InstantLauncher::new();
//! resolver.shoot(&mut grid, 2, BlockColor::Red);
//! while resolver.tick(&mut grid, &mut launcher, TICK_MS) != ShotPhase::Idle {}
//!
//! assert_eq!(grid.remaining_block_count(), 1);
//! assert_eq!(grid.topmost_color(2, 0), Some(BlockColor::Blue));
//! ```

pub mod animation;
pub mod error;
pub mod events;
pub mod grid;
pub mod level;
pub mod progress;
pub mod shoot;
pub mod snapshot;
pub mod stack;

pub use blockshot_types as types;

// Re-export commonly used types for convenience
pub use animation::{smoothstep, BlockPositions, SettleAnimation, Track};
pub use error::{GridError, LevelError};
pub use events::{Delivery, EventBus, GridEvent, SubscriptionId};
pub use grid::{Block, Grid, LeasedGrid, MutationLease};
pub use level::{checked_cell_count, LevelPattern, LevelSource, MAX_LEVEL_CELLS};
pub use progress::ProgressTracker;
pub use shoot::{
    arrival_channel, ArrivalNotifier, ArrivalPoll, ArrivalSignal, InstantLauncher,
    ManualLauncher, ProjectileLauncher, ResolverConfig, ShotPhase, ShotResolver,
};
pub use snapshot::{CellSnapshot, GridSnapshot};
pub use stack::BlockStack;
