//! Async runtime for block-shot sessions
//!
//! The core is tick-driven and never waits. This crate supplies the clock and
//! the outside world:
//!
//! - [`Session`] drives a shot on a `tokio::time::interval` until the resolver
//!   is idle, drains grid notifications and keeps level progress current
//! - [`TimedLauncher`] models projectile travel as a tokio task that fires the
//!   arrival signal after a fixed delay
//! - [`SessionConfig`] reads tuning from `BLOCKSHOT_*` environment variables
//!
//! # Environment Variables
//!
//! - `BLOCKSHOT_TICK_MS`: scheduler tick interval (default: 16)
//! - `BLOCKSHOT_SETTLE_MS`: settle animation after each removal (default: 50)
//! - `BLOCKSHOT_ARRIVAL_TIMEOUT_MS`: arrival timeout, 0 disables (default: 5000)
//! - `BLOCKSHOT_MAX_IDLE_PASSES`: passes without a match before giving up (default: 2)
//! - `BLOCKSHOT_TRAVEL_MS`: projectile travel time (default: 120)
//! - `BLOCKSHOT_LEVEL`: level pattern JSON file

pub mod config;
pub mod launcher;
pub mod session;

pub use blockshot_core as core;
pub use blockshot_types as types;

pub use config::SessionConfig;
pub use launcher::TimedLauncher;
pub use session::{FrameSink, Session, ShotReport};
