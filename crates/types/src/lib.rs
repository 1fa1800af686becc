//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, async runtime, terminal rendering).
//!
//! # Grid Geometry
//!
//! The grid is addressed as `[column][row]` with row 0 at the bottom:
//!
//! - **Cell size**: world-space spacing between neighbouring cells
//! - **Spawn depth**: top-layer blocks are spawned in front of the base layer
//! - **Settle depth**: top-layer settle targets sit slightly toward the viewer
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Scheduler tick interval (~60 FPS) |
//! | `DEFAULT_SETTLE_MS` | 150 | Settle animation duration for ad-hoc compaction |
//! | `SHOT_SETTLE_MS` | 50 | Settle animation duration after a shot removal |
//! | `DEFAULT_ARRIVAL_TIMEOUT_MS` | 5000 | Max wait for a projectile arrival signal |
//! | `DEFAULT_TRAVEL_MS` | 120 | Projectile travel time used by the timed launcher |
//!
//! # Level Codes
//!
//! Level patterns store one code per cell and layer:
//!
//! | Code | Color |
//! |------|-------|
//! | 0 | no block |
//! | 1 | Red |
//! | 2 | Yellow |
//! | 3 | Blue |
//! | 4 | Green |
//! | 5 | Orange |
//! | 6 | Pink |
//! | 7 | LightBlue |
//! | 8 | Purple |
//!
//! Any code above 8 is treated as "no block".
//!
//! # Examples
//!
//! ```
//! use blockshot_types::{BlockColor, Layer};
//!
//! assert_eq!(BlockColor::from_code(1), Some(BlockColor::Red));
//! assert_eq!(BlockColor::from_code(0), None);
//! assert_eq!(BlockColor::from_str("light_blue"), Some(BlockColor::LightBlue));
//!
//! assert_eq!(Layer::Top.index(), 1);
//! ```

/// Default world-space spacing between cells
pub const DEFAULT_CELL_SIZE: f32 = 1.2;

/// Z offset applied to top-layer blocks when they are spawned
pub const TOP_SPAWN_DEPTH: f32 = 1.0;

/// Z offset applied to top-layer settle targets
pub const TOP_SETTLE_DEPTH: f32 = -0.1;

/// Scheduler tick interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Settle animation duration for ad-hoc compaction
pub const DEFAULT_SETTLE_MS: u32 = 150;

/// Settle animation duration after a shot removal
pub const SHOT_SETTLE_MS: u32 = 50;

/// Maximum time the resolver waits for a projectile to arrive
pub const DEFAULT_ARRIVAL_TIMEOUT_MS: u32 = 5000;

/// Full scan passes without a match before a shot sequence gives up
pub const DEFAULT_MAX_IDLE_PASSES: u32 = 2;

/// Projectile travel time used by the timed launcher
pub const DEFAULT_TRAVEL_MS: u32 = 120;

/// Highest level code that maps to a block
pub const MAX_BLOCK_CODE: u8 = 8;

/// The eight block colors
///
/// The declaration order matches the level code order (Red = 1 .. Purple = 8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BlockColor {
    Red,
    Yellow,
    Blue,
    Green,
    Orange,
    Pink,
    LightBlue,
    Purple,
}

impl BlockColor {
    /// All colors in level code order
    pub const ALL: [BlockColor; 8] = [
        BlockColor::Red,
        BlockColor::Yellow,
        BlockColor::Blue,
        BlockColor::Green,
        BlockColor::Orange,
        BlockColor::Pink,
        BlockColor::LightBlue,
        BlockColor::Purple,
    ];

    /// Map a level code to a color
    ///
    /// # Examples
    ///
    /// ```
    /// use blockshot_types::BlockColor;
    ///
    /// assert_eq!(BlockColor::from_code(3), Some(BlockColor::Blue));
    /// assert_eq!(BlockColor::from_code(8), Some(BlockColor::Purple));
    /// assert_eq!(BlockColor::from_code(9), None);
    /// ```
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1..=MAX_BLOCK_CODE => Some(Self::ALL[(code - 1) as usize]),
            _ => None,
        }
    }

    /// Level code for this color (1..=8)
    pub fn code(&self) -> u8 {
        *self as u8 + 1
    }

    /// Parse color from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockshot_types::BlockColor;
    ///
    /// assert_eq!(BlockColor::from_str("RED"), Some(BlockColor::Red));
    /// assert_eq!(BlockColor::from_str("light-blue"), Some(BlockColor::LightBlue));
    /// assert_eq!(BlockColor::from_str("teal"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "red" => Some(BlockColor::Red),
            "yellow" => Some(BlockColor::Yellow),
            "blue" => Some(BlockColor::Blue),
            "green" => Some(BlockColor::Green),
            "orange" => Some(BlockColor::Orange),
            "pink" => Some(BlockColor::Pink),
            "lightblue" | "light_blue" | "light-blue" => Some(BlockColor::LightBlue),
            "purple" => Some(BlockColor::Purple),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockColor::Red => "red",
            BlockColor::Yellow => "yellow",
            BlockColor::Blue => "blue",
            BlockColor::Green => "green",
            BlockColor::Orange => "orange",
            BlockColor::Pink => "pink",
            BlockColor::LightBlue => "lightblue",
            BlockColor::Purple => "purple",
        }
    }
}

/// Layer a block occupies inside its cell
///
/// - **Base**: bottom layer, level layer index 0
/// - **Top**: covering layer, level layer index 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Base,
    Top,
}

impl Layer {
    /// Level layer index (0 = base, 1 = top)
    pub fn index(&self) -> usize {
        match self {
            Layer::Base => 0,
            Layer::Top => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Layer::Base => "base",
            Layer::Top => "top",
        }
    }
}

/// Opaque handle to a block entity
///
/// Handles are unique within a grid and are never reused after the block is destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u32);
