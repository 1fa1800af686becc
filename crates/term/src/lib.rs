//! Terminal view for block-shot sessions.
//!
//! Renders grid snapshots into a small framebuffer that is flushed to the
//! terminal with crossterm. Nothing here reads input; the view only observes
//! snapshots produced by the core.

pub mod fb;
pub mod grid_view;
pub mod renderer;

pub use blockshot_core as core;
pub use blockshot_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use grid_view::{color_rgb, progress_bar, AnchorY, GridView, HudState, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
