//! Error types for level loading and grid construction.
//!
//! Only setup failures are errors. Ordinary outcomes such as an empty cell,
//! an out-of-range coordinate or a stale handle are reported as `bool`/`Option`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to read level file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed level data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("level dimensions must be positive, got {width}x{height}")]
    EmptyDimensions { width: usize, height: usize },
    #[error("level {width}x{height} exceeds the {max} cell limit")]
    TooLarge {
        width: usize,
        height: usize,
        max: usize,
    },
    #[error("{layer} layer has {len} entries but the grid only has {cells} cells")]
    LayerTooLong {
        layer: &'static str,
        len: usize,
        cells: usize,
    },
}

#[derive(Debug, Error)]
pub enum GridError {
    #[error("invalid level configuration: {0}")]
    Level(#[from] LevelError),
    #[error("mutation lease belongs to a different grid")]
    ForeignLease,
}
