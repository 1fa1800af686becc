//! Level module - static per-cell block layout for two layers
//!
//! A level is a lookup table from `(layer, y * width + x)` to a block code
//! (see [`BlockColor::from_code`]). Patterns are authored as JSON:
//!
//! ```json
//! { "width": 3, "height": 1, "base_layer": [1, 1, 3], "second_layer": [] }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::LevelError;
use crate::types::{BlockColor, Layer};

/// Largest `width * height` a level may declare.
pub const MAX_LEVEL_CELLS: usize = 1 << 20;

/// Cell count of a `width` x `height` level, rejecting empty and oversized ones.
pub fn checked_cell_count(width: usize, height: usize) -> Result<usize, LevelError> {
    if width == 0 || height == 0 {
        return Err(LevelError::EmptyDimensions { width, height });
    }
    width
        .checked_mul(height)
        .filter(|&cells| cells <= MAX_LEVEL_CELLS)
        .ok_or(LevelError::TooLarge {
            width,
            height,
            max: MAX_LEVEL_CELLS,
        })
}

/// Source of the initial grid population.
pub trait LevelSource {
    fn width(&self) -> usize;
    fn height(&self) -> usize;

    /// Block code at `(x, y)` on `layer`; 0 or an out-of-range index means no block.
    fn block_type(&self, layer: Layer, x: usize, y: usize) -> u8;

    /// Color at `(x, y)` on `layer`, if a block is there.
    fn block_color(&self, layer: Layer, x: usize, y: usize) -> Option<BlockColor> {
        BlockColor::from_code(self.block_type(layer, x, y))
    }

    /// Reject configurations that cannot produce a grid.
    fn validate(&self) -> Result<(), LevelError> {
        checked_cell_count(self.width(), self.height()).map(|_| ())
    }
}

/// In-memory level pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelPattern {
    pub width: usize,
    pub height: usize,
    pub base_layer: Vec<u8>,
    #[serde(default)]
    pub second_layer: Vec<u8>,
}

impl LevelPattern {
    pub fn new(width: usize, height: usize, base_layer: Vec<u8>, second_layer: Vec<u8>) -> Self {
        Self {
            width,
            height,
            base_layer,
            second_layer,
        }
    }

    /// Build a pattern from rows listed bottom-up.
    ///
    /// Each row entry is `(base, top)`. Rows shorter than the widest row are
    /// padded with empty cells.
    pub fn from_rows(rows: &[&[(u8, u8)]]) -> Self {
        let height = rows.len();
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        let mut base_layer = vec![0u8; width * height];
        let mut second_layer = vec![0u8; width * height];
        for (y, row) in rows.iter().enumerate() {
            for (x, &(base, top)) in row.iter().enumerate() {
                base_layer[y * width + x] = base;
                second_layer[y * width + x] = top;
            }
        }
        Self::new(width, height, base_layer, second_layer)
    }

    pub fn from_json_str(s: &str) -> Result<Self, LevelError> {
        let pattern: LevelPattern = serde_json::from_str(s)?;
        pattern.validate()?;
        Ok(pattern)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    fn layer(&self, layer: Layer) -> &[u8] {
        match layer {
            Layer::Base => &self.base_layer,
            Layer::Top => &self.second_layer,
        }
    }
}

impl LevelSource for LevelPattern {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn block_type(&self, layer: Layer, x: usize, y: usize) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.layer(layer)
            .get(y * self.width + x)
            .copied()
            .unwrap_or(0)
    }

    fn validate(&self) -> Result<(), LevelError> {
        let cells = checked_cell_count(self.width, self.height)?;
        for layer in [Layer::Base, Layer::Top] {
            let len = self.layer(layer).len();
            if len > cells {
                return Err(LevelError::LayerTooLong {
                    layer: layer.as_str(),
                    len,
                    cells,
                });
            }
        }
        Ok(())
    }
}
