//! Block stack module - the up-to-two-layer content of a single grid cell
//!
//! A stack holds an optional base block and an optional top block.
//! A stack with only a top block is legal (the base was removed first);
//! removal through [`BlockStack::remove_top`] always prefers the top layer.

use arrayvec::ArrayVec;

use crate::types::{BlockId, Layer};

/// Content of a single cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BlockStack {
    pub base: Option<BlockId>,
    pub top: Option<BlockId>,
}

impl BlockStack {
    /// Create an empty stack
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_none() && self.top.is_none()
    }

    pub fn has_base(&self) -> bool {
        self.base.is_some()
    }

    pub fn has_top(&self) -> bool {
        self.top.is_some()
    }

    /// Top block if present, else the base block
    pub fn topmost(&self) -> Option<BlockId> {
        self.top.or(self.base)
    }

    /// Number of occupied layers (0, 1 or 2)
    pub fn len(&self) -> usize {
        self.base.is_some() as usize + self.top.is_some() as usize
    }

    /// Layer holding `id`, if it is in this stack
    pub fn layer_of(&self, id: BlockId) -> Option<Layer> {
        if self.top == Some(id) {
            Some(Layer::Top)
        } else if self.base == Some(id) {
            Some(Layer::Base)
        } else {
            None
        }
    }

    /// Occupied blocks, base first
    pub fn blocks(&self) -> ArrayVec<(Layer, BlockId), 2> {
        let mut out = ArrayVec::new();
        if let Some(id) = self.base {
            out.push((Layer::Base, id));
        }
        if let Some(id) = self.top {
            out.push((Layer::Top, id));
        }
        out
    }

    /// Clear the topmost layer and return the removed block
    pub fn remove_top(&mut self) -> Option<BlockId> {
        self.top.take().or_else(|| self.base.take())
    }

    /// Clear both layers in place, returning the removed blocks
    pub fn clear(&mut self) -> ArrayVec<(Layer, BlockId), 2> {
        let removed = self.blocks();
        *self = Self::new();
        removed
    }
}
