//! Grid module - column-major array of block stacks
//!
//! The grid is `width` columns of `height` rows each, addressed `[x][y]` with
//! row 0 at the bottom. It owns the block entities, their visual positions and
//! the mutation lease that keeps multi-step sequences from interleaving.
//!
//! # Mutation lease
//!
//! Structural changes (removal and compaction) are gated by a single lease.
//! While a lease is outstanding the grid reports [`Grid::is_busy`] and the plain
//! mutating methods reject the call (returning `false`, no mutation). The lease
//! holder mutates through [`Grid::leased`]. The lease is released when the
//! [`MutationLease`] guard is dropped, on every exit path.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use arrayvec::ArrayVec;
use glam::Vec3;
use log::debug;

use crate::animation::{BlockPositions, SettleAnimation, Track};
use crate::error::GridError;
use crate::events::{EventBus, GridEvent};
use crate::level::{checked_cell_count, LevelSource};
use crate::stack::BlockStack;
use crate::types::{
    BlockColor, BlockId, Layer, DEFAULT_CELL_SIZE, TOP_SETTLE_DEPTH, TOP_SPAWN_DEPTH,
};

/// A block entity. Color and layer never change; position is visual state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Block {
    pub id: BlockId,
    pub color: BlockColor,
    pub layer: Layer,
    pub position: Vec3,
}

/// Exclusive right to mutate a grid's structure.
///
/// Dropping the guard releases the lease.
#[derive(Debug)]
pub struct MutationLease {
    flag: Arc<AtomicBool>,
}

impl MutationLease {
    /// Release the lease explicitly (same as dropping it).
    pub fn release(self) {}
}

impl Drop for MutationLease {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[derive(Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    cell_size: f32,
    origin: Vec3,
    /// `columns[x][y]`, row 0 at the bottom
    columns: Vec<Vec<BlockStack>>,
    blocks: HashMap<BlockId, Block>,
    next_id: u32,
    busy: Arc<AtomicBool>,
    events: EventBus,
}

impl Grid {
    /// Build a grid from a level source with the default layout.
    pub fn from_source<S: LevelSource + ?Sized>(source: &S) -> Result<Self, GridError> {
        Self::with_layout(source, DEFAULT_CELL_SIZE, Vec3::ZERO)
    }

    /// Build a grid from a level source, placing cell `(0, 0)` at `origin`.
    pub fn with_layout<S: LevelSource + ?Sized>(
        source: &S,
        cell_size: f32,
        origin: Vec3,
    ) -> Result<Self, GridError> {
        source.validate()?;

        let width = source.width();
        let height = source.height();
        checked_cell_count(width, height)?;
        let mut grid = Self {
            width,
            height,
            cell_size,
            origin,
            columns: vec![vec![BlockStack::new(); height]; width],
            blocks: HashMap::new(),
            next_id: 1,
            busy: Arc::new(AtomicBool::new(false)),
            events: EventBus::new(),
        };

        for x in 0..width {
            for y in 0..height {
                let base_pos = grid.cell_position(x, y);
                if let Some(color) = source.block_color(Layer::Base, x, y) {
                    let id = grid.spawn(color, Layer::Base, base_pos);
                    grid.columns[x][y].base = Some(id);
                }
                if let Some(color) = source.block_color(Layer::Top, x, y) {
                    let id = grid.spawn(color, Layer::Top, base_pos + Vec3::Z * TOP_SPAWN_DEPTH);
                    grid.columns[x][y].top = Some(id);
                }
            }
        }

        debug!(
            "grid {}x{} built with {} blocks",
            width,
            height,
            grid.blocks.len()
        );
        Ok(grid)
    }

    fn spawn(&mut self, color: BlockColor, layer: Layer, position: Vec3) -> BlockId {
        let id = BlockId(self.next_id);
        self.next_id += 1;
        self.blocks.insert(
            id,
            Block {
                id,
                color,
                layer,
                position,
            },
        );
        id
    }

    fn destroy(&mut self, id: BlockId) {
        if self.blocks.remove(&id).is_some() {
            self.events.publish(GridEvent::BlockDestroyed { id });
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    /// Stack at `(x, y)`; None if out of bounds
    pub fn stack(&self, x: usize, y: usize) -> Option<&BlockStack> {
        self.columns.get(x).and_then(|col| col.get(y))
    }

    /// Column `x`, bottom row first
    pub fn column(&self, x: usize) -> Option<&[BlockStack]> {
        self.columns.get(x).map(|col| col.as_slice())
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(&id)
    }

    /// Live block entities in unspecified order
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.values()
    }

    /// Color of the topmost block at `(x, y)`
    pub fn topmost_color(&self, x: usize, y: usize) -> Option<BlockColor> {
        let id = self.stack(x, y)?.topmost()?;
        self.block(id).map(|b| b.color)
    }

    /// Grid-aligned world position of cell `(x, y)`
    pub fn cell_position(&self, x: usize, y: usize) -> Vec3 {
        self.origin + Vec3::new(x as f32 * self.cell_size, y as f32 * self.cell_size, 0.0)
    }

    /// Number of occupied layers over all cells.
    pub fn remaining_block_count(&self) -> usize {
        self.columns
            .iter()
            .flat_map(|col| col.iter())
            .map(BlockStack::len)
            .sum()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Acquire the mutation lease; None if it is already held.
    pub fn try_lease(&self) -> Option<MutationLease> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| MutationLease {
                flag: Arc::clone(&self.busy),
            })
    }

    /// Mutating view for the holder of `lease`.
    ///
    /// The view borrows the lease, so it cannot outlive it.
    pub fn leased<'a>(
        &'a mut self,
        lease: &'a MutationLease,
    ) -> Result<LeasedGrid<'a>, GridError> {
        if !Arc::ptr_eq(&lease.flag, &self.busy) {
            return Err(GridError::ForeignLease);
        }
        Ok(LeasedGrid {
            grid: self,
            _lease: lease,
        })
    }

    pub fn events(&mut self) -> &mut EventBus {
        &mut self.events
    }

    pub(crate) fn publish(&mut self, event: GridEvent) {
        self.events.publish(event);
    }

    /// Publish `BlockSpawned` for every live block, in handle order.
    ///
    /// Construction happens before anyone can subscribe, so a visual layer
    /// calls this once after subscribing to mirror the initial population.
    pub fn announce_blocks(&mut self) {
        let mut blocks: Vec<Block> = self.blocks.values().copied().collect();
        blocks.sort_by_key(|b| b.id);
        for b in blocks {
            self.events.publish(GridEvent::BlockSpawned {
                id: b.id,
                color: b.color,
                layer: b.layer,
                position: b.position,
            });
        }
    }

    /// Remove the topmost block at `(x, y)`.
    ///
    /// Returns false for out-of-range coordinates, empty cells, or while the grid is busy.
    pub fn remove_block_at(&mut self, x: usize, y: usize) -> bool {
        if self.is_busy() {
            debug!("remove_block_at({}, {}) rejected: grid busy", x, y);
            return false;
        }
        self.remove_block_at_unchecked(x, y)
    }

    /// Remove a specific block wherever it is. Rejected while the grid is busy.
    pub fn remove_specific_block(&mut self, id: BlockId) -> bool {
        if self.is_busy() {
            debug!("remove_specific_block({:?}) rejected: grid busy", id);
            return false;
        }
        self.remove_specific_block_unchecked(id)
    }

    /// Compact column `x`. Rejected (false) while busy or out of range.
    pub fn compact_column(&mut self, x: usize) -> bool {
        if self.is_busy() {
            debug!("compact_column({}) rejected: grid busy", x);
            return false;
        }
        self.compact_column_unchecked(x)
    }

    /// Compact every column. Rejected (false) while busy.
    pub fn compact_all(&mut self) -> bool {
        if self.is_busy() {
            debug!("compact_all rejected: grid busy");
            return false;
        }
        self.compact_all_unchecked();
        true
    }

    fn remove_block_at_unchecked(&mut self, x: usize, y: usize) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let Some(id) = self.columns[x][y].remove_top() else {
            return false;
        };
        self.destroy(id);
        self.events.publish(GridEvent::GridChanged);
        true
    }

    fn remove_specific_block_unchecked(&mut self, id: BlockId) -> bool {
        let mut found = None;
        'scan: for (x, col) in self.columns.iter().enumerate() {
            for (y, stack) in col.iter().enumerate() {
                if let Some(layer) = stack.layer_of(id) {
                    found = Some((x, y, layer));
                    break 'scan;
                }
            }
        }
        let Some((x, y, layer)) = found else {
            return false;
        };

        let stack = &mut self.columns[x][y];
        let mut removed = ArrayVec::<BlockId, 2>::new();
        match layer {
            Layer::Top => removed.extend(stack.top.take()),
            Layer::Base => {
                // A covered base takes its covering block with it.
                removed.extend(stack.top.take());
                removed.extend(stack.base.take());
            }
        }
        for id in removed {
            self.destroy(id);
        }
        self.events.publish(GridEvent::GridChanged);
        true
    }

    fn compact_column_unchecked(&mut self, x: usize) -> bool {
        let height = self.height;
        let Some(col) = self.columns.get_mut(x) else {
            return false;
        };

        let mut write_y = 0;
        for read_y in 0..height {
            if col[read_y].is_empty() {
                continue;
            }
            if write_y != read_y {
                col[write_y] = col[read_y];
                col[read_y].clear();
            }
            write_y += 1;
        }
        for stack in &mut col[write_y..] {
            stack.clear();
        }

        self.events.publish(GridEvent::GridChanged);
        true
    }

    fn compact_all_unchecked(&mut self) {
        for x in 0..self.width {
            self.compact_column_unchecked(x);
        }
    }

    /// Build a settle animation from every block's current position to its
    /// grid-aligned target.
    pub fn animate_settle(&self, duration_ms: u32) -> SettleAnimation {
        let mut tracks = Vec::with_capacity(self.blocks.len());
        for (x, col) in self.columns.iter().enumerate() {
            for (y, stack) in col.iter().enumerate() {
                let cell = self.cell_position(x, y);
                for (layer, id) in stack.blocks() {
                    let Some(block) = self.blocks.get(&id) else {
                        continue;
                    };
                    let target = match layer {
                        Layer::Base => cell,
                        Layer::Top => cell + Vec3::Z * TOP_SETTLE_DEPTH,
                    };
                    tracks.push(Track {
                        id,
                        start: block.position,
                        target,
                    });
                }
            }
        }
        SettleAnimation::new(tracks, duration_ms)
    }

    /// Advance `anim` by one tick; publishes `SettleComplete` when it finishes.
    pub fn advance_settle(&mut self, anim: &mut SettleAnimation, elapsed_ms: u32) -> bool {
        if anim.is_finished() {
            return true;
        }
        let done = anim.advance(elapsed_ms, self);
        if done {
            self.events.publish(GridEvent::SettleComplete);
        }
        done
    }

    /// Snap `anim` to completion immediately.
    pub fn finish_settle(&mut self, anim: &mut SettleAnimation) {
        if anim.is_finished() {
            return;
        }
        anim.finish(self);
        self.events.publish(GridEvent::SettleComplete);
    }
}

impl BlockPositions for Grid {
    fn position(&self, id: BlockId) -> Option<Vec3> {
        self.blocks.get(&id).map(|b| b.position)
    }

    fn set_position(&mut self, id: BlockId, position: Vec3) -> bool {
        match self.blocks.get_mut(&id) {
            Some(block) => {
                block.position = position;
                true
            }
            None => false,
        }
    }
}

/// Mutating view of a grid for the lease holder.
///
/// ```compile_fail
/// use blockshot_core::{Grid, LevelPattern};
///
/// let mut grid = Grid::from_source(&LevelPattern::from_rows(&[&[(1, 0)]])).unwrap();
/// let lease = grid.try_lease().unwrap();
/// let mut view = grid.leased(&lease).unwrap();
/// drop(lease);
/// view.remove_block_at(0, 0);
/// ```
#[derive(Debug)]
pub struct LeasedGrid<'a> {
    grid: &'a mut Grid,
    _lease: &'a MutationLease,
}

impl LeasedGrid<'_> {
    pub fn remove_block_at(&mut self, x: usize, y: usize) -> bool {
        self.grid.remove_block_at_unchecked(x, y)
    }

    pub fn remove_specific_block(&mut self, id: BlockId) -> bool {
        self.grid.remove_specific_block_unchecked(id)
    }

    pub fn compact_column(&mut self, x: usize) -> bool {
        self.grid.compact_column_unchecked(x)
    }

    pub fn compact_all(&mut self) {
        self.grid.compact_all_unchecked();
    }
}
