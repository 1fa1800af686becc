//! Settle animation - frame-stepped interpolation of block positions
//!
//! Each block moves from its position at animation start to its grid-aligned
//! target. Normalized time advances by `elapsed / duration` per tick *before*
//! easing, so the first tick already moves blocks. Once normalized time reaches 1
//! every block is snapped exactly to its target.
//!
//! Blocks destroyed mid-animation are skipped; they never fail the batch.

use glam::Vec3;

use crate::types::BlockId;

/// Position storage the animation writes into.
pub trait BlockPositions {
    fn position(&self, id: BlockId) -> Option<Vec3>;

    /// Returns false when `id` no longer exists.
    fn set_position(&mut self, id: BlockId, position: Vec3) -> bool;
}

/// Start and target of a single block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Track {
    pub id: BlockId,
    pub start: Vec3,
    pub target: Vec3,
}

/// Smooth Hermite easing on `[0, 1]`; input is clamped.
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[derive(Debug, Clone)]
pub struct SettleAnimation {
    tracks: Vec<Track>,
    duration_ms: u32,
    t: f32,
    finished: bool,
}

impl SettleAnimation {
    pub fn new(tracks: Vec<Track>, duration_ms: u32) -> Self {
        Self {
            tracks,
            duration_ms,
            t: 0.0,
            finished: false,
        }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    /// Normalized time, clamped to `[0, 1]`
    pub fn progress(&self) -> f32 {
        self.t.min(1.0)
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advance by one tick. Returns true once the animation has finished.
    pub fn advance<P: BlockPositions + ?Sized>(&mut self, elapsed_ms: u32, store: &mut P) -> bool {
        if self.finished {
            return true;
        }

        if self.duration_ms == 0 {
            self.t = 1.0;
        } else {
            self.t += elapsed_ms as f32 / self.duration_ms as f32;
        }

        if self.t >= 1.0 {
            self.finish(store);
            return true;
        }

        let ease = smoothstep(self.t);
        for track in &self.tracks {
            store.set_position(track.id, track.start.lerp(track.target, ease));
        }
        false
    }

    /// Snap every remaining block to its target.
    pub fn finish<P: BlockPositions + ?Sized>(&mut self, store: &mut P) {
        for track in &self.tracks {
            store.set_position(track.id, track.target);
        }
        self.t = 1.0;
        self.finished = true;
    }
}
