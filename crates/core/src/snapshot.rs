use serde::Serialize;

use crate::grid::Grid;
use crate::types::BlockColor;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct CellSnapshot {
    #[serde(serialize_with = "ser_color")]
    pub base: Option<BlockColor>,
    #[serde(serialize_with = "ser_color")]
    pub top: Option<BlockColor>,
}

impl CellSnapshot {
    pub fn is_empty(&self) -> bool {
        self.base.is_none() && self.top.is_none()
    }

    pub fn topmost(&self) -> Option<BlockColor> {
        self.top.or(self.base)
    }
}

fn ser_color<S: serde::Serializer>(c: &Option<BlockColor>, s: S) -> Result<S::Ok, S::Error> {
    match c {
        Some(color) => s.serialize_some(color.as_str()),
        None => s.serialize_none(),
    }
}

/// Copy of the grid's contents, column-major with row 0 first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GridSnapshot {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<CellSnapshot>,
    pub busy: bool,
    pub remaining: usize,
}

impl GridSnapshot {
    pub fn cell(&self, x: usize, y: usize) -> Option<&CellSnapshot> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get(x * self.height + y)
    }

    /// Cells of column `x`, bottom row first
    pub fn column(&self, x: usize) -> &[CellSnapshot] {
        let start = (x * self.height).min(self.cells.len());
        let end = (start + self.height).min(self.cells.len());
        &self.cells[start..end]
    }
}

impl Grid {
    pub fn snapshot_into(&self, out: &mut GridSnapshot) {
        out.width = self.width();
        out.height = self.height();
        out.busy = self.is_busy();
        out.remaining = self.remaining_block_count();
        out.cells.clear();
        for x in 0..self.width() {
            for stack in self.column(x).unwrap_or_default() {
                let color = |id| self.block(id).map(|b| b.color);
                out.cells.push(CellSnapshot {
                    base: stack.base.and_then(color),
                    top: stack.top.and_then(color),
                });
            }
        }
    }

    pub fn snapshot(&self) -> GridSnapshot {
        let mut s = GridSnapshot {
            width: 0,
            height: 0,
            cells: Vec::with_capacity(self.width() * self.height()),
            busy: false,
            remaining: 0,
        };
        self.snapshot_into(&mut s);
        s
    }
}
