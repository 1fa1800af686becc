//! Draws a [`GridSnapshot`] and the shot HUD into a [`FrameBuffer`].
//!
//! Each grid cell is `cell_w` characters wide and one row tall. Row 0 of the
//! grid is drawn at the bottom of the frame. Below the frame sit two HUD
//! lines: a progress bar and the shot status.

use blockshot_core::{CellSnapshot, GridSnapshot};
use blockshot_types::BlockColor;

use crate::fb::{CellStyle, FrameBuffer, Rgb};

const BG: Rgb = Rgb::new(30, 30, 40);
const BORDER: Rgb = Rgb::new(200, 200, 200);
const EMPTY_FG: Rgb = Rgb::new(90, 90, 100);

const HUD_LINES: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnchorY {
    #[default]
    Center,
    Top,
}

/// Shot state shown under the grid.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HudState {
    pub bullets_left: u32,
    pub target: Option<BlockColor>,
    /// 0.0 to 1.0
    pub progress: f32,
    pub level_complete: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct GridView {
    cell_w: u16,
    anchor_y: AnchorY,
}

impl Default for GridView {
    fn default() -> Self {
        Self {
            cell_w: 2,
            anchor_y: AnchorY::Center,
        }
    }
}

pub fn color_rgb(color: BlockColor) -> Rgb {
    match color {
        BlockColor::Red => Rgb::new(220, 70, 70),
        BlockColor::Yellow => Rgb::new(240, 220, 80),
        BlockColor::Blue => Rgb::new(70, 110, 230),
        BlockColor::Green => Rgb::new(90, 210, 110),
        BlockColor::Orange => Rgb::new(255, 160, 40),
        BlockColor::Pink => Rgb::new(245, 140, 200),
        BlockColor::LightBlue => Rgb::new(120, 210, 240),
        BlockColor::Purple => Rgb::new(160, 90, 210),
    }
}

impl GridView {
    pub fn new(cell_w: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            ..Self::default()
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Frame size including the border, without the HUD lines.
    pub fn frame_size(&self, snap: &GridSnapshot) -> (u16, u16) {
        let cols = u16::try_from(snap.width).unwrap_or(u16::MAX);
        let rows = u16::try_from(snap.height).unwrap_or(u16::MAX);
        let w = cols.saturating_mul(self.cell_w).saturating_add(2);
        let h = rows.saturating_add(2);
        (w, h)
    }

    pub fn render(&self, snap: &GridSnapshot, hud: &HudState, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, hud, viewport, &mut fb);
        fb
    }

    pub fn render_into(
        &self,
        snap: &GridSnapshot,
        hud: &HudState,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let (frame_w, frame_h) = self.frame_size(snap);
        let total_h = frame_h.saturating_add(HUD_LINES);
        let start_x = viewport.width.saturating_sub(frame_w) / 2;
        let start_y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(total_h) / 2,
            AnchorY::Top => 0,
        };

        let border = CellStyle::new(BORDER, BG);
        draw_border(fb, start_x, start_y, frame_w, frame_h, border);

        // Cells past the viewport edge are not drawn.
        let left = usize::from(start_x) + 1;
        let bottom = usize::from(start_y) + usize::from(frame_h) - 2;
        for x in 0..snap.width {
            let px = x.saturating_mul(usize::from(self.cell_w)).saturating_add(left);
            let Some(px) = u16::try_from(px).ok().filter(|&px| px < viewport.width) else {
                break;
            };
            for (y, cell) in snap.column(x).iter().enumerate() {
                let Some(py) = bottom.checked_sub(y).and_then(|py| u16::try_from(py).ok()) else {
                    break;
                };
                if py >= viewport.height {
                    continue;
                }
                let (ch, style) = cell_glyph(cell);
                fb.fill_rect(px, py, self.cell_w, 1, ch, style);
            }
        }

        let hud_y = start_y.saturating_add(frame_h);
        fb.put_str(start_x, hud_y, &progress_bar(hud.progress, frame_w), CellStyle::default());
        let status = status_line(hud, snap.busy);
        let style = if hud.level_complete {
            CellStyle::new(Rgb::new(120, 240, 120), Rgb::new(0, 0, 0)).bold()
        } else {
            CellStyle::default()
        };
        fb.put_str(start_x, hud_y.saturating_add(1), &status, style);
    }
}

fn cell_glyph(cell: &CellSnapshot) -> (char, CellStyle) {
    match (cell.base, cell.top) {
        (None, None) => ('·', CellStyle::new(EMPTY_FG, BG).dim()),
        (Some(base), None) => ('█', CellStyle::new(color_rgb(base), BG)),
        (base, Some(top)) => (
            '▓',
            CellStyle::new(color_rgb(top), base.map_or(BG, color_rgb)).bold(),
        ),
    }
}

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
    if w < 2 || h < 2 {
        return;
    }
    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);
    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}

/// `[####----] 50%`, `width` characters wide when it fits.
pub fn progress_bar(progress: f32, width: u16) -> String {
    let progress = progress.clamp(0.0, 1.0);
    let bar_w = width.saturating_sub(7).max(4) as usize;
    let filled = (progress * bar_w as f32).round() as usize;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        "-".repeat(bar_w - filled),
        (progress * 100.0).round() as u32
    )
}

fn status_line(hud: &HudState, busy: bool) -> String {
    if hud.level_complete {
        return "CLEAR".to_string();
    }
    let mut line = format!("ammo {}", hud.bullets_left);
    if let Some(color) = hud.target {
        line.push(' ');
        line.push_str(color.as_str());
    }
    if busy {
        line.push_str(" *");
    }
    line
}
