use blockshot::core::{CellSnapshot, Grid, GridSnapshot, LevelPattern};
use blockshot::term::{color_rgb, AnchorY, GridView, HudState, Viewport};
use blockshot::types::BlockColor;

fn snapshot(rows: &[&[(u8, u8)]]) -> GridSnapshot {
    Grid::from_source(&LevelPattern::from_rows(rows))
        .unwrap()
        .snapshot()
}

#[test]
fn term_view_renders_border_corners() {
    // 3x2 grid, 2 chars per cell => 6x2 interior, 8x4 frame
    let snap = snapshot(&[&[(1, 0), (0, 0), (3, 0)], &[(0, 0), (0, 0), (0, 0)]]);
    let view = GridView::default().with_anchor_y(AnchorY::Top);
    let fb = view.render(&snap, &HudState::default(), Viewport::new(8, 6));

    assert_eq!(view.frame_size(&snap), (8, 4));
    assert_eq!(fb.get(0, 0).unwrap().ch, '┌');
    assert_eq!(fb.get(7, 0).unwrap().ch, '┐');
    assert_eq!(fb.get(0, 3).unwrap().ch, '└');
    assert_eq!(fb.get(7, 3).unwrap().ch, '┘');
}

#[test]
fn term_view_draws_row_zero_at_the_bottom() {
    let snap = snapshot(&[&[(1, 0), (0, 0)], &[(0, 0), (3, 0)]]);
    let view = GridView::default().with_anchor_y(AnchorY::Top);
    let fb = view.render(&snap, &HudState::default(), Viewport::new(6, 6));

    // Interior rows: y=1 is grid row 1, y=2 is grid row 0
    assert_eq!(fb.row_text(1), "│··██│");
    assert_eq!(fb.row_text(2), "│██··│");
    assert_eq!(fb.get(1, 2).unwrap().style.fg, color_rgb(BlockColor::Red));
    assert_eq!(fb.get(4, 1).unwrap().style.fg, color_rgb(BlockColor::Blue));
}

#[test]
fn term_view_draws_top_layer_over_base() {
    let mut snap = snapshot(&[&[(0, 0)]]);
    snap.cells[0] = CellSnapshot {
        base: Some(BlockColor::Orange),
        top: Some(BlockColor::Purple),
    };
    let view = GridView::default().with_anchor_y(AnchorY::Top);
    let fb = view.render(&snap, &HudState::default(), Viewport::new(4, 5));

    let cell = fb.get(1, 1).unwrap();
    assert_eq!(cell.ch, '▓');
    assert_eq!(cell.style.fg, color_rgb(BlockColor::Purple));
    assert_eq!(cell.style.bg, color_rgb(BlockColor::Orange));
    assert_eq!(fb.get(2, 1).unwrap(), cell);
}

#[test]
fn term_view_shows_progress_and_bullets() {
    let snap = snapshot(&[&[(1, 0); 6]]);
    let hud = HudState {
        bullets_left: 4,
        target: Some(BlockColor::Red),
        progress: 0.25,
        level_complete: false,
    };
    let view = GridView::default().with_anchor_y(AnchorY::Top);
    // Frame is 14x3; HUD lines follow at y=3 and y=4
    let fb = view.render(&snap, &hud, Viewport::new(14, 5));

    assert_eq!(fb.row_text(3), "[##-----]  25%");
    assert!(fb.row_text(4).starts_with("ammo 4 red"));

    let done = HudState {
        level_complete: true,
        progress: 1.0,
        ..hud
    };
    let fb = view.render(&snap, &done, Viewport::new(14, 5));
    assert!(fb.row_text(4).starts_with("CLEAR"));
    assert!(fb.row_text(3).ends_with("100%"));
}

#[test]
fn term_view_centers_in_large_viewport() {
    let snap = snapshot(&[&[(1, 0)]]);
    let view = GridView::default();
    let fb = view.render(&snap, &HudState::default(), Viewport::new(20, 15));

    // Frame 4x3 plus 2 HUD lines => 4x5 block centered in 20x15
    assert_eq!(fb.get(8, 5).unwrap().ch, '┌');
    assert_eq!(fb.get(11, 7).unwrap().ch, '┘');
}

#[test]
fn term_view_clips_grids_wider_than_the_viewport() {
    let snap = Grid::from_source(&LevelPattern::new(40_000, 1, vec![1; 40_000], vec![]))
        .unwrap()
        .snapshot();
    let view = GridView::default().with_anchor_y(AnchorY::Top);
    assert_eq!(view.frame_size(&snap), (u16::MAX, 3));

    let fb = view.render(&snap, &HudState::default(), Viewport::new(10, 5));
    assert_eq!(fb.get(0, 0).unwrap().ch, '┌');
    assert_eq!(fb.row_text(1), "│█████████");
    assert_eq!(fb.get(9, 1).unwrap().style.fg, color_rgb(BlockColor::Red));
}
