//! Grid tests - removal, compaction and the mutation lease

use blockshot::core::{Grid, GridEvent, LevelPattern};
use blockshot::types::{BlockColor, Layer};

fn grid(rows: &[&[(u8, u8)]]) -> Grid {
    Grid::from_source(&LevelPattern::from_rows(rows)).unwrap()
}

/// Topmost colors of column `x`, bottom row first.
fn column_colors(g: &Grid, x: usize) -> Vec<Option<BlockColor>> {
    (0..g.height()).map(|y| g.topmost_color(x, y)).collect()
}

#[test]
fn test_compact_already_compact_column_is_unchanged() {
    // Column 0 = [Red, Blue], column 1 empty
    let mut g = grid(&[&[(1, 0), (0, 0)], &[(3, 0), (0, 0)]]);
    let before: Vec<_> = g.column(0).unwrap().to_vec();

    assert!(g.compact_column(0));
    assert_eq!(g.column(0).unwrap(), before.as_slice());
    assert_eq!(
        column_colors(&g, 0),
        vec![Some(BlockColor::Red), Some(BlockColor::Blue)]
    );
    assert_eq!(column_colors(&g, 1), vec![None, None]);
}

#[test]
fn test_remove_then_compact_drops_block() {
    let mut g = grid(&[&[(1, 0), (0, 0)], &[(3, 0), (0, 0)]]);
    let blue = g.stack(0, 1).unwrap().base.unwrap();

    assert!(g.remove_block_at(0, 0));
    assert!(g.stack(0, 0).unwrap().is_empty());
    assert!(g.compact_column(0));

    assert_eq!(g.stack(0, 0).unwrap().base, Some(blue));
    assert!(g.stack(0, 1).unwrap().is_empty());
}

#[test]
fn test_remove_out_of_bounds_or_empty_returns_false() {
    let mut g = grid(&[&[(1, 0), (0, 0)]]);
    assert!(!g.remove_block_at(2, 0));
    assert!(!g.remove_block_at(0, 1));
    assert!(!g.remove_block_at(1, 0));
    assert!(!g.compact_column(5));
    assert_eq!(g.remaining_block_count(), 1);
}

#[test]
fn test_remove_takes_top_layer_first() {
    let mut g = grid(&[&[(1, 4)]]);
    assert_eq!(g.topmost_color(0, 0), Some(BlockColor::Green));

    assert!(g.remove_block_at(0, 0));
    assert_eq!(g.topmost_color(0, 0), Some(BlockColor::Red));
    assert!(g.stack(0, 0).unwrap().has_base());
    assert!(!g.stack(0, 0).unwrap().has_top());

    assert!(g.remove_block_at(0, 0));
    assert!(g.stack(0, 0).unwrap().is_empty());
    assert!(!g.remove_block_at(0, 0));
}

#[test]
fn test_remaining_count_never_increases() {
    let mut g = grid(&[
        &[(1, 2), (3, 0), (4, 4)],
        &[(0, 0), (2, 0), (1, 0)],
        &[(5, 0), (0, 0), (6, 7)],
    ]);
    let mut last = g.remaining_block_count();
    assert_eq!(last, 10);

    let ops: &[(usize, usize)] = &[(0, 0), (2, 2), (1, 1), (0, 0), (2, 0), (0, 2), (1, 0)];
    for &(x, y) in ops {
        g.remove_block_at(x, y);
        let now = g.remaining_block_count();
        assert!(now <= last);
        last = now;

        g.compact_all();
        assert_eq!(g.remaining_block_count(), last);
    }
}

#[test]
fn test_busy_grid_rejects_plain_mutations() {
    let mut g = grid(&[&[(1, 0)], &[(3, 0)]]);
    let blue = g.stack(0, 1).unwrap().base.unwrap();
    let lease = g.try_lease().unwrap();

    assert!(!g.remove_block_at(0, 0));
    assert!(!g.remove_specific_block(blue));
    assert!(!g.compact_column(0));
    assert!(!g.compact_all());
    assert_eq!(g.remaining_block_count(), 2);

    // The lease holder still gets through.
    let mut view = g.leased(&lease).unwrap();
    assert!(view.remove_block_at(0, 0));
    assert!(view.compact_column(0));
    drop(lease);

    assert_eq!(g.stack(0, 0).unwrap().base, Some(blue));
    assert!(g.remove_block_at(0, 0));
}

#[test]
fn test_lease_release_is_explicit_or_on_drop() {
    let g = grid(&[&[(1, 0)]]);
    let lease = g.try_lease().unwrap();
    lease.release();
    assert!(!g.is_busy());

    {
        let _lease = g.try_lease().unwrap();
        assert!(g.is_busy());
    }
    assert!(!g.is_busy());
}

#[test]
fn test_mutations_publish_events() {
    let mut g = grid(&[&[(1, 2)]]);
    let (_, mut rx) = g.events().subscribe_channel();
    let base = g.stack(0, 0).unwrap().base.unwrap();
    let top = g.stack(0, 0).unwrap().top.unwrap();

    assert!(g.remove_specific_block(base));
    let events: Vec<_> = std::iter::from_fn(|| rx.try_recv().ok()).collect();
    assert_eq!(
        events,
        vec![
            GridEvent::BlockDestroyed { id: top },
            GridEvent::BlockDestroyed { id: base },
            GridEvent::GridChanged,
        ]
    );
}

#[test]
fn test_announce_blocks_mirrors_population() {
    let mut g = grid(&[&[(1, 2), (3, 0)]]);
    let (_, mut rx) = g.events().subscribe_channel();
    g.announce_blocks();

    let spawned: Vec<_> = std::iter::from_fn(|| rx.try_recv().ok())
        .filter_map(|e| match e {
            GridEvent::BlockSpawned { id, color, layer, .. } => Some((id, color, layer)),
            _ => None,
        })
        .collect();
    assert_eq!(spawned.len(), 3);
    assert!(spawned.windows(2).all(|w| w[0].0 < w[1].0));
    assert!(spawned.contains(&(
        g.stack(0, 0).unwrap().top.unwrap(),
        BlockColor::Yellow,
        Layer::Top
    )));
}
