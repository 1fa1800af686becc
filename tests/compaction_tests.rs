//! Compaction properties over a spread of hand-built layouts

use blockshot::core::{BlockStack, Grid, LevelPattern};

/// Layouts with gaps at the bottom, in the middle and at the top of columns.
fn layouts() -> Vec<LevelPattern> {
    vec![
        LevelPattern::from_rows(&[
            &[(0, 0), (1, 0), (0, 2)],
            &[(3, 0), (0, 0), (0, 0)],
            &[(0, 0), (4, 5), (6, 0)],
            &[(7, 8), (0, 0), (0, 0)],
        ]),
        LevelPattern::from_rows(&[&[(0, 0)], &[(0, 0)], &[(0, 0)], &[(2, 0)]]),
        LevelPattern::from_rows(&[
            &[(1, 0), (2, 0)],
            &[(3, 0), (4, 0)],
            &[(5, 0), (6, 0)],
        ]),
        LevelPattern::new(3, 3, vec![0, 1, 0, 0, 0, 0, 2, 0, 3], vec![0, 4, 0, 0, 0, 5, 0, 0, 0]),
    ]
}

fn occupied(column: &[BlockStack]) -> Vec<BlockStack> {
    column.iter().copied().filter(|s| !s.is_empty()).collect()
}

#[test]
fn test_compaction_preserves_order_and_occupancy() {
    for level in layouts() {
        let mut g = Grid::from_source(&level).unwrap();
        let total = g.remaining_block_count();
        let before: Vec<Vec<BlockStack>> = (0..g.width())
            .map(|x| occupied(g.column(x).unwrap()))
            .collect();

        assert!(g.compact_all());

        assert_eq!(g.remaining_block_count(), total);
        for (x, expected) in before.iter().enumerate() {
            let column = g.column(x).unwrap();
            // Same stacks, same relative order, packed from row 0.
            assert_eq!(&column[..expected.len()], expected.as_slice());
            assert!(column[expected.len()..].iter().all(BlockStack::is_empty));
        }
    }
}

#[test]
fn test_compaction_is_idempotent() {
    for level in layouts() {
        let mut g = Grid::from_source(&level).unwrap();
        g.compact_all();
        let once: Vec<Vec<BlockStack>> =
            (0..g.width()).map(|x| g.column(x).unwrap().to_vec()).collect();

        g.compact_all();
        let twice: Vec<Vec<BlockStack>> =
            (0..g.width()).map(|x| g.column(x).unwrap().to_vec()).collect();
        assert_eq!(once, twice);
    }
}

#[test]
fn test_compaction_leaves_no_gap_below_occupied_cell() {
    for level in layouts() {
        let mut g = Grid::from_source(&level).unwrap();
        g.compact_all();
        for x in 0..g.width() {
            let column = g.column(x).unwrap();
            for y in 1..g.height() {
                if !column[y].is_empty() {
                    assert!(!column[y - 1].is_empty(), "gap below ({}, {})", x, y);
                }
            }
        }
    }
}

#[test]
fn test_compaction_moves_stacks_as_a_unit() {
    // Column 0: empty row 0, red base under a yellow top at row 1
    let mut g = Grid::from_source(&LevelPattern::from_rows(&[&[(0, 0)], &[(1, 2)]])).unwrap();
    let stack = *g.stack(0, 1).unwrap();

    assert!(g.compact_column(0));
    assert_eq!(*g.stack(0, 0).unwrap(), stack);
    assert!(g.stack(0, 1).unwrap().is_empty());
}
