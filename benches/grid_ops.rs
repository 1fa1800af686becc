use criterion::{black_box, criterion_group, criterion_main, Criterion};
use blockshot::core::{Grid, InstantLauncher, LevelPattern, ShotPhase, ShotResolver};
use blockshot::types::{BlockColor, TICK_MS};

/// 12x16 level cycling through every color, with a top layer on every third cell.
fn level() -> LevelPattern {
    let (w, h) = (12usize, 16usize);
    let base = (0..w * h).map(|i| (i % 8) as u8 + 1).collect();
    let top = (0..w * h)
        .map(|i| if i % 3 == 0 { (i % 5) as u8 + 1 } else { 0 })
        .collect();
    LevelPattern::new(w, h, base, top)
}

fn bench_build(c: &mut Criterion) {
    let level = level();
    c.bench_function("grid_from_source", |b| {
        b.iter(|| Grid::from_source(black_box(&level)).unwrap())
    });
}

fn bench_remove_and_compact(c: &mut Criterion) {
    let level = level();
    c.bench_function("remove_row0_compact_all", |b| {
        b.iter(|| {
            let mut grid = Grid::from_source(&level).unwrap();
            for x in 0..grid.width() {
                grid.remove_block_at(x, 0);
            }
            grid.compact_all();
            grid
        })
    });
}

fn bench_settle(c: &mut Criterion) {
    let level = level();
    c.bench_function("settle_animation_150ms", |b| {
        b.iter(|| {
            let mut grid = Grid::from_source(&level).unwrap();
            let mut anim = grid.animate_settle(150);
            while !grid.advance_settle(&mut anim, black_box(TICK_MS)) {}
            grid
        })
    });
}

fn bench_shot(c: &mut Criterion) {
    let level = level();
    c.bench_function("shot_8_red_instant", |b| {
        b.iter(|| {
            let mut grid = Grid::from_source(&level).unwrap();
            let mut resolver = ShotResolver::default();
            let mut launcher = InstantLauncher::new();
            resolver.shoot(&mut grid, 8, BlockColor::Red);
            while resolver.tick(&mut grid, &mut launcher, TICK_MS) != ShotPhase::Idle {}
            grid.remaining_block_count()
        })
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let grid = Grid::from_source(&level()).unwrap();
    let mut snap = grid.snapshot();
    c.bench_function("snapshot_into", |b| {
        b.iter(|| {
            grid.snapshot_into(black_box(&mut snap));
        })
    });
}

criterion_group!(
    benches,
    bench_build,
    bench_remove_and_compact,
    bench_settle,
    bench_shot,
    bench_snapshot
);
criterion_main!(benches);
