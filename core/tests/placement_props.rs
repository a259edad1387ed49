//! Property tests for treasure placement: overlap freedom, bounds, determinism.
use std::collections::HashSet;

use digsite_core::{
    DigError, LayoutGenerator, PlacementFailed, RandomLayoutGenerator, SiteConfig, TreasurePool,
    TreasureShape,
};
use proptest::prelude::*;

fn sample_pool() -> TreasurePool {
    [
        ("pebble", &["#"][..], 1),
        ("bone", &["###"], 2),
        ("hook", &["##", "#."], 3),
        ("plate", &["##", "##"], 4),
        ("fossil", &[".#.", "###", ".#."], 6),
    ]
    .into_iter()
    .map(|(name, rows, score)| TreasureShape::from_rows(name, rows, score).unwrap())
    .collect()
}

#[test]
fn single_bar_blocks_overlapping_shapes() {
    let bar = TreasureShape::from_rows("bar", &["##"], 5).unwrap();
    let pool = TreasurePool::new(vec![bar]);

    let layout = RandomLayoutGenerator::new(42)
        .generate(&SiteConfig::new((10, 10), 5), &pool)
        .unwrap();
    assert_eq!(layout.len(), 1);

    let occupancy = layout.occupancy();
    let bar_cells: HashSet<_> = layout.placements()[0].solid_cells().collect();
    let block = TreasureShape::from_rows("block", &["##", "##"], 1).unwrap();
    let mut blocked = 0;
    // every origin keeps the block inside the grid, so only overlap can reject it
    for bx in 0..=8 {
        for by in 0..=8 {
            let overlaps = block
                .solid_cells_at((bx, by))
                .any(|cell| bar_cells.contains(&cell));
            blocked += usize::from(overlaps);
            assert_eq!(occupancy.can_place(&block, (bx, by)), !overlaps, "({bx}, {by})");
        }
    }
    assert!(blocked >= 2, "a bar blocks at least two in-grid block origins");
}

#[test]
fn shape_larger_than_grid_reports_failure() {
    let pool = TreasurePool::new(vec![TreasureShape::solid("boulder", (2, 3), 1).unwrap()]);

    let layout = RandomLayoutGenerator::new(0)
        .generate(&SiteConfig::new((1, 1), 1), &pool)
        .unwrap();

    assert!(layout.is_empty());
    assert_eq!(
        layout.failures(),
        [PlacementFailed {
            shape: "boulder".into(),
            size: (2, 3)
        }]
    );
}

#[test]
fn layout_survives_json_round_trip() {
    let layout = RandomLayoutGenerator::new(5)
        .generate(&SiteConfig::new((8, 8), 12), &sample_pool())
        .unwrap();

    let json = serde_json::to_string(&layout).unwrap();
    assert_eq!(serde_json::from_str::<digsite_core::Layout>(&json).unwrap(), layout);
}

proptest! {
    #[test]
    fn placements_never_overlap(
        seed in any::<u64>(),
        width in 1i32..12,
        height in 1i32..12,
        budget in 0u32..40,
    ) {
        let layout = RandomLayoutGenerator::new(seed)
            .generate(&SiteConfig::new((width, height), budget), &sample_pool())
            .unwrap();

        let mut union = HashSet::new();
        let mut solid_total = 0;
        for placed in layout.placements() {
            let (w, h) = placed.shape.size();
            let (x, y) = placed.origin;
            prop_assert!(x >= 0 && y >= 0 && x + w <= width && y + h <= height);
            for cell in placed.solid_cells() {
                solid_total += 1;
                union.insert(cell);
            }
        }
        prop_assert_eq!(union.len(), solid_total);

        let occupancy = layout.occupancy();
        prop_assert_eq!(occupancy.len() as usize, union.len());
        prop_assert_eq!(occupancy.cells().collect::<HashSet<_>>(), union);

        let placed_score: u32 = layout.total_score();
        let failed = layout.failures().len();
        prop_assert!(placed_score <= budget);
        prop_assert!(failed == 0 || placed_score < budget);
    }

    #[test]
    fn generation_is_deterministic(seed in any::<u64>(), budget in 0u32..30) {
        let config = SiteConfig::new((9, 9), budget);
        let pool = sample_pool();

        let first = RandomLayoutGenerator::new(seed).generate(&config, &pool);
        let second = RandomLayoutGenerator::new(seed).generate(&config, &pool);

        prop_assert_eq!(first, second);
    }

    #[test]
    fn budget_without_fitting_shape_is_exhausted(seed in any::<u64>(), budget in 1u32..5) {
        let pool = TreasurePool::new(vec![TreasureShape::solid("crown", (1, 1), 5).unwrap()]);

        prop_assert_eq!(
            RandomLayoutGenerator::new(seed).generate(&SiteConfig::new((4, 4), budget), &pool),
            Err(DigError::SelectionExhausted { budget, reached: 0 })
        );
    }
}
