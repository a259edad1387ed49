use core::cmp::Reverse;

use rand::prelude::*;

use super::*;
use crate::layout::LayoutBuilder;

/// Generation strategy that draws treasures at random until the score budget is met, then
/// packs them largest-first at random positions, scanning the whole grid for any that
/// random tries could not fit.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomLayoutGenerator {
    seed: u64,
}

impl RandomLayoutGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl LayoutGenerator for RandomLayoutGenerator {
    fn generate(self, config: &SiteConfig, pool: &TreasurePool) -> Result<Layout> {
        config.validate()?;

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut selection =
            select_within_budget(&mut rng, pool, config.score_budget, config.max_selection_draws)?;

        // bigger boxes first, ties keep draw order
        selection.sort_by_key(|shape| Reverse(shape.area()));

        let mut builder = LayoutBuilder::new(config.size);
        let mut unplaced = Vec::new();
        for shape in selection {
            match place_randomly(&mut rng, &builder, shape, config.max_attempts) {
                Some(origin) => builder.commit(shape, origin),
                None => unplaced.push(shape),
            }
        }

        for shape in unplaced {
            log::debug!("Random placement failed for {:?}, scanning grid", shape.name());
            match scan_for_fit(&builder, shape) {
                Some(origin) => builder.commit(shape, origin),
                None => builder.record_failure(shape),
            }
        }

        let (layout, occupancy) = builder.finish();
        log::debug!(
            "Generated layout: {} treasures, {} failed, {} cells occupied, score {}",
            layout.len(),
            layout.failures().len(),
            occupancy.len(),
            layout.total_score()
        );
        Ok(layout)
    }
}

/// Draws shapes uniformly, keeping each one that does not overshoot the budget, until the
/// running total reaches the budget exactly.
///
/// `max_stalled` caps consecutive draws that leave the total unchanged, so pools whose
/// fitting shapes are all worth zero cannot spin forever.
fn select_within_budget<'a>(
    rng: &mut SmallRng,
    pool: &'a TreasurePool,
    budget: Score,
    max_stalled: u32,
) -> Result<Vec<&'a TreasureShape>> {
    let mut selection = Vec::new();
    let mut total: Score = 0;
    let mut draws: u64 = 0;
    let mut stalled = 0;

    while total < budget {
        let remaining = budget - total;
        if stalled >= max_stalled || !pool.fits_within(remaining) {
            log::warn!(
                "Treasure selection exhausted after {} draws, reached {} of {}",
                draws,
                total,
                budget
            );
            return Err(DigError::SelectionExhausted {
                budget,
                reached: total,
            });
        }
        draws += 1;

        let shape = &pool.shapes()[rng.random_range(0..pool.len())];
        if shape.score() > remaining {
            stalled += 1;
            continue;
        }
        selection.push(shape);
        if shape.score() == 0 {
            stalled += 1;
        } else {
            total += shape.score();
            stalled = 0;
        }
    }

    log::debug!(
        "Selected {} treasures worth {} in {} draws",
        selection.len(),
        total,
        draws
    );
    Ok(selection)
}

/// Largest valid top-left corner for `shape`, or `None` when it cannot fit at all.
fn origin_limits(grid: GridSize, shape: &TreasureShape) -> Option<Cell> {
    let (width, height) = shape.size();
    let max_x = grid.0 - width;
    let max_y = grid.1 - height;
    (max_x >= 0 && max_y >= 0).then_some((max_x, max_y))
}

fn place_randomly(
    rng: &mut SmallRng,
    builder: &LayoutBuilder,
    shape: &TreasureShape,
    max_attempts: u32,
) -> Option<Cell> {
    let (max_x, max_y) = origin_limits(builder.size(), shape)?;

    (0..max_attempts).find_map(|attempt| {
        let origin = (rng.random_range(0..=max_x), rng.random_range(0..=max_y));
        log::trace!("{:?} attempt {} at {:?}", shape.name(), attempt, origin);
        builder.can_place(shape, origin).then_some(origin)
    })
}

/// First fitting top-left corner in row-major order.
fn scan_for_fit(builder: &LayoutBuilder, shape: &TreasureShape) -> Option<Cell> {
    let (max_x, max_y) = origin_limits(builder.size(), shape)?;

    (0..=max_y)
        .flat_map(|y| (0..=max_x).map(move |x| (x, y)))
        .find(|&origin| builder.can_place(shape, origin))
}
