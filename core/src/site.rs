use alloc::vec::Vec;
use core::num::Saturating;
use core::ops::BitOr;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SiteState {
    Ready,
    Active,
    /// Every placed treasure is exposed.
    Cleared,
    /// The wall gave out first.
    Collapsed,
}

impl SiteState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Cleared | Self::Collapsed)
    }
}

impl Default for SiteState {
    fn default() -> Self {
        Self::Ready
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StrikeOutcome {
    NoChange,
    Dug,
    Collapsed,
    Cleared,
}

impl StrikeOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

impl BitOr for StrikeOutcome {
    type Output = StrikeOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use StrikeOutcome::*;
        match (self, rhs) {
            (Cleared, _) => Cleared,
            (_, Cleared) => Cleared,
            (Collapsed, _) => Collapsed,
            (_, Collapsed) => Collapsed,
            (Dug, _) => Dug,
            (_, Dug) => Dug,
            (NoChange, NoChange) => NoChange,
        }
    }
}

/// Stateful dig site: a treasure layout buried under per-cell material and a wall that
/// weakens with every strike.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DigSite {
    layout: Layout,
    material: Array2<u8>,
    stability: Saturating<u32>,
    state: SiteState,
}

impl DigSite {
    pub fn new(layout: Layout, material: Array2<u8>, stability: u32) -> Result<Self> {
        let (width, height) = layout.grid();
        if material.dim() != (width as usize, height as usize) {
            return Err(DigError::InvalidConfig);
        }
        let mut site = Self {
            layout,
            material,
            stability: Saturating(stability),
            state: SiteState::default(),
        };
        // nothing left to find (empty layout or already uncovered) counts as cleared
        if site.all_collected() {
            site.state = SiteState::Cleared;
        } else if stability == 0 {
            site.state = SiteState::Collapsed;
        }
        Ok(site)
    }

    /// Generates a layout and buries it under random material, both from `seed`.
    pub fn generate(config: &SiteConfig, pool: &TreasurePool, seed: u64) -> Result<Self> {
        let layout = RandomLayoutGenerator::new(seed).generate(config, pool)?;
        let material = random_material(config, seed);
        Self::new(layout, material, config.stability)
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn size(&self) -> GridSize {
        self.layout.grid()
    }

    pub fn state(&self) -> SiteState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn stability(&self) -> u32 {
        self.stability.0
    }

    pub fn validate_coords(&self, cell: Cell) -> Result<Cell> {
        if in_bounds(self.size(), cell) {
            Ok(cell)
        } else {
            Err(DigError::InvalidCoords)
        }
    }

    /// Material left on `cell`, zero outside the grid.
    pub fn material_at(&self, cell: Cell) -> u8 {
        cell.to_nd_index(self.size())
            .map_or(0, |index| self.material[index])
    }

    pub fn is_exposed(&self, cell: Cell) -> bool {
        self.material_at(cell) == 0
    }

    pub fn score(&self) -> Score {
        self.layout.score_of(|cell| self.is_exposed(cell))
    }

    /// Treasures whose solid cells are all uncovered.
    pub fn collected(&self) -> impl Iterator<Item = &PlacedTreasure> {
        self.layout
            .placements()
            .iter()
            .filter(|placed| placed.is_exposed_by(|cell| self.is_exposed(cell)))
    }

    /// Cells the tool would remove material from, with the amount removed.
    pub fn preview(&self, cell: Cell, tool: ToolProfile) -> Vec<(Cell, u8)> {
        tool.pattern_at(cell)
            .into_iter()
            .filter_map(|entry| {
                let material = self.material_at(entry.cell);
                let removed = entry.power.min(material.into()) as u8;
                (removed > 0).then_some((entry.cell, removed))
            })
            .collect()
    }

    pub fn strike(&mut self, cell: Cell, tool: ToolProfile) -> Result<StrikeOutcome> {
        let cell = self.validate_coords(cell)?;
        if self.state.is_finished() {
            return Err(DigError::AlreadyEnded);
        }

        let dug = self.preview(cell, tool);
        if dug.is_empty() {
            return Ok(StrikeOutcome::NoChange);
        }

        let size = self.size();
        for (dug_cell, removed) in dug {
            if let Some(index) = dug_cell.to_nd_index(size) {
                self.material[index] -= removed;
            }
        }
        self.stability -= tool.damage;
        log::debug!(
            "Strike at {:?}: stability {}, score {}",
            cell,
            self.stability.0,
            self.score()
        );

        Ok(self.settle())
    }

    fn all_collected(&self) -> bool {
        self.collected().count() == self.layout.len()
    }

    fn settle(&mut self) -> StrikeOutcome {
        if self.all_collected() {
            self.state = SiteState::Cleared;
            StrikeOutcome::Cleared
        } else if self.stability.0 == 0 {
            self.state = SiteState::Collapsed;
            StrikeOutcome::Collapsed
        } else {
            self.state = SiteState::Active;
            StrikeOutcome::Dug
        }
    }
}

/// Fills the grid with material amounts drawn uniformly from `config.material`.
pub fn random_material(config: &SiteConfig, seed: u64) -> Array2<u8> {
    use rand::prelude::*;

    // decorrelate from the layout stream that shares the seed
    let mut rng = SmallRng::seed_from_u64(seed ^ 0x6d61_7465_7269_616c);
    let (width, height) = config.size;
    let MaterialRange { min, max } = config.material;
    Array2::from_shape_simple_fn(
        [width.max(0) as usize, height.max(0) as usize],
        || rng.random_range(min..=max),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(size: GridSize, treasures: &[(&[&str], Cell)]) -> Layout {
        let mut builder = crate::layout::LayoutBuilder::new(size);
        for (index, &(rows, origin)) in treasures.iter().enumerate() {
            let shape = TreasureShape::from_rows("gem", rows, index as Score + 1).unwrap();
            builder.commit(&shape, origin);
        }
        builder.finish().0
    }

    fn site(size: GridSize, depth: u8, stability: u32, treasures: &[(&[&str], Cell)]) -> DigSite {
        let material = Array2::from_elem([size.0 as usize, size.1 as usize], depth);
        DigSite::new(layout(size, treasures), material, stability).unwrap()
    }

    #[test]
    fn pickaxe_removes_residual_power() {
        let mut site = site((5, 5), 3, 10, &[(&["#"], (4, 4))]);

        let outcome = site.strike((2, 2), Tool::Pickaxe.profile()).unwrap();

        assert_eq!(outcome, StrikeOutcome::Dug);
        assert_eq!(site.state(), SiteState::Active);
        assert_eq!(site.material_at((2, 2)), 0);
        assert_eq!(site.material_at((2, 1)), 2);
        assert_eq!(site.material_at((1, 1)), 3);
        assert_eq!(site.stability(), 9);
    }

    #[test]
    fn pattern_is_clipped_to_grid() {
        let mut site = site((2, 2), 1, 10, &[(&["#"], (1, 1))]);

        site.strike((0, 0), Tool::Pickaxe.profile()).unwrap();

        assert_eq!(site.material_at((0, 0)), 0);
        assert_eq!(site.material_at((1, 0)), 0);
        assert_eq!(site.material_at((0, 1)), 0);
        assert_eq!(site.material_at((1, 1)), 1);
    }

    #[test]
    fn exhausted_cells_do_not_cost_stability() {
        let mut site = site((3, 3), 1, 10, &[(&["#"], (2, 2))]);
        let tool = ToolProfile::new(1, -5, 4);

        assert_eq!(site.strike((0, 0), tool).unwrap(), StrikeOutcome::Dug);
        assert_eq!(site.strike((0, 0), tool).unwrap(), StrikeOutcome::NoChange);
        assert_eq!(site.stability(), 6);
    }

    #[test]
    fn partial_exposure_scores_nothing() {
        let mut site = site((4, 1), 1, 10, &[(&["##"], (0, 0)), (&["##"], (2, 0))]);
        let tool = ToolProfile::new(1, -5, 1);

        site.strike((0, 0), tool).unwrap();
        site.strike((1, 0), tool).unwrap();
        site.strike((2, 0), tool).unwrap();

        assert_eq!(site.score(), 1);
        assert_eq!(site.collected().count(), 1);
        assert_eq!(site.strike((3, 0), tool).unwrap(), StrikeOutcome::Cleared);
        assert_eq!(site.score(), 3);
        assert!(site.is_finished());
    }

    #[test]
    fn wall_collapses_when_stability_runs_out() {
        let mut site = site((4, 4), 9, 3, &[(&["#"], (3, 3))]);

        assert_eq!(
            site.strike((0, 0), Tool::Hammer.profile()).unwrap(),
            StrikeOutcome::Dug
        );
        assert_eq!(
            site.strike((0, 0), Tool::Hammer.profile()).unwrap(),
            StrikeOutcome::Collapsed
        );
        assert_eq!(site.stability(), 0);
        assert_eq!(
            site.strike((1, 1), Tool::Pickaxe.profile()),
            Err(DigError::AlreadyEnded)
        );
    }

    #[test]
    fn rejects_out_of_grid_strikes() {
        let mut site = site((2, 2), 1, 5, &[(&["#"], (0, 0))]);
        assert_eq!(
            site.strike((2, 0), Tool::Pickaxe.profile()),
            Err(DigError::InvalidCoords)
        );
    }

    #[test]
    fn empty_layout_starts_cleared() {
        let mut site = DigSite::new(Layout::empty((3, 3)), Array2::from_elem([3, 3], 2), 5).unwrap();

        assert_eq!(site.state(), SiteState::Cleared);
        assert_eq!(site.score(), 0);
        assert_eq!(
            site.strike((1, 1), Tool::Pickaxe.profile()),
            Err(DigError::AlreadyEnded)
        );
        assert_eq!(site.material_at((1, 1)), 2);
    }

    #[test]
    fn buried_layout_starts_ready() {
        let site = site((3, 3), 1, 5, &[(&["#"], (1, 1))]);
        assert_eq!(site.state(), SiteState::Ready);
    }

    #[test]
    fn material_must_match_layout_grid() {
        let material = Array2::from_elem([3, 2], 1);
        assert_eq!(
            DigSite::new(Layout::empty((2, 3)), material, 5),
            Err(DigError::InvalidConfig)
        );
    }

    #[test]
    fn outcomes_merge_by_priority() {
        use StrikeOutcome::*;
        assert_eq!(Dug | Cleared, Cleared);
        assert_eq!(Collapsed | Dug, Collapsed);
        assert_eq!(NoChange | Dug, Dug);
        assert_eq!(NoChange | NoChange, NoChange);
        assert!(!NoChange.has_update());
    }

    #[test]
    fn random_material_respects_range() {
        let mut config = SiteConfig::new((6, 4), 0);
        config.material = MaterialRange { min: 2, max: 4 };

        let material = random_material(&config, 5);

        assert_eq!(material.dim(), (6, 4));
        assert!(material.iter().all(|&depth| (2..=4).contains(&depth)));
        assert_eq!(material, random_material(&config, 5));
    }
}
