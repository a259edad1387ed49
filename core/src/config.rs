use serde::{Deserialize, Serialize};

use crate::*;

/// Random placement tries per treasure before falling back to a full scan.
pub const MAX_ATTEMPTS: u32 = 30;

/// Cap on consecutive budget-selection draws that add nothing to the running total.
pub const MAX_SELECTION_DRAWS: u32 = 1000;

/// Inclusive bounds of the material stacked on each cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialRange {
    pub min: u8,
    pub max: u8,
}

impl Default for MaterialRange {
    fn default() -> Self {
        Self { min: 2, max: 6 }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub size: GridSize,
    pub score_budget: Score,
    pub max_attempts: u32,
    pub max_selection_draws: u32,
    pub material: MaterialRange,
    pub stability: u32,
}

impl SiteConfig {
    pub const fn new(size: GridSize, score_budget: Score) -> Self {
        Self {
            size,
            score_budget,
            max_attempts: MAX_ATTEMPTS,
            max_selection_draws: MAX_SELECTION_DRAWS,
            material: MaterialRange { min: 2, max: 6 },
            stability: 60,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let (width, height) = self.size;
        if width <= 0 || height <= 0 || self.material.min > self.material.max {
            return Err(DigError::InvalidConfig);
        }
        Ok(())
    }

    pub const fn total_cells(&self) -> CellCount {
        area(self.size)
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self::new((13, 10), 20)
    }
}
