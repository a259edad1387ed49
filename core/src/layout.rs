use alloc::string::String;
use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Grid cells claimed by solid bits of placed treasures.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "OccupancyRecord")]
pub struct Occupancy {
    claimed: Array2<bool>,
    count: CellCount,
}

/// Wire form; the count is always recomputed from the mask.
#[derive(Deserialize)]
struct OccupancyRecord {
    claimed: Array2<bool>,
}

impl TryFrom<OccupancyRecord> for Occupancy {
    type Error = DigError;

    fn try_from(record: OccupancyRecord) -> Result<Self> {
        let (width, height) = record.claimed.dim();
        if Coord::try_from(width).is_err() || Coord::try_from(height).is_err() {
            return Err(DigError::InvalidLayout);
        }
        let count = record.claimed.iter().filter(|&&claimed| claimed).count();
        Ok(Self {
            count: CellCount::try_from(count).map_err(|_| DigError::InvalidLayout)?,
            claimed: record.claimed,
        })
    }
}

impl Occupancy {
    pub fn new(size: GridSize) -> Self {
        let width = usize::try_from(size.0).unwrap_or(0);
        let height = usize::try_from(size.1).unwrap_or(0);
        Self {
            claimed: Array2::default([width, height]),
            count: 0,
        }
    }

    pub fn size(&self) -> GridSize {
        let (width, height) = self.claimed.dim();
        (width as Coord, height as Coord)
    }

    pub fn len(&self) -> CellCount {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.to_nd_index(self.size())
            .is_some_and(|index| self.claimed[index])
    }

    /// Whether `shape` fits with its top-left corner at `origin`: the bounding box stays
    /// inside the grid and no solid bit lands on a claimed cell.
    pub fn can_place(&self, shape: &TreasureShape, origin: Cell) -> bool {
        let (width, height) = shape.size();
        let Some(far_corner) = origin
            .0
            .checked_add(width - 1)
            .zip(origin.1.checked_add(height - 1))
        else {
            return false;
        };
        in_bounds(self.size(), origin)
            && in_bounds(self.size(), far_corner)
            && !shape.solid_cells_at(origin).any(|cell| self.contains(cell))
    }

    /// Claims the solid cells of `shape` at `origin`. Cells outside the grid or already
    /// claimed are skipped, so the count stays the number of distinct claimed cells.
    fn claim(&mut self, shape: &TreasureShape, origin: Cell) {
        let size = self.size();
        for cell in shape.solid_cells_at(origin) {
            if let Some(index) = cell.to_nd_index(size) {
                if !self.claimed[index] {
                    self.claimed[index] = true;
                    self.count += 1;
                }
            }
        }
    }

    /// Claimed cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let (width, height) = self.size();
        (0..height)
            .flat_map(move |y| (0..width).map(move |x| (x, y)))
            .filter(|&cell| self.contains(cell))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacedTreasure {
    pub shape: TreasureShape,
    /// Top-left corner of the shape's bounding box.
    pub origin: Cell,
}

impl PlacedTreasure {
    pub fn solid_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.shape.solid_cells_at(self.origin)
    }

    /// Whether every solid cell satisfies `exposed`.
    pub fn is_exposed_by(&self, exposed: impl Fn(Cell) -> bool) -> bool {
        self.solid_cells().all(exposed)
    }
}

/// Diagnostic for a treasure that neither random nor exhaustive placement could fit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementFailed {
    pub shape: String,
    pub size: GridSize,
}

/// Result of one layout generation pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LayoutRecord")]
pub struct Layout {
    grid: GridSize,
    placements: Vec<PlacedTreasure>,
    failures: Vec<PlacementFailed>,
}

/// Wire form; placements are replayed against a fresh occupancy set on load.
#[derive(Deserialize)]
struct LayoutRecord {
    grid: GridSize,
    placements: Vec<PlacedTreasure>,
    failures: Vec<PlacementFailed>,
}

impl TryFrom<LayoutRecord> for Layout {
    type Error = DigError;

    fn try_from(record: LayoutRecord) -> Result<Self> {
        if record.grid.0 < 0 || record.grid.1 < 0 {
            return Err(DigError::InvalidLayout);
        }
        let mut occupancy = Occupancy::new(record.grid);
        for placed in &record.placements {
            if !occupancy.can_place(&placed.shape, placed.origin) {
                return Err(DigError::InvalidLayout);
            }
            occupancy.claim(&placed.shape, placed.origin);
        }
        Ok(Self {
            grid: record.grid,
            placements: record.placements,
            failures: record.failures,
        })
    }
}

impl Layout {
    pub fn empty(grid: GridSize) -> Self {
        Self {
            grid,
            placements: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn grid(&self) -> GridSize {
        self.grid
    }

    pub fn placements(&self) -> &[PlacedTreasure] {
        &self.placements
    }

    pub fn failures(&self) -> &[PlacementFailed] {
        &self.failures
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Total score over placed treasures, exposed or not.
    pub fn total_score(&self) -> Score {
        self.placements.iter().map(|placed| placed.shape.score()).sum()
    }

    /// Sums the score of treasures whose solid cells are all exposed; a partially
    /// covered treasure is worth nothing.
    pub fn score_of(&self, exposed: impl Fn(Cell) -> bool) -> Score {
        self.placements
            .iter()
            .filter(|placed| placed.is_exposed_by(&exposed))
            .map(|placed| placed.shape.score())
            .sum()
    }

    /// Index of the treasure whose solid bit covers `cell`.
    pub fn treasure_at(&self, cell: Cell) -> Option<usize> {
        self.placements
            .iter()
            .position(|placed| placed.solid_cells().any(|solid| solid == cell))
    }

    /// Rebuilds the occupancy set from the placements.
    pub fn occupancy(&self) -> Occupancy {
        let mut occupancy = Occupancy::new(self.grid);
        for placed in &self.placements {
            occupancy.claim(&placed.shape, placed.origin);
        }
        occupancy
    }
}

/// Mutable state of a single generation pass. Starts empty on every pass.
#[derive(Debug)]
pub(crate) struct LayoutBuilder {
    occupancy: Occupancy,
    layout: Layout,
}

impl LayoutBuilder {
    pub(crate) fn new(grid: GridSize) -> Self {
        Self {
            occupancy: Occupancy::new(grid),
            layout: Layout::empty(grid),
        }
    }

    pub(crate) fn size(&self) -> GridSize {
        self.occupancy.size()
    }

    pub(crate) fn can_place(&self, shape: &TreasureShape, origin: Cell) -> bool {
        self.occupancy.can_place(shape, origin)
    }

    pub(crate) fn commit(&mut self, shape: &TreasureShape, origin: Cell) {
        self.occupancy.claim(shape, origin);
        self.layout.placements.push(PlacedTreasure {
            shape: shape.clone(),
            origin,
        });
    }

    pub(crate) fn record_failure(&mut self, shape: &TreasureShape) {
        log::warn!(
            "Could not place treasure {:?} ({}x{}) anywhere",
            shape.name(),
            shape.size().0,
            shape.size().1
        );
        self.layout.failures.push(PlacementFailed {
            shape: shape.name().into(),
            size: shape.size(),
        });
    }

    pub(crate) fn finish(self) -> (Layout, Occupancy) {
        (self.layout, self.occupancy)
    }
}
