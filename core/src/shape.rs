use alloc::string::String;
use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Irregular treasure footprint: a bitmask of solid cells plus the score it is worth.
///
/// The mask is indexed `[x, y]`, like the site grids.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ShapeRecord")]
pub struct TreasureShape {
    name: String,
    mask: Array2<bool>,
    score: Score,
}

/// Unchecked wire form, validated through `TreasureShape::from_mask`.
#[derive(Deserialize)]
struct ShapeRecord {
    name: String,
    mask: Array2<bool>,
    score: Score,
}

impl TryFrom<ShapeRecord> for TreasureShape {
    type Error = DigError;

    fn try_from(record: ShapeRecord) -> Result<Self> {
        Self::from_mask(record.name, record.mask, record.score)
    }
}

impl TreasureShape {
    pub fn from_mask(name: impl Into<String>, mask: Array2<bool>, score: Score) -> Result<Self> {
        let (width, height) = mask.dim();
        if width == 0
            || height == 0
            || Coord::try_from(width).is_err()
            || Coord::try_from(height).is_err()
            || !mask.iter().any(|&solid| solid)
        {
            return Err(DigError::InvalidShape);
        }
        Ok(Self {
            name: name.into(),
            mask,
            score,
        })
    }

    /// Parses rows of `#` (solid) and `.` (empty), top row first.
    pub fn from_rows<S: AsRef<str>>(
        name: impl Into<String>,
        rows: &[S],
        score: Score,
    ) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.as_ref().chars().count());
        let mut mask = Array2::from_elem([width, height], false);

        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.chars().count() != width {
                return Err(DigError::InvalidShape);
            }
            for (x, ch) in row.chars().enumerate() {
                mask[[x, y]] = match ch {
                    '#' => true,
                    '.' => false,
                    _ => return Err(DigError::InvalidShape),
                };
            }
        }

        Self::from_mask(name, mask, score)
    }

    /// Fully solid `width`×`height` rectangle.
    pub fn solid(name: impl Into<String>, (width, height): GridSize, score: Score) -> Result<Self> {
        let width = usize::try_from(width).map_err(|_| DigError::InvalidShape)?;
        let height = usize::try_from(height).map_err(|_| DigError::InvalidShape)?;
        Self::from_mask(name, Array2::from_elem([width, height], true), score)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn score(&self) -> Score {
        self.score
    }

    /// Bounding box `(width, height)`.
    pub fn size(&self) -> GridSize {
        let (width, height) = self.mask.dim();
        // checked in from_mask
        (width as Coord, height as Coord)
    }

    /// Bounding box area, used to order shapes before packing.
    pub fn area(&self) -> CellCount {
        area(self.size())
    }

    pub fn is_solid(&self, offset: Cell) -> bool {
        offset
            .to_nd_index(self.size())
            .is_some_and(|index| self.mask[index])
    }

    /// Offsets of solid cells relative to the top-left corner, row-major.
    pub fn solid_offsets(&self) -> impl Iterator<Item = Cell> + '_ {
        let (width, height) = self.size();
        (0..height)
            .flat_map(move |y| (0..width).map(move |x| (x, y)))
            .filter(|&offset| self.is_solid(offset))
    }

    pub fn solid_count(&self) -> CellCount {
        self.mask.iter().filter(|&&solid| solid).count() as CellCount
    }

    /// Grid cells covered by solid bits when the top-left corner sits at `origin`.
    pub fn solid_cells_at(&self, (ox, oy): Cell) -> impl Iterator<Item = Cell> + '_ {
        self.solid_offsets().map(move |(dx, dy)| (ox + dx, oy + dy))
    }

    /// Renders the mask back into `#`/`.` rows.
    pub fn to_rows(&self) -> Vec<String> {
        let (width, height) = self.size();
        (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| if self.is_solid((x, y)) { '#' } else { '.' })
                    .collect()
            })
            .collect()
    }
}
