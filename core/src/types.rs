/// Single coordinate axis. Signed because mining patterns spill past the grid edges.
pub type Coord = i32;

/// Grid cell as `(column, row)`.
pub type Cell = (Coord, Coord);

/// Grid dimensions as `(width, height)`.
pub type GridSize = (Coord, Coord);

/// Count type used for cell and treasure counts.
pub type CellCount = u32;

/// Propagation budget of a single mining action.
pub type Power = u32;

/// Per-hop decay modifier of a mining action, may be negative.
pub type Resistance = i32;

pub type Score = u32;

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self, size: GridSize) -> Option<Self::Output>;
}

impl ToNdIndex for Cell {
    type Output = [usize; 2];

    fn to_nd_index(self, size: GridSize) -> Option<Self::Output> {
        if in_bounds(size, self) {
            Some([self.0 as usize, self.1 as usize])
        } else {
            None
        }
    }
}

pub const fn in_bounds((width, height): GridSize, (x, y): Cell) -> bool {
    x >= 0 && y >= 0 && x < width && y < height
}

pub const fn area((width, height): GridSize) -> CellCount {
    let width = if width > 0 { width as CellCount } else { 0 };
    let height = if height > 0 { height as CellCount } else { 0 };
    width.saturating_mul(height)
}

/// Offsets `(dx, dy)` for the 4 axis neighbours: left, up, right, down.
const DISPLACEMENTS: [(Coord, Coord); 4] = [(-1, 0), (0, -1), (1, 0), (0, 1)];

/// Applies `delta` to `cell`, skipping results that would overflow.
fn apply_delta((x, y): Cell, (dx, dy): (Coord, Coord)) -> Option<Cell> {
    Some((x.checked_add(dx)?, y.checked_add(dy)?))
}

/// Iterates the 4-connected neighbours of a cell on an unbounded grid.
pub fn neighbors4(center: Cell) -> NeighborIter {
    NeighborIter { center, index: 0 }
}

#[derive(Debug)]
pub struct NeighborIter {
    center: Cell,
    index: u8,
}

impl Iterator for NeighborIter {
    type Item = Cell;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let delta = *DISPLACEMENTS.get(usize::from(self.index))?;
            self.index += 1;

            if let Some(next_item) = apply_delta(self.center, delta) {
                return Some(next_item);
            }
        }
    }
}
