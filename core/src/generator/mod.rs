use alloc::vec::Vec;

use crate::*;
pub use random::*;

mod random;

pub trait LayoutGenerator {
    fn generate(self, config: &SiteConfig, pool: &TreasurePool) -> Result<Layout>;
}

/// Read-only set of treasure shapes that layouts draw from.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TreasurePool {
    shapes: Vec<TreasureShape>,
}

impl TreasurePool {
    pub fn new(shapes: Vec<TreasureShape>) -> Self {
        Self { shapes }
    }

    pub fn shapes(&self) -> &[TreasureShape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Whether any shape is worth at most `remaining`.
    pub fn fits_within(&self, remaining: Score) -> bool {
        self.shapes.iter().any(|shape| shape.score() <= remaining)
    }
}

impl FromIterator<TreasureShape> for TreasurePool {
    fn from_iter<I: IntoIterator<Item = TreasureShape>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
