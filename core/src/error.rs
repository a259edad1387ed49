use thiserror::Error;

use crate::Score;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum DigError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Treasure shape must be a non-empty rectangular mask of '#' and '.'")]
    InvalidShape,
    #[error("Placed treasures overlap or leave the grid")]
    InvalidLayout,
    #[error("Invalid site configuration")]
    InvalidConfig,
    #[error("Could not reach score budget {budget}, stopped at {reached}")]
    SelectionExhausted { budget: Score, reached: Score },
    #[error("Dig site already finished, no new strikes are accepted")]
    AlreadyEnded,
}

pub type Result<T> = core::result::Result<T, DigError>;
