use thiserror::Error;

/// Rejections raised while building a [`crate::puzzle::PuzzleState`] from outside input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("expected 9 tiles, got {0}")]
    WrongTileCount(usize),
    #[error("tile {0} is outside 0..=8")]
    TileOutOfRange(u8),
    #[error("tile {0} appears more than once")]
    DuplicateTile(u8),
    #[error("cannot read tile from {0:?}")]
    InvalidToken(String),
}
