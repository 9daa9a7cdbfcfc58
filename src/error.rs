use thiserror::Error;

use crate::moves::Move;
use crate::state::PieceId;

#[derive(Debug, Error)]
pub enum PuzzleError {
    /// The grid description does not match its declared dimensions.
    #[error("malformed input at line {line}: {reason}")]
    MalformedInput { line: usize, reason: String },
    #[error("the piece '{0}' does not exist")]
    PieceNotFound(PieceId),
    #[error("illegal move: {0}")]
    IllegalMove(Move),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PuzzleError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        PuzzleError::MalformedInput {
            line,
            reason: reason.into(),
        }
    }
}
