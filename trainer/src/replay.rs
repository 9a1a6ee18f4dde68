use chess::{Board, ChessMove};
use std::str::FromStr;
use thiserror::Error;

/// A move that cannot be played on the given position, either because the
/// notation does not parse or because the move is not legal there.
#[derive(Debug, Error)]
#[error("move {notation:?} cannot be played on {fen}")]
pub struct IllegalMove {
    pub notation: String,
    pub fen: String,
}

/// Applies one coordinate-notation move and returns the resulting
/// position. The input board is never mutated; on failure it is exactly
/// as it was.
pub fn apply(board: &Board, notation: &str) -> Result<Board, IllegalMove> {
    let illegal = || IllegalMove {
        notation: notation.to_string(),
        fen: board.to_string(),
    };

    let mv = ChessMove::from_str(notation).map_err(|_| illegal())?;
    if !board.legal(mv) {
        return Err(illegal());
    }

    Ok(board.make_move_new(mv))
}
