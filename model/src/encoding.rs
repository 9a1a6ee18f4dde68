use chess::{Board, Piece, ALL_SQUARES};

// Feature Layout (64 total):
//
// One slot per square in A1..H8 order, holding the piece-type code of the
// occupant:
//
//   [A1][B1]...[H1][A2]...[H8]
//
//   0 = empty, 1 = pawn, 2 = knight, 3 = bishop, 4 = rook, 5 = queen, 6 = king
//
// Piece color, side to move, castling rights and en-passant state are not
// part of the encoding: two positions differing only in those respects
// produce identical vectors.

pub const NUM_FEATURES: usize = 64;

/// Encodes a board position into a dense f32 feature array.
pub fn encode_board(board: &Board) -> [f32; NUM_FEATURES] {
    let mut features = [0f32; NUM_FEATURES];

    for (i, sq) in ALL_SQUARES.iter().enumerate() {
        if let Some(piece) = board.piece_on(*sq) {
            features[i] = piece_code(piece);
        }
    }

    features
}

fn piece_code(piece: Piece) -> f32 {
    match piece {
        Piece::Pawn => 1.0,
        Piece::Knight => 2.0,
        Piece::Bishop => 3.0,
        Piece::Rook => 4.0,
        Piece::Queen => 5.0,
        Piece::King => 6.0,
    }
}
