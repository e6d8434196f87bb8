//! Zobrist hashing over (mailbox square, packed piece byte).
//!
//! Empty squares hash like any other cell content, so incremental
//! updates XOR the empty key back in whenever a square is vacated.

use once_cell::sync::Lazy;
use rand::prelude::*;

use crate::board::{Color, Piece, Square};
use crate::board::types::{ARR_SIZE, PIECE_INDEX_BITS};

/// Fixed seed: reproducible keys give reproducible node counts.
const ZOBRIST_SEED: u64 = 0x6c65_6973_6572;

pub(crate) struct ZobristKeys {
    // piece_keys[mailbox_square][piece_byte]
    piece_keys: [[u64; 1 << PIECE_INDEX_BITS]; ARR_SIZE],
    black_to_move_key: u64,
}

impl ZobristKeys {
    fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);
        let mut piece_keys = [[0u64; 1 << PIECE_INDEX_BITS]; ARR_SIZE];
        for square in piece_keys.iter_mut() {
            for key in square.iter_mut() {
                *key = rng.gen();
            }
        }
        let black_to_move_key = rng.gen();
        ZobristKeys {
            piece_keys,
            black_to_move_key,
        }
    }
}

static ZOBRIST: Lazy<ZobristKeys> = Lazy::new(ZobristKeys::new);

/// Key of `piece` sitting on `sq` (including the empty piece).
#[inline]
pub(crate) fn piece_key(sq: Square, piece: Piece) -> u64 {
    ZOBRIST.piece_keys[sq.mailbox_index()][piece.bits() as usize]
}

/// Toggled when black is to move.
#[inline]
pub(crate) fn side_key() -> u64 {
    ZOBRIST.black_to_move_key
}

/// Key of a board scan plus the side-to-move toggle. Positions carry
/// this incrementally; a full recompute happens only after parsing.
pub(crate) fn compute_key<F>(piece_at: F, side_to_move: Color) -> u64
where
    F: Fn(Square) -> Piece,
{
    let mut key = 0;
    for sq in Square::all() {
        key ^= piece_key(sq, piece_at(sq));
    }
    if side_to_move == Color::Black {
        key ^= side_key();
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::PieceKind;

    #[test]
    fn test_keys_are_deterministic() {
        let sq = Square::new(3, 3);
        let p = Piece::new(Color::White, PieceKind::Pawn, 2);
        assert_eq!(piece_key(sq, p), piece_key(sq, p));
        assert_ne!(piece_key(sq, p), piece_key(sq, Piece::EMPTY));
    }

    #[test]
    fn test_side_toggle_changes_key() {
        let empty = |_sq: Square| Piece::EMPTY;
        let white = compute_key(empty, Color::White);
        let black = compute_key(empty, Color::Black);
        assert_eq!(white ^ side_key(), black);
    }
}
