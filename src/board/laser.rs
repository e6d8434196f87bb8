//! Laser simulation by ray masks and bit scans.

use super::state::Position;
use super::tables::{RAY_FILE, RAY_RANK, REFLECT};
use super::types::{monarch_ori, Color, PieceKind, Square};

/// Trace the laser of the monarch on `monarch_sq` and return the
/// square of the piece it destroys, if any. Pawns reflect the beam off
/// their diagonal face; a beam into a pawn's back (or into a monarch)
/// stops there, and a beam that leaves the board fizzles.
///
/// Returns `None` when `monarch_sq` does not hold a monarch (absent
/// monarch slots are `Square::NONE`, which sits on the sentinel ring).
#[must_use]
pub fn fire_laser(pos: &Position, monarch_sq: Square) -> Option<Square> {
    if pos.piece_at(monarch_sq).kind() != PieceKind::Monarch {
        return None;
    }

    let pieces = pos.occupancy(Color::White) | pos.occupancy(Color::Black);
    let mut sq = monarch_sq;
    let mut beam = pos.piece_at(sq).orientation();

    loop {
        let shot = sq.bit();
        // N/S beams run along a file; E/W beams along a rank.
        let mut ray = if beam & 1 != 0 {
            RAY_RANK[sq.rank() as usize]
        } else {
            RAY_FILE[sq.file() as usize]
        };
        // Restrict to the squares strictly beyond the beam source.
        if beam & 2 != 0 {
            ray &= shot - 1;
        } else {
            ray &= (shot << 1).wrapping_neg();
        }

        let hit = ray & pieces;
        if hit == 0 {
            return None;
        }

        // First piece along the beam: lowest bit when heading N/E,
        // highest when heading S/W.
        sq = if beam & 2 != 0 {
            Square::from_dense(63 - hit.leading_zeros() as usize)
        } else {
            Square::from_dense(hit.trailing_zeros() as usize)
        };

        let piece = pos.piece_at(sq);
        if piece.kind() != PieceKind::Pawn {
            return Some(sq);
        }
        let out = REFLECT[beam as usize][piece.orientation() as usize];
        if out < 0 {
            return Some(sq);
        }
        beam = out as u8;
    }
}

/// Number of this color's monarch shots that would destroy a piece.
/// The generator emits a null-shot move exactly when this is nonzero.
#[must_use]
pub fn fire_lasers(pos: &Position, color: Color) -> u32 {
    let mut victims = 0;
    for num in 0..2 {
        if fire_laser(pos, pos.monarch(color, num)).is_some() {
            victims += 1;
        }
    }
    victims
}

// Beam direction encoding sanity: bit 0 selects the axis, bit 1 the sign.
const _: () = assert!(monarch_ori::NN & 1 == 0 && monarch_ori::SS & 1 == 0);
const _: () = assert!(monarch_ori::SS & 2 != 0 && monarch_ori::WW & 2 != 0);
