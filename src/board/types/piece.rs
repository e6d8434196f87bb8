//! Packed piece byte and colors.
//!
//! A piece is a single byte: bits 0-1 orientation, bits 2-3 kind,
//! bit 4 color. The empty square is the all-zero byte so that Zobrist
//! indexing can use the raw byte directly.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub(crate) const ORI_SHIFT: u8 = 0;
pub(crate) const ORI_MASK: u8 = 0b11;
pub(crate) const KIND_SHIFT: u8 = 2;
pub(crate) const KIND_MASK: u8 = 0b11;
pub(crate) const COLOR_SHIFT: u8 = 4;
pub(crate) const COLOR_MASK: u8 = 0b1;

/// Width of the piece byte as used for Zobrist indexing.
pub(crate) const PIECE_INDEX_BITS: u8 = 5;

// Lock the packing: the full piece encoding must fit in PIECE_INDEX_BITS.
const _: () = assert!(COLOR_SHIFT + 1 == PIECE_INDEX_BITS);
const _: () = assert!(KIND_SHIFT == ORI_SHIFT + 2);

/// Number of orientations a piece can take.
pub const NUM_ORI: u8 = 4;

/// What occupies a square.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PieceKind {
    Empty,
    Pawn,
    Monarch,
    Invalid,
}

impl PieceKind {
    #[inline]
    #[must_use]
    pub(crate) const fn from_bits(bits: u8) -> PieceKind {
        match bits & KIND_MASK {
            0 => PieceKind::Empty,
            1 => PieceKind::Pawn,
            2 => PieceKind::Monarch,
            _ => PieceKind::Invalid,
        }
    }

    #[inline]
    #[must_use]
    pub(crate) const fn bits(self) -> u8 {
        match self {
            PieceKind::Empty => 0,
            PieceKind::Pawn => 1,
            PieceKind::Monarch => 2,
            PieceKind::Invalid => 3,
        }
    }
}

/// The two sides.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    #[inline]
    #[must_use]
    pub const fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    #[inline]
    #[must_use]
    pub(crate) const fn from_bits(bits: u8) -> Color {
        if bits & COLOR_MASK == 0 {
            Color::White
        } else {
            Color::Black
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

/// Monarch orientations double as laser directions.
pub mod monarch_ori {
    pub const NN: u8 = 0;
    pub const EE: u8 = 1;
    pub const SS: u8 = 2;
    pub const WW: u8 = 3;
}

/// Pawn orientations select the reflecting diagonal face.
pub mod pawn_ori {
    pub const NW: u8 = 0;
    pub const NE: u8 = 1;
    pub const SE: u8 = 2;
    pub const SW: u8 = 3;
}

/// Two-character orientation tokens, `[color][orientation]`.
pub(crate) const MONARCH_ORI_REP: [[&str; 4]; 2] =
    [["NN", "EE", "SS", "WW"], ["nn", "ee", "ss", "ww"]];
pub(crate) const PAWN_ORI_REP: [[&str; 4]; 2] =
    [["NW", "NE", "SE", "SW"], ["nw", "ne", "se", "sw"]];

/// One board cell, packed into a byte.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece(u8);

impl Piece {
    pub const EMPTY: Piece = Piece(0);
    /// Sentinel-ring cell.
    pub const INVALID: Piece = Piece(PieceKind::Invalid.bits() << KIND_SHIFT);

    #[inline]
    #[must_use]
    pub const fn new(color: Color, kind: PieceKind, ori: u8) -> Piece {
        Piece(
            ((color.index() as u8 & COLOR_MASK) << COLOR_SHIFT)
                | ((kind.bits() & KIND_MASK) << KIND_SHIFT)
                | ((ori & ORI_MASK) << ORI_SHIFT),
        )
    }

    #[inline]
    #[must_use]
    pub const fn kind(self) -> PieceKind {
        PieceKind::from_bits(self.0 >> KIND_SHIFT)
    }

    #[inline]
    #[must_use]
    pub const fn color(self) -> Color {
        Color::from_bits(self.0 >> COLOR_SHIFT)
    }

    /// Orientation index, 0..4.
    #[inline]
    #[must_use]
    pub const fn orientation(self) -> u8 {
        (self.0 >> ORI_SHIFT) & ORI_MASK
    }

    #[inline]
    #[must_use]
    pub const fn with_orientation(self, ori: u8) -> Piece {
        Piece((self.0 & !(ORI_MASK << ORI_SHIFT)) | ((ori & ORI_MASK) << ORI_SHIFT))
    }

    #[inline]
    #[must_use]
    pub const fn is_occupied(self) -> bool {
        matches!(self.kind(), PieceKind::Pawn | PieceKind::Monarch)
    }

    /// Raw byte, used as the Zobrist piece index.
    #[inline]
    #[must_use]
    pub(crate) const fn bits(self) -> u8 {
        self.0
    }

    /// Two-character token as it appears in board text (`NN`, `sw`, ...).
    #[must_use]
    pub fn token(self) -> Option<&'static str> {
        let c = self.color().index();
        let ori = self.orientation() as usize;
        match self.kind() {
            PieceKind::Monarch => Some(MONARCH_ORI_REP[c][ori]),
            PieceKind::Pawn => Some(PAWN_ORI_REP[c][ori]),
            _ => None,
        }
    }
}

impl fmt::Debug for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            PieceKind::Empty => write!(f, "Piece(empty)"),
            PieceKind::Invalid => write!(f, "Piece(invalid)"),
            _ => write!(f, "Piece({})", self.token().unwrap_or("?")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_zero_byte() {
        assert_eq!(Piece::EMPTY.bits(), 0);
        assert_eq!(Piece::EMPTY.kind(), PieceKind::Empty);
        assert_eq!(Piece::EMPTY.orientation(), 0);
    }

    #[test]
    fn test_pack_unpack() {
        for color in [Color::White, Color::Black] {
            for kind in [PieceKind::Pawn, PieceKind::Monarch] {
                for ori in 0..NUM_ORI {
                    let p = Piece::new(color, kind, ori);
                    assert_eq!(p.color(), color);
                    assert_eq!(p.kind(), kind);
                    assert_eq!(p.orientation(), ori);
                    assert!(p.bits() < 1 << PIECE_INDEX_BITS);
                }
            }
        }
    }

    #[test]
    fn test_rotation_wraps() {
        let p = Piece::new(Color::White, PieceKind::Monarch, monarch_ori::WW);
        let q = p.with_orientation((p.orientation() + 1) % NUM_ORI);
        assert_eq!(q.orientation(), monarch_ori::NN);
        assert_eq!(q.kind(), PieceKind::Monarch);
        assert_eq!(q.color(), Color::White);
    }
}
