//! Board text parsing and printing.
//!
//! Ranks are listed top (rank 7) to bottom, `/`-separated. Pieces are
//! two-character tokens (`NN EE SS WW` monarchs, `NW NE SE SW` pawns;
//! lowercase for black), empty runs are a digit or the literal `10`,
//! then a space and `W` or `B` for the side to move, then optionally
//! the last move played (for repetition detection after reload).

use std::str::FromStr;

use super::error::FenError;
use super::state::Position;
use super::types::{
    monarch_ori, pawn_ori, Color, Move, Piece, PieceKind, Rotation, Square, BOARD_WIDTH,
};

/// The standard opening position.
pub const STARTPOS_FEN: &str = "nn6nn/sesw1sesw1sesw/8/8/8/8/NENW1NENW1NENW/SS6SS W";
/// A bare two-monarch endgame.
pub const ENDGAME_FEN: &str = "ss7/8/8/8/8/8/8/7NN W";

fn piece_for_token(c1: char, c2: char) -> Option<Piece> {
    let (color, kind, ori) = match (c1, c2) {
        ('N', 'N') => (Color::White, PieceKind::Monarch, monarch_ori::NN),
        ('E', 'E') => (Color::White, PieceKind::Monarch, monarch_ori::EE),
        ('S', 'S') => (Color::White, PieceKind::Monarch, monarch_ori::SS),
        ('W', 'W') => (Color::White, PieceKind::Monarch, monarch_ori::WW),
        ('N', 'W') => (Color::White, PieceKind::Pawn, pawn_ori::NW),
        ('N', 'E') => (Color::White, PieceKind::Pawn, pawn_ori::NE),
        ('S', 'E') => (Color::White, PieceKind::Pawn, pawn_ori::SE),
        ('S', 'W') => (Color::White, PieceKind::Pawn, pawn_ori::SW),
        ('n', 'n') => (Color::Black, PieceKind::Monarch, monarch_ori::NN),
        ('e', 'e') => (Color::Black, PieceKind::Monarch, monarch_ori::EE),
        ('s', 's') => (Color::Black, PieceKind::Monarch, monarch_ori::SS),
        ('w', 'w') => (Color::Black, PieceKind::Monarch, monarch_ori::WW),
        ('n', 'w') => (Color::Black, PieceKind::Pawn, pawn_ori::NW),
        ('n', 'e') => (Color::Black, PieceKind::Pawn, pawn_ori::NE),
        ('s', 'e') => (Color::Black, PieceKind::Pawn, pawn_ori::SE),
        ('s', 'w') => (Color::Black, PieceKind::Pawn, pawn_ori::SW),
        _ => return None,
    };
    Some(Piece::new(color, kind, ori))
}

struct FenParser<'a> {
    chars: &'a [char],
    pos: usize,
}

impl<'a> FenParser<'a> {
    fn next(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn parse_board(&mut self, p: &mut Position) -> Result<(), FenError> {
        let width = BOARD_WIDTH as i8;
        let mut file: i8 = -1;
        let mut rank: i8 = width - 1;
        let mut monarch_count = [0usize; 2];

        while let Some(c) = self.next() {
            match c {
                c if c.is_ascii_whitespace() => {
                    if file == width - 1 && rank == 0 {
                        break;
                    }
                }
                '1'..='9' => {
                    let mut run = c as i8 - '0' as i8;
                    if c == '1' && self.peek() == Some('0') {
                        self.pos += 1;
                        run = 10;
                    }
                    for _ in 0..run {
                        file += 1;
                        if file >= width {
                            return Err(FenError::TooManySquaresInRank { col: self.pos });
                        }
                        let sq = Square::new(file, rank);
                        p.board[sq.mailbox_index()] = Piece::EMPTY;
                    }
                }
                '/' => {
                    if file != width - 1 {
                        return Err(FenError::TooFewSquaresInRank { col: self.pos });
                    }
                    file = -1;
                    rank -= 1;
                    if rank < 0 {
                        return Err(FenError::TooManyRanks { col: self.pos });
                    }
                }
                _ => {
                    let c2 = self.next().ok_or(FenError::Syntax { col: self.pos })?;
                    let piece =
                        piece_for_token(c, c2).ok_or(FenError::Syntax { col: self.pos })?;
                    file += 1;
                    if file >= width {
                        return Err(FenError::TooManySquaresInRank { col: self.pos });
                    }
                    let sq = Square::new(file, rank);
                    let color = piece.color();
                    p.board[sq.mailbox_index()] = piece;
                    p.occupancy[color.index()] |= sq.bit();
                    if piece.kind() == PieceKind::Monarch {
                        let count = &mut monarch_count[color.index()];
                        if *count >= 2 {
                            return Err(FenError::TooManyMonarchs {
                                color,
                                col: self.pos,
                            });
                        }
                        p.monarchs[color.index()][*count] = sq;
                        *count += 1;
                    }
                }
            }
        }

        if file != width - 1 || rank != 0 {
            return Err(FenError::TooFewSquares { col: self.pos });
        }
        for color in [Color::White, Color::Black] {
            if monarch_count[color.index()] == 0 {
                return Err(FenError::NoMonarch { color });
            }
        }
        Ok(())
    }

    fn parse_side_to_move(&mut self) -> Result<u32, FenError> {
        self.skip_whitespace();
        match self.next() {
            Some('W') => Ok(0),
            Some('B') => Ok(1),
            _ => Err(FenError::BadSideToMove { col: self.pos }),
        }
    }

    /// Optional last-move tail, mirroring move text.
    fn parse_last_move(&mut self) -> Result<Move, FenError> {
        self.skip_whitespace();
        let Some(fc) = self.next() else {
            return Ok(Move::NULL);
        };
        let from = self.parse_square_from(fc)?;
        match self.peek() {
            Some('R') => {
                self.pos += 1;
                Ok(Move::new(PieceKind::Empty, Rotation::Right, from, from))
            }
            Some('U') => {
                self.pos += 1;
                Ok(Move::new(PieceKind::Empty, Rotation::UTurn, from, from))
            }
            Some('L') => {
                self.pos += 1;
                Ok(Move::new(PieceKind::Empty, Rotation::Left, from, from))
            }
            Some(c) => {
                self.pos += 1;
                let to = self.parse_square_from(c)?;
                Ok(Move::new(PieceKind::Empty, Rotation::None, from, to))
            }
            None => Err(FenError::BadLastMove { col: self.pos }),
        }
    }

    fn parse_square_from(&mut self, file_char: char) -> Result<Square, FenError> {
        let rank_char = self.next().ok_or(FenError::BadLastMove { col: self.pos })?;
        if !('a'..='h').contains(&file_char) || !('0'..='7').contains(&rank_char) {
            return Err(FenError::BadLastMove { col: self.pos });
        }
        Ok(Square::new(
            file_char as i8 - 'a' as i8,
            rank_char as i8 - '0' as i8,
        ))
    }
}

impl Position {
    /// Parse a position from board text.
    pub fn try_from_fen(fen: &str) -> Result<Position, FenError> {
        let chars: Vec<char> = fen.chars().collect();
        let mut parser = FenParser {
            chars: &chars,
            pos: 0,
        };

        let mut p = Position::blank();
        parser.parse_board(&mut p)?;
        p.ply = parser.parse_side_to_move()?;
        p.last_move = parser.parse_last_move()?;
        p.key = p.computed_key();
        Ok(p)
    }

    /// Parse a position from board text.
    ///
    /// # Panics
    /// Panics on malformed input; use `try_from_fen` for fallible parsing.
    #[must_use]
    pub fn from_fen(fen: &str) -> Position {
        Position::try_from_fen(fen).expect("invalid board text")
    }

    /// The standard opening position.
    #[must_use]
    pub fn startpos() -> Position {
        Position::from_fen(STARTPOS_FEN)
    }

    /// Render the position as board text (without the last-move tail).
    #[must_use]
    pub fn to_fen(&self) -> String {
        let width = BOARD_WIDTH as i8;
        let mut out = String::new();
        for rank in (0..width).rev() {
            let mut empty_run = 0;
            for file in 0..width {
                let piece = self.piece_at(Square::new(file, rank));
                match piece.token() {
                    Some(token) => {
                        if empty_run > 0 {
                            out.push_str(&empty_run.to_string());
                            empty_run = 0;
                        }
                        out.push_str(token);
                    }
                    None => empty_run += 1,
                }
            }
            if empty_run > 0 {
                out.push_str(&empty_run.to_string());
            }
            if rank > 0 {
                out.push('/');
            }
        }
        out.push(' ');
        out.push(if self.side_to_move() == Color::White {
            'W'
        } else {
            'B'
        });
        out
    }
}

impl FromStr for Position {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::try_from_fen(s)
    }
}
