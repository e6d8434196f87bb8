//! Human-readable board dumps for the `display` and `bitboard`
//! commands. Lines are prefixed with `info` so UCI-side tooling
//! ignores them; the `DoneDisplay` terminator is load-bearing for
//! external test harnesses.

use std::fmt::Write;

use super::state::Position;
use super::types::{Color, PieceKind, Square, BOARD_WIDTH};

fn monarch_str(p: &Position, color: Color, num: usize) -> String {
    let sq = p.monarch(color, num);
    if sq.is_none() {
        "-".to_string()
    } else {
        sq.to_string()
    }
}

fn header(p: &Position, out: &mut String) {
    let _ = writeln!(out, "info Ply: {}", p.ply());
    let _ = writeln!(out, "info Color to move: {}", p.side_to_move());
    for color in [Color::White, Color::Black] {
        for num in 0..2 {
            let _ = writeln!(out, "info {color} Monarch: {}", monarch_str(p, color, num));
        }
    }
}

fn footer(out: &mut String) {
    let _ = write!(out, "\ninfo    ");
    for f in 0..BOARD_WIDTH as u8 {
        let _ = write!(out, " {} ", (b'a' + f) as char);
    }
    out.push('\n');
    // Kept verbatim: external harnesses key on this line.
    out.push_str("DoneDisplay\n");
    out.push('\n');
}

impl Position {
    /// Render the board the way the `display` command prints it.
    #[must_use]
    pub fn display(&self) -> String {
        let mut out = String::new();
        header(self, &mut out);
        let _ = write!(out, "info");
        for rank in (0..BOARD_WIDTH as i8).rev() {
            let _ = write!(out, "\ninfo {rank} ");
            for file in 0..BOARD_WIDTH as i8 {
                let piece = self.piece_at(Square::new(file, rank));
                match piece.token() {
                    Some(token) => {
                        let _ = write!(out, " {token}");
                    }
                    None => {
                        debug_assert!(piece.kind() == PieceKind::Empty);
                        let _ = write!(out, " --");
                    }
                }
            }
        }
        footer(&mut out);
        out
    }

    /// Render per-color occupancy the way the `bitboard` command
    /// prints it: `0` for white pieces, `1` for black.
    #[must_use]
    pub fn display_occupancy(&self) -> String {
        let mut out = String::new();
        header(self, &mut out);
        let _ = write!(out, "info");
        for rank in (0..BOARD_WIDTH as i8).rev() {
            let _ = write!(out, "\ninfo {rank} ");
            for file in 0..BOARD_WIDTH as i8 {
                let bit = Square::new(file, rank).bit();
                if self.occupancy(Color::White) & bit != 0 {
                    let _ = write!(out, "  0");
                } else if self.occupancy(Color::Black) & bit != 0 {
                    let _ = write!(out, "  1");
                } else {
                    let _ = write!(out, " --");
                }
            }
        }
        footer(&mut out);
        out
    }
}
