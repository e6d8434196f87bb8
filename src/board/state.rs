//! Position representation and move application.
//!
//! Positions are immutable once built: `apply_move` copies the parent
//! and mutates the copy, so the search tree is a tree of successor
//! values. Game and search history is carried as a flat line of
//! [`LineEntry`] records (an arena walk, not parent pointers), which
//! keeps repetition detection O(1) per step with no cyclic ownership.

use super::laser;
use super::types::{Color, Move, Piece, PieceKind, Square, Victims, ARR_SIZE};
use crate::zobrist;

/// Even plies are White to move.
#[inline]
fn color_for_ply(ply: u32) -> Color {
    if ply & 1 == 0 {
        Color::White
    } else {
        Color::Black
    }
}

/// One ancestor record for repetition detection.
#[derive(Clone, Copy, Debug)]
pub struct LineEntry {
    pub key: u64,
    pub was_played: bool,
    /// True when the move producing the position removed nothing.
    pub victimless: bool,
}

/// A full game state.
#[derive(Clone)]
pub struct Position {
    pub(crate) board: [Piece; ARR_SIZE],
    /// Per-color occupancy over dense square indices.
    pub(crate) occupancy: [u64; 2],
    /// Up to two monarch squares per color; `Square::NONE` when absent.
    pub(crate) monarchs: [[Square; 2]; 2],
    pub(crate) key: u64,
    /// Plies since the start of the game; even means White to move.
    pub(crate) ply: u32,
    pub(crate) plies_since_victim: u32,
    pub(crate) last_move: Move,
    pub(crate) victims: Victims,
    pub(crate) was_played: bool,
}

impl Position {
    /// A board of all-invalid cells; the FEN parser carves out the
    /// playable squares.
    pub(crate) fn blank() -> Position {
        Position {
            board: [Piece::INVALID; ARR_SIZE],
            occupancy: [0; 2],
            monarchs: [[Square::NONE; 2]; 2],
            key: 0,
            ply: 0,
            plies_since_victim: 0,
            last_move: Move::NULL,
            victims: Victims::default(),
            was_played: true,
        }
    }

    #[inline]
    #[must_use]
    pub fn side_to_move(&self) -> Color {
        color_for_ply(self.ply)
    }

    #[inline]
    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Piece {
        self.board[sq.mailbox_index()]
    }

    #[inline]
    #[must_use]
    pub fn key(&self) -> u64 {
        self.key
    }

    #[inline]
    #[must_use]
    pub fn ply(&self) -> u32 {
        self.ply
    }

    #[inline]
    #[must_use]
    pub fn last_move(&self) -> Move {
        self.last_move
    }

    #[inline]
    #[must_use]
    pub fn victims(&self) -> Victims {
        self.victims
    }

    #[inline]
    #[must_use]
    pub fn plies_since_victim(&self) -> u32 {
        self.plies_since_victim
    }

    /// True for positions on the real game line, false for positions
    /// that exist only inside a search.
    #[inline]
    #[must_use]
    pub fn was_played(&self) -> bool {
        self.was_played
    }

    #[inline]
    #[must_use]
    pub fn occupancy(&self, color: Color) -> u64 {
        self.occupancy[color.index()]
    }

    /// Monarch square `num` (0 or 1) of `color`, `Square::NONE` if gone.
    #[inline]
    #[must_use]
    pub fn monarch(&self, color: Color, num: usize) -> Square {
        self.monarchs[color.index()][num]
    }

    #[must_use]
    pub fn monarch_count(&self, color: Color) -> u32 {
        self.monarchs[color.index()]
            .iter()
            .filter(|sq| !sq.is_none())
            .count() as u32
    }

    #[must_use]
    pub fn line_entry(&self) -> LineEntry {
        LineEntry {
            key: self.key,
            was_played: self.was_played,
            victimless: self.victims.is_empty(),
        }
    }

    /// The objective: a player wins by starting their turn with more
    /// monarchs, or by the opponent having none at all.
    #[must_use]
    pub fn player_wins(&self, color: Color) -> bool {
        let white = self.monarch_count(Color::White);
        let black = self.monarch_count(Color::Black);
        match color {
            Color::White => {
                (self.side_to_move() == Color::White && white > black) || black == 0
            }
            Color::Black => {
                (self.side_to_move() == Color::Black && white < black) || white == 0
            }
        }
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.player_wins(Color::White) || self.player_wins(Color::Black)
    }

    /// Full key recomputation from the board; `apply_move` keeps the
    /// incremental key equal to this at every stable state.
    #[must_use]
    pub(crate) fn computed_key(&self) -> u64 {
        zobrist::compute_key(|sq| self.piece_at(sq), self.side_to_move())
    }

    /// Apply a move, producing the successor position. The move must
    /// come from `generate_moves` (legality is not re-checked here).
    #[must_use]
    pub fn apply_move(&self, mv: Move) -> Position {
        debug_assert!(!mv.is_null(), "apply_move on the null sentinel");

        let mut p = self.clone();
        p.last_move = mv;
        p.was_played = false;
        p.victims = Victims::default();
        p.key ^= zobrist::side_key();

        let from = mv.from();
        let to = mv.to();

        if to != from {
            p.displace(from, to);
        } else {
            p.rotate_in_place(from, mv);
        }
        p.ply += 1;

        // Both monarch shots of the mover resolve against the
        // post-move board; removal happens afterwards. A double hit on
        // one square removes the piece once.
        let mover = self.side_to_move().index();
        let victim_a = laser::fire_laser(&p, p.monarchs[mover][0]);
        let victim_b = laser::fire_laser(&p, p.monarchs[mover][1]);
        if let Some(sq) = victim_a {
            p.remove_victim(sq);
        }
        if let Some(sq) = victim_b {
            if victim_a != victim_b {
                p.remove_victim(sq);
            }
        }

        // A pawn pushed into an occupied (or off-board) cell is
        // squashed, and counts as a victim of its own color.
        let displaced = self.piece_at(to);
        if to != from && displaced.kind() == PieceKind::Pawn {
            let dir = to.mailbox_index() as i32 - from.mailbox_index() as i32;
            let push_target = to.offset(dir);
            if self.piece_at(push_target).kind() != PieceKind::Empty {
                p.victims.count += 1;
                p.victims.removed_color[displaced.color().index()] = true;
            }
        }

        p.plies_since_victim = if p.victims.is_empty() {
            self.plies_since_victim + 1
        } else {
            0
        };

        debug_assert_eq!(p.key, p.computed_key(), "incremental key diverged");
        p
    }

    /// `apply_move` plus marking the successor as part of the real
    /// game line (as opposed to a search-only position).
    #[must_use]
    pub fn apply_played(&self, mv: Move) -> Position {
        let mut p = self.apply_move(mv);
        p.was_played = true;
        p
    }

    fn displace(&mut self, from: Square, to: Square) {
        let dir = to.mailbox_index() as i32 - from.mailbox_index() as i32;
        let push_target = to.offset(dir);

        let moving = self.board[from.mailbox_index()];
        let displaced = self.board[to.mailbox_index()];
        let mover = moving.color().index();

        // Lift the moving piece.
        self.key ^= zobrist::piece_key(from, moving);
        self.board[from.mailbox_index()] = Piece::EMPTY;
        self.key ^= zobrist::piece_key(from, Piece::EMPTY);
        self.occupancy[mover] &= !from.bit();

        if moving.kind() == PieceKind::Monarch {
            let slots = &mut self.monarchs[mover];
            let slot = usize::from(slots[0] != from);
            slots[slot] = to;
        }

        // Land it, displacing whatever was there.
        self.key ^= zobrist::piece_key(to, displaced);
        if displaced.is_occupied() {
            self.occupancy[displaced.color().index()] &= !to.bit();
        }
        self.board[to.mailbox_index()] = moving;
        self.key ^= zobrist::piece_key(to, moving);
        self.occupancy[mover] |= to.bit();

        // The displaced piece is pushed one further square if that
        // cell is empty; otherwise it is squashed and simply vanishes
        // here (the victim accounting happens in `apply_move`).
        if displaced.is_occupied()
            && self.board[push_target.mailbox_index()].kind() == PieceKind::Empty
        {
            self.key ^= zobrist::piece_key(push_target, Piece::EMPTY);
            self.board[push_target.mailbox_index()] = displaced;
            self.key ^= zobrist::piece_key(push_target, displaced);
            self.occupancy[displaced.color().index()] |= push_target.bit();
        }
    }

    fn rotate_in_place(&mut self, at: Square, mv: Move) {
        let piece = self.board[at.mailbox_index()];
        self.key ^= zobrist::piece_key(at, piece);
        let rotated = piece.with_orientation(mv.rot().apply(piece.orientation()));
        self.board[at.mailbox_index()] = rotated;
        self.key ^= zobrist::piece_key(at, rotated);
    }

    fn remove_victim(&mut self, sq: Square) {
        let piece = self.board[sq.mailbox_index()];
        debug_assert!(piece.is_occupied(), "laser victim on empty square");
        let color = piece.color().index();

        self.key ^= zobrist::piece_key(sq, piece);
        self.board[sq.mailbox_index()] = Piece::EMPTY;
        self.key ^= zobrist::piece_key(sq, Piece::EMPTY);
        self.occupancy[color] &= !sq.bit();

        if piece.kind() == PieceKind::Monarch {
            let slots = &mut self.monarchs[color];
            let slot = usize::from(slots[0] != sq);
            slots[slot] = Square::NONE;
        }

        self.victims.count += 1;
        self.victims.removed_color[color] = true;
    }
}

impl std::fmt::Debug for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Position({} ply {} key {:#018x})",
            self.to_fen(),
            self.ply,
            self.key
        )
    }
}
