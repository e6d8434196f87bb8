//! Pseudo-legal move generation.
//!
//! Every generated move is legal to apply; there is no check concept
//! in this game. Displacements may push the destination piece, but a
//! piece never lands on a monarch, and a pawn cannot push a pawn of
//! higher qi.

use super::laser;
use super::state::Position;
use super::tables::{qi_at, COMPASS};
use super::types::{Move, MoveList, PieceKind, Rotation};

impl Position {
    /// All moves for the side to move: up to 8 displacements and 3
    /// rotations per piece, plus at most one null-shot when a monarch
    /// laser already has a victim in its path.
    #[must_use]
    pub fn generate_moves(&self) -> MoveList {
        let mover = self.side_to_move();
        let mut list = MoveList::new();

        let mut pieces = self.occupancy(mover);
        while pieces != 0 {
            let sq = super::types::Square::from_dense(pieces.trailing_zeros() as usize);
            pieces &= pieces - 1;
            let kind = self.piece_at(sq).kind();

            for dir in COMPASS {
                let dest = sq.offset(dir);
                let dest_kind = self.piece_at(dest).kind();
                if dest_kind == PieceKind::Invalid || dest_kind == PieceKind::Monarch {
                    continue;
                }
                // A piece may not push a same-kind piece of higher qi.
                if dest_kind == kind && qi_at(dest) > qi_at(sq) {
                    continue;
                }
                list.push(Move::displacement(kind, sq, dest));
            }

            for rot in [Rotation::Right, Rotation::UTurn, Rotation::Left] {
                list.push(Move::rotation(kind, rot, sq));
            }
        }

        if laser::fire_lasers(self, mover) > 0 {
            let monarch_0 = self.monarch(mover, 0);
            let at = if self.piece_at(monarch_0).kind() == PieceKind::Monarch {
                monarch_0
            } else {
                self.monarch(mover, 1)
            };
            list.push(Move::null_shot(at));
        }

        list
    }

    /// Find the legal move whose text matches `text` (case-insensitive).
    #[must_use]
    pub fn find_move(&self, text: &str) -> Option<Move> {
        let wanted = text.to_ascii_lowercase();
        self.generate_moves()
            .iter()
            .copied()
            .find(|mv| mv.to_string().to_ascii_lowercase() == wanted)
    }

    /// Like [`Position::find_move`], reporting failure as an error.
    pub fn parse_move(&self, text: &str) -> Result<Move, super::error::MoveParseError> {
        self.find_move(text)
            .ok_or_else(|| super::error::MoveParseError {
                notation: text.to_string(),
            })
    }

    /// Count move paths to the given depth. Game-over positions are
    /// leaves and are not expanded further.
    #[must_use]
    pub fn perft(&self, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }
        let moves = self.generate_moves();
        if depth == 1 {
            return moves.len() as u64;
        }
        let mut nodes = 0;
        for &mv in &moves {
            let next = self.apply_move(mv);
            if next.is_game_over() {
                nodes += 1;
                continue;
            }
            nodes += next.perft(depth - 1);
        }
        nodes
    }
}
