//! Move application, laser victims, and Zobrist consistency.

use crate::board::{Color, PieceKind, Position, Square, STARTPOS_FEN};

fn sq(text: &str) -> Square {
    text.parse().expect("valid square")
}

fn piece_counts(pos: &Position, color: Color) -> u32 {
    Square::all()
        .filter(|&s| {
            let p = pos.piece_at(s);
            p.is_occupied() && p.color() == color
        })
        .count() as u32
}

fn assert_invariants(pos: &Position) {
    assert_eq!(pos.key(), pos.computed_key(), "incremental key");
    for color in [Color::White, Color::Black] {
        let bits = pos.occupancy(color).count_ones();
        assert_eq!(bits, piece_counts(pos, color), "occupancy vs board");
        assert!(bits <= 8);
    }
    // The sentinel ring stays invalid.
    for idx in 0..100 {
        let s = Square::from_mailbox_index(idx);
        let on_board = (0..8).contains(&s.file()) && (0..8).contains(&s.rank());
        if !on_board {
            assert_eq!(pos.piece_at(s).kind(), PieceKind::Invalid, "ring at {idx}");
        }
    }
}

#[test]
fn test_every_startpos_move_preserves_invariants() {
    let pos = Position::startpos();
    assert_invariants(&pos);
    for &mv in &pos.generate_moves() {
        let next = pos.apply_move(mv);
        assert_invariants(&next);
        assert_ne!(next.side_to_move(), pos.side_to_move(), "{mv}");
        assert_eq!(next.ply(), pos.ply() + 1);
        assert_eq!(next.last_move(), mv);
        assert!(!next.was_played());
    }
}

#[test]
fn test_displacement_pushes_into_empty_square() {
    // d1's pawn displaces e1's; the pushed pawn lands on f1.
    let pos = Position::startpos();
    let mv = pos.find_move("d1e1").expect("legal");
    let next = pos.apply_move(mv);
    assert_eq!(next.piece_at(sq("d1")).kind(), PieceKind::Empty);
    assert_eq!(next.piece_at(sq("e1")), pos.piece_at(sq("d1")));
    assert_eq!(next.piece_at(sq("f1")), pos.piece_at(sq("e1")));
    assert!(next.victims().is_empty());
}

#[test]
fn test_push_off_board_squashes_self() {
    // b1's pawn displaces a1's toward the edge; the pushed pawn has
    // nowhere to go and is squashed, counting as White's own victim.
    let pos = Position::startpos();
    let mv = pos.find_move("b1a1").expect("legal");
    let next = pos.apply_move(mv);
    assert_eq!(next.piece_at(sq("a1")), pos.piece_at(sq("b1")));
    assert_eq!(next.piece_at(sq("b1")).kind(), PieceKind::Empty);
    let victims = next.victims();
    assert_eq!(victims.count, 1);
    assert!(victims.removed_color[Color::White.index()]);
    assert!(!victims.removed_color[Color::Black.index()]);
    assert!(victims.is_blunder(Color::White));
}

#[test]
fn test_rotation_changes_orientation_only() {
    let pos = Position::startpos();
    let mv = pos.find_move("a0R").expect("legal");
    let next = pos.apply_move(mv);
    let before = pos.piece_at(sq("a0"));
    let after = next.piece_at(sq("a0"));
    assert_eq!(after.kind(), before.kind());
    assert_eq!(after.color(), before.color());
    assert_eq!(after.orientation(), (before.orientation() + 1) % 4);
    assert!(next.victims().is_empty());
}

#[test]
fn test_null_shot_zaps_monarch_and_ends_game() {
    let pos = Position::from_fen("7nn/8/8/8/8/8/8/7NN W");
    let mv = pos.find_move("h0h0").expect("null-shot is legal here");
    let next = pos.apply_move(mv);
    let victims = next.victims();
    assert_eq!(victims.count, 1);
    assert!(victims.removed_color[Color::Black.index()]);
    assert!(!victims.removed_color[Color::White.index()]);
    assert!(next.is_game_over());
    assert!(next.player_wins(Color::White));
    assert_eq!(next.monarch_count(Color::Black), 0);
}

#[test]
fn test_blunder_zaps_own_pawn_only() {
    // White's laser path ends in the back of his own pawn.
    let pos = Position::from_fen("nn7/8/8/7NW/8/8/8/7NN W");
    let mv = pos.find_move("h0h0").expect("null-shot is legal here");
    let next = pos.apply_move(mv);
    let victims = next.victims();
    assert_eq!(victims.count, 1);
    assert!(victims.removed_color[Color::White.index()]);
    assert!(!victims.removed_color[Color::Black.index()]);
    assert!(victims.is_blunder(Color::White));
    assert_eq!(next.piece_at(sq("h4")).kind(), PieceKind::Empty);
}

#[test]
fn test_victim_resets_progress_counter() {
    let pos = Position::from_fen("nn7/8/8/7NW/8/8/8/7NN W");
    let quiet = pos.apply_move(pos.find_move("h0L").expect("legal"));
    assert_eq!(quiet.plies_since_victim(), 1);
    let zap = pos.apply_move(pos.find_move("h0h0").expect("legal"));
    assert_eq!(zap.plies_since_victim(), 0);
}

#[test]
fn test_fen_round_trip() {
    for fen in [
        STARTPOS_FEN,
        crate::board::ENDGAME_FEN,
        "nn7/8/8/nw6SW/8/8/8/7NN B",
    ] {
        let pos = Position::from_fen(fen);
        assert_eq!(pos.to_fen(), fen);
        let reparsed = Position::from_fen(&pos.to_fen());
        assert_eq!(reparsed.key(), pos.key());
        assert_eq!(reparsed.side_to_move(), pos.side_to_move());
    }
}

#[test]
fn test_fen_errors() {
    use crate::board::FenError;
    assert!(matches!(
        Position::try_from_fen("8/8/8/8/8/8/8/8 W"),
        Err(FenError::NoMonarch { .. })
    ));
    assert!(matches!(
        Position::try_from_fen("nn6nn/8/8/8/8/8/8/SS5SSNN W"),
        Err(FenError::TooManySquaresInRank { .. })
    ));
    assert!(matches!(
        Position::try_from_fen("nn6nn/8/8/8/8/8/8/SS6SS"),
        Err(FenError::BadSideToMove { .. })
    ));
    assert!(Position::try_from_fen("xx6nn/8/8/8/8/8/8/SS6SS W").is_err());
}

#[test]
fn test_fen_last_move_tail() {
    let pos = Position::from_fen("nn6nn/sesw1sesw1sesw/8/8/8/8/NENW1NENW1NENW/SS6SS B a1U");
    assert_eq!(pos.last_move().to_string(), "a1U");
    assert_eq!(pos.side_to_move(), Color::Black);
}
