//! Randomized invariant tests over move sequences.

use proptest::prelude::*;

use crate::board::{Color, Position, Square};

fn board_piece_count(pos: &Position, color: Color) -> u32 {
    Square::all()
        .filter(|&s| {
            let p = pos.piece_at(s);
            p.is_occupied() && p.color() == color
        })
        .count() as u32
}

fn check_invariants(pos: &Position) {
    assert_eq!(pos.key(), pos.computed_key());
    for color in [Color::White, Color::Black] {
        let bits = pos.occupancy(color).count_ones();
        assert_eq!(bits, board_piece_count(pos, color));
        assert!(bits <= 8);
        // Monarch slots point at live monarchs of the right color.
        for num in 0..2 {
            let m = pos.monarch(color, num);
            if !m.is_none() {
                let piece = pos.piece_at(m);
                assert_eq!(piece.kind(), crate::board::PieceKind::Monarch);
                assert_eq!(piece.color(), color);
            }
        }
        assert_eq!(
            pos.monarch_count(color),
            Square::all()
                .filter(|&s| {
                    let p = pos.piece_at(s);
                    p.kind() == crate::board::PieceKind::Monarch && p.color() == color
                })
                .count() as u32
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_walk_preserves_invariants(choices in prop::collection::vec(any::<u16>(), 0..32)) {
        let mut pos = Position::startpos();
        check_invariants(&pos);

        for choice in choices {
            if pos.is_game_over() {
                break;
            }
            let moves = pos.generate_moves();
            prop_assert!(!moves.is_empty());
            let mv = moves[choice as usize % moves.len()];
            let next = pos.apply_move(mv);

            check_invariants(&next);
            prop_assert_ne!(next.side_to_move(), pos.side_to_move());
            prop_assert_eq!(next.ply(), pos.ply() + 1);
            if next.victims().is_empty() {
                prop_assert_eq!(next.plies_since_victim(), pos.plies_since_victim() + 1);
            } else {
                prop_assert_eq!(next.plies_since_victim(), 0);
            }
            pos = next;
        }
    }

    #[test]
    fn random_walk_fen_round_trips(choices in prop::collection::vec(any::<u16>(), 0..24)) {
        let mut pos = Position::startpos();
        for choice in choices {
            if pos.is_game_over() {
                break;
            }
            let moves = pos.generate_moves();
            let mv = moves[choice as usize % moves.len()];
            pos = pos.apply_move(mv);
        }
        if !pos.is_game_over() {
            let reparsed = Position::from_fen(&pos.to_fen());
            prop_assert_eq!(reparsed.key(), pos.key());
            prop_assert_eq!(reparsed.to_fen(), pos.to_fen());
        }
    }
}
