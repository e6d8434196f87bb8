//! Perft counts for the move generator and applier.

use crate::board::Position;

/// Known-good path counts from the standard opening position.
const STARTPOS_PERFT: &[(u32, u64)] = &[(0, 1), (1, 66), (2, 4226), (3, 267_674)];

#[test]
fn test_startpos_perft() {
    let pos = Position::startpos();
    for &(depth, expected) in STARTPOS_PERFT {
        assert_eq!(pos.perft(depth), expected, "perft({depth})");
    }
}

/// The deep counts take minutes; run with `--ignored` when touching
/// the generator or applier.
#[test]
#[ignore]
fn test_startpos_perft_deep() {
    let pos = Position::startpos();
    assert_eq!(pos.perft(4), 17_024_694);
    assert_eq!(pos.perft(5), 1_071_907_988);
}

#[test]
fn test_endgame_perft_depth_matches_movegen() {
    let pos = Position::from_fen(crate::board::ENDGAME_FEN);
    assert_eq!(pos.perft(1), pos.generate_moves().len() as u64);
}
