//! Static evaluation tests.

use crate::board::{
    evaluate, EvalWeights, Position, Score, ENDGAME_FEN, EV_SCORE_RATIO, PAWN_EV_VALUE,
    STARTPOS_FEN,
};

fn zero_weights() -> EvalWeights {
    EvalWeights {
        ptouch: 0,
        pprox: 0,
        mface: 0,
        mcede: 0,
        lcoverage: 0,
        pmid: 0,
        mmid: 0,
        pmat: 0,
        relqi: 0,
        absqi: 0,
    }
}

#[test]
fn test_startpos_is_balanced() {
    // The opening position is mirror-symmetric, so every heuristic
    // cancels exactly.
    let weights = EvalWeights::default();
    let pos = Position::from_fen(STARTPOS_FEN);
    assert_eq!(evaluate(&pos, &weights), 0);
}

#[test]
fn test_endgame_score_is_finite_and_sign_flips() {
    let weights = EvalWeights::default();
    let white_to_move = Position::from_fen(ENDGAME_FEN);
    let black_to_move = Position::from_fen("ss7/8/8/8/8/8/8/7NN B");
    let w = evaluate(&white_to_move, &weights);
    let b = evaluate(&black_to_move, &weights);
    assert_eq!(w, -b, "same board, flipped point of view");
}

#[test]
fn test_zero_weights_zero_score() {
    let weights = zero_weights();
    for fen in [STARTPOS_FEN, ENDGAME_FEN, "nn7/8/8/nw6SW/8/8/8/7NN W"] {
        assert_eq!(evaluate(&Position::from_fen(fen), &weights), 0);
    }
}

#[test]
fn test_material_counts() {
    // Only the material weight set: six pawns each cancel at the
    // start, and an extra white pawn is worth one pawn after scaling.
    let mut weights = zero_weights();
    weights.pmat = PAWN_EV_VALUE;

    let balanced = Position::from_fen(STARTPOS_FEN);
    assert_eq!(evaluate(&balanced, &weights), 0);

    let up_a_pawn = Position::from_fen("nn6nn/8/8/8/8/8/4NW3/SS6SS W");
    assert_eq!(
        evaluate(&up_a_pawn, &weights),
        (PAWN_EV_VALUE / EV_SCORE_RATIO) as Score
    );
}

#[test]
fn test_lcoverage_weight_has_no_effect() {
    let mut weights = EvalWeights::default();
    let pos = Position::from_fen("nn7/8/8/nw6SW/8/8/8/7NN W");
    let before = evaluate(&pos, &weights);
    weights.lcoverage = 9999;
    assert_eq!(evaluate(&pos, &weights), before);
}

#[test]
fn test_pawns_touching_penalized() {
    let mut weights = zero_weights();
    weights.ptouch = PAWN_EV_VALUE;

    // Two adjacent white pawns both take the penalty; the separated
    // variant takes none.
    let touching = Position::from_fen("nn6nn/8/8/3NWNE3/8/8/8/SS6SS W");
    let apart = Position::from_fen("nn6nn/8/8/2NW2NE2/8/8/8/SS6SS W");
    assert!(evaluate(&touching, &weights) < evaluate(&apart, &weights));
    assert_eq!(evaluate(&apart, &weights), 0);
}

#[test]
fn test_mface_rewards_facing_the_opponent() {
    // White monarch on h0: facing the lone black monarch up the board
    // beats facing away.
    let mut weights = zero_weights();
    weights.mface = PAWN_EV_VALUE;
    let facing = Position::from_fen("7nn/8/8/8/8/8/8/7NN W");
    let away = Position::from_fen("7nn/8/8/8/8/8/8/7SS W");
    assert!(evaluate(&facing, &weights) > evaluate(&away, &weights));
}
