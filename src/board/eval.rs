//! Static positional evaluation.
//!
//! A weighted sum of ten heuristics, computed from White's point of
//! view, sign-flipped for the side to move, and scaled down from
//! "hi-res" evaluator units to search units by `EV_SCORE_RATIO`.

use super::search::constants::{Score, PAWN_VALUE};
use super::state::Position;
use super::tables::{centrality, qi_at, NEIGHBORS};
use super::types::{monarch_ori, Color, Piece, PieceKind, Square};

/// Ratio of evaluator units to search score units.
pub const EV_SCORE_RATIO: i32 = 100;
/// One pawn in evaluator units.
pub const PAWN_EV_VALUE: i32 = PAWN_VALUE * EV_SCORE_RATIO;

/// Configurable heuristic weights, in evaluator units.
#[derive(Clone, Debug)]
pub struct EvalWeights {
    pub ptouch: i32,
    pub pprox: i32,
    pub mface: i32,
    pub mcede: i32,
    /// Wired through for weight compatibility; the evaluator gives it
    /// a zero score, so it contributes nothing.
    pub lcoverage: i32,
    pub pmid: i32,
    pub mmid: i32,
    pub pmat: i32,
    pub relqi: i32,
    pub absqi: i32,
}

impl Default for EvalWeights {
    fn default() -> Self {
        // Tuned offline; fractions of PAWN_EV_VALUE.
        EvalWeights {
            ptouch: 1029,
            pprox: 2231,
            mface: 4186,
            mcede: 1204,
            lcoverage: 175,
            pmid: -1234,
            mmid: -1227,
            pmat: PAWN_EV_VALUE,
            relqi: 12006,
            absqi: 106,
        }
    }
}

const NUM_HEURISTICS: usize = 10;

// Heuristic slots, in weight-table order.
const PTOUCH: usize = 0;
const PPROX: usize = 1;
const MFACE: usize = 2;
const MCEDE: usize = 3;
const LCOVERAGE: usize = 4;
const PMID: usize = 5;
const MMID: usize = 6;
const PMAT: usize = 7;
const RELQI: usize = 8;
const ABSQI: usize = 9;

/// Heuristics whose raw scores are scaled by `weight / PAWN_EV_VALUE`
/// instead of multiplied by the weight directly.
const FLOATING: [bool; NUM_HEURISTICS] = [
    false, true, true, true, true, false, false, false, true, true,
];

/// `INVERSE[d] == 1 / (d + 1)`.
const INVERSE: [f32; 16] = [
    1.0,
    1.0 / 2.0,
    1.0 / 3.0,
    1.0 / 4.0,
    1.0 / 5.0,
    1.0 / 6.0,
    1.0 / 7.0,
    1.0 / 8.0,
    1.0 / 9.0,
    1.0 / 10.0,
    1.0 / 11.0,
    1.0 / 12.0,
    1.0 / 13.0,
    1.0 / 14.0,
    1.0 / 15.0,
    1.0 / 16.0,
];

/// Harmonic-ish distance: `1/(|df|+1) + 1/(|dr|+1)`.
#[inline]
fn h_dist(rank: i8, file: i8, other: Square) -> f32 {
    let delta_fil = (file - other.file()).unsigned_abs() as usize;
    let delta_rnk = (rank - other.rank()).unsigned_abs() as usize;
    INVERSE[delta_fil] + INVERSE[delta_rnk]
}

/// MFACE: bonus for facing toward an opposing monarch, proportional to
/// the component of the offset along the facing direction, damped by
/// taxicab distance.
fn mface_pair(piece: Piece, delta_fil: i32, delta_rnk: i32) -> i32 {
    let along = match piece.orientation() {
        monarch_ori::NN => delta_rnk,
        monarch_ori::EE => delta_fil,
        monarch_ori::SS => -delta_rnk,
        _ => -delta_fil,
    };
    let dist = (delta_rnk.unsigned_abs() + delta_fil.unsigned_abs()) as usize;
    ((along * PAWN_EV_VALUE) as f32 * INVERSE[dist - 1]) as i32
}

/// MCEDE: penalty proportional to the quadrant area the opposing
/// monarch can move into, chosen by the sign of its offset.
fn mcede_pair(file: i32, rank: i32, delta_fil: i32, delta_rnk: i32) -> i32 {
    let width = 8;
    let penalty = if delta_fil >= 0 && delta_rnk >= 0 {
        (width - file) * (width - rank)
    } else if delta_fil >= 0 {
        (width - file) * (rank + 1)
    } else if delta_rnk <= 0 {
        (file + 1) * (rank + 1)
    } else {
        (file + 1) * (width - rank)
    };
    (PAWN_EV_VALUE * penalty) / (width * width)
}

fn for_each_opposing_monarch(p: &Position, color: Color, mut f: impl FnMut(Square)) {
    for num in 0..2 {
        let sq = p.monarch(color.opponent(), num);
        if p.piece_at(sq).kind() == PieceKind::Monarch {
            f(sq);
        }
    }
}

/// `(# white>black qi pairs) - (# white<black qi pairs)`, over pawns,
/// normalized by `(n_w + 1)(n_b + 1)`.
fn rel_qi(p: &Position) -> f32 {
    let mut pawn_sqs: [[Square; 6]; 2] = [[Square::NONE; 6]; 2];
    let mut counts = [0usize; 2];

    for color in [Color::White, Color::Black] {
        let c = color.index();
        let mut pieces = p.occupancy(color);
        for num in 0..2 {
            let m = p.monarch(color, num);
            if !m.is_none() {
                pieces &= !m.bit();
            }
        }
        while pieces != 0 {
            let sq = Square::from_dense(pieces.trailing_zeros() as usize);
            pieces &= pieces - 1;
            pawn_sqs[c][counts[c]] = sq;
            counts[c] += 1;
        }
    }

    let mut qi = 0i32;
    for &white_sq in &pawn_sqs[0][..counts[0]] {
        for &black_sq in &pawn_sqs[1][..counts[1]] {
            match qi_at(white_sq).cmp(&qi_at(black_sq)) {
                std::cmp::Ordering::Greater => qi += 1,
                std::cmp::Ordering::Less => qi -= 1,
                std::cmp::Ordering::Equal => {}
            }
        }
    }
    qi as f32 / ((counts[0] + 1) as f32 * (counts[1] + 1) as f32)
}

/// Sum of qi over one color's pawns.
fn abs_qi(p: &Position, color: Color) -> i32 {
    let mut qi = 0i32;
    let mut pieces = p.occupancy(color);
    while pieces != 0 {
        let sq = Square::from_dense(pieces.trailing_zeros() as usize);
        pieces &= pieces - 1;
        if p.piece_at(sq).kind() == PieceKind::Pawn {
            qi += i32::from(qi_at(sq));
        }
    }
    qi
}

/// Static evaluation in search units, from the side to move's point
/// of view.
#[must_use]
pub fn evaluate(p: &Position, weights: &EvalWeights) -> Score {
    let mut score = [[0i32; NUM_HEURISTICS]; 2];

    // All pawns of both colors, for the touch test.
    let mut pawns = p.occupancy(Color::White) | p.occupancy(Color::Black);
    for color in [Color::White, Color::Black] {
        for num in 0..2 {
            let m = p.monarch(color, num);
            if !m.is_none() {
                pawns &= !m.bit();
            }
        }
    }

    for color in [Color::White, Color::Black] {
        let c = color.index();
        let mut pieces = p.occupancy(color);
        while pieces != 0 {
            let sq = Square::from_dense(pieces.trailing_zeros() as usize);
            pieces &= pieces - 1;
            let piece = p.piece_at(sq);
            let (f, r) = (sq.file(), sq.rank());
            let central = centrality(f, r);

            match piece.kind() {
                PieceKind::Pawn => {
                    score[c][PMAT] += 1;
                    if pawns & NEIGHBORS[sq.mailbox_index()] != 0 {
                        score[c][PTOUCH] -= 1;
                    }
                    let mut pweight = 0.0f32;
                    for mcolor in [Color::White, Color::Black] {
                        for num in 0..2 {
                            let m = p.monarch(mcolor, num);
                            if !m.is_none() {
                                pweight += h_dist(r, f, m);
                            }
                        }
                    }
                    score[c][PPROX] += (pweight * PAWN_EV_VALUE as f32) as i32;
                    score[c][PMID] += central;
                }
                PieceKind::Monarch => {
                    for_each_opposing_monarch(p, color, |opp_sq| {
                        let delta_fil = i32::from(opp_sq.file() - f);
                        let delta_rnk = i32::from(opp_sq.rank() - r);
                        score[c][MFACE] += mface_pair(piece, delta_fil, delta_rnk);
                        score[c][MCEDE] -=
                            mcede_pair(i32::from(f), i32::from(r), delta_fil, delta_rnk);
                    });
                    score[c][MMID] += central;
                }
                _ => {}
            }
        }
    }

    let white_relqi = (PAWN_EV_VALUE as f32 * rel_qi(p)) as i32;
    score[Color::White.index()][RELQI] = white_relqi;
    score[Color::Black.index()][RELQI] = -white_relqi;
    score[Color::White.index()][ABSQI] = PAWN_EV_VALUE * abs_qi(p, Color::White);
    score[Color::Black.index()][ABSQI] = PAWN_EV_VALUE * abs_qi(p, Color::Black);
    // LCOVERAGE keeps its weight slot but scores zero.
    debug_assert_eq!(score[0][LCOVERAGE], 0);

    let weight_table = [
        weights.ptouch,
        weights.pprox,
        weights.mface,
        weights.mcede,
        weights.lcoverage,
        weights.pmid,
        weights.mmid,
        weights.pmat,
        weights.relqi,
        weights.absqi,
    ];

    let mut total = [0i32; 2];
    for c in 0..2 {
        for (i, &weight) in weight_table.iter().enumerate() {
            let bonus = if FLOATING[i] {
                (score[c][i] as f32 * (weight as f32 / PAWN_EV_VALUE as f32)) as i32
            } else {
                score[c][i] * weight
            };
            total[c] += bonus;
        }
    }

    let mut tot = total[Color::White.index()] - total[Color::Black.index()];
    if p.side_to_move() == Color::Black {
        tot = -tot;
    }
    (tot / EV_SCORE_RATIO) as Score
}
