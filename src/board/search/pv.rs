//! Full-window principal-variation search.
//!
//! Unlike scout nodes, a PV node never short-circuits on a
//! transposition-table hit; the table only contributes its hint move
//! to the ordering. The whole move list is sorted up front and walked
//! with the same two-pass deferral discipline as the scout search.

use crate::board::state::Position;
use crate::board::types::{Move, MAX_MOVES};

use super::common::{
    assign_sort_keys, evaluate_as_leaf, evaluate_move, process_score, store_tt, Frame,
    MoveOutcome, NodeCtx,
};
use super::constants::{Score, INF};
use super::{SearchContext, WorkerState};

/// Search `pos` with the full window `[alpha, beta)`.
pub(crate) fn search_pv(
    ctx: &SearchContext<'_>,
    w: &mut WorkerState,
    parent: &Frame<'_>,
    pos: &Position,
    alpha: Score,
    beta: Score,
    depth: i32,
    ply: usize,
) -> Score {
    let frame = Frame::child(parent);

    let leaf = evaluate_as_leaf(ctx, pos, depth, beta, ply, false);
    if let Some(score) = leaf.resolved {
        return score;
    }

    let mut node = NodeCtx {
        pos,
        ply,
        depth,
        alpha,
        beta,
        orig_alpha: alpha,
        quiescence: depth <= 0,
        scout: false,
        legal_move_count: 0,
        killer_a: w.killers.primary(ply),
        killer_b: w.killers.secondary(ply),
        best_score: -INF,
        best_move: Move::NULL,
        best_index: 0,
    };

    // In quiescence the side to move may stand pat.
    if leaf.score > node.best_score {
        node.best_score = leaf.score;
        if node.best_score > node.alpha {
            node.alpha = node.best_score;
        }
    }

    let moves = pos.generate_moves();
    let mut list = assign_sort_keys(w, pos, &moves, leaf.tt_move, ply, false);
    list.sort_desc();

    let mut tried = [Move::NULL; MAX_MOVES];
    let mut tried_count = 0usize;

    let mut deferred = [Move::NULL; MAX_MOVES];
    let mut deferred_count = 0usize;
    let mut first = true;
    let mut aborted = false;

    'passes: for pass in 0..2 {
        let count = if pass == 0 { list.len() } else { deferred_count };
        for idx in 0..count {
            let mv = if pass == 0 {
                list.as_slice()[idx].mv
            } else {
                deferred[idx]
            };
            if pass == 0 && !first && ctx.deferral.is_searching(pos.key(), mv) {
                deferred[deferred_count] = mv;
                deferred_count += 1;
                continue;
            }
            first = false;

            if ctx.params.trace_moves {
                println!("info {} {}", mv, node.ply);
            }
            w.node_count += 1;

            ctx.deferral.begin(pos.key(), mv);
            let result = evaluate_move(ctx, w, &frame, &node, mv);
            ctx.deferral.finish(pos.key(), mv);

            if ctx.clock.is_aborted() {
                aborted = true;
                break 'passes;
            }

            let score = match result {
                MoveOutcome::Ignore => continue,
                MoveOutcome::Evaluated(score) => {
                    node.legal_move_count += 1;
                    score
                }
                MoveOutcome::GameOver(score) => score,
            };

            tried[tried_count] = mv;
            if process_score(w, &mut node, mv, tried_count, score) {
                tried_count += 1;
                break 'passes;
            }
            tried_count += 1;
        }
    }

    // An aborted frame returns a neutral score and leaves the tables
    // untouched; the coordinator discards the whole iteration.
    if aborted {
        return 0;
    }

    if !node.quiescence {
        w.history
            .update(pos, &tried[..tried_count], node.best_index);
    }
    store_tt(ctx, &node);
    node.best_score
}
