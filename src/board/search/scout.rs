//! Null-window (scout) search.
//!
//! The best-keyed move is tried before the rest of the list is even
//! sorted; only if it fails to cut off does the node pay for a full
//! ordering pass. Remaining moves run through the two-pass deferral
//! discipline: moves another worker is already searching at this
//! position wait for the second pass.

use crate::board::state::Position;
use crate::board::types::{Move, MAX_MOVES};

use super::common::{
    assign_sort_keys, evaluate_as_leaf, evaluate_move, process_score, store_tt, Frame,
    MoveOutcome, NodeCtx,
};
use super::constants::Score;
use super::{SearchContext, WorkerState};

/// Search `pos` with the null window `[beta-1, beta)`.
pub(crate) fn scout_search(
    ctx: &SearchContext<'_>,
    w: &mut WorkerState,
    parent: &Frame<'_>,
    pos: &Position,
    beta: Score,
    depth: i32,
    ply: usize,
) -> Score {
    let frame = Frame::child(parent);

    if ctx.clock.poll(&mut w.tics) || frame.parent_aborted() {
        return 0;
    }

    let leaf = evaluate_as_leaf(ctx, pos, depth, beta, ply, true);
    if let Some(score) = leaf.resolved {
        return score;
    }

    let mut node = NodeCtx {
        pos,
        ply,
        depth,
        alpha: beta - 1,
        beta,
        orig_alpha: beta - 1,
        quiescence: leaf.enter_quiescence,
        scout: true,
        legal_move_count: 0,
        killer_a: w.killers.primary(ply),
        killer_b: w.killers.secondary(ply),
        best_score: leaf.score,
        best_move: Move::NULL,
        best_index: 0,
    };

    let moves = pos.generate_moves();
    let mut list = assign_sort_keys(w, pos, &moves, leaf.tt_move, ply, true);

    let mut tried = [Move::NULL; MAX_MOVES];
    let mut tried_count = 0usize;

    if let Some(best_move) = list.best() {
        tried[tried_count] = best_move;
        let cutoff = process_move(ctx, w, &frame, &mut node, best_move, tried_count);
        tried_count += 1;

        if !cutoff {
            list.sort_desc();
            debug_assert_eq!(list.as_slice()[0].mv, best_move);

            let mut deferred = [Move::NULL; MAX_MOVES];
            let mut deferred_count = 0usize;
            let mut first = true;

            'passes: for pass in 0..2 {
                let count = if pass == 0 {
                    list.len() - 1
                } else {
                    deferred_count
                };
                for idx in 0..count {
                    let mv = if pass == 0 {
                        list.as_slice()[idx + 1].mv
                    } else {
                        deferred[idx]
                    };
                    if pass == 0 && !first && ctx.deferral.is_searching(pos.key(), mv) {
                        deferred[deferred_count] = mv;
                        deferred_count += 1;
                        continue;
                    }
                    first = false;
                    ctx.deferral.begin(pos.key(), mv);
                    tried[tried_count] = mv;
                    let cutoff = process_move(ctx, w, &frame, &mut node, mv, tried_count);
                    tried_count += 1;
                    if cutoff {
                        break 'passes;
                    }
                }
            }
        }
    }

    w.node_count += 1;

    // A canceled search returns a neutral score from every frame and
    // leaves the shared tables untouched.
    if ctx.clock.is_aborted() || frame.parent_aborted() {
        return 0;
    }

    if !node.quiescence {
        w.history
            .update(pos, &tried[..tried_count], node.best_index);
    }
    store_tt(ctx, &node);
    node.best_score
}

/// Evaluate one scout move and fold in its score. Returns true on a
/// beta cutoff, which also marks this node aborted so anything still
/// searching below it unwinds.
fn process_move(
    ctx: &SearchContext<'_>,
    w: &mut WorkerState,
    frame: &Frame<'_>,
    node: &mut NodeCtx<'_>,
    mv: Move,
    index: usize,
) -> bool {
    if ctx.params.trace_moves {
        println!("info {} {}", mv, node.ply);
    }

    let result = evaluate_move(ctx, w, frame, node, mv);
    ctx.deferral.finish(node.pos.key(), mv);

    if ctx.clock.is_aborted() || frame.parent_aborted() {
        return false;
    }
    let score = match result {
        MoveOutcome::Ignore => return false,
        MoveOutcome::Evaluated(score) => {
            node.legal_move_count += 1;
            score
        }
        MoveOutcome::GameOver(score) => score,
    };

    let cutoff = process_score(w, node, mv, index, score);
    if cutoff {
        frame.mark_aborted();
    }
    cutoff
}
