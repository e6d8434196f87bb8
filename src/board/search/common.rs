//! Machinery shared by the root, PV, and scout searches: leaf
//! pre-evaluation, per-move evaluation and recursion, draw detection,
//! score bookkeeping, and move ordering keys.

use crate::board::eval::evaluate;
use crate::board::state::{LineEntry, Position};
use crate::board::types::{Color, Move, MoveList, SortableMoveList, MAX_SORT_KEY};
use crate::tt;

use super::constants::{
    Score, DRAW_NUM_REPS, FUTILITY_MARGIN, HISTORY_PARTIAL_FLOOR, INF, PAWN_VALUE, WIN,
};
use super::pv::search_pv;
use super::scout::scout_search;
use super::{SearchContext, WorkerState};

use std::cell::Cell;

/// One frame of the search tree, linked to its parent so a cutoff can
/// be observed by anything searching below a dead node.
pub(crate) struct Frame<'a> {
    parent: Option<&'a Frame<'a>>,
    abort: Cell<bool>,
}

impl<'a> Frame<'a> {
    pub(crate) fn root() -> Frame<'static> {
        Frame {
            parent: None,
            abort: Cell::new(false),
        }
    }

    pub(crate) fn child(parent: &'a Frame<'a>) -> Frame<'a> {
        Frame {
            parent: Some(parent),
            abort: Cell::new(false),
        }
    }

    pub(crate) fn mark_aborted(&self) {
        self.abort.set(true);
    }

    /// Whether any ancestor node has cut off.
    pub(crate) fn parent_aborted(&self) -> bool {
        let mut frame = self.parent;
        while let Some(f) = frame {
            if f.abort.get() {
                return true;
            }
            frame = f.parent;
        }
        false
    }
}

/// Mutable per-node search state threaded through the move loop.
pub(crate) struct NodeCtx<'a> {
    pub pos: &'a Position,
    pub ply: usize,
    pub depth: i32,
    pub alpha: Score,
    pub beta: Score,
    pub orig_alpha: Score,
    pub quiescence: bool,
    pub scout: bool,
    pub legal_move_count: i32,
    pub killer_a: Move,
    pub killer_b: Move,
    pub best_score: Score,
    pub best_move: Move,
    pub best_index: usize,
}

/// Result of evaluating one move at a node.
pub(crate) enum MoveOutcome {
    /// A recursive search produced this score.
    Evaluated(Score),
    /// The move ends the game (win or draw); no recursion happened.
    GameOver(Score),
    /// Skipped: quiet or blundering in quiescence, or aborted.
    Ignore,
}

/// Result of pre-evaluating a node before any move is tried.
pub(crate) struct LeafEval {
    /// Set when the node's value is already decided (TT cutoff, or a
    /// quiescence stand-pat at or above beta).
    pub resolved: Option<Score>,
    /// Stand-pat score to seed `best_score` with; `-INF` when the
    /// node is not (entering) quiescence.
    pub score: Score,
    pub enter_quiescence: bool,
    pub tt_move: Move,
}

/// Pre-evaluate a node. Scout nodes may be settled outright by the
/// transposition table, by margin-based forward pruning at depths 1-2,
/// or demoted to quiescence by extended futility pruning; PV nodes
/// only pick up the hint move and the quiescence stand-pat.
pub(crate) fn evaluate_as_leaf(
    ctx: &SearchContext<'_>,
    pos: &Position,
    depth: i32,
    beta: Score,
    ply: usize,
    scout: bool,
) -> LeafEval {
    let mut result = LeafEval {
        resolved: None,
        score: -INF,
        enter_quiescence: false,
        tt_move: Move::NULL,
    };

    if ctx.params.use_tt {
        if let Some(rec) = ctx.tt.get(pos.key()) {
            if scout && rec.is_usable(depth, beta) {
                result.resolved = Some(tt::score_from_table(rec.score, ply));
                return result;
            }
            result.tt_move = rec.mv;
        }
    }

    let stand_pat = evaluate(pos, ctx.weights).saturating_add(ctx.params.hmb);
    let quiescence = depth <= 0;
    result.enter_quiescence = quiescence;
    if quiescence {
        result.score = stand_pat;
        if stand_pat >= beta {
            result.resolved = Some(stand_pat);
            return result;
        }
    }

    // Margin-based forward pruning near the horizon: a static eval
    // three (resp. five) pawns above beta at depth 1 (resp. 2) fails
    // high without searching.
    if scout && ctx.params.use_nmm && depth <= 2 {
        if depth == 1 && i32::from(stand_pat) >= i32::from(beta) + 3 * PAWN_VALUE {
            result.resolved = Some(beta);
            return result;
        }
        if depth == 2 && i32::from(stand_pat) >= i32::from(beta) + 5 * PAWN_VALUE {
            result.resolved = Some(beta);
            return result;
        }
    }

    // Extended futility: a hopeless static eval turns this ply into a
    // quiescence ply that looks only at capture-like moves.
    if scout
        && depth <= ctx.params.fut_depth
        && depth > 0
        && i32::from(stand_pat) + FUTILITY_MARGIN[depth as usize] < i32::from(beta)
    {
        result.enter_quiescence = true;
        result.score = stand_pat;
    }

    result
}

/// Draw by no progress or by repetition. Ancestors are walked two
/// plies at a time over the flat history line (`line`'s last entry is
/// the parent of `next`), bounded by the victimless-ply counter, so
/// the walk needs no sentinels to terminate.
pub fn is_draw(next: &Position, line: &[LineEntry], params: &super::SearchParams) -> bool {
    if !params.detect_draws {
        return false;
    }
    if next.plies_since_victim() >= 2 * params.nmoves_draw {
        return true;
    }

    let cur = next.key();
    let mut reps_history = 1usize;
    let mut reps_search = usize::from(!next.was_played());

    let mut budget = next.plies_since_victim() as i64 - 2;
    let mut idx = line.len() as i64 - 2;
    while budget >= 0 && idx >= 0 {
        let entry = line[idx as usize];
        if entry.key == cur {
            reps_history += 1;
            if !entry.was_played {
                reps_search += 1;
            }
        }
        budget -= 2;
        idx -= 2;
    }
    reps_history >= DRAW_NUM_REPS || reps_search >= 2
}

/// Score of a drawn position: the configured draw score from the
/// point of view of the player at `node_ply`, or zero when the chain
/// of victimless ancestors holds no repetition (no-progress draws).
pub(crate) fn draw_score(
    next: &Position,
    node_ply: usize,
    line: &[LineEntry],
    params: &super::SearchParams,
) -> Score {
    let cur = next.key();
    let mut idx = line.len() as i64 - 1;
    loop {
        if idx < 0 || !line[idx as usize].victimless {
            return 0;
        }
        idx -= 1;
        if idx < 0 {
            return 0;
        }
        let entry = line[idx as usize];
        if !entry.victimless {
            return 0;
        }
        if entry.key == cur {
            return if node_ply & 1 == 1 {
                -params.draw
            } else {
                params.draw
            };
        }
        idx -= 1;
    }
}

/// End-game score from `pov` (+1 White, -1 Black), with a ply shift so
/// nearer wins score higher.
pub(crate) fn game_over_score(next: &Position, pov: i32, ply: usize) -> Score {
    let mut score = if next.player_wins(Color::Black) {
        -i32::from(WIN) * pov
    } else {
        i32::from(WIN) * pov
    };
    if score < 0 {
        score += ply as i32;
    } else {
        score -= ply as i32;
    }
    score as Score
}

/// Point of view multiplier of the side to move.
#[inline]
pub(crate) fn pov_of(pos: &Position) -> i32 {
    match pos.side_to_move() {
        Color::White => 1,
        Color::Black => -1,
    }
}

/// Build ordering keys: the hint move first, then the killers, then
/// history. `partial` collapses small history scores to zero, which
/// cheapens the later sort in scout nodes.
pub(crate) fn assign_sort_keys(
    w: &WorkerState,
    pos: &Position,
    moves: &MoveList,
    tt_move: Move,
    ply: usize,
    partial: bool,
) -> SortableMoveList {
    let killer_a = w.killers.primary(ply);
    let killer_b = w.killers.secondary(ply);

    let mut list = SortableMoveList::new();
    for &mv in moves {
        let key = if mv == tt_move {
            MAX_SORT_KEY
        } else if mv == killer_a {
            MAX_SORT_KEY - 1
        } else if mv == killer_b {
            MAX_SORT_KEY - 2
        } else {
            let mut score = w.history.score(pos, mv);
            if partial && score < HISTORY_PARTIAL_FLOOR {
                score = 0;
            }
            score as u32
        };
        list.push(mv, key);
    }
    list
}

/// Evaluate one move: apply it, settle game-over/draw/quiescence
/// filtering, then recurse with capture extension and (in scout
/// nodes) late-move reduction.
pub(crate) fn evaluate_move(
    ctx: &SearchContext<'_>,
    w: &mut WorkerState,
    frame: &Frame<'_>,
    node: &NodeCtx<'_>,
    mv: Move,
) -> MoveOutcome {
    let next = node.pos.apply_move(mv);
    let victims = next.victims();
    let mover = node.pos.side_to_move();

    if next.is_game_over() {
        return MoveOutcome::GameOver(game_over_score(&next, pov_of(node.pos), node.ply));
    }

    // Quiescence examines only capture-like moves.
    if victims.is_empty() && node.quiescence {
        return MoveOutcome::Ignore;
    }

    if is_draw(&next, &w.line, ctx.params) {
        return MoveOutcome::GameOver(draw_score(&next, node.ply, &w.line, ctx.params));
    }

    let blunder = victims.is_blunder(mover);
    if node.quiescence && blunder {
        return MoveOutcome::Ignore;
    }

    // Capturing something (other than only ourselves) is interesting
    // enough to look one ply deeper.
    let ext = i32::from(victims.any() && !blunder);

    // Late-move reductions, scout only: a quiet non-killer move late
    // in the ordering gets a reduced-depth trial first.
    let mut reduction = 0;
    if node.scout
        && node.legal_move_count + 1 >= ctx.params.lmr_r1
        && node.depth > 2
        && victims.is_empty()
        && mv != node.killer_a
        && mv != node.killer_b
    {
        reduction = if node.legal_move_count + 1 >= ctx.params.lmr_r2 {
            2
        } else {
            1
        };
    }

    w.line.push(next.line_entry());
    let outcome = recurse(ctx, w, frame, node, &next, ext, reduction);
    w.line.pop();
    outcome
}

fn recurse(
    ctx: &SearchContext<'_>,
    w: &mut WorkerState,
    frame: &Frame<'_>,
    node: &NodeCtx<'_>,
    next: &Position,
    ext: i32,
    reduction: i32,
) -> MoveOutcome {
    let search_depth = ext + node.depth - 1;
    let child_ply = node.ply + 1;

    if reduction > 0 {
        let reduced = -scout_search(
            ctx,
            w,
            frame,
            next,
            -node.alpha,
            search_depth - reduction,
            child_ply,
        );
        // Only a reduced score that threatens beta earns the full-
        // depth re-search.
        if reduced < node.beta {
            return MoveOutcome::Evaluated(reduced);
        }
    }

    if ctx.clock.is_aborted() {
        return MoveOutcome::Ignore;
    }

    let score = if node.scout {
        -scout_search(ctx, w, frame, next, -node.alpha, search_depth, child_ply)
    } else if node.legal_move_count == 0 || node.quiescence {
        -search_pv(
            ctx,
            w,
            frame,
            next,
            -node.beta,
            -node.alpha,
            search_depth,
            child_ply,
        )
    } else {
        let scouted = -scout_search(ctx, w, frame, next, -node.alpha, search_depth, child_ply);
        if scouted > node.alpha {
            -search_pv(
                ctx,
                w,
                frame,
                next,
                -node.beta,
                -node.alpha,
                node.depth + ext - 1,
                child_ply,
            )
        } else {
            scouted
        }
    };
    MoveOutcome::Evaluated(score)
}

/// Fold one move's score into the node. Returns true on a beta
/// cutoff, after installing the move as a killer.
pub(crate) fn process_score(
    w: &mut WorkerState,
    node: &mut NodeCtx<'_>,
    mv: Move,
    mv_index: usize,
    score: Score,
) -> bool {
    if score > node.best_score {
        node.best_score = score;
        node.best_move = mv;
        node.best_index = mv_index;

        if !node.scout && score > node.alpha {
            node.alpha = score;
        }

        if score >= node.beta {
            w.killers.install(node.ply, mv);
            return true;
        }
    }
    false
}

/// Write the node's result back to the transposition table. Fail-low
/// results store the null move, which keeps any previously recorded
/// hint move alive in the record.
pub(crate) fn store_tt(ctx: &SearchContext<'_>, node: &NodeCtx<'_>) {
    let score = tt::score_to_table(node.best_score, node.ply);
    let key = node.pos.key();
    if node.scout {
        if node.best_score < node.beta {
            ctx.tt.put(key, node.depth, score, tt::Bound::Upper, Move::NULL);
        } else {
            ctx.tt.put(key, node.depth, score, tt::Bound::Lower, node.best_move);
        }
    } else if node.best_score <= node.orig_alpha {
        ctx.tt.put(key, node.depth, score, tt::Bound::Upper, Move::NULL);
    } else if node.best_score >= node.beta {
        ctx.tt.put(key, node.depth, score, tt::Bound::Lower, node.best_move);
    } else {
        ctx.tt.put(key, node.depth, score, tt::Bound::Exact, node.best_move);
    }
}
