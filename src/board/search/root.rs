//! Root search and the iterative-deepening driver.
//!
//! The driver runs one fork-join of worker replicas per depth. Every
//! worker owns its killers, history, root move list, and node counter;
//! the transposition table, the deferral table, and the per-depth
//! best-move slots are shared. Each worker shuffles its own root list
//! at depth 1 and thereafter keeps successful moves at the front, so
//! replicas diverge in move order and cooperate through the shared
//! tables.

use std::thread;

use rand::Rng;

use crate::board::eval::EvalWeights;
use crate::board::state::{LineEntry, Position};
use crate::board::types::{Move, SortableMoveList};
use crate::sync::AbortClock;
use crate::tt::TranspositionTable;

use super::common::{draw_score, game_over_score, is_draw, pov_of, Frame};
use super::constants::{Score, INF};
use super::pv::search_pv;
use super::scout::scout_search;
use super::tables::{DeferralTable, PvTable};
use super::{SearchContext, SearchParams, WorkerState};

/// Do not start an iteration past this fraction of the time budget.
const RATIO_FOR_TIMEOUT: f64 = 0.5;

/// One worker's pass over the root moves at a fixed depth.
fn search_root(
    ctx: &SearchContext<'_>,
    w: &mut WorkerState,
    pos: &Position,
    mut alpha: Score,
    beta: Score,
    depth: i32,
) -> Score {
    if depth == 1 {
        let moves = pos.generate_moves();
        w.root_moves = SortableMoveList::new();
        for &mv in &moves {
            w.root_moves.push(mv, 0);
        }
        let n = w.root_moves.len();
        let slice = w.root_moves.as_mut_slice();
        for i in 0..n {
            let r = w.rng.gen_range(0..n);
            slice.swap(i, r);
        }
    }

    let frame = Frame::root();
    let pov = pov_of(pos);
    let mut best_score = -INF;

    for idx in 0..w.root_moves.len() {
        let mv = w.root_moves.as_slice()[idx].mv;
        if ctx.params.trace_moves {
            println!("info {mv} 0");
        }
        w.node_count += 1;

        let next = pos.apply_move(mv);

        let score = if next.is_game_over() {
            game_over_score(&next, pov, 0)
        } else if is_draw(&next, &w.line, ctx.params) {
            draw_score(&next, 0, &w.line, ctx.params)
        } else {
            w.line.push(next.line_entry());
            // The first move is presumed to be the principal
            // variation; the rest get a null-window trial first.
            let searched = if idx == 0 || depth == 1 {
                -search_pv(ctx, w, &frame, &next, -beta, -alpha, depth - 1, 1)
            } else {
                let scouted = -scout_search(ctx, w, &frame, &next, -alpha, depth - 1, 1);
                if scouted > alpha && !ctx.clock.is_aborted() {
                    -search_pv(ctx, w, &frame, &next, -beta, -alpha, depth - 1, 1)
                } else {
                    scouted
                }
            };
            w.line.pop();
            if ctx.clock.is_aborted() {
                return 0;
            }
            searched
        };

        if score > best_score {
            best_score = score;
            ctx.pv.submit(depth, score, mv);

            let elapsed = ctx.clock.elapsed_ms().max(0.00001);
            let nps = (1000.0 * w.node_count as f64 / elapsed) as u64;
            println!(
                "info depth {depth} move_no {} time (microsec) {} nodes {} nps {nps}",
                idx + 1,
                (elapsed * 1000.0) as u64,
                w.node_count,
            );
            println!("info score cp {score} pv {}", ctx.pv.line());

            w.root_moves.slide_to_front(idx);
        }

        if score > alpha {
            alpha = score;
        }
        if score >= beta {
            break;
        }
    }

    best_score
}

/// What a search produced.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub best_move: Option<Move>,
    pub nodes: u64,
    pub elapsed_ms: f64,
    /// Deepest iteration that ran to completion.
    pub completed_depth: i32,
}

/// Iterative deepening over fork-joined worker replicas.
///
/// `line` is the played game line including `pos` itself (used for
/// repetition detection). `budget_ms` of `None` means depth-limited
/// only; otherwise iterations stop early once half the budget is
/// spent, and the hard deadline aborts mid-iteration at three times
/// the budget.
#[allow(clippy::too_many_arguments)]
pub fn iterative_deepening(
    pos: &Position,
    line: &[LineEntry],
    tt: &TranspositionTable,
    deferral: &DeferralTable,
    pv: &PvTable,
    params: &SearchParams,
    weights: &EvalWeights,
    workers: &mut [WorkerState],
    depth_limit: i32,
    budget_ms: Option<f64>,
) -> SearchOutcome {
    let clock = budget_ms.map_or_else(AbortClock::unlimited, AbortClock::with_budget_ms);
    pv.reset();
    for w in workers.iter_mut() {
        w.begin_search(line);
    }

    let mut best_move = None;
    let mut completed_depth = 0;

    for depth in 1..=depth_limit {
        clock.reset();
        tt.age();

        thread::scope(|scope| {
            for w in workers.iter_mut() {
                let clock = &clock;
                scope.spawn(move || {
                    let ctx = SearchContext {
                        tt,
                        deferral,
                        pv,
                        clock,
                        params,
                        weights,
                    };
                    search_root(&ctx, w, pos, -INF, INF, depth);
                });
            }
        });

        if let Some(mv) = pv.best() {
            best_move = Some(mv);
        }
        #[cfg(feature = "logging")]
        log::debug!(
            "depth {depth}: best {:?}, {} nodes, {:.1} ms",
            best_move,
            workers.iter().map(WorkerState::node_count).sum::<u64>(),
            clock.elapsed_ms()
        );
        if clock.is_aborted() {
            break;
        }
        completed_depth = depth;

        if let Some(budget) = budget_ms {
            if clock.elapsed_ms() > budget * RATIO_FOR_TIMEOUT {
                break;
            }
        }
    }

    SearchOutcome {
        best_move,
        nodes: workers.iter().map(WorkerState::node_count).sum(),
        elapsed_ms: clock.elapsed_ms(),
        completed_depth,
    }
}
