//! Iterative-deepening principal-variation + scout search.
//!
//! Three mutually recursive routines walk the position tree:
//! `search_root` over the shuffled root list, `search_pv` with the
//! full window along the presumed best line, and `scout_search` with
//! a null window everywhere else (re-searched on a fail-high).
//! Supporting cast: a shared lock-free transposition table, killers
//! and a decayed best-move history per worker, late-move reductions,
//! margin and futility forward pruning, capture-only quiescence with
//! stand-pat, and repetition draw detection over a flat history line.

pub(crate) mod constants;

mod common;
mod params;
mod pv;
mod root;
mod scout;
mod tables;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::board::eval::EvalWeights;
use crate::board::state::LineEntry;
use crate::board::types::SortableMoveList;
use crate::sync::AbortClock;
use crate::tt::TranspositionTable;

pub use common::is_draw;
pub use constants::{Score, INF, WIN};
pub use params::SearchParams;
pub use root::{iterative_deepening, SearchOutcome};
pub use tables::{DeferralTable, PvTable};

use tables::{HistoryTable, KillerTable};

/// Everything a worker shares with its peers, by reference: the
/// transposition table and deferral table race benignly, the
/// best-move slots take a short lock, the clock is an atomic flag.
pub(crate) struct SearchContext<'a> {
    pub tt: &'a TranspositionTable,
    pub deferral: &'a DeferralTable,
    pub pv: &'a PvTable,
    pub clock: &'a AbortClock,
    pub params: &'a SearchParams,
    pub weights: &'a EvalWeights,
}

/// Per-worker search state. Killers, history, and the root move list
/// survive across searches; the history line and counters are reset
/// per search. Alignment keeps neighboring workers off each other's
/// cache lines.
#[repr(align(64))]
pub struct WorkerState {
    pub(crate) killers: KillerTable,
    pub(crate) history: HistoryTable,
    pub(crate) root_moves: SortableMoveList,
    /// Game line plus the current search line, for draw detection.
    pub(crate) line: Vec<LineEntry>,
    pub(crate) node_count: u64,
    pub(crate) tics: u32,
    pub(crate) rng: StdRng,
}

impl WorkerState {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        WorkerState {
            killers: KillerTable::new(),
            history: HistoryTable::new(),
            root_moves: SortableMoveList::new(),
            line: Vec::new(),
            node_count: 0,
            tics: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Reset per-search state; ordering tables deliberately persist.
    pub(crate) fn begin_search(&mut self, line: &[LineEntry]) {
        self.line.clear();
        self.line.extend_from_slice(line);
        self.node_count = 0;
        self.tics = 0;
    }

    /// Re-seed the root-shuffle generator (the `reset_rng` option).
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    #[must_use]
    pub fn node_count(&self) -> u64 {
        self.node_count
    }
}
