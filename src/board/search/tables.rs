//! Search ordering tables and the cross-worker coordination tables.
//!
//! Killers and history are per-worker. The deferral table and the
//! per-depth best-move slots are shared by all workers: the former is
//! plain atomics with benign races, the latter a short critical
//! section around a handful of writes.

use std::sync::atomic::{AtomicU32, Ordering};

use parking_lot::Mutex;

use crate::board::state::Position;
use crate::board::types::{Color, Move};

use super::constants::{Score, HISTORY_BONUS, HISTORY_DECAY, INF, MAX_PLY_IN_SEARCH};

/// Two killer moves per search ply (with room for two more, unused).
#[derive(Clone)]
pub(crate) struct KillerTable {
    moves: [[Move; 4]; MAX_PLY_IN_SEARCH],
}

impl KillerTable {
    pub(crate) fn new() -> Self {
        KillerTable {
            moves: [[Move::NULL; 4]; MAX_PLY_IN_SEARCH],
        }
    }

    // Capture chains can extend a search past the nominal depth
    // budget; such plies all share the last slot.
    #[inline]
    fn row(ply: usize) -> usize {
        ply.min(MAX_PLY_IN_SEARCH - 1)
    }

    #[inline]
    pub(crate) fn primary(&self, ply: usize) -> Move {
        self.moves[Self::row(ply)][0]
    }

    #[inline]
    pub(crate) fn secondary(&self, ply: usize) -> Move {
        self.moves[Self::row(ply)][1]
    }

    /// Install a cutoff move, demoting the current primary killer.
    pub(crate) fn install(&mut self, ply: usize, mv: Move) {
        let row = &mut self.moves[Self::row(ply)];
        if mv != row[0] {
            row[1] = row[0];
            row[0] = mv;
        }
    }
}

const HISTORY_COLORS: usize = 2;
const HISTORY_KINDS: usize = 4;
const HISTORY_SQUARES: usize = crate::board::types::ARR_SIZE;
const HISTORY_ORIS: usize = 4;
const HISTORY_SIZE: usize = HISTORY_COLORS * HISTORY_KINDS * HISTORY_SQUARES * HISTORY_ORIS;

/// Best-move history indexed by (side, piece kind, to-square, final
/// orientation). Scores decay multiplicatively on every visit, and the
/// node's best move earns a flat bonus; values stay well under the
/// killer sort keys.
#[derive(Clone)]
pub(crate) struct HistoryTable {
    scores: Box<[i32; HISTORY_SIZE]>,
}

impl HistoryTable {
    pub(crate) fn new() -> Self {
        HistoryTable {
            scores: Box::new([0; HISTORY_SIZE]),
        }
    }

    #[inline]
    fn index(color: Color, mv: Move, final_ori: u8) -> usize {
        ((color.index() * HISTORY_KINDS + mv.kind().bits() as usize) * HISTORY_SQUARES
            + mv.to().mailbox_index())
            * HISTORY_ORIS
            + final_ori as usize
    }

    /// Orientation the moving piece ends the move with.
    #[inline]
    fn final_orientation(pos: &Position, mv: Move) -> u8 {
        mv.rot().apply(pos.piece_at(mv.from()).orientation())
    }

    #[inline]
    pub(crate) fn score(&self, pos: &Position, mv: Move) -> i32 {
        self.scores[Self::index(pos.side_to_move(), mv, Self::final_orientation(pos, mv))]
    }

    /// Decay every tried move and reward the best one.
    pub(crate) fn update(&mut self, pos: &Position, tried: &[Move], index_of_best: usize) {
        let color = pos.side_to_move();
        for (i, &mv) in tried.iter().enumerate() {
            let idx = Self::index(color, mv, Self::final_orientation(pos, mv));
            let mut s = self.scores[idx];
            if i == index_of_best {
                s += HISTORY_BONUS;
            }
            s = (f64::from(s) * HISTORY_DECAY) as i32;
            self.scores[idx] = s;
        }
    }
}

const DEFER_SETS: usize = 32768;
const DEFER_WAYS: usize = 4;

/// The "moves being searched" table (ABDADA). Workers publish the move
/// they are expanding at a position; peers defer duplicates to a
/// second pass. Plain relaxed atomics: a stale read costs duplicated
/// work, never correctness.
pub struct DeferralTable {
    slots: Vec<AtomicU32>,
}

impl DeferralTable {
    #[must_use]
    pub fn new() -> Self {
        let mut slots = Vec::with_capacity(DEFER_SETS * DEFER_WAYS);
        slots.resize_with(DEFER_SETS * DEFER_WAYS, || AtomicU32::new(0));
        DeferralTable { slots }
    }

    #[inline]
    fn set_base(pos_key: u64, mv: Move) -> usize {
        ((pos_key ^ u64::from(mv.bits())) & (DEFER_SETS as u64 - 1)) as usize * DEFER_WAYS
    }

    /// Publish that `mv` is being searched at `pos_key`.
    pub(crate) fn begin(&self, pos_key: u64, mv: Move) {
        let base = Self::set_base(pos_key, mv);
        let hash = mv.bits();
        for way in 0..DEFER_WAYS {
            let slot = &self.slots[base + way];
            if slot.load(Ordering::Relaxed) == 0 {
                slot.store(hash, Ordering::Relaxed);
                return;
            }
        }
        self.slots[base].store(hash, Ordering::Relaxed);
    }

    /// Clear the published entry, if it is still ours.
    pub(crate) fn finish(&self, pos_key: u64, mv: Move) {
        let base = Self::set_base(pos_key, mv);
        let hash = mv.bits();
        for way in 0..DEFER_WAYS {
            let slot = &self.slots[base + way];
            if slot.load(Ordering::Relaxed) == hash {
                slot.store(0, Ordering::Relaxed);
            }
        }
    }

    pub(crate) fn is_searching(&self, pos_key: u64, mv: Move) -> bool {
        let base = Self::set_base(pos_key, mv);
        let hash = mv.bits();
        (0..DEFER_WAYS).any(|way| self.slots[base + way].load(Ordering::Relaxed) == hash)
    }
}

impl Default for DeferralTable {
    fn default() -> Self {
        DeferralTable::new()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct PvSlot {
    pub score: Score,
    pub mv: Move,
    pub has_been_set: bool,
}

impl PvSlot {
    const EMPTY: PvSlot = PvSlot {
        score: -INF,
        mv: Move::NULL,
        has_been_set: false,
    };
}

/// Shared best-move-per-depth slots. Workers commit improvements under
/// the slot mutex with a strictly-greater-score rule, which stays
/// monotonic under retries.
pub struct PvTable {
    slots: Vec<Mutex<PvSlot>>,
}

impl PvTable {
    #[must_use]
    pub fn new() -> Self {
        let mut slots = Vec::with_capacity(MAX_PLY_IN_SEARCH);
        slots.resize_with(MAX_PLY_IN_SEARCH, || Mutex::new(PvSlot::EMPTY));
        PvTable { slots }
    }

    pub(crate) fn reset(&self) {
        for slot in &self.slots {
            *slot.lock() = PvSlot::EMPTY;
        }
    }

    /// Commit `mv` as the best move found at `depth` if it beats the
    /// recorded score. Returns whether the slot was updated.
    pub(crate) fn submit(&self, depth: i32, score: Score, mv: Move) -> bool {
        let idx = (depth - 1).clamp(0, MAX_PLY_IN_SEARCH as i32 - 1) as usize;
        let mut slot = self.slots[idx].lock();
        if !slot.has_been_set || score > slot.score {
            *slot = PvSlot {
                score,
                mv,
                has_been_set: true,
            };
            true
        } else {
            false
        }
    }

    /// Best move of the deepest completed depth.
    #[must_use]
    pub fn best(&self) -> Option<Move> {
        let mut best = None;
        for slot in &self.slots {
            let slot = slot.lock();
            if slot.has_been_set {
                best = Some(slot.mv);
            }
        }
        best
    }

    /// The per-depth best moves, shallowest first, up to the first
    /// unset slot. This is the line printed after `pv` in info output.
    #[must_use]
    pub fn line(&self) -> String {
        let mut parts = Vec::new();
        for slot in &self.slots {
            let slot = slot.lock();
            if !slot.has_been_set {
                break;
            }
            parts.push(slot.mv.to_string());
        }
        parts.join(" ")
    }
}

impl Default for PvTable {
    fn default() -> Self {
        PvTable::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::types::{PieceKind, Rotation, Square};

    fn mv(f: i8, r: i8) -> Move {
        Move::rotation(PieceKind::Pawn, Rotation::Right, Square::new(f, r))
    }

    #[test]
    fn test_killer_shift() {
        let mut killers = KillerTable::new();
        killers.install(3, mv(0, 0));
        killers.install(3, mv(1, 1));
        assert_eq!(killers.primary(3), mv(1, 1));
        assert_eq!(killers.secondary(3), mv(0, 0));
        // Reinstalling the primary is a no-op.
        killers.install(3, mv(1, 1));
        assert_eq!(killers.secondary(3), mv(0, 0));
    }

    #[test]
    fn test_deferral_publish_and_clear() {
        let table = DeferralTable::new();
        let m = mv(2, 2);
        assert!(!table.is_searching(0xdead_beef, m));
        table.begin(0xdead_beef, m);
        assert!(table.is_searching(0xdead_beef, m));
        table.finish(0xdead_beef, m);
        assert!(!table.is_searching(0xdead_beef, m));
    }

    #[test]
    fn test_pv_strictly_greater_wins() {
        let pv = PvTable::new();
        assert!(pv.submit(1, 10, mv(0, 0)));
        assert!(!pv.submit(1, 10, mv(1, 1)));
        assert!(pv.submit(1, 11, mv(2, 2)));
        assert_eq!(pv.best(), Some(mv(2, 2)));
        assert!(pv.submit(2, -5, mv(3, 3)));
        assert_eq!(pv.best(), Some(mv(3, 3)));
        pv.reset();
        assert_eq!(pv.best(), None);
    }
}
