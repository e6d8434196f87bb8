//! Shared transposition table.
//!
//! Two records per set, 16 bytes per record: a 64-bit key and a 64-bit
//! payload packing move, score, quality (store depth), bound, and age.
//! Workers share the table with no locks; key and payload are separate
//! relaxed atomics, so a racing write can tear a pair. A torn record
//! either fails the key probe or yields a stale hint move, both of
//! which only cost extra work.

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};

use crate::board::search::constants::{Score, MAX_PLY_IN_SEARCH, WIN};
use crate::board::types::Move;

/// What the stored score means relative to the search window.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Bound {
    Upper,
    Lower,
    Exact,
}

impl Bound {
    #[inline]
    const fn bits(self) -> u64 {
        match self {
            Bound::Upper => 0,
            Bound::Lower => 1,
            Bound::Exact => 2,
        }
    }

    #[inline]
    const fn from_bits(bits: u64) -> Bound {
        match bits & 0b11 {
            1 => Bound::Lower,
            2 => Bound::Exact,
            _ => Bound::Upper,
        }
    }
}

// Payload layout, low bits first.
const MOVE_SHIFT: u64 = 0;
const MOVE_MASK: u64 = (1 << 20) - 1;
const SCORE_SHIFT: u64 = 20;
const QUALITY_SHIFT: u64 = 36;
const BOUND_SHIFT: u64 = 44;
const AGE_SHIFT: u64 = 46;

const _: () = assert!(AGE_SHIFT + 8 <= 64);

/// A decoded table record.
#[derive(Clone, Copy, Debug)]
pub struct TtEntry {
    pub mv: Move,
    pub score: Score,
    /// Depth of the search that stored the record.
    pub quality: u8,
    pub bound: Bound,
    pub age: u8,
}

impl TtEntry {
    fn decode(data: u64) -> TtEntry {
        TtEntry {
            mv: Move::from_bits(((data >> MOVE_SHIFT) & MOVE_MASK) as u32),
            score: ((data >> SCORE_SHIFT) & 0xFFFF) as u16 as i16,
            quality: ((data >> QUALITY_SHIFT) & 0xFF) as u8,
            bound: Bound::from_bits(data >> BOUND_SHIFT),
            age: ((data >> AGE_SHIFT) & 0xFF) as u8,
        }
    }

    fn encode(&self) -> u64 {
        (u64::from(self.mv.bits()) << MOVE_SHIFT)
            | (u64::from(self.score as u16) << SCORE_SHIFT)
            | (u64::from(self.quality) << QUALITY_SHIFT)
            | (self.bound.bits() << BOUND_SHIFT)
            | (u64::from(self.age) << AGE_SHIFT)
    }

    /// A record can short-circuit a null-window node when it is at
    /// least as deep as the request and its bound settles which side
    /// of beta the true score falls on.
    #[must_use]
    pub fn is_usable(&self, depth: i32, beta: Score) -> bool {
        if i32::from(self.quality) < depth {
            return false;
        }
        match self.bound {
            Bound::Lower => self.score >= beta,
            Bound::Upper => self.score < beta,
            Bound::Exact => false,
        }
    }
}

struct Record {
    key: AtomicU64,
    data: AtomicU64,
}

const RECORDS_PER_SET: usize = 2;

pub struct TranspositionTable {
    records: Vec<Record>,
    set_mask: u64,
    age: AtomicU8,
}

impl TranspositionTable {
    /// Build a table of at most `size_mb` megabytes, rounded down to
    /// a power-of-two number of sets.
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        let set_bytes = RECORDS_PER_SET * 16;
        let requested = ((size_mb << 20) / set_bytes).max(1);
        let num_sets = if requested.is_power_of_two() {
            requested
        } else {
            requested.next_power_of_two() / 2
        };
        let mut records = Vec::with_capacity(num_sets * RECORDS_PER_SET);
        records.resize_with(num_sets * RECORDS_PER_SET, || Record {
            key: AtomicU64::new(0),
            data: AtomicU64::new(0),
        });
        TranspositionTable {
            records,
            set_mask: num_sets as u64 - 1,
            age: AtomicU8::new(0),
        }
    }

    #[must_use]
    pub fn num_records(&self) -> usize {
        self.records.len()
    }

    #[inline]
    fn set_range(&self, key: u64) -> std::ops::Range<usize> {
        let base = (key & self.set_mask) as usize * RECORDS_PER_SET;
        base..base + RECORDS_PER_SET
    }

    /// Advance the generation. Old records are not cleared; they age
    /// out through the replacement policy.
    pub fn age(&self) {
        self.age.fetch_add(1, Ordering::Relaxed);
    }

    pub fn clear(&self) {
        for record in &self.records {
            record.key.store(0, Ordering::Relaxed);
            record.data.store(0, Ordering::Relaxed);
        }
        self.age.store(0, Ordering::Relaxed);
    }

    #[must_use]
    pub fn get(&self, key: u64) -> Option<TtEntry> {
        for idx in self.set_range(key) {
            let record = &self.records[idx];
            if record.key.load(Ordering::Relaxed) == key {
                return Some(TtEntry::decode(record.data.load(Ordering::Relaxed)));
            }
        }
        None
    }

    /// Store a record. An empty or same-key slot is always taken
    /// (keeping the previously stored move when the caller passes the
    /// null move); otherwise the replacement victim is scored by age
    /// and quality.
    pub fn put(&self, key: u64, depth: i32, score: Score, bound: Bound, mv: Move) {
        let entry = TtEntry {
            mv,
            score,
            quality: depth.clamp(0, 255) as u8,
            bound,
            age: self.age.load(Ordering::Relaxed),
        };

        let mut victim_idx = self.set_range(key).start;
        let mut victim_value = i32::MIN;
        let mut victim_entry = TtEntry::decode(0);

        for idx in self.set_range(key) {
            let record = &self.records[idx];
            let slot_key = record.key.load(Ordering::Relaxed);
            let slot_entry = TtEntry::decode(record.data.load(Ordering::Relaxed));

            if slot_key == 0 || slot_key == key {
                let mut write = entry;
                if write.mv.is_null() {
                    write.mv = slot_entry.mv;
                }
                record.key.store(key, Ordering::Relaxed);
                record.data.store(write.encode(), Ordering::Relaxed);
                return;
            }

            let mut value = 0;
            if slot_entry.age < victim_entry.age {
                value -= 6;
            }
            if slot_entry.quality < victim_entry.quality {
                value += 1;
            }
            if value > victim_value {
                victim_value = value;
                victim_idx = idx;
                victim_entry = slot_entry;
            }
        }

        let record = &self.records[victim_idx];
        record.key.store(key, Ordering::Relaxed);
        record.data.store(entry.encode(), Ordering::Relaxed);
    }
}

#[inline]
#[must_use]
pub(crate) fn win_in(ply: usize) -> Score {
    WIN - ply as Score
}

#[inline]
#[must_use]
pub(crate) fn lose_in(ply: usize) -> Score {
    -WIN + ply as Score
}

/// Stored scores are root-relative so mate distances compose; shift by
/// the search ply when writing...
#[inline]
#[must_use]
pub(crate) fn score_to_table(score: Score, ply: usize) -> Score {
    if score >= win_in(MAX_PLY_IN_SEARCH) {
        score.saturating_add(ply as Score)
    } else if score <= lose_in(MAX_PLY_IN_SEARCH) {
        score.saturating_sub(ply as Score)
    } else {
        score
    }
}

/// ...and shift back when reading.
#[inline]
#[must_use]
pub(crate) fn score_from_table(score: Score, ply: usize) -> Score {
    if score >= win_in(MAX_PLY_IN_SEARCH) {
        score.saturating_sub(ply as Score)
    } else if score <= lose_in(MAX_PLY_IN_SEARCH) {
        score.saturating_add(ply as Score)
    } else {
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::types::{PieceKind, Rotation, Square};

    fn mv() -> Move {
        Move::rotation(PieceKind::Monarch, Rotation::Left, Square::new(4, 0))
    }

    #[test]
    fn test_store_then_load_exact() {
        let tt = TranspositionTable::new(1);
        tt.put(0x1234_5678_9abc_def0, 7, -412, Bound::Exact, mv());
        let entry = tt.get(0x1234_5678_9abc_def0).expect("stored record");
        assert_eq!(entry.score, -412);
        assert_eq!(entry.quality, 7);
        assert_eq!(entry.bound, Bound::Exact);
        assert_eq!(entry.mv, mv());
        assert_eq!(entry.age, 0);
    }

    #[test]
    fn test_null_move_preserves_hint() {
        let tt = TranspositionTable::new(1);
        tt.put(42, 3, 10, Bound::Lower, mv());
        tt.put(42, 5, 20, Bound::Upper, Move::NULL);
        let entry = tt.get(42).expect("stored record");
        assert_eq!(entry.mv, mv(), "null-move store keeps the old hint");
        assert_eq!(entry.quality, 5);
    }

    #[test]
    fn test_miss_on_unknown_key() {
        let tt = TranspositionTable::new(1);
        tt.put(42, 3, 10, Bound::Lower, mv());
        assert!(tt.get(43).is_none());
    }

    #[test]
    fn test_is_usable_bounds() {
        let entry = TtEntry {
            mv: Move::NULL,
            score: 50,
            quality: 6,
            bound: Bound::Lower,
            age: 0,
        };
        assert!(entry.is_usable(6, 50));
        assert!(entry.is_usable(4, 40));
        assert!(!entry.is_usable(7, 50), "too shallow");
        assert!(!entry.is_usable(6, 51), "lower bound below beta");

        let upper = TtEntry {
            bound: Bound::Upper,
            ..entry
        };
        assert!(upper.is_usable(6, 51));
        assert!(!upper.is_usable(6, 50));
    }

    #[test]
    fn test_mate_score_ply_adjustment_round_trips() {
        let mate = WIN - 3;
        let stored = score_to_table(mate, 5);
        assert_eq!(score_from_table(stored, 5), mate);
        let plain: Score = 123;
        assert_eq!(score_to_table(plain, 9), plain);
    }

    #[test]
    fn test_aging_marks_new_stores() {
        let tt = TranspositionTable::new(1);
        tt.age();
        tt.put(7, 1, 0, Bound::Exact, mv());
        assert_eq!(tt.get(7).expect("stored").age, 1);
    }
}
