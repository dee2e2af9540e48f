//! Transposition table for caching search results
//!
//! Search results are cached by Zobrist hash so positions reached through
//! different move orders are searched once. Entries record the searched
//! depth and a bound type; a cached score only satisfies a query searched
//! at least as deep, while the stored best move is always returned as a
//! move-ordering hint.
//!
//! Replacement is unconditional overwrite on collision, with no aging or
//! generation scheme. Entries decay in usefulness quickly as the game
//! tree grows, and table memory stays bounded by the fixed slot count.

use crate::board::Pos;

/// How a cached score bounds the true value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// The search completed with the true value inside the window
    Exact,
    /// Fail-high: true value >= stored score (beta cutoff)
    Lower,
    /// Fail-low: true value <= stored score (no move raised alpha)
    Upper,
}

/// Transposition table entry
#[derive(Debug, Clone, Copy)]
pub struct TtEntry {
    /// Zobrist hash of the position (slot verification)
    pub hash: u64,
    /// Remaining search depth when stored
    pub depth: u8,
    /// Score from the side-to-move perspective
    pub score: i32,
    /// Bound type of the score
    pub bound: Bound,
    /// Best move found for this position
    pub best_move: Option<Pos>,
}

/// Probe/store counters for diagnostics.
#[derive(Debug, Clone, Copy, Default)]
pub struct TtStats {
    pub probes: u64,
    pub score_hits: u64,
    pub hint_hits: u64,
    pub stores: u64,
}

/// Fingerprint-keyed cache of prior search results.
///
/// Direct-mapped: each hash owns exactly one slot (`hash % len`).
pub struct TranspositionTable {
    entries: Vec<Option<TtEntry>>,
    stats: TtStats,
}

impl TranspositionTable {
    /// Create a table with the given size in megabytes.
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        let entry_size = std::mem::size_of::<Option<TtEntry>>();
        let len = ((size_mb * 1024 * 1024) / entry_size).max(1024);
        Self {
            entries: vec![None; len],
            stats: TtStats::default(),
        }
    }

    /// Probe the table.
    ///
    /// Returns `(usable score, move hint)`. The score is present when the
    /// entry is at least `depth` deep and its bound resolves the query
    /// window: an Exact entry always does; a Lower bound raises alpha, an
    /// Upper bound lowers beta, and if the adjusted window closes
    /// (alpha >= beta) the stored score is the cutoff value. The move
    /// hint is returned even from a too-shallow entry.
    pub fn lookup(
        &mut self,
        hash: u64,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
    ) -> (Option<i32>, Option<Pos>) {
        self.stats.probes += 1;

        let idx = (hash as usize) % self.entries.len();
        let Some(entry) = self.entries[idx] else {
            return (None, None);
        };
        if entry.hash != hash {
            return (None, None);
        }

        let hint = entry.best_move;
        if hint.is_some() {
            self.stats.hint_hits += 1;
        }

        // A shallower cached search cannot answer a deeper query;
        // it only donates the hint.
        if entry.depth >= depth {
            match entry.bound {
                Bound::Exact => {
                    self.stats.score_hits += 1;
                    return (Some(entry.score), hint);
                }
                Bound::Lower => alpha = alpha.max(entry.score),
                Bound::Upper => beta = beta.min(entry.score),
            }
            if alpha >= beta {
                self.stats.score_hits += 1;
                return (Some(entry.score), hint);
            }
        }

        (None, hint)
    }

    /// Store a search result, overwriting whatever occupies the slot.
    pub fn store(&mut self, hash: u64, depth: u8, score: i32, bound: Bound, best_move: Option<Pos>) {
        self.stats.stores += 1;
        let idx = (hash as usize) % self.entries.len();
        self.entries[idx] = Some(TtEntry {
            hash,
            depth,
            score,
            bound,
            best_move,
        });
    }

    /// Drop all entries (new game).
    pub fn clear(&mut self) {
        self.entries.fill(None);
        self.stats = TtStats::default();
    }

    #[must_use]
    pub fn stats(&self) -> TtStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_lookup_exact() {
        let mut tt = TranspositionTable::new(1);
        let hash = 0x1234_5678_9ABC_DEF0;

        tt.store(hash, 5, 100, Bound::Exact, Some(Pos::new(7, 7)));

        let (score, hint) = tt.lookup(hash, 5, -1000, 1000);
        assert_eq!(score, Some(100));
        assert_eq!(hint, Some(Pos::new(7, 7)));
    }

    #[test]
    fn test_shallow_entry_gives_hint_only() {
        let mut tt = TranspositionTable::new(1);
        let hash = 0x1234_5678_9ABC_DEF0;

        tt.store(hash, 3, 100, Bound::Exact, Some(Pos::new(5, 5)));

        let (score, hint) = tt.lookup(hash, 5, -1000, 1000);
        assert_eq!(score, None);
        assert_eq!(hint, Some(Pos::new(5, 5)));
    }

    #[test]
    fn test_deeper_entry_satisfies_shallower_query() {
        let mut tt = TranspositionTable::new(1);
        let hash = 0xAAAA;

        tt.store(hash, 7, 42, Bound::Exact, None);
        let (score, _) = tt.lookup(hash, 3, -1000, 1000);
        assert_eq!(score, Some(42));
    }

    #[test]
    fn test_lower_bound_cutoff() {
        let mut tt = TranspositionTable::new(1);
        let hash = 0x1111;

        tt.store(hash, 5, 200, Bound::Lower, None);

        // 200 >= beta=150: raised alpha closes the window
        let (score, _) = tt.lookup(hash, 5, -1000, 150);
        assert_eq!(score, Some(200));

        // 200 < beta=300: not conclusive
        let (score, _) = tt.lookup(hash, 5, -1000, 300);
        assert_eq!(score, None);
    }

    #[test]
    fn test_upper_bound_cutoff() {
        let mut tt = TranspositionTable::new(1);
        let hash = 0x2222;

        tt.store(hash, 5, 50, Bound::Upper, None);

        // 50 <= alpha=100: lowered beta closes the window
        let (score, _) = tt.lookup(hash, 5, 100, 1000);
        assert_eq!(score, Some(50));

        // 50 > alpha=30: not conclusive
        let (score, _) = tt.lookup(hash, 5, 30, 1000);
        assert_eq!(score, None);
    }

    #[test]
    fn test_hash_mismatch_misses() {
        let mut tt = TranspositionTable::new(1);
        tt.store(0x1234, 5, 100, Bound::Exact, Some(Pos::new(9, 9)));

        let (score, hint) = tt.lookup(0x9999_9999_9999, 5, -1000, 1000);
        assert_eq!(score, None);
        assert_eq!(hint, None);
    }

    #[test]
    fn test_unconditional_overwrite() {
        let mut tt = TranspositionTable::new(1);
        let hash = 0x3333;

        tt.store(hash, 9, 500, Bound::Exact, Some(Pos::new(1, 1)));
        // A shallower store still replaces the deeper entry
        tt.store(hash, 2, -25, Bound::Upper, Some(Pos::new(2, 2)));

        let (score, hint) = tt.lookup(hash, 2, -30, 1000);
        assert_eq!(score, Some(-25));
        assert_eq!(hint, Some(Pos::new(2, 2)));

        let (score, _) = tt.lookup(hash, 9, -1000, 1000);
        assert_eq!(score, None, "the deep entry is gone");
    }

    #[test]
    fn test_clear() {
        let mut tt = TranspositionTable::new(1);
        let hash = 0x4444;

        tt.store(hash, 5, 100, Bound::Exact, None);
        tt.clear();

        let (score, hint) = tt.lookup(hash, 5, -1000, 1000);
        assert_eq!(score, None);
        assert_eq!(hint, None);
    }

    #[test]
    fn test_stats_counting() {
        let mut tt = TranspositionTable::new(1);
        let hash = 0x5555;

        tt.store(hash, 5, 100, Bound::Exact, Some(Pos::new(3, 3)));
        let _ = tt.lookup(hash, 5, -1000, 1000);
        let _ = tt.lookup(0x6666, 5, -1000, 1000);

        let stats = tt.stats();
        assert_eq!(stats.stores, 1);
        assert_eq!(stats.probes, 2);
        assert_eq!(stats.score_hits, 1);
        assert_eq!(stats.hint_hits, 1);
    }

    #[test]
    fn test_minimum_size() {
        let tt = TranspositionTable::new(0);
        assert!(tt.entries.len() >= 1024);
    }
}
