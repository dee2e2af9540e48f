//! Zobrist hashing for position identification
//!
//! One random 64-bit key per (cell, side) pair; the position hash is the
//! XOR of the keys of all stones on the board. Placing or removing a
//! stone is a single XOR, so the hash tracks make/unmake at O(1) and two
//! boards with identical stones hash identically regardless of move
//! order, which is what makes transposition lookups work.
//!
//! There is no side-to-move key: moves strictly alternate, so the stone
//! count parity already determines whose turn it is.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use crate::board::{Board, Player, Pos, TOTAL_CELLS};

/// Fixed seed so hashes are reproducible across runs. The keys only need
/// to be non-zero with low collision probability, not cryptographic.
const KEY_SEED: u64 = 0x6F6D_6B75_5A6F_6221;

/// Zobrist key table.
pub struct ZobristTable {
    black: [u64; TOTAL_CELLS],
    white: [u64; TOTAL_CELLS],
}

impl ZobristTable {
    /// Create a table with deterministic pseudo-random keys.
    #[must_use]
    pub fn new() -> Self {
        let mut rng = Pcg64::seed_from_u64(KEY_SEED);
        let mut next_key = move || loop {
            let key: u64 = rng.gen();
            if key != 0 {
                return key;
            }
        };

        let mut black = [0u64; TOTAL_CELLS];
        let mut white = [0u64; TOTAL_CELLS];
        for i in 0..TOTAL_CELLS {
            black[i] = next_key();
            white[i] = next_key();
        }

        Self { black, white }
    }

    /// Key for one (cell, side) pair.
    #[inline]
    #[must_use]
    pub fn key(&self, pos: Pos, side: Player) -> u64 {
        match side {
            Player::Black => self.black[pos.to_index()],
            Player::White => self.white[pos.to_index()],
        }
    }

    /// Full hash of a board. Used to initialize the incremental hash;
    /// searches update it with [`ZobristTable::toggle`] instead.
    #[must_use]
    pub fn hash(&self, board: &Board) -> u64 {
        let mut h = 0u64;
        for pos in board.stones(Player::Black).iter_ones() {
            h ^= self.black[pos.to_index()];
        }
        for pos in board.stones(Player::White).iter_ones() {
            h ^= self.white[pos.to_index()];
        }
        h
    }

    /// Incremental update for placing a stone. XOR is its own inverse,
    /// so the same call reverses a removal.
    #[inline]
    #[must_use]
    pub fn toggle(&self, hash: u64, pos: Pos, side: Player) -> u64 {
        hash ^ self.key(pos, side)
    }
}

impl Default for ZobristTable {
    fn default() -> Self {
        Self::new()
    }
}
