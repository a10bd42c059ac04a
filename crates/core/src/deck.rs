//! Call-deck construction: column letters, round partitioning, and the
//! call-order generator.
//!
//! The deck is the ordered sequence of tracks a session will call. It is
//! built exactly once at session creation and materialized 1:1 into
//! `session_calls` rows (`call_index` = 1-based position in the deck).

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::error::CoreError;
use crate::modes::CallMode;

/// Grid column letters, cycled over the deck by `call_index`.
pub const COLUMN_LETTERS: [char; 5] = ['B', 'I', 'N', 'G', 'O'];

/// Minimum pool size for a 5x5 card game.
///
/// 25 tracks guarantee five entries per column letter, which is what the
/// column-constrained card sampler needs to fill every card.
pub const MIN_POOL_SIZE: usize = 25;

/// One eligible track from the resolved playlist pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolTrack {
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub side: Option<String>,
    pub position: Option<String>,
}

/// Column letter for a 1-based call index (B, I, N, G, O, B, ...).
pub fn column_letter(call_index: i32) -> char {
    let idx = (call_index - 1).rem_euclid(COLUMN_LETTERS.len() as i32);
    COLUMN_LETTERS[idx as usize]
}

/// Calls per round when a deck of `deck_len` is split over `round_count`
/// rounds (ceiling division, so early rounds absorb the remainder).
pub fn songs_per_round(deck_len: usize, round_count: i32) -> i32 {
    let count = round_count.max(1) as usize;
    (deck_len.div_ceil(count)) as i32
}

/// Round a 1-based call index belongs to, capped at `round_count` so the
/// tail of an uneven split lands in the final round.
pub fn round_number(call_index: i32, songs_per_round: i32, round_count: i32) -> i32 {
    let round = ((call_index - 1) / songs_per_round.max(1)) + 1;
    round.min(round_count.max(1))
}

/// Reject pools too small to fill a card.
pub fn ensure_pool_size(have: usize) -> Result<(), CoreError> {
    if have < MIN_POOL_SIZE {
        return Err(CoreError::InsufficientPool {
            needed: MIN_POOL_SIZE,
            have,
        });
    }
    Ok(())
}

/// Order the pool into the call deck.
///
/// `Random` produces a uniform permutation driven entirely by the caller's
/// RNG (seed it for reproducible sessions in tests); `Setlist` preserves
/// the curated order verbatim. Output length always equals pool length.
pub fn build_call_order(pool: Vec<PoolTrack>, mode: CallMode, rng: &mut StdRng) -> Vec<PoolTrack> {
    match mode {
        CallMode::Setlist => pool,
        CallMode::Random => {
            let mut deck = pool;
            deck.shuffle(rng);
            deck
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
