//! Player-card generation and hydration.
//!
//! Each card is a 5x5 grid. Cells in grid column B/I/N/G/O draw only
//! from calls carrying that column letter, sampled without replacement
//! within a card (a call may repeat across cards, never twice on one).
//! The center cell is free exactly when the variant plays with a free
//! space. Grids are serialized to JSONB as an ordered, row-major cell
//! list and the `call_id` links are fixed for the life of the session;
//! only labels may be refreshed later ("hydration").

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::deck::{COLUMN_LETTERS, MIN_POOL_SIZE};
use crate::error::CoreError;
use crate::modes::{GameVariant, LabelMode};
use crate::types::DbId;

pub const GRID_ROWS: usize = 5;
pub const GRID_COLS: usize = 5;

/// Canonical free-cell position (center of the grid).
pub const FREE_ROW: usize = 2;
pub const FREE_COL: usize = 2;

pub const FREE_LABEL: &str = "FREE";

/// One cell of a card grid, as stored in `session_cards.grid`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardCell {
    pub row: u8,
    pub col: u8,
    pub free: bool,
    pub column_letter: char,
    pub call_id: Option<DbId>,
    pub track_title: String,
    pub artist_name: String,
    pub label: String,
}

/// The slice of a persisted call the card generator needs.
#[derive(Debug, Clone)]
pub struct CardSource {
    pub call_id: DbId,
    pub column_letter: char,
    pub track_title: String,
    pub artist_name: String,
}

/// Labeled (non-free) cells a card must carry for the given variant.
pub fn cells_needed(variant: GameVariant) -> usize {
    let free = if variant.has_free_space() { 1 } else { 0 };
    GRID_ROWS * GRID_COLS - free
}

/// Render a cell label from track metadata.
pub fn make_label(title: &str, artist: &str, mode: LabelMode) -> String {
    match mode {
        LabelMode::TrackOnly => title.to_string(),
        LabelMode::TrackArtist => format!("{title} - {artist}"),
    }
}

/// Build `card_count` card grids from a session's calls.
///
/// Fails fast with `InsufficientPool` before anything is persisted if any
/// column cannot fill its slots; the caller creates session, calls, and
/// cards in one transaction so a failure here leaves no partial rows.
pub fn build_cards(
    calls: &[CardSource],
    card_count: i32,
    variant: GameVariant,
    label_mode: LabelMode,
    rng: &mut StdRng,
) -> Result<Vec<Vec<CardCell>>, CoreError> {
    let free_space = variant.has_free_space();

    // Partition the deck by column letter once; cards sample from these.
    let mut by_column: HashMap<char, Vec<&CardSource>> = HashMap::new();
    for call in calls {
        by_column.entry(call.column_letter).or_default().push(call);
    }

    for (col, letter) in COLUMN_LETTERS.iter().enumerate() {
        let needed = rows_needed(col, free_space);
        let have = by_column.get(letter).map_or(0, Vec::len);
        if have < needed {
            return Err(CoreError::InsufficientPool {
                needed: MIN_POOL_SIZE,
                have: calls.len(),
            });
        }
    }

    let mut cards = Vec::with_capacity(card_count.max(0) as usize);
    for _ in 0..card_count {
        cards.push(build_one_card(&by_column, free_space, label_mode, rng));
    }
    Ok(cards)
}

/// Slots grid column `col` must fill (the center column loses one to the
/// free cell).
fn rows_needed(col: usize, free_space: bool) -> usize {
    if free_space && col == FREE_COL {
        GRID_ROWS - 1
    } else {
        GRID_ROWS
    }
}

fn build_one_card(
    by_column: &HashMap<char, Vec<&CardSource>>,
    free_space: bool,
    label_mode: LabelMode,
    rng: &mut StdRng,
) -> Vec<CardCell> {
    // Sample each column without replacement.
    let mut picks: Vec<Vec<&CardSource>> = Vec::with_capacity(GRID_COLS);
    for (col, letter) in COLUMN_LETTERS.iter().enumerate() {
        let mut pool: Vec<&CardSource> = by_column[letter].clone();
        pool.shuffle(rng);
        pool.truncate(rows_needed(col, free_space));
        picks.push(pool);
    }

    let mut grid = Vec::with_capacity(GRID_ROWS * GRID_COLS);
    let mut used: [usize; GRID_COLS] = [0; GRID_COLS];
    for row in 0..GRID_ROWS {
        for col in 0..GRID_COLS {
            if free_space && row == FREE_ROW && col == FREE_COL {
                grid.push(CardCell {
                    row: row as u8,
                    col: col as u8,
                    free: true,
                    column_letter: COLUMN_LETTERS[col],
                    call_id: None,
                    track_title: FREE_LABEL.to_string(),
                    artist_name: String::new(),
                    label: FREE_LABEL.to_string(),
                });
                continue;
            }

            let source = picks[col][used[col]];
            used[col] += 1;
            grid.push(CardCell {
                row: row as u8,
                col: col as u8,
                free: false,
                column_letter: source.column_letter,
                call_id: Some(source.call_id),
                track_title: source.track_title.clone(),
                artist_name: source.artist_name.clone(),
                label: make_label(&source.track_title, &source.artist_name, label_mode),
            });
        }
    }
    grid
}

/// Refresh cell labels from current call metadata.
///
/// The `call_id` identity links never change; only the denormalized
/// title/artist/label text is rewritten where the upstream call row now
/// carries different metadata. Free cells and dangling ids are untouched.
pub fn hydrate_cells(cells: &mut [CardCell], calls: &[CardSource], label_mode: LabelMode) {
    let by_id: HashMap<DbId, &CardSource> = calls.iter().map(|c| (c.call_id, c)).collect();
    for cell in cells.iter_mut() {
        let Some(call_id) = cell.call_id else {
            continue;
        };
        if let Some(source) = by_id.get(&call_id) {
            cell.track_title = source.track_title.clone();
            cell.artist_name = source.artist_name.clone();
            cell.label = make_label(&source.track_title, &source.artist_name, label_mode);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
