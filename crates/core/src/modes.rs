//! Game configuration enums: win-pattern variant, call ordering mode,
//! card label mode, and print layout.
//!
//! All of these are stored as plain text in the database; `as_str` /
//! `parse` pairs define the canonical wire and storage spellings.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// GameVariant
// ---------------------------------------------------------------------------

/// The win-pattern ruleset for a session.
///
/// The variant determines whether cards carry a free center cell:
/// `blackout` and `death` require every cell to be claimable, so they
/// play without one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameVariant {
    SingleLine,
    DoubleLine,
    TripleLine,
    CrissCross,
    FourCorners,
    Blackout,
    Death,
}

impl GameVariant {
    /// Whether cards for this variant carry a free center cell.
    pub fn has_free_space(self) -> bool {
        !matches!(self, GameVariant::Blackout | GameVariant::Death)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GameVariant::SingleLine => "single_line",
            GameVariant::DoubleLine => "double_line",
            GameVariant::TripleLine => "triple_line",
            GameVariant::CrissCross => "criss_cross",
            GameVariant::FourCorners => "four_corners",
            GameVariant::Blackout => "blackout",
            GameVariant::Death => "death",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "single_line" => Some(GameVariant::SingleLine),
            "double_line" => Some(GameVariant::DoubleLine),
            "triple_line" => Some(GameVariant::TripleLine),
            "criss_cross" => Some(GameVariant::CrissCross),
            "four_corners" => Some(GameVariant::FourCorners),
            "blackout" => Some(GameVariant::Blackout),
            "death" => Some(GameVariant::Death),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// CallMode
// ---------------------------------------------------------------------------

/// How the call deck is ordered at session creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallMode {
    /// Uniform random permutation of the pool.
    Random,
    /// Curated DJ order preserved verbatim.
    Setlist,
}

impl CallMode {
    pub fn as_str(self) -> &'static str {
        match self {
            CallMode::Random => "random",
            CallMode::Setlist => "setlist",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "random" => Some(CallMode::Random),
            "setlist" => Some(CallMode::Setlist),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// LabelMode
// ---------------------------------------------------------------------------

/// How card cell labels are rendered from track metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelMode {
    /// `"{title} - {artist}"`.
    TrackArtist,
    /// Title only (harder; artists stay hidden).
    TrackOnly,
}

impl LabelMode {
    pub fn as_str(self) -> &'static str {
        match self {
            LabelMode::TrackArtist => "track_artist",
            LabelMode::TrackOnly => "track_only",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "track_artist" => Some(LabelMode::TrackArtist),
            "track_only" => Some(LabelMode::TrackOnly),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// CardLayout
// ---------------------------------------------------------------------------

/// Print layout for the card PDF export (cards per page).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardLayout {
    #[serde(rename = "2-up")]
    TwoUp,
    #[serde(rename = "4-up")]
    FourUp,
}

impl CardLayout {
    pub fn as_str(self) -> &'static str {
        match self {
            CardLayout::TwoUp => "2-up",
            CardLayout::FourUp => "4-up",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "2-up" => Some(CardLayout::TwoUp),
            "4-up" => Some(CardLayout::FourUp),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
