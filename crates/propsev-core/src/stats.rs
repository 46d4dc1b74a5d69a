// Canonical stat vocabulary, player positions, and numeric value parsing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Canonical stat keys
// ---------------------------------------------------------------------------

/// The fixed internal stat vocabulary every feed maps into.
///
/// Adapters, the derived-stat resolver, and the scoring config all key off
/// this enum, so a stat outside it cannot be stored on a player record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKey {
    PassYards,
    PassTds,
    Ints,
    RushYards,
    RushTds,
    ReceiveYards,
    ReceiveTds,
    Receptions,
}

impl StatKey {
    /// Every key, in display order.
    pub const ALL: [StatKey; 8] = [
        StatKey::PassYards,
        StatKey::PassTds,
        StatKey::Ints,
        StatKey::RushYards,
        StatKey::RushTds,
        StatKey::ReceiveYards,
        StatKey::ReceiveTds,
        StatKey::Receptions,
    ];

    /// The snake_case identifier used in config files.
    pub fn as_str(&self) -> &'static str {
        match self {
            StatKey::PassYards => "pass_yards",
            StatKey::PassTds => "pass_tds",
            StatKey::Ints => "ints",
            StatKey::RushYards => "rush_yards",
            StatKey::RushTds => "rush_tds",
            StatKey::ReceiveYards => "receive_yards",
            StatKey::ReceiveTds => "receive_tds",
            StatKey::Receptions => "receptions",
        }
    }

    /// Short column heading for reports.
    pub fn column_label(&self) -> &'static str {
        match self {
            StatKey::PassYards => "PassYds",
            StatKey::PassTds => "PassTD",
            StatKey::Ints => "INT",
            StatKey::RushYards => "RushYds",
            StatKey::RushTds => "RushTD",
            StatKey::ReceiveYards => "RecYds",
            StatKey::ReceiveTds => "RecTD",
            StatKey::Receptions => "Rec",
        }
    }
}

impl fmt::Display for StatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not a member of the stat vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown stat key `{0}`")]
pub struct UnknownStatKey(pub String);

impl FromStr for StatKey {
    type Err = UnknownStatKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        StatKey::ALL
            .into_iter()
            .find(|k| k.as_str() == trimmed)
            .ok_or_else(|| UnknownStatKey(trimmed.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Positions
// ---------------------------------------------------------------------------

/// Offensive skill positions covered by prop markets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    QB,
    RB,
    WR,
    TE,
}

impl Position {
    /// Report order.
    pub const ALL: [Position; 4] = [Position::QB, Position::RB, Position::WR, Position::TE];

    /// Parse a roster position code.
    ///
    /// Accepts a positional-rank suffix (`"RB12"` -> RB) and is
    /// case-insensitive. Returns `None` for anything outside QB/RB/WR/TE.
    pub fn from_code(s: &str) -> Option<Self> {
        let code: String = s
            .trim()
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .collect::<String>()
            .to_ascii_uppercase();
        match code.as_str() {
            "QB" => Some(Position::QB),
            "RB" => Some(Position::RB),
            "WR" => Some(Position::WR),
            "TE" => Some(Position::TE),
            _ => None,
        }
    }

    pub fn display_str(&self) -> &'static str {
        match self {
            Position::QB => "QB",
            Position::RB => "RB",
            Position::WR => "WR",
            Position::TE => "TE",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_str())
    }
}

// ---------------------------------------------------------------------------
// Numeric parsing
// ---------------------------------------------------------------------------

/// Parse a captured stat value as a float.
///
/// Feeds publish values like `"1,234"` or `" 45.5 "`, so grouping commas and
/// surrounding whitespace are stripped first. Non-finite results are
/// rejected. Returns `None` when the text is not a number.
pub fn parse_stat_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Render a computed value back to the textual form stored on records.
pub fn format_stat_number(value: f64) -> String {
    format!("{value}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
