// Identity registry: the canonical player set built from the baseline roster.

use crate::stats::{Position, StatKey};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::info;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Display-only ranking signals copied from the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaselineRanks {
    pub adp: u32,
    pub expert_rank: u32,
    pub site_rank: u32,
}

/// Where a stored stat value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatOrigin {
    /// Directly observed in the named feed.
    Feed(String),
    /// Back-filled from a combined total reported by the named feed.
    Derived(String),
}

/// A stat value kept as the feed wrote it until scoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatValue {
    pub raw: String,
    pub origin: StatOrigin,
}

/// Identity and projection state for one player.
#[derive(Debug, Clone)]
pub struct PlayerRecord {
    pub canonical_name: String,
    pub position: Position,
    pub ranks: BaselineRanks,
    pub stat_values: HashMap<StatKey, StatValue>,
    pub projected_points: f64,
}

impl PlayerRecord {
    pub fn new(canonical_name: impl Into<String>, position: Position, ranks: BaselineRanks) -> Self {
        Self {
            canonical_name: canonical_name.into(),
            position,
            ranks,
            stat_values: HashMap::new(),
            projected_points: 0.0,
        }
    }

    /// Raw text of a stat, if any feed or derivation supplied it.
    pub fn stat_raw(&self, key: StatKey) -> Option<&str> {
        self.stat_values.get(&key).map(|v| v.raw.as_str())
    }

    pub fn has_stat(&self, key: StatKey) -> bool {
        self.stat_values.contains_key(&key)
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("failed to read roster {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in roster: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed roster row {row}: {reason}")]
    MalformedRosterRow { row: usize, reason: String },
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Canonical player set, in roster order, indexed by canonical name.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    players: Vec<PlayerRecord>,
    index: HashMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a player. Fails if the canonical name is already registered.
    pub fn insert(&mut self, record: PlayerRecord) -> Result<(), PlayerRecord> {
        if self.index.contains_key(&record.canonical_name) {
            return Err(record);
        }
        self.index
            .insert(record.canonical_name.clone(), self.players.len());
        self.players.push(record);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&PlayerRecord> {
        self.index.get(name).map(|&i| &self.players[i])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut PlayerRecord> {
        self.index.get(name).map(|&i| &mut self.players[i])
    }

    pub fn players(&self) -> &[PlayerRecord] {
        &self.players
    }

    pub fn players_mut(&mut self) -> impl Iterator<Item = &mut PlayerRecord> {
        self.players.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Drop every player with no stat values. Returns the dropped names.
    pub fn retain_with_stats(&mut self) -> Vec<String> {
        let mut dropped = Vec::new();
        self.players.retain(|p| {
            if p.stat_values.is_empty() {
                dropped.push(p.canonical_name.clone());
                false
            } else {
                true
            }
        });
        self.index = self
            .players
            .iter()
            .enumerate()
            .map(|(i, p)| (p.canonical_name.clone(), i))
            .collect();
        dropped
    }
}

// ---------------------------------------------------------------------------
// Roster loading
// ---------------------------------------------------------------------------

const NAME_HEADERS: &[&str] = &["player", "name"];
const POSITION_HEADERS: &[&str] = &["pos", "position"];
const ADP_HEADERS: &[&str] = &["adp"];
const EXPERT_RANK_HEADERS: &[&str] = &["fp rank", "ecr"];
const SITE_RANK_HEADERS: &[&str] = &["xrank", "site rank"];

/// Column positions resolved from the roster header row.
struct RosterColumns {
    name: usize,
    position: usize,
    adp: usize,
    expert_rank: usize,
    site_rank: usize,
}

fn find_column(headers: &csv::StringRecord, accepted: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| accepted.contains(&h.trim().to_ascii_lowercase().as_str()))
}

impl RosterColumns {
    fn locate(headers: &csv::StringRecord) -> Result<Self, RosterError> {
        let require = |accepted: &[&str], what: &str| {
            find_column(headers, accepted).ok_or_else(|| RosterError::MalformedRosterRow {
                row: 0,
                reason: format!("missing required column `{what}` in header"),
            })
        };
        Ok(Self {
            name: require(NAME_HEADERS, "Player")?,
            position: require(POSITION_HEADERS, "POS")?,
            adp: require(ADP_HEADERS, "ADP")?,
            expert_rank: require(EXPERT_RANK_HEADERS, "FP Rank")?,
            site_rank: require(SITE_RANK_HEADERS, "XRank")?,
        })
    }
}

fn rank_field(record: &csv::StringRecord, idx: usize, what: &str, row: usize) -> Result<u32, RosterError> {
    let raw = record.get(idx).unwrap_or("").trim();
    raw.parse::<u32>()
        .map_err(|_| RosterError::MalformedRosterRow {
            row,
            reason: format!("{what} `{raw}` is not an integer"),
        })
}

/// Build the registry from roster CSV text.
///
/// Row numbers in errors are 1-based data rows (the header is row 0).
pub fn load_roster_from_reader<R: Read>(rdr: R) -> Result<Registry, RosterError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(rdr);
    let headers = reader.headers()?.clone();
    let cols = RosterColumns::locate(&headers)?;

    let mut registry = Registry::new();
    for (i, result) in reader.records().enumerate() {
        let row = i + 1;
        let record = result?;

        let name = record.get(cols.name).unwrap_or("").trim();
        if name.is_empty() {
            return Err(RosterError::MalformedRosterRow {
                row,
                reason: "empty player name".into(),
            });
        }

        let pos_raw = record.get(cols.position).unwrap_or("");
        let position = Position::from_code(pos_raw).ok_or_else(|| RosterError::MalformedRosterRow {
            row,
            reason: format!("unsupported position `{}` for {name}", pos_raw.trim()),
        })?;

        let ranks = BaselineRanks {
            adp: rank_field(&record, cols.adp, "ADP", row)?,
            expert_rank: rank_field(&record, cols.expert_rank, "FP Rank", row)?,
            site_rank: rank_field(&record, cols.site_rank, "XRank", row)?,
        };

        registry
            .insert(PlayerRecord::new(name, position, ranks))
            .map_err(|dup| RosterError::MalformedRosterRow {
                row,
                reason: format!("duplicate player `{}`", dup.canonical_name),
            })?;
    }

    Ok(registry)
}

/// Build the registry from a roster CSV file.
pub fn load_roster(path: &Path) -> Result<Registry, RosterError> {
    let file = std::fs::File::open(path).map_err(|e| RosterError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let registry = load_roster_from_reader(file)?;
    info!("Loaded {} players from roster {}", registry.len(), path.display());
    Ok(registry)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn ranks(adp: u32) -> BaselineRanks {
        BaselineRanks {
            adp,
            expert_rank: adp,
            site_rank: adp,
        }
    }

    // -- Roster parsing --

    #[test]
    fn roster_with_leading_index_column() {
        let csv_data = "\
,Player,POS,ADP,FP Rank,XRank
0,Josh Allen,QB1,20,18,22
1,A.J. Dillon,RB40,140,133,150
2,Travis Kelce,TE1,12,10,9";

        let registry = load_roster_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(registry.len(), 3);

        let dillon = registry.get("A.J. Dillon").unwrap();
        assert_eq!(dillon.position, Position::RB);
        assert_eq!(
            dillon.ranks,
            BaselineRanks {
                adp: 140,
                expert_rank: 133,
                site_rank: 150
            }
        );
        assert!(dillon.stat_values.is_empty());
        assert_eq!(dillon.projected_points, 0.0);

        let names: Vec<_> = registry.players().iter().map(|p| p.canonical_name.as_str()).collect();
        assert_eq!(names, vec!["Josh Allen", "A.J. Dillon", "Travis Kelce"]);
    }

    #[test]
    fn roster_header_aliases() {
        let csv_data = "\
Name,Position,ADP,ECR,Site Rank
Justin Jefferson,WR,2,1,3";

        let registry = load_roster_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(registry.get("Justin Jefferson").unwrap().position, Position::WR);
    }

    #[test]
    fn names_trimmed() {
        let csv_data = "\
Player,POS,ADP,FP Rank,XRank
  Josh Allen  ,QB,20,18,22";

        let registry = load_roster_from_reader(csv_data.as_bytes()).unwrap();
        assert!(registry.contains("Josh Allen"));
    }

    #[test]
    fn missing_column_is_malformed() {
        let csv_data = "\
Player,POS,ADP,FP Rank
Josh Allen,QB,20,18";

        let err = load_roster_from_reader(csv_data.as_bytes()).unwrap_err();
        match err {
            RosterError::MalformedRosterRow { row, reason } => {
                assert_eq!(row, 0);
                assert!(reason.contains("XRank"), "{reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_integer_rank_is_malformed() {
        let csv_data = "\
Player,POS,ADP,FP Rank,XRank
Josh Allen,QB,20,18,22
Jalen Hurts,QB,twenty,19,21";

        let err = load_roster_from_reader(csv_data.as_bytes()).unwrap_err();
        match err {
            RosterError::MalformedRosterRow { row, reason } => {
                assert_eq!(row, 2);
                assert!(reason.contains("twenty"), "{reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unsupported_position_is_malformed() {
        let csv_data = "\
Player,POS,ADP,FP Rank,XRank
Justin Tucker,K1,150,140,160";

        let err = load_roster_from_reader(csv_data.as_bytes()).unwrap_err();
        assert!(matches!(err, RosterError::MalformedRosterRow { row: 1, .. }));
    }

    #[test]
    fn duplicate_player_is_malformed() {
        let csv_data = "\
Player,POS,ADP,FP Rank,XRank
Josh Allen,QB,20,18,22
Josh Allen,QB,21,18,22";

        let err = load_roster_from_reader(csv_data.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("duplicate player `Josh Allen`"));
    }

    // -- Registry operations --

    #[test]
    fn retain_with_stats_drops_empty_records_and_reindexes() {
        let mut registry = Registry::new();
        for (name, adp) in [("Empty One", 1), ("Has Stats", 2), ("Empty Two", 3)] {
            registry
                .insert(PlayerRecord::new(name, Position::WR, ranks(adp)))
                .unwrap();
        }
        registry.get_mut("Has Stats").unwrap().stat_values.insert(
            StatKey::Receptions,
            StatValue {
                raw: "80".into(),
                origin: StatOrigin::Feed("test".into()),
            },
        );

        let dropped = registry.retain_with_stats();
        assert_eq!(dropped, vec!["Empty One", "Empty Two"]);
        assert_eq!(registry.len(), 1);
        assert!(!registry.contains("Empty One"));
        assert_eq!(registry.get("Has Stats").unwrap().stat_raw(StatKey::Receptions), Some("80"));
    }

    #[test]
    fn get_mut_reaches_indexed_record() {
        let mut registry = Registry::new();
        for (name, adp) in [("Josh Allen", 1), ("Travis Kelce", 2)] {
            registry
                .insert(PlayerRecord::new(name, Position::QB, ranks(adp)))
                .unwrap();
        }
        registry.get_mut("Travis Kelce").unwrap().projected_points = 12.5;
        assert_eq!(registry.get("Travis Kelce").unwrap().projected_points, 12.5);
        assert_eq!(registry.get("Josh Allen").unwrap().projected_points, 0.0);
        assert!(registry.get_mut("Nobody Here").is_none());
    }

    #[test]
    fn insert_rejects_duplicate() {
        let mut registry = Registry::new();
        registry
            .insert(PlayerRecord::new("Josh Allen", Position::QB, ranks(1)))
            .unwrap();
        assert!(registry
            .insert(PlayerRecord::new("Josh Allen", Position::QB, ranks(2)))
            .is_err());
        assert_eq!(registry.get("Josh Allen").unwrap().ranks.adp, 1);
    }
}
