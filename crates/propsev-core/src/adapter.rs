// Source adapter: maps a feed's (name, label, value) triples onto registry
// records through the feed's label map and the shared name resolver.

use crate::names::{NameResolver, Resolution};
use crate::registry::{Registry, StatOrigin, StatValue};
use crate::stats::{StatKey, UnknownStatKey};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// One extracted observation from a feed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedTriple {
    pub name: String,
    pub label: String,
    pub value: String,
}

impl FeedTriple {
    pub fn new(name: impl Into<String>, label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            value: value.into(),
        }
    }
}

/// What a feed label means in the canonical vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelTarget {
    /// A directly observed stat.
    Stat(StatKey),
    /// A combined total of two stats, resolved later by derivation.
    Combined(StatKey, StatKey),
}

impl FromStr for LabelTarget {
    type Err = UnknownStatKey;

    /// `"rush_yards"` or `"rush_yards+receive_yards"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('+') {
            Some((a, b)) => Ok(LabelTarget::Combined(a.parse()?, b.parse()?)),
            None => Ok(LabelTarget::Stat(s.parse()?)),
        }
    }
}

impl fmt::Display for LabelTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelTarget::Stat(k) => write!(f, "{k}"),
            LabelTarget::Combined(a, b) => write!(f, "{a}+{b}"),
        }
    }
}

/// Feed-specific mapping from native stat labels to canonical targets.
///
/// Labels compare case-insensitively with whitespace collapsed, since the
/// same heading shows up as "Rushing Yards" on one page and "rushing  yards"
/// on another.
#[derive(Debug, Clone, Default)]
pub struct LabelMap {
    entries: HashMap<String, LabelTarget>,
}

fn label_key(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

impl LabelMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, LabelTarget)>,
    {
        let mut map = Self::new();
        for (label, target) in entries {
            map.insert(label, target);
        }
        map
    }

    /// Add or replace a mapping.
    pub fn insert(&mut self, label: &str, target: LabelTarget) {
        self.entries.insert(label_key(label), target);
    }

    pub fn get(&self, label: &str) -> Option<LabelTarget> {
        self.entries.get(&label_key(label)).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A combined-total line waiting for the derived stat resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedTotal {
    pub player: String,
    pub components: (StatKey, StatKey),
    pub total: String,
    pub feed: String,
}

/// Counts from one adapter run, plus the combined totals it deferred.
#[derive(Debug, Clone, Default)]
pub struct IngestSummary {
    pub written: usize,
    pub overwritten: usize,
    /// Values already observed by an earlier feed and left in place.
    pub kept_earlier: usize,
    pub skipped_names: usize,
    pub ignored_labels: usize,
    pub combined: Vec<CombinedTotal>,
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("feed `{feed}` references unknown player `{name}` (label `{label}`)")]
    UnknownPlayer {
        feed: String,
        name: String,
        label: String,
    },
}

// ---------------------------------------------------------------------------
// Adapter
// ---------------------------------------------------------------------------

/// One adapter instance per feed: the feed's name and its label map.
#[derive(Debug, Clone)]
pub struct SourceAdapter {
    feed: String,
    labels: LabelMap,
}

impl SourceAdapter {
    pub fn new(feed: impl Into<String>, labels: LabelMap) -> Self {
        Self {
            feed: feed.into(),
            labels,
        }
    }

    pub fn feed(&self) -> &str {
        &self.feed
    }

    /// Map and merge a feed's triples into the registry.
    ///
    /// Unmapped labels and skip-listed names are dropped. An unresolvable
    /// name aborts the whole ingest. Within this feed the last value for a
    /// (player, stat) wins; a value an earlier feed supplied is left alone.
    pub fn ingest<I>(
        &self,
        triples: I,
        registry: &mut Registry,
        resolver: &NameResolver,
    ) -> Result<IngestSummary, AdapterError>
    where
        I: IntoIterator<Item = FeedTriple>,
    {
        let mut summary = IngestSummary::default();

        for triple in triples {
            let Some(target) = self.labels.get(&triple.label) else {
                debug!("feed '{}': ignoring unmapped label '{}'", self.feed, triple.label);
                summary.ignored_labels += 1;
                continue;
            };

            let player = match resolver.resolve(&triple.name, registry) {
                Resolution::Player(name) => name,
                Resolution::Skip => {
                    debug!("feed '{}': skipping listed name '{}'", self.feed, triple.name);
                    summary.skipped_names += 1;
                    continue;
                }
                Resolution::Unknown => {
                    return Err(AdapterError::UnknownPlayer {
                        feed: self.feed.clone(),
                        name: triple.name,
                        label: triple.label,
                    });
                }
            };

            match target {
                LabelTarget::Stat(key) => self.write(registry, &player, key, triple.value, &mut summary),
                LabelTarget::Combined(a, b) => summary.combined.push(CombinedTotal {
                    player,
                    components: (a, b),
                    total: triple.value,
                    feed: self.feed.clone(),
                }),
            }
        }

        info!(
            "Feed '{}': wrote {} values ({} overwritten, {} kept from earlier feeds), \
             skipped {} names, ignored {} labels, deferred {} combined totals",
            self.feed,
            summary.written,
            summary.overwritten,
            summary.kept_earlier,
            summary.skipped_names,
            summary.ignored_labels,
            summary.combined.len()
        );
        Ok(summary)
    }

    fn write(
        &self,
        registry: &mut Registry,
        player: &str,
        key: StatKey,
        raw: String,
        summary: &mut IngestSummary,
    ) {
        let Some(record) = registry.get_mut(player) else {
            return;
        };
        let value = StatValue {
            raw,
            origin: StatOrigin::Feed(self.feed.clone()),
        };
        match record.stat_values.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(value);
                summary.written += 1;
            }
            Entry::Occupied(mut slot) => {
                if slot.get().origin == value.origin {
                    slot.insert(value);
                    summary.overwritten += 1;
                } else {
                    debug!(
                        "feed '{}': keeping earlier {} for {} ({})",
                        self.feed,
                        key,
                        player,
                        slot.get().raw
                    );
                    summary.kept_earlier += 1;
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{BaselineRanks, PlayerRecord};
    use crate::stats::Position;

    fn registry() -> Registry {
        let mut registry = Registry::new();
        for (name, pos) in [("A.J. Dillon", Position::RB), ("Josh Allen", Position::QB)] {
            registry
                .insert(PlayerRecord::new(
                    name,
                    pos,
                    BaselineRanks {
                        adp: 1,
                        expert_rank: 1,
                        site_rank: 1,
                    },
                ))
                .unwrap();
        }
        registry
    }

    fn rushing_labels() -> LabelMap {
        LabelMap::from_entries([
            ("Rushing Yards", LabelTarget::Stat(StatKey::RushYards)),
            ("Rushing TDs", LabelTarget::Stat(StatKey::RushTds)),
            (
                "Rush + Rec Yards",
                LabelTarget::Combined(StatKey::RushYards, StatKey::ReceiveYards),
            ),
        ])
    }

    // -- Label targets --

    #[test]
    fn label_target_parsing() {
        assert_eq!("rush_yards".parse::<LabelTarget>(), Ok(LabelTarget::Stat(StatKey::RushYards)));
        assert_eq!(
            "rush_yards + receive_yards".parse::<LabelTarget>(),
            Ok(LabelTarget::Combined(StatKey::RushYards, StatKey::ReceiveYards))
        );
        assert!("kicking_points".parse::<LabelTarget>().is_err());
        assert!("rush_yards+field_goals".parse::<LabelTarget>().is_err());
    }

    #[test]
    fn label_lookup_ignores_case_and_spacing() {
        let labels = rushing_labels();
        assert_eq!(
            labels.get("  rushing   YARDS "),
            Some(LabelTarget::Stat(StatKey::RushYards))
        );
        assert_eq!(labels.get("Longest Rush"), None);
    }

    // -- Ingest --

    #[test]
    fn writes_mapped_values_through_alias() {
        let mut reg = registry();
        let adapter = SourceAdapter::new("page", rushing_labels());
        let summary = adapter
            .ingest(
                vec![
                    FeedTriple::new("AJ Dillon", "Rushing Yards", "800"),
                    FeedTriple::new("AJ Dillon", "Rushing TDs", "6"),
                ],
                &mut reg,
                &NameResolver::default(),
            )
            .unwrap();

        assert_eq!(summary.written, 2);
        let dillon = reg.get("A.J. Dillon").unwrap();
        assert_eq!(dillon.stat_raw(StatKey::RushYards), Some("800"));
        assert_eq!(dillon.stat_raw(StatKey::RushTds), Some("6"));
        assert_eq!(
            dillon.stat_values[&StatKey::RushYards].origin,
            StatOrigin::Feed("page".into())
        );
    }

    #[test]
    fn unmapped_labels_ignored() {
        let mut reg = registry();
        let adapter = SourceAdapter::new("page", rushing_labels());
        let summary = adapter
            .ingest(
                vec![FeedTriple::new("Josh Allen", "Anytime TD Scorer", "+120")],
                &mut reg,
                &NameResolver::default(),
            )
            .unwrap();

        assert_eq!(summary.ignored_labels, 1);
        assert!(reg.get("Josh Allen").unwrap().stat_values.is_empty());
    }

    #[test]
    fn unmapped_label_does_not_require_known_player() {
        let mut reg = registry();
        let adapter = SourceAdapter::new("page", rushing_labels());
        let summary = adapter
            .ingest(
                vec![FeedTriple::new("Justin Tucker", "Kicking Points", "8.5")],
                &mut reg,
                &NameResolver::default(),
            )
            .unwrap();
        assert_eq!(summary.ignored_labels, 1);
    }

    #[test]
    fn skip_listed_names_dropped() {
        let mut reg = registry();
        let adapter = SourceAdapter::new("page", rushing_labels());
        let summary = adapter
            .ingest(
                vec![FeedTriple::new("Dalvin Cook", "Rushing Yards", "400")],
                &mut reg,
                &NameResolver::default(),
            )
            .unwrap();
        assert_eq!(summary.skipped_names, 1);
        assert_eq!(summary.written, 0);
    }

    #[test]
    fn unknown_player_is_fatal() {
        let mut reg = registry();
        let adapter = SourceAdapter::new("page", rushing_labels());
        let err = adapter
            .ingest(
                vec![
                    FeedTriple::new("Josh Allen", "Rushing Yards", "500"),
                    FeedTriple::new("Nobody Here", "Rushing Yards", "10"),
                ],
                &mut reg,
                &NameResolver::default(),
            )
            .unwrap_err();
        let AdapterError::UnknownPlayer { feed, name, label } = err;
        assert_eq!(feed, "page");
        assert_eq!(name, "Nobody Here");
        assert_eq!(label, "Rushing Yards");
    }

    #[test]
    fn last_write_wins_within_feed() {
        let mut reg = registry();
        let adapter = SourceAdapter::new("page", rushing_labels());
        let summary = adapter
            .ingest(
                vec![
                    FeedTriple::new("Josh Allen", "Rushing Yards", "450"),
                    FeedTriple::new("Josh Allen", "Rushing Yards", "475"),
                ],
                &mut reg,
                &NameResolver::default(),
            )
            .unwrap();
        assert_eq!(summary.written, 1);
        assert_eq!(summary.overwritten, 1);
        assert_eq!(reg.get("Josh Allen").unwrap().stat_raw(StatKey::RushYards), Some("475"));
    }

    #[test]
    fn earlier_feed_value_not_overwritten() {
        let mut reg = registry();
        let resolver = NameResolver::default();
        SourceAdapter::new("first", rushing_labels())
            .ingest(
                vec![FeedTriple::new("Josh Allen", "Rushing Yards", "450")],
                &mut reg,
                &resolver,
            )
            .unwrap();
        let summary = SourceAdapter::new("second", rushing_labels())
            .ingest(
                vec![FeedTriple::new("Josh Allen", "Rushing Yards", "520")],
                &mut reg,
                &resolver,
            )
            .unwrap();

        assert_eq!(summary.kept_earlier, 1);
        let allen = reg.get("Josh Allen").unwrap();
        assert_eq!(allen.stat_raw(StatKey::RushYards), Some("450"));
        assert_eq!(
            allen.stat_values[&StatKey::RushYards].origin,
            StatOrigin::Feed("first".into())
        );
    }

    #[test]
    fn combined_totals_deferred() {
        let mut reg = registry();
        let adapter = SourceAdapter::new("odds", rushing_labels());
        let summary = adapter
            .ingest(
                vec![FeedTriple::new("AJ Dillon", "Rush + Rec Yards", "1,010.5")],
                &mut reg,
                &NameResolver::default(),
            )
            .unwrap();

        assert!(reg.get("A.J. Dillon").unwrap().stat_values.is_empty());
        assert_eq!(
            summary.combined,
            vec![CombinedTotal {
                player: "A.J. Dillon".into(),
                components: (StatKey::RushYards, StatKey::ReceiveYards),
                total: "1,010.5".into(),
                feed: "odds".into(),
            }]
        );
    }
}
