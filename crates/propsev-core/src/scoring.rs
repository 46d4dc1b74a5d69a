// Scoring engine: per-stat point weights and the linear projection.

use crate::registry::{PlayerRecord, Registry};
use crate::stats::{parse_stat_number, StatKey};
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("failed to read scoring overrides {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("malformed scoring line {line_no}: `{line}` ({reason})")]
    MalformedConfigLine {
        line_no: usize,
        line: String,
        reason: String,
    },

    #[error("scoring line {line_no} names unknown stat `{key}`")]
    UnconfiguredStatKey { line_no: usize, key: String },

    #[error("{player} has stat `{key}` with no configured weight")]
    UnconfiguredStat { player: String, key: StatKey },

    #[error("{player}: value `{value}` for `{key}` is not numeric")]
    MalformedNumericValue {
        player: String,
        key: String,
        value: String,
    },
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Point-per-unit weight for each canonical stat.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    weights: HashMap<StatKey, f64>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: HashMap::from([
                (StatKey::PassYards, 0.04),
                (StatKey::PassTds, 4.0),
                (StatKey::Ints, -2.0),
                (StatKey::RushYards, 0.1),
                (StatKey::RushTds, 6.0),
                (StatKey::ReceiveYards, 0.1),
                (StatKey::ReceiveTds, 6.0),
                (StatKey::Receptions, 1.0),
            ]),
        }
    }
}

impl ScoringConfig {
    /// A config holding exactly the given weights. Stats left out score as
    /// unconfigured.
    pub fn from_weights<I: IntoIterator<Item = (StatKey, f64)>>(weights: I) -> Self {
        Self {
            weights: weights.into_iter().collect(),
        }
    }

    pub fn weight(&self, key: StatKey) -> Option<f64> {
        self.weights.get(&key).copied()
    }

    pub fn set_weight(&mut self, key: StatKey, weight: f64) {
        self.weights.insert(key, weight);
    }

    /// Every weight multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            weights: self.weights.iter().map(|(k, w)| (*k, w * factor)).collect(),
        }
    }

    /// Apply `stat_key: weight` override lines on top of this config.
    ///
    /// Blank lines and `#` comments are skipped. Every other line must split
    /// on `:` into exactly two parts, name a canonical stat, and carry a
    /// finite weight.
    pub fn apply_overrides_from_reader<R: Read>(&mut self, rdr: R) -> Result<usize, ScoringError> {
        let mut applied = 0;
        for (i, line) in BufReader::new(rdr).lines().enumerate() {
            let line_no = i + 1;
            let line = line.map_err(|e| ScoringError::MalformedConfigLine {
                line_no,
                line: String::new(),
                reason: e.to_string(),
            })?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = trimmed.split(':').collect();
            let [key, weight] = parts.as_slice() else {
                return Err(ScoringError::MalformedConfigLine {
                    line_no,
                    line: line.clone(),
                    reason: format!("expected `stat_key: weight`, found {} parts", parts.len()),
                });
            };

            let key: StatKey = key.parse().map_err(|_| ScoringError::UnconfiguredStatKey {
                line_no,
                key: key.trim().to_string(),
            })?;
            let weight = weight
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|w| w.is_finite())
                .ok_or_else(|| ScoringError::MalformedConfigLine {
                    line_no,
                    line: line.clone(),
                    reason: format!("weight `{}` is not a number", weight.trim()),
                })?;

            debug!("scoring override: {} = {}", key, weight);
            self.set_weight(key, weight);
            applied += 1;
        }
        Ok(applied)
    }

    /// Defaults with the overrides in `path` applied.
    pub fn load_with_overrides(path: &Path) -> Result<Self, ScoringError> {
        let file = std::fs::File::open(path).map_err(|e| ScoringError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let mut config = Self::default();
        let applied = config.apply_overrides_from_reader(file)?;
        info!("Applied {} scoring overrides from {}", applied, path.display());
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// `sum(weight[k] * value[k])` over the record's stat values.
///
/// Accumulates in `StatKey::ALL` order so the float result does not depend
/// on map iteration order.
pub fn score(record: &PlayerRecord, config: &ScoringConfig) -> Result<f64, ScoringError> {
    let mut total = 0.0;
    for key in StatKey::ALL {
        let Some(value) = record.stat_values.get(&key) else {
            continue;
        };
        let weight = config
            .weight(key)
            .ok_or_else(|| ScoringError::UnconfiguredStat {
                player: record.canonical_name.clone(),
                key,
            })?;
        let amount =
            parse_stat_number(&value.raw).ok_or_else(|| ScoringError::MalformedNumericValue {
                player: record.canonical_name.clone(),
                key: key.to_string(),
                value: value.raw.clone(),
            })?;
        total += weight * amount;
    }
    Ok(total)
}

/// Score every record and store the result as its projection.
pub fn score_all(registry: &mut Registry, config: &ScoringConfig) -> Result<(), ScoringError> {
    for record in registry.players_mut() {
        record.projected_points = score(record, config)?;
    }
    info!("Scored {} players", registry.len());
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
