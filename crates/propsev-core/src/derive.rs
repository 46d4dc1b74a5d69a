// Derived stats: back-fill one component of a combined-total line from the
// other, already observed, component.

use crate::adapter::CombinedTotal;
use crate::registry::{Registry, StatOrigin, StatValue};
use crate::stats::{format_stat_number, parse_stat_number, StatKey};
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum DeriveError {
    #[error("{player}: value `{value}` for `{key}` is not numeric, cannot derive {missing}")]
    MalformedNumericValue {
        player: String,
        key: String,
        value: String,
        missing: String,
    },
}

/// Outcome counts for one derivation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeriveSummary {
    pub filled: usize,
    pub both_known: usize,
    pub neither_known: usize,
}

fn number(raw: &str, player: &str, what: &str, missing: StatKey) -> Result<f64, DeriveError> {
    parse_stat_number(raw).ok_or_else(|| DeriveError::MalformedNumericValue {
        player: player.to_string(),
        key: what.to_string(),
        value: raw.to_string(),
        missing: missing.to_string(),
    })
}

/// Apply one combined total to its player.
///
/// Fills the missing component as `total - known` only when exactly one of
/// the two components is present. Returns whether a value was stored.
pub fn apply_total(registry: &mut Registry, line: &CombinedTotal) -> Result<bool, DeriveError> {
    let Some(record) = registry.get_mut(&line.player) else {
        return Ok(false);
    };
    let (a, b) = line.components;

    let (known_key, missing_key) = match (record.has_stat(a), record.has_stat(b)) {
        (true, false) => (a, b),
        (false, true) => (b, a),
        _ => return Ok(false),
    };

    let known_raw = record.stat_values[&known_key].raw.clone();
    let known = number(&known_raw, &line.player, known_key.as_str(), missing_key)?;
    let total = number(&line.total, &line.player, &format!("{a}+{b}"), missing_key)?;
    let derived = total - known;

    debug!(
        "derived {} = {} for {} ({} - {} {})",
        missing_key, derived, line.player, line.total, known_key, known_raw
    );
    record.stat_values.insert(
        missing_key,
        StatValue {
            raw: format_stat_number(derived),
            origin: StatOrigin::Derived(line.feed.clone()),
        },
    );
    Ok(true)
}

/// Run every pending combined total, in feed order.
///
/// Must run after all feeds are ingested: a component observed by a later
/// feed would otherwise be shadowed by a derived value.
pub fn resolve_all(registry: &mut Registry, totals: &[CombinedTotal]) -> Result<DeriveSummary, DeriveError> {
    let mut summary = DeriveSummary::default();
    for line in totals {
        let Some(record) = registry.get(&line.player) else {
            continue;
        };
        let (a, b) = line.components;
        match (record.has_stat(a), record.has_stat(b)) {
            (true, true) => summary.both_known += 1,
            (false, false) => {
                debug!(
                    "no component of {}+{} known for {}; leaving total unused",
                    a, b, line.player
                );
                summary.neither_known += 1;
            }
            _ => {
                if apply_total(registry, line)? {
                    summary.filled += 1;
                }
            }
        }
    }
    info!(
        "Derived {} stats from {} combined totals ({} already complete, {} without a known component)",
        summary.filled,
        totals.len(),
        summary.both_known,
        summary.neither_known
    );
    Ok(summary)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
