// Per-position report layout and ranking over scored records.

use crate::registry::{PlayerRecord, Registry};
use crate::stats::{Position, StatKey};
use std::cmp::Ordering;

/// Which optional stat columns a report carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportLayout {
    /// Prepend passing columns to the RB table (trick-play backs).
    pub rb_passing: bool,
    /// Append rushing columns to the WR table.
    pub wr_rushing: bool,
}

impl ReportLayout {
    /// Ordered stat columns relevant to a position.
    pub fn columns(&self, position: Position) -> Vec<StatKey> {
        use StatKey::*;
        match position {
            Position::QB => vec![PassYards, PassTds, Ints, RushYards, RushTds],
            Position::RB => {
                let mut cols = Vec::with_capacity(7);
                if self.rb_passing {
                    cols.extend([PassYards, PassTds]);
                }
                cols.extend([RushYards, RushTds, Receptions, ReceiveYards, ReceiveTds]);
                cols
            }
            Position::WR => {
                let mut cols = vec![Receptions, ReceiveYards, ReceiveTds];
                if self.wr_rushing {
                    cols.extend([RushYards, RushTds]);
                }
                cols
            }
            Position::TE => vec![Receptions, ReceiveYards, ReceiveTds],
        }
    }
}

/// Highest projection first; ties go to the better (lower) ADP, then name.
fn by_projection(a: &PlayerRecord, b: &PlayerRecord) -> Ordering {
    b.projected_points
        .total_cmp(&a.projected_points)
        .then_with(|| a.ranks.adp.cmp(&b.ranks.adp))
        .then_with(|| a.canonical_name.cmp(&b.canonical_name))
}

/// The top `limit` scored players at `position`, best first.
pub fn ranked<'a>(registry: &'a Registry, position: Position, limit: usize) -> Vec<&'a PlayerRecord> {
    let mut rows: Vec<&PlayerRecord> = registry
        .players()
        .iter()
        .filter(|p| p.position == position)
        .collect();
    rows.sort_by(|a, b| by_projection(a, b));
    rows.truncate(limit);
    rows
}
