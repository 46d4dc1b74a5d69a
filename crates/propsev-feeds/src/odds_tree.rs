// Downloaded JSON odds documents: events holding markets holding
// per-player selections.

use crate::{clean_text, FeedError, FeedFormat, FeedReader};
use propsev_core::adapter::FeedTriple;
use serde::Deserialize;
use serde_json::Value;

// ---------------------------------------------------------------------------
// Raw JSON serde structs (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawOddsDocument {
    #[serde(default)]
    events: Vec<RawEvent>,
    /// Some books publish a single event's markets at the top level.
    #[serde(default)]
    markets: Vec<RawMarket>,
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    #[serde(default)]
    markets: Vec<RawMarket>,
}

#[derive(Debug, Deserialize)]
struct RawMarket {
    #[serde(alias = "name")]
    label: String,
    #[serde(default, alias = "outcomes")]
    selections: Vec<RawSelection>,
}

#[derive(Debug, Deserialize)]
struct RawSelection {
    #[serde(alias = "player")]
    participant: String,
    #[serde(default)]
    line: Value,
    #[serde(default)]
    side: Option<String>,
}

impl RawSelection {
    /// Under lines repeat the over line's number; only one side is kept.
    fn is_over_or_single(&self) -> bool {
        self.side
            .as_deref()
            .map_or(true, |s| s.trim().eq_ignore_ascii_case("over"))
    }

    /// The line exactly as the document wrote it.
    fn line_text(&self) -> Option<String> {
        match &self.line {
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OddsTreeReader;

impl FeedReader for OddsTreeReader {
    fn format(&self) -> FeedFormat {
        FeedFormat::OddsTree
    }

    fn read_triples(&self, document: &str) -> Result<Vec<FeedTriple>, FeedError> {
        let raw: RawOddsDocument = serde_json::from_str(document)?;

        let markets = raw
            .events
            .iter()
            .flat_map(|e| e.markets.iter())
            .chain(raw.markets.iter());

        let mut triples = Vec::new();
        for market in markets {
            let label = clean_text(&market.label);
            for selection in market.selections.iter().filter(|s| s.is_over_or_single()) {
                let Some(line) = selection.line_text() else {
                    continue;
                };
                triples.push(FeedTriple::new(clean_text(&selection.participant), label.as_str(), line));
            }
        }
        Ok(triples)
    }
}
