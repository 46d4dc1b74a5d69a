// Downloaded odds sheets: wide CSV with one row per player and one column
// per prop market.

use crate::{clean_text, FeedError, FeedFormat, FeedReader};
use propsev_core::adapter::FeedTriple;

const PLAYER_HEADERS: &[&str] = &["player", "name"];

#[derive(Debug, Clone, Copy, Default)]
pub struct OddsSheetReader;

impl FeedReader for OddsSheetReader {
    fn format(&self) -> FeedFormat {
        FeedFormat::OddsSheet
    }

    /// Every non-empty cell under a named column becomes a triple labelled
    /// with that column's header.
    fn read_triples(&self, document: &str) -> Result<Vec<FeedTriple>, FeedError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(document.as_bytes());
        let headers: Vec<String> = reader.headers()?.iter().map(clean_text).collect();

        let player_col = headers
            .iter()
            .position(|h| PLAYER_HEADERS.contains(&h.to_ascii_lowercase().as_str()))
            .ok_or_else(|| FeedError::MissingPlayerColumn {
                expected: "Player, Name".into(),
            })?;

        let mut triples = Vec::new();
        for result in reader.records() {
            let record = result?;
            let name = clean_text(record.get(player_col).unwrap_or(""));
            if name.is_empty() {
                continue;
            }
            for (idx, cell) in record.iter().enumerate() {
                let Some(label) = headers.get(idx) else {
                    continue;
                };
                let value = cell.trim();
                if idx == player_col || label.is_empty() || value.is_empty() {
                    continue;
                }
                triples.push(FeedTriple::new(name.as_str(), label.as_str(), value));
            }
        }
        Ok(triples)
    }
}
