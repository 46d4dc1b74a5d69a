// Feed document readers: turn each supported feed shape into the
// (name, label, value) triples the core adapters consume.

pub mod html_list;
pub mod labels;
pub mod odds_sheet;
pub mod odds_tree;

use propsev_core::adapter::FeedTriple;
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use tracing::info;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Supported feed document shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedFormat {
    /// Projection web page: stat section headings over name/value rows.
    HtmlList,
    /// Wide CSV odds sheet: one player column, one column per stat.
    OddsSheet,
    /// Nested JSON odds document: events, markets, selections.
    OddsTree,
}

impl FeedFormat {
    pub const ALL: [FeedFormat; 3] = [FeedFormat::HtmlList, FeedFormat::OddsSheet, FeedFormat::OddsTree];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeedFormat::HtmlList => "html_list",
            FeedFormat::OddsSheet => "odds_sheet",
            FeedFormat::OddsTree => "odds_tree",
        }
    }
}

impl fmt::Display for FeedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("failed to read feed {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid selector `{selector}`: {message}")]
    Selector { selector: String, message: String },

    #[error("CSV error in odds sheet: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error in odds document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("odds sheet has no player column (expected one of: {expected})")]
    MissingPlayerColumn { expected: String },
}

// ---------------------------------------------------------------------------
// Reader trait
// ---------------------------------------------------------------------------

/// Extracts triples from one feed shape. Readers only locate names, labels
/// and values; mapping and merging happen in the core adapter.
pub trait FeedReader {
    fn format(&self) -> FeedFormat;

    fn read_triples(&self, document: &str) -> Result<Vec<FeedTriple>, FeedError>;
}

/// The reader for a feed format.
pub fn reader_for(format: FeedFormat) -> Box<dyn FeedReader> {
    match format {
        FeedFormat::HtmlList => Box::new(html_list::HtmlListReader),
        FeedFormat::OddsSheet => Box::new(odds_sheet::OddsSheetReader),
        FeedFormat::OddsTree => Box::new(odds_tree::OddsTreeReader),
    }
}

/// Read a feed file from disk and extract its triples.
pub fn read_feed_file(path: &Path, format: FeedFormat) -> Result<Vec<FeedTriple>, FeedError> {
    let document = std::fs::read_to_string(path).map_err(|e| FeedError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let triples = reader_for(format).read_triples(&document)?;
    info!(
        "Read {} triples from {} feed {}",
        triples.len(),
        format,
        path.display()
    );
    Ok(triples)
}

/// Collapse whitespace runs in extracted cell text.
pub(crate) fn clean_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
