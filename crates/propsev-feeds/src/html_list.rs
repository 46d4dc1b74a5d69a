// Projection web pages: each stat section is a heading followed by a table
// of player rows.

use crate::{clean_text, FeedError, FeedFormat, FeedReader};
use propsev_core::adapter::FeedTriple;
use scraper::{Html, Selector};
use tracing::debug;

const SECTION_SELECTOR: &str = "h1, h2, h3, h4, tr";
const CELL_SELECTOR: &str = "td";

fn selector(css: &str) -> Result<Selector, FeedError> {
    Selector::parse(css).map_err(|e| FeedError::Selector {
        selector: css.to_string(),
        message: e.to_string(),
    })
}

/// Reads heading-delimited stat tables.
///
/// The most recent `h1`-`h4` heading is the label for every following row.
/// A row needs at least two `td` cells: the first is the player name and the
/// last is the value. Header rows (`th` only) and rows before the first
/// heading are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlListReader;

impl FeedReader for HtmlListReader {
    fn format(&self) -> FeedFormat {
        FeedFormat::HtmlList
    }

    fn read_triples(&self, document: &str) -> Result<Vec<FeedTriple>, FeedError> {
        let html = Html::parse_document(document);
        let sections = selector(SECTION_SELECTOR)?;
        let cells = selector(CELL_SELECTOR)?;

        let mut triples = Vec::new();
        let mut label: Option<String> = None;

        for element in html.select(&sections) {
            if element.value().name() != "tr" {
                let heading = clean_text(&element.text().collect::<String>());
                debug!("html section '{}'", heading);
                label = Some(heading);
                continue;
            }

            let Some(current) = label.as_ref() else {
                continue;
            };
            let row: Vec<String> = element
                .select(&cells)
                .map(|td| clean_text(&td.text().collect::<String>()))
                .collect();
            let [name, .., value] = row.as_slice() else {
                continue;
            };
            if name.is_empty() || value.is_empty() {
                continue;
            }
            triples.push(FeedTriple::new(name.as_str(), current.as_str(), value.as_str()));
        }

        Ok(triples)
    }
}
