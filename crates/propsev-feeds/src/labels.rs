// Built-in label maps, one per feed format.

use crate::FeedFormat;
use propsev_core::adapter::{LabelMap, LabelTarget};
use propsev_core::stats::StatKey;

use LabelTarget::{Combined, Stat};
use StatKey::*;

/// Section headings on season projection pages.
const HTML_LIST_LABELS: &[(&str, LabelTarget)] = &[
    ("Passing Yards", Stat(PassYards)),
    ("Passing TDs", Stat(PassTds)),
    ("Passing Touchdowns", Stat(PassTds)),
    ("Interceptions", Stat(Ints)),
    ("Interceptions Thrown", Stat(Ints)),
    ("Rushing Yards", Stat(RushYards)),
    ("Rushing TDs", Stat(RushTds)),
    ("Rushing Touchdowns", Stat(RushTds)),
    ("Receiving Yards", Stat(ReceiveYards)),
    ("Receiving TDs", Stat(ReceiveTds)),
    ("Receiving Touchdowns", Stat(ReceiveTds)),
    ("Receptions", Stat(Receptions)),
    ("Rush + Rec Yards", Combined(RushYards, ReceiveYards)),
    ("Pass + Rush Yards", Combined(PassYards, RushYards)),
];

/// Column headings on downloaded odds sheets.
const ODDS_SHEET_LABELS: &[(&str, LabelTarget)] = &[
    ("Pass Yds", Stat(PassYards)),
    ("Pass TDs", Stat(PassTds)),
    ("INTs", Stat(Ints)),
    ("Rush Yds", Stat(RushYards)),
    ("Rush TDs", Stat(RushTds)),
    ("Rec Yds", Stat(ReceiveYards)),
    ("Rec TDs", Stat(ReceiveTds)),
    ("Receptions", Stat(Receptions)),
    ("Rush + Rec Yds", Combined(RushYards, ReceiveYards)),
    ("Pass + Rush Yds", Combined(PassYards, RushYards)),
];

/// Market names in JSON odds documents.
const ODDS_TREE_LABELS: &[(&str, LabelTarget)] = &[
    ("Player Passing Yards", Stat(PassYards)),
    ("Player Passing Touchdowns", Stat(PassTds)),
    ("Player Interceptions", Stat(Ints)),
    ("Player Rushing Yards", Stat(RushYards)),
    ("Player Rushing Touchdowns", Stat(RushTds)),
    ("Player Receiving Yards", Stat(ReceiveYards)),
    ("Player Receiving Touchdowns", Stat(ReceiveTds)),
    ("Player Receptions", Stat(Receptions)),
    ("Player Rush + Rec Yards", Combined(RushYards, ReceiveYards)),
    ("Player Pass + Rush Yards", Combined(PassYards, RushYards)),
];

/// The built-in label map for a feed format.
pub fn default_labels(format: FeedFormat) -> LabelMap {
    let table = match format {
        FeedFormat::HtmlList => HTML_LIST_LABELS,
        FeedFormat::OddsSheet => ODDS_SHEET_LABELS,
        FeedFormat::OddsTree => ODDS_TREE_LABELS,
    };
    LabelMap::from_entries(table.iter().map(|(label, target)| (*label, *target)))
}
