// Per-position report rendering: fixed-width text for stdout and one CSV
// file per position.

use propsev_core::registry::{PlayerRecord, Registry};
use propsev_core::report::{ranked, ReportLayout};
use propsev_core::stats::{parse_stat_number, Position, StatKey};
use std::fmt::Write as _;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to write report {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to write report CSV: {0}")]
    Csv(#[from] csv::Error),
}

const BASE_HEADERS: [&str; 6] = ["Rank", "Player", "ADP", "FP Rank", "XRank", "Points"];

/// A stat cell: one decimal for numbers, the raw text otherwise, `missing`
/// when the player has no value.
fn stat_cell(record: &PlayerRecord, key: StatKey, missing: &str) -> String {
    match record.stat_raw(key) {
        Some(raw) => match parse_stat_number(raw) {
            Some(v) => format!("{v:.1}"),
            None => raw.to_string(),
        },
        None => missing.to_string(),
    }
}

fn row_cells(rank: usize, record: &PlayerRecord, columns: &[StatKey], missing: &str) -> Vec<String> {
    let mut cells = vec![
        rank.to_string(),
        record.canonical_name.clone(),
        record.ranks.adp.to_string(),
        record.ranks.expert_rank.to_string(),
        record.ranks.site_rank.to_string(),
        format!("{:.1}", record.projected_points),
    ];
    cells.extend(columns.iter().map(|k| stat_cell(record, *k, missing)));
    cells
}

fn header_cells(columns: &[StatKey]) -> Vec<String> {
    BASE_HEADERS
        .iter()
        .map(|h| h.to_string())
        .chain(columns.iter().map(|k| k.column_label().to_string()))
        .collect()
}

// ---------------------------------------------------------------------------
// Text
// ---------------------------------------------------------------------------

/// One position's table. The player column is left-aligned, every other
/// column right-aligned, each sized to its widest cell.
pub fn render_position(position: Position, rows: &[&PlayerRecord], layout: &ReportLayout) -> String {
    let columns = layout.columns(position);
    let header = header_cells(&columns);
    let body: Vec<Vec<String>> = rows
        .iter()
        .enumerate()
        .map(|(i, r)| row_cells(i + 1, r, &columns, "-"))
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|col| {
            body.iter()
                .map(|row| row[col].len())
                .chain(std::iter::once(header[col].len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let _ = writeln!(out, "== {position} ==");
    for line in std::iter::once(&header).chain(body.iter()) {
        let cells: Vec<String> = line
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(col, (cell, w))| {
                if col == 1 {
                    format!("{cell:<w$}")
                } else {
                    format!("{cell:>w$}")
                }
            })
            .collect();
        let _ = writeln!(out, "{}", cells.join("  ").trim_end());
    }
    if body.is_empty() {
        let _ = writeln!(out, "(no players)");
    }
    out
}

/// Every position's table, top `top_n` each, separated by blank lines.
pub fn render_report(registry: &Registry, layout: &ReportLayout, top_n: usize) -> String {
    Position::ALL
        .iter()
        .map(|&pos| render_position(pos, &ranked(registry, pos, top_n), layout))
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Write one position's rows as CSV. Missing stats are empty cells.
pub fn write_position_csv<W: Write>(
    writer: W,
    position: Position,
    rows: &[&PlayerRecord],
    layout: &ReportLayout,
) -> Result<(), OutputError> {
    let columns = layout.columns(position);
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(header_cells(&columns))?;
    for (i, record) in rows.iter().enumerate() {
        wtr.write_record(row_cells(i + 1, record, &columns, ""))?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write `qb.csv`, `rb.csv`, `wr.csv` and `te.csv` into `dir`, creating it
/// if needed. Returns the written paths.
pub fn write_csv_reports(
    registry: &Registry,
    layout: &ReportLayout,
    top_n: usize,
    dir: &Path,
) -> Result<Vec<PathBuf>, OutputError> {
    std::fs::create_dir_all(dir).map_err(|e| OutputError::Io {
        path: dir.display().to_string(),
        source: e,
    })?;

    let mut written = Vec::new();
    for position in Position::ALL {
        let path = dir.join(format!("{}.csv", position.display_str().to_ascii_lowercase()));
        let file = std::fs::File::create(&path).map_err(|e| OutputError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let rows = ranked(registry, position, top_n);
        write_position_csv(file, position, &rows, layout)?;
        written.push(path);
    }
    info!("Wrote {} CSV reports to {}", written.len(), dir.display());
    Ok(written)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
