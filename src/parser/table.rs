use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::result_cell;
use crate::model::ResultRecord;

static TABLE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table#ctnResultats").unwrap());
static ROW_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());

const HEADER_CLASSES: &[&str] = &["headers", "mainheaders"];
/// Result rows carry 9 direct cells; detail rows carry fewer.
const MIN_CELLS: usize = 9;

const COL_NAME: usize = 0;
const COL_EVENT: usize = 1;
const COL_RESULT: usize = 2;
const COL_ROUND: usize = 3;
const COL_POINTS: usize = 5;
const COL_LEVEL: usize = 6;
const COL_DATE: usize = 7;
const COL_CITY: usize = 8;

/// Extract every result row of the `ctnResultats` table. No table → empty.
pub fn extract(doc: &Html) -> Vec<ResultRecord> {
    let Some(table) = doc.select(&TABLE_SEL).next() else {
        debug!("no results table in document");
        return Vec::new();
    };

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for row in table.select(&ROW_SEL) {
        // Rows of tables nested inside detail rows belong to their own table.
        if owning_table(row).map(|t| t.id()) != Some(table.id()) {
            continue;
        }
        if row
            .value()
            .classes()
            .any(|c| HEADER_CLASSES.contains(&c))
        {
            continue;
        }

        match parse_row(row) {
            Some(r) => records.push(r),
            None => skipped += 1,
        }
    }

    debug!(rows = records.len(), skipped, "extracted results table");
    records
}

fn parse_row(row: ElementRef) -> Option<ResultRecord> {
    let cells: Vec<String> = row
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|e| e.value().name() == "td")
        .map(cell_text)
        .collect();
    if cells.len() < MIN_CELLS {
        return None;
    }

    let result = result_cell::decode(&cells[COL_RESULT]);
    let points = cells[COL_POINTS].parse::<u32>().unwrap_or(0);

    Some(ResultRecord {
        athlete_name: cells[COL_NAME].clone(),
        event: cells[COL_EVENT].clone(),
        round: cells[COL_ROUND].clone(),
        performance: result.performance,
        points,
        place: result.place,
        qualified: result.qualified,
        level: cells[COL_LEVEL].clone(),
        date_text: cells[COL_DATE].clone(),
        city: cells[COL_CITY].clone(),
    })
}

fn owning_table(row: ElementRef) -> Option<ElementRef> {
    row.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|e| e.value().name() == "table")
}

/// Visible text of a cell: markup dropped, whitespace collapsed and trimmed.
pub fn cell_text(cell: ElementRef) -> String {
    let raw: String = cell.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
