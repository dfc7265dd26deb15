use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::clean::{clean_monetary_value, is_blank};
use crate::header::{clean_header_names, consolidate_headers, remove_duplicate_columns};
use crate::model::{Dataset, RawTable};
use crate::table_parse::extract_cells;

/// Phrases marking a restated heading or boilerplate line inside a table body.
const HEADER_ROW_PHRASES: &[&str] = &[
    "year ended",
    "years ended",
    "months ended",
    "weeks ended",
    "as of",
    "in millions",
    "in thousands",
    "except per share",
    "unaudited",
    "see accompanying",
];

static HEADER_ROW_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives = HEADER_ROW_PHRASES
        .iter()
        .map(|phrase| regex::escape(phrase))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{alternatives})\b")).expect("valid header row regex")
});

/// Normalizes a located table into a rectangular dataset.
#[must_use]
pub fn normalize(table: &RawTable) -> Dataset {
    normalize_html(&table.html)
}

/// Normalizes the first `<table>` in `table_html`. Returns an empty dataset
/// when nothing usable can be extracted.
#[must_use]
pub fn normalize_html(table_html: &str) -> Dataset {
    let Some(extracted) = extract_cells(table_html) else {
        debug!("no rows extracted from table");
        return Dataset::empty();
    };

    let dataset = Dataset {
        headers: extracted.header,
        rows: extracted.rows,
    };
    let dataset = drop_empty_rows_and_columns(dataset);
    let dataset = consolidate_headers(dataset);
    let mut dataset = remove_duplicate_columns(dataset);
    dataset.headers = clean_header_names(&dataset.headers);
    let dataset = remove_header_rows(dataset);
    let dataset = clean_values(dataset);
    let dataset = remove_sparse_rows(dataset);

    if dataset.rows.is_empty() {
        return Dataset::empty();
    }
    dataset
}

fn retain_columns(dataset: Dataset, keep: &[usize]) -> Dataset {
    if keep.len() == dataset.headers.len() {
        return dataset;
    }

    let headers = keep
        .iter()
        .map(|&col| dataset.headers[col].clone())
        .collect();
    let rows = dataset
        .rows
        .iter()
        .map(|row| keep.iter().map(|&col| row[col].clone()).collect())
        .collect();
    Dataset { headers, rows }
}

fn drop_empty_columns(dataset: Dataset) -> Dataset {
    let keep = (0..dataset.headers.len())
        .filter(|&col| dataset.rows.iter().any(|row| !is_blank(&row[col])))
        .collect::<Vec<_>>();
    let dropped = dataset.headers.len() - keep.len();
    if dropped > 0 {
        debug!(dropped, "removed empty columns");
    }
    retain_columns(dataset, &keep)
}

pub(crate) fn drop_empty_rows_and_columns(mut dataset: Dataset) -> Dataset {
    dataset
        .rows
        .retain(|row| row.iter().any(|cell| !is_blank(cell)));
    drop_empty_columns(dataset)
}

fn is_separator_row(row: &[String]) -> bool {
    let values = row
        .iter()
        .map(|cell| clean_monetary_value(cell))
        .filter(|value| !value.is_empty())
        .collect::<Vec<_>>();
    values.len() > 1 && values.iter().all(|value| *value == values[0])
}

fn is_heading_row(row: &[String]) -> bool {
    let text = row
        .iter()
        .filter(|cell| !is_blank(cell))
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    HEADER_ROW_RE.is_match(&text)
}

/// Drops restated headings ("Year Ended", "In millions", ...) and separator
/// rows repeating one value across cells.
pub(crate) fn remove_header_rows(mut dataset: Dataset) -> Dataset {
    let before = dataset.rows.len();
    dataset
        .rows
        .retain(|row| !is_separator_row(row) && !is_heading_row(row));
    let removed = before - dataset.rows.len();
    if removed > 0 {
        debug!(removed, "removed header/separator rows");
    }
    dataset
}

pub(crate) fn clean_values(mut dataset: Dataset) -> Dataset {
    for row in &mut dataset.rows {
        for cell in row.iter_mut() {
            *cell = clean_monetary_value(cell);
        }
    }
    dataset
}

/// Minimum populated cells for a row to count as data.
#[must_use]
pub fn min_populated_cells(column_count: usize) -> usize {
    (column_count / 3).max(2)
}

/// Drops empty rows, rows below the density threshold, then columns left empty.
pub(crate) fn remove_sparse_rows(mut dataset: Dataset) -> Dataset {
    let min_cells = min_populated_cells(dataset.headers.len());
    let before = dataset.rows.len();
    dataset.rows.retain(|row| {
        let populated = row.iter().filter(|cell| !is_blank(cell)).count();
        populated > 0 && populated >= min_cells
    });
    let removed = before - dataset.rows.len();
    if removed > 0 {
        debug!(removed, min_cells, "removed sparse rows");
    }
    drop_empty_columns(dataset)
}
