use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::clean::{collapse_whitespace, is_blank};
use crate::model::Dataset;

static ARTIFACT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Unnamed: \d+|level_\d+").expect("valid artifact regex"));

fn is_fiscal_year(value: &str) -> bool {
    value.len() == 4
        && value.chars().all(|ch| ch.is_ascii_digit())
        && (value.starts_with("19") || value.starts_with("20"))
}

/// Empty, `nan`/`None`, or a bare positional number. Four-digit fiscal years
/// are real column names.
pub(crate) fn is_placeholder_name(name: &str) -> bool {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") || trimmed == "None" {
        return true;
    }
    trimmed.chars().all(|ch| ch.is_ascii_digit()) && !is_fiscal_year(trimmed)
}

fn non_empty_count(row: &[String]) -> usize {
    row.iter().filter(|cell| !is_blank(cell)).count()
}

fn combine_fragments(upper: &str, lower: &str, index: usize) -> String {
    let upper = if is_blank(upper) { "" } else { upper.trim() };
    let lower = if is_blank(lower) { "" } else { lower.trim() };
    match (upper.is_empty(), lower.is_empty()) {
        (false, false) if upper != lower => format!("{upper} {lower}"),
        (_, false) => lower.to_string(),
        (false, true) => upper.to_string(),
        (true, true) => format!("Column_{index}"),
    }
}

/// Merges a sparse first data row with a denser second one into the header.
/// Applies only while the header is still positional.
pub(crate) fn consolidate_headers(mut dataset: Dataset) -> Dataset {
    if dataset.rows.len() < 2
        || !dataset
            .headers
            .iter()
            .all(|header| is_placeholder_name(header))
    {
        return dataset;
    }

    let first = non_empty_count(&dataset.rows[0]);
    let second = non_empty_count(&dataset.rows[1]);
    if first > 2 || second <= first {
        return dataset;
    }

    dataset.headers = dataset.rows[0]
        .iter()
        .zip(&dataset.rows[1])
        .enumerate()
        .map(|(index, (upper, lower))| combine_fragments(upper, lower, index))
        .collect();
    dataset.rows.drain(..2);
    debug!(headers = ?dataset.headers, "consolidated two header rows");
    dataset
}

fn columns_equal(rows: &[Vec<String>], left: usize, right: usize) -> bool {
    rows.iter().all(|row| row[left] == row[right])
}

/// Drops repeated columns whose values match the first column of the same
/// name and renames repeats with differing values to `<name>_duplicate_<n>`.
pub(crate) fn remove_duplicate_columns(dataset: Dataset) -> Dataset {
    let mut first_index: HashMap<String, usize> = HashMap::new();
    let mut repeats: HashMap<String, usize> = HashMap::new();
    let mut keep = Vec::new();
    let mut headers = Vec::new();

    for (col, header) in dataset.headers.iter().enumerate() {
        let name = header.trim().to_string();
        if let Some(&first) = first_index.get(&name) {
            if columns_equal(&dataset.rows, first, col) {
                debug!(column = %name, "dropped duplicate column");
                continue;
            }
            let count = repeats.entry(name.clone()).or_insert(0);
            *count += 1;
            headers.push(format!("{name}_duplicate_{count}"));
        } else {
            first_index.insert(name.clone(), col);
            headers.push(name);
        }
        keep.push(col);
    }

    let rows = dataset
        .rows
        .iter()
        .map(|row| keep.iter().map(|&col| row[col].clone()).collect())
        .collect();
    Dataset { headers, rows }
}

/// Strips reader artifacts and whitespace, replaces placeholder names with
/// `Description` (first column) or `Column_<index>`, and keeps names unique.
pub(crate) fn clean_header_names(headers: &[String]) -> Vec<String> {
    let cleaned = headers.iter().enumerate().map(|(index, header)| {
        let name = collapse_whitespace(&ARTIFACT_RE.replace_all(header, ""));
        if !is_placeholder_name(&name) {
            name
        } else if index == 0 {
            "Description".to_string()
        } else {
            format!("Column_{index}")
        }
    });

    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(headers.len());
    for name in cleaned {
        let mut candidate = name.clone();
        let mut suffix = 0;
        while seen.contains(&candidate) {
            suffix += 1;
            candidate = format!("{name}_duplicate_{suffix}");
        }
        seen.insert(candidate.clone());
        unique.push(candidate);
    }
    unique
}
