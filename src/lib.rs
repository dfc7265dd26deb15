mod clean;
mod csv_out;
mod document;
mod error;
mod header;
mod locate;
mod model;
mod normalize;
mod options;
mod score;
mod table_parse;
mod warning;

use std::collections::BTreeMap;

use tracing::info;

pub use clean::clean_monetary_value;
pub use csv_out::{write_csv, write_csv_to_string};
pub use document::FilingDocument;
pub use error::ExtractError;
pub use locate::locate;
pub use model::{
    Dataset, ExtractionReport, LocatedTables, RawTable, SelectedTable, StatementCategory,
    StatementResult, TableCandidate,
};
pub use normalize::{min_populated_cells, normalize, normalize_html};
pub use options::{
    DEFAULT_CONTEXT_CHARS, DEFAULT_MIN_SCORE, ExtractOptions, LocateOptions, SelectionMode,
    StatementKeywords,
};
pub use score::{ScoreSignals, relevance, signals};
pub use warning::{ExtractWarning, WarningCode};

/// Parses `html` and selects the best table for each statement category.
pub fn locate_statements(
    html: &str,
    options: &ExtractOptions,
) -> Result<(LocatedTables, Vec<ExtractWarning>), ExtractError> {
    options.validate()?;
    let document = FilingDocument::parse(html);
    let mut warnings = Vec::new();
    let located = locate(&document, &options.locate, &mut warnings);
    Ok((located, warnings))
}

/// Locates and normalizes the income statement, balance sheet and cash flow
/// tables of one filing.
pub fn extract_statements(
    html: &str,
    options: &ExtractOptions,
) -> Result<ExtractionReport, ExtractError> {
    let (located, mut warnings) = locate_statements(html, options)?;

    let mut statements = BTreeMap::new();
    for category in StatementCategory::ALL {
        let Some(selected) = located.get(category) else {
            warnings.push(
                ExtractWarning::new(
                    WarningCode::NoTableFound,
                    format!("no suitable table found for {}", category.title()),
                )
                .with_category(category),
            );
            continue;
        };

        let dataset = normalize(&selected.table);
        if dataset.is_empty() {
            warnings.push(
                ExtractWarning::new(
                    WarningCode::EmptyDataset,
                    "selected table produced no usable rows",
                )
                .with_category(category)
                .with_table_index(selected.table.index)
                .with_score(selected.score),
            );
        } else {
            info!(
                %category,
                rows = dataset.row_count(),
                columns = dataset.column_count(),
                "normalized statement"
            );
        }

        statements.insert(
            category,
            StatementResult {
                table_index: selected.table.index,
                score: selected.score,
                dataset,
            },
        );
    }

    Ok(ExtractionReport {
        statements,
        table_count: located.table_count,
        warnings,
    })
}

/// Same as [`extract_statements`], additionally rendering every non-empty
/// dataset as delimited text keyed by category.
pub fn extract_statements_to_csv(
    html: &str,
    options: &ExtractOptions,
) -> Result<(BTreeMap<StatementCategory, String>, ExtractionReport), ExtractError> {
    let report = extract_statements(html, options)?;
    let mut rendered = BTreeMap::new();
    for (category, result) in &report.statements {
        if result.dataset.is_empty() {
            continue;
        }
        rendered.insert(
            *category,
            write_csv_to_string(&result.dataset, options.delimiter)?,
        );
    }
    Ok((rendered, report))
}
