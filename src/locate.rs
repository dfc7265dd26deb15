use std::collections::{BTreeMap, HashSet};

use tracing::{debug, info};

use crate::document::FilingDocument;
use crate::model::{LocatedTables, RawTable, SelectedTable, StatementCategory, TableCandidate};
use crate::options::{LocateOptions, SelectionMode};
use crate::score;
use crate::warning::{ExtractWarning, WarningCode};

/// Context text for a table at `position`, or empty text plus a
/// `ContextNotFound` warning when its markup could not be located.
fn candidate_context(
    document: &FilingDocument,
    table: &RawTable,
    position: Option<usize>,
    context_chars: usize,
    warnings: &mut Vec<ExtractWarning>,
) -> String {
    match position {
        Some(position) => document.context_text(table, position, context_chars),
        None => {
            warnings.push(
                ExtractWarning::new(
                    WarningCode::ContextNotFound,
                    "table markup not found in serialized document; scoring without context",
                )
                .with_table_index(table.index),
            );
            String::new()
        }
    }
}

fn build_candidates(
    document: &FilingDocument,
    options: &LocateOptions,
    warnings: &mut Vec<ExtractWarning>,
) -> Vec<TableCandidate> {
    let mut cursor = 0;
    let mut candidates = Vec::new();

    for table in document.tables() {
        let position = document.locate_table(&table, cursor);
        if let Some(position) = position {
            cursor = position + 1;
        }
        let context_text =
            candidate_context(document, &table, position, options.context_chars, warnings);
        candidates.push(TableCandidate {
            table,
            context_text,
        });
    }

    candidates
}

/// Scores of every table for one category, in document order.
fn score_category(
    candidates: &[TableCandidate],
    category: StatementCategory,
    options: &LocateOptions,
) -> Vec<f64> {
    let keywords = options.keywords.for_category(category);
    candidates
        .iter()
        .map(|candidate| {
            let signals = score::signals(&candidate.context_text, &candidate.table.text, keywords);
            let score = signals.normalized(keywords.len());
            debug!(
                %category,
                table = candidate.table.index,
                context_hits = signals.context_hits,
                table_hits = signals.table_hits,
                has_money = signals.has_money,
                has_year = signals.has_year,
                score,
                "scored table"
            );
            score
        })
        .collect()
}

/// Index and score of the highest-scoring table strictly above `min_score`;
/// the earliest table wins ties.
fn best_above(scores: &[f64], min_score: f64) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (index, &score) in scores.iter().enumerate() {
        if score <= min_score {
            continue;
        }
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((index, score));
        }
    }
    best
}

fn select_independent(
    candidates: &[TableCandidate],
    scores: &BTreeMap<StatementCategory, Vec<f64>>,
    options: &LocateOptions,
    warnings: &mut Vec<ExtractWarning>,
) -> BTreeMap<StatementCategory, (usize, f64)> {
    let mut picks = BTreeMap::new();
    let mut owners: BTreeMap<usize, StatementCategory> = BTreeMap::new();

    for (&category, category_scores) in scores {
        let Some((index, score)) = best_above(category_scores, options.min_score) else {
            continue;
        };
        if let Some(owner) = owners.get(&index) {
            warnings.push(
                ExtractWarning::new(
                    WarningCode::SharedTable,
                    format!("table already selected for {owner}"),
                )
                .with_category(category)
                .with_table_index(candidates[index].table.index)
                .with_score(score),
            );
        } else {
            owners.insert(index, category);
        }
        picks.insert(category, (index, score));
    }

    picks
}

/// Greedy assignment: highest score first, each table and category used once.
fn select_exclusive(
    scores: &BTreeMap<StatementCategory, Vec<f64>>,
    options: &LocateOptions,
) -> BTreeMap<StatementCategory, (usize, f64)> {
    let min_score = options.min_score;
    let mut pairs = scores
        .iter()
        .flat_map(|(&category, category_scores)| {
            category_scores
                .iter()
                .enumerate()
                .filter(move |(_, score)| **score > min_score)
                .map(move |(index, &score)| (category, index, score))
        })
        .collect::<Vec<_>>();
    pairs.sort_by(|left, right| {
        right
            .2
            .total_cmp(&left.2)
            .then(left.0.cmp(&right.0))
            .then(left.1.cmp(&right.1))
    });

    let mut picks = BTreeMap::new();
    let mut taken = HashSet::new();
    for (category, index, score) in pairs {
        if picks.contains_key(&category) || taken.contains(&index) {
            continue;
        }
        taken.insert(index);
        picks.insert(category, (index, score));
    }
    picks
}

/// Picks at most one table per statement category.
#[must_use]
pub fn locate(
    document: &FilingDocument,
    options: &LocateOptions,
    warnings: &mut Vec<ExtractWarning>,
) -> LocatedTables {
    let candidates = build_candidates(document, options, warnings);
    debug!(tables = candidates.len(), "collected candidate tables");

    let scores = StatementCategory::ALL
        .iter()
        .map(|&category| (category, score_category(&candidates, category, options)))
        .collect::<BTreeMap<_, _>>();

    let picks = match options.selection {
        SelectionMode::Independent => select_independent(&candidates, &scores, options, warnings),
        SelectionMode::Exclusive => select_exclusive(&scores, options),
    };

    let mut selected = BTreeMap::new();
    for category in StatementCategory::ALL {
        let Some(&(index, score)) = picks.get(&category) else {
            info!(%category, "no table scored above threshold");
            continue;
        };
        let table: RawTable = candidates[index].table.clone();
        info!(%category, table = table.index, score, "selected table");
        selected.insert(
            category,
            SelectedTable {
                category,
                table,
                score,
            },
        );
    }

    LocatedTables {
        selected,
        table_count: candidates.len(),
    }
}
