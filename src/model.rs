use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::warning::ExtractWarning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementCategory {
    IncomeStatement,
    BalanceSheet,
    CashFlow,
}

impl StatementCategory {
    pub const ALL: [Self; 3] = [Self::IncomeStatement, Self::BalanceSheet, Self::CashFlow];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IncomeStatement => "income_statement",
            Self::BalanceSheet => "balance_sheet",
            Self::CashFlow => "cash_flow",
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::IncomeStatement => "Income Statement",
            Self::BalanceSheet => "Balance Sheet",
            Self::CashFlow => "Cash Flow",
        }
    }
}

impl Display for StatementCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatementCategory {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income_statement" => Ok(Self::IncomeStatement),
            "balance_sheet" => Ok(Self::BalanceSheet),
            "cash_flow" => Ok(Self::CashFlow),
            other => Err(format!("unknown statement category: '{other}'")),
        }
    }
}

/// One `<table>` element of a filing, detached from the parsed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawTable {
    /// Position in document order.
    pub index: usize,
    /// The element's own serialization.
    pub html: String,
    /// Flattened, lowercased text of every cell.
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableCandidate {
    pub table: RawTable,
    pub context_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedTable {
    pub category: StatementCategory,
    pub table: RawTable,
    pub score: f64,
}

/// Best table per statement category. A category missing from the map had no
/// table scoring above the threshold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocatedTables {
    pub selected: BTreeMap<StatementCategory, SelectedTable>,
    pub table_count: usize,
}

impl LocatedTables {
    #[must_use]
    pub fn get(&self, category: StatementCategory) -> Option<&SelectedTable> {
        self.selected.get(&category)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Dataset {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let index = self.headers.iter().position(|header| header == name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(index).map_or("", String::as_str))
                .collect(),
        )
    }

    /// Renders the dataset as a minimal table with a `<th>` header row.
    #[must_use]
    pub fn to_html_table(&self) -> String {
        let mut html = String::from("<table>");
        if !self.headers.is_empty() {
            html.push_str("<thead><tr>");
            for header in &self.headers {
                html.push_str("<th>");
                html.push_str(&html_escape::encode_text(header));
                html.push_str("</th>");
            }
            html.push_str("</tr></thead>");
        }
        html.push_str("<tbody>");
        for row in &self.rows {
            html.push_str("<tr>");
            for cell in row {
                html.push_str("<td>");
                html.push_str(&html_escape::encode_text(cell));
                html.push_str("</td>");
            }
            html.push_str("</tr>");
        }
        html.push_str("</tbody></table>");
        html
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementResult {
    pub table_index: usize,
    pub score: f64,
    pub dataset: Dataset,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractionReport {
    pub statements: BTreeMap<StatementCategory, StatementResult>,
    pub table_count: usize,
    pub warnings: Vec<ExtractWarning>,
}

impl ExtractionReport {
    #[must_use]
    pub fn dataset(&self, category: StatementCategory) -> Option<&Dataset> {
        self.statements.get(&category).map(|result| &result.dataset)
    }
}
