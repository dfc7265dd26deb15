use serde::Serialize;

use crate::model::StatementCategory;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningCode {
    NoTableFound,
    EmptyDataset,
    ContextNotFound,
    SharedTable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractWarning {
    pub code: WarningCode,
    pub message: String,
    pub category: Option<StatementCategory>,
    pub table_index: Option<usize>,
    pub score: Option<f64>,
}

impl ExtractWarning {
    #[must_use]
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            category: None,
            table_index: None,
            score: None,
        }
    }

    #[must_use]
    pub fn with_category(mut self, category: StatementCategory) -> Self {
        self.category = Some(category);
        self
    }

    #[must_use]
    pub fn with_table_index(mut self, table_index: usize) -> Self {
        self.table_index = Some(table_index);
        self
    }

    #[must_use]
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }
}
