use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::error::ExtractError;
use crate::model::StatementCategory;

pub const DEFAULT_CONTEXT_CHARS: usize = 1000;
pub const DEFAULT_MIN_SCORE: f64 = 0.3;

static DEFAULT_KEYWORDS: LazyLock<StatementKeywords> = LazyLock::new(|| {
    let mut keywords = BTreeMap::new();
    keywords.insert(
        StatementCategory::IncomeStatement,
        to_owned_list(&[
            "income statements",
            "consolidated statements of income",
            "statements of operations",
            "revenue",
            "net income",
            "operating income",
            "gross margin",
            "earnings per share",
        ]),
    );
    keywords.insert(
        StatementCategory::BalanceSheet,
        to_owned_list(&[
            "balance sheets",
            "consolidated balance sheets",
            "total assets",
            "total liabilities",
            "stockholders equity",
            "current assets",
            "current liabilities",
            "long-term debt",
        ]),
    );
    keywords.insert(
        StatementCategory::CashFlow,
        to_owned_list(&[
            "cash flows statements",
            "consolidated statements of cash flows",
            "cash from operations",
            "operating activities",
            "operations",
            "income tax",
            "net income",
            "financing",
        ]),
    );
    StatementKeywords { keywords }
});

fn to_owned_list(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

/// Keyword lists used to score tables against each statement category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<StatementCategory, Vec<String>>",
    into = "BTreeMap<StatementCategory, Vec<String>>"
)]
pub struct StatementKeywords {
    keywords: BTreeMap<StatementCategory, Vec<String>>,
}

impl StatementKeywords {
    /// Process-wide defaults for English-language SEC filings.
    #[must_use]
    pub fn defaults() -> &'static Self {
        &DEFAULT_KEYWORDS
    }

    /// Builds keyword lists, trimming and lowercasing every keyword.
    pub fn new(
        keywords: BTreeMap<StatementCategory, Vec<String>>,
    ) -> Result<Self, ExtractError> {
        let keywords = keywords
            .into_iter()
            .map(|(category, list)| {
                let list = list
                    .iter()
                    .map(|keyword| keyword.trim().to_lowercase())
                    .filter(|keyword| !keyword.is_empty())
                    .collect::<Vec<_>>();
                (category, list)
            })
            .collect();
        let built = Self { keywords };
        built.validate()?;
        Ok(built)
    }

    /// Reads keyword lists from JSON such as `{"income_statement": ["revenue"], ...}`.
    pub fn from_json(json: &str) -> Result<Self, ExtractError> {
        let raw: BTreeMap<StatementCategory, Vec<String>> = serde_json::from_str(json)?;
        Self::new(raw)
    }

    #[must_use]
    pub fn for_category(&self, category: StatementCategory) -> &[String] {
        self.keywords.get(&category).map_or(&[], Vec::as_slice)
    }

    pub fn validate(&self) -> Result<(), ExtractError> {
        for category in StatementCategory::ALL {
            if self.for_category(category).is_empty() {
                return Err(ExtractError::InvalidKeywords(format!(
                    "no keywords configured for {category}"
                )));
            }
        }
        Ok(())
    }
}

impl TryFrom<BTreeMap<StatementCategory, Vec<String>>> for StatementKeywords {
    type Error = ExtractError;

    fn try_from(keywords: BTreeMap<StatementCategory, Vec<String>>) -> Result<Self, Self::Error> {
        Self::new(keywords)
    }
}

impl From<StatementKeywords> for BTreeMap<StatementCategory, Vec<String>> {
    fn from(keywords: StatementKeywords) -> Self {
        keywords.keywords
    }
}

impl Default for StatementKeywords {
    fn default() -> Self {
        DEFAULT_KEYWORDS.clone()
    }
}

/// How selections interact across categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// Each category picks its best table; one table may serve several.
    #[default]
    Independent,
    /// Greedy one-table-per-category assignment by descending score.
    Exclusive,
}

impl FromStr for SelectionMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "independent" => Ok(Self::Independent),
            "exclusive" => Ok(Self::Exclusive),
            other => Err(format!(
                "invalid selection mode '{other}', expected independent or exclusive"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocateOptions {
    pub context_chars: usize,
    pub min_score: f64,
    pub selection: SelectionMode,
    pub keywords: StatementKeywords,
}

impl Default for LocateOptions {
    fn default() -> Self {
        Self {
            context_chars: DEFAULT_CONTEXT_CHARS,
            min_score: DEFAULT_MIN_SCORE,
            selection: SelectionMode::Independent,
            keywords: StatementKeywords::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    pub locate: LocateOptions,
    pub delimiter: u8,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            locate: LocateOptions::default(),
            delimiter: b',',
        }
    }
}

impl ExtractOptions {
    pub fn validate(&self) -> Result<(), ExtractError> {
        if !self.locate.min_score.is_finite() || self.locate.min_score < 0.0 {
            return Err(ExtractError::InvalidOption(format!(
                "min_score must be a non-negative number, got {}",
                self.locate.min_score
            )));
        }
        if !self.delimiter.is_ascii() || self.delimiter == b'"' {
            return Err(ExtractError::InvalidOption(
                "delimiter must be a single ASCII character other than '\"'".to_string(),
            ));
        }
        self.locate.keywords.validate()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{ExtractOptions, SelectionMode, StatementKeywords};
    use crate::error::ExtractError;
    use crate::model::StatementCategory;

    #[test]
    fn defaults_cover_every_category() {
        let keywords = StatementKeywords::defaults();
        for category in StatementCategory::ALL {
            assert_eq!(keywords.for_category(category).len(), 8);
        }
        assert!(
            keywords
                .for_category(StatementCategory::CashFlow)
                .contains(&"operating activities".to_string())
        );
    }

    #[test]
    fn loads_keywords_from_json_and_lowercases() {
        let keywords = StatementKeywords::from_json(
            r#"{
                "income_statement": ["  Revenue ", "Net Income"],
                "balance_sheet": ["Total Assets"],
                "cash_flow": ["Operating Activities"]
            }"#,
        )
        .expect("keywords should load");
        assert_eq!(
            keywords.for_category(StatementCategory::IncomeStatement),
            ["revenue", "net income"]
        );
    }

    #[test]
    fn rejects_missing_category_keywords() {
        let err = StatementKeywords::from_json(r#"{"income_statement": ["revenue"]}"#)
            .expect_err("missing categories should fail");
        assert!(matches!(err, ExtractError::InvalidKeywords(_)));
    }

    #[test]
    fn rejects_unknown_category_in_json() {
        let err = StatementKeywords::from_json(r#"{"equity": ["shares"]}"#)
            .expect_err("unknown category should fail");
        assert!(matches!(err, ExtractError::KeywordConfig(_)));
    }

    #[test]
    fn deserializing_applies_keyword_normalization() {
        let keywords: StatementKeywords = serde_json::from_str(
            r#"{
                "income_statement": [" Net Income "],
                "balance_sheet": ["TOTAL ASSETS"],
                "cash_flow": ["Financing"]
            }"#,
        )
        .expect("keywords should deserialize");
        assert_eq!(
            keywords.for_category(StatementCategory::BalanceSheet),
            ["total assets"]
        );

        let err = serde_json::from_str::<StatementKeywords>(
            r#"{"income_statement": ["revenue"], "balance_sheet": [], "cash_flow": ["x"]}"#,
        )
        .expect_err("empty keyword list should fail");
        assert!(err.to_string().contains("no keywords configured"));

        let json = serde_json::to_string(&keywords).expect("keywords should serialize");
        assert!(json.contains("\"income_statement\":[\"net income\"]"));
    }

    #[test]
    fn parses_selection_mode() {
        assert_eq!(
            SelectionMode::from_str("Exclusive").expect("mode should parse"),
            SelectionMode::Exclusive
        );
        let err = SelectionMode::from_str("greedy").expect_err("unknown mode should fail");
        assert!(err.contains("invalid selection mode"));
    }

    #[test]
    fn rejects_negative_threshold_and_bad_delimiter() {
        let mut options = ExtractOptions::default();
        options.locate.min_score = -0.1;
        assert!(matches!(
            options.validate(),
            Err(ExtractError::InvalidOption(_))
        ));

        let options = ExtractOptions {
            delimiter: b'"',
            ..ExtractOptions::default()
        };
        assert!(options.validate().is_err());
        assert!(ExtractOptions::default().validate().is_ok());
    }
}
