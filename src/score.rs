use std::sync::LazyLock;

use regex::Regex;

static MONEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\s*\d[\d,]*|\(\s*\d[\d,]*\s*\)").expect("valid money regex")
});

static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b20\d{2}\b").expect("valid year regex"));

const CONTEXT_WEIGHT: f64 = 0.4;
const TABLE_WEIGHT: f64 = 0.4;
const MONEY_WEIGHT: f64 = 0.1;
const YEAR_WEIGHT: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreSignals {
    pub context_hits: usize,
    pub table_hits: usize,
    pub has_money: bool,
    pub has_year: bool,
}

impl ScoreSignals {
    /// Weighted sum divided by the keyword count, so categories with longer
    /// keyword lists stay comparable.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn normalized(&self, keyword_count: usize) -> f64 {
        if keyword_count == 0 {
            return 0.0;
        }

        let raw = self.context_hits as f64 * CONTEXT_WEIGHT
            + self.table_hits as f64 * TABLE_WEIGHT
            + f64::from(u8::from(self.has_money)) * MONEY_WEIGHT
            + f64::from(u8::from(self.has_year)) * YEAR_WEIGHT;
        raw / keyword_count as f64
    }
}

fn keyword_hits(text: &str, keywords: &[String]) -> usize {
    keywords
        .iter()
        .filter(|keyword| text.contains(keyword.as_str()))
        .count()
}

/// Inputs are expected lowercased; keywords are matched as substrings.
#[must_use]
pub fn signals(context_text: &str, table_text: &str, keywords: &[String]) -> ScoreSignals {
    ScoreSignals {
        context_hits: keyword_hits(context_text, keywords),
        table_hits: keyword_hits(table_text, keywords),
        has_money: MONEY_RE.is_match(table_text),
        has_year: YEAR_RE.is_match(table_text),
    }
}

#[must_use]
pub fn relevance(context_text: &str, table_text: &str, keywords: &[String]) -> f64 {
    signals(context_text, table_text, keywords).normalized(keywords.len())
}
