use std::sync::LazyLock;

use regex::Regex;

static NUMERIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?(?:\d+(?:\.\d*)?|\.\d+)$").expect("valid numeric regex"));

/// An optional `$`, an optional parenthesis pair, and one whitespace-free
/// amount. Whitespace is allowed only around the sign and the parentheses.
static MONEY_CELL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\$?\s*(\()?\s*\$?\s*([^\s()$]+)\s*(\))?$").expect("valid money cell regex")
});

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

const MISSING_TOKENS: &[&str] = &["", "nan", "none", "null", "n/a", "na", "—", "–", "-"];

/// True for blank cells and placeholder tokens such as `N/A`, `nan` or a lone dash.
#[must_use]
pub fn is_missing(value: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.len() > 4 {
        return false;
    }
    let lowered = trimmed.to_lowercase();
    MISSING_TOKENS.contains(&lowered.as_str())
}

/// True when the cell carries no value once canonicalized.
#[must_use]
pub fn is_blank(value: &str) -> bool {
    clean_monetary_value(value).is_empty()
}

#[must_use]
pub fn collapse_whitespace(value: &str) -> String {
    WHITESPACE_RE.replace_all(value, " ").trim().to_string()
}

/// Canonicalizes a monetary cell: `"(1,234)"` becomes `"-1234"`,
/// `"$45,678.90"` becomes `"45678.90"` and placeholders become `""`.
/// Text that does not look numeric is returned trimmed.
#[must_use]
pub fn clean_monetary_value(value: &str) -> String {
    let trimmed = value.trim();
    if is_missing(trimmed) {
        return String::new();
    }

    if trimmed
        .chars()
        .all(|ch| ch == '$' || ch == ',' || ch.is_whitespace())
    {
        return String::new();
    }

    let Some(captures) = MONEY_CELL_RE.captures(trimmed) else {
        return trimmed.to_string();
    };
    let negative = match (captures.get(1), captures.get(3)) {
        (Some(_), Some(_)) => true,
        (None, None) => false,
        _ => return trimmed.to_string(),
    };

    let body = captures[2].replace(',', "");
    if !NUMERIC_RE.is_match(&body) {
        return trimmed.to_string();
    }

    if negative {
        match body.strip_prefix('-') {
            Some(unsigned) => format!("-{unsigned}"),
            None => format!("-{body}"),
        }
    } else {
        body
    }
}

#[cfg(test)]
mod tests {
    use super::{clean_monetary_value, collapse_whitespace, is_blank, is_missing};

    #[test]
    fn converts_parenthesized_negatives() {
        assert_eq!(clean_monetary_value("(1,234)"), "-1234");
        assert_eq!(clean_monetary_value("$(5.0)"), "-5.0");
        assert_eq!(clean_monetary_value("( 12 )"), "-12");
    }

    #[test]
    fn strips_currency_and_thousands_separators() {
        assert_eq!(clean_monetary_value("$45,678.90"), "45678.90");
        assert_eq!(clean_monetary_value("$ 1,000"), "1000");
        assert_eq!(clean_monetary_value("-3.5"), "-3.5");
    }

    #[test]
    fn maps_placeholders_to_empty() {
        for value in ["", "N/A", "—", "nan", "None", " - ", "$"] {
            assert_eq!(clean_monetary_value(value), "", "value {value:?}");
        }
        assert!(is_missing("n/a"));
        assert!(!is_missing("Revenue"));
        assert!(is_blank("$"));
    }

    #[test]
    fn passes_text_through_unchanged() {
        assert_eq!(clean_monetary_value("Net income (loss)"), "Net income (loss)");
        assert_eq!(clean_monetary_value(" Revenue, net "), "Revenue, net");
        assert_eq!(clean_monetary_value("12.5%"), "12.5%");
    }

    #[test]
    fn keeps_space_separated_numbers_as_text() {
        assert_eq!(clean_monetary_value("10 20"), "10 20");
        assert_eq!(clean_monetary_value("2024 2023"), "2024 2023");
        assert_eq!(clean_monetary_value("$ 1 000"), "$ 1 000");
        assert_eq!(clean_monetary_value("(3 5)"), "(3 5)");
        assert_eq!(clean_monetary_value("$ 1,000"), "1000");
        assert_eq!(clean_monetary_value("( 12 )"), "-12");
        assert_eq!(clean_monetary_value("$ (0.12)"), "-0.12");
        assert_eq!(clean_monetary_value("(12"), "(12");
    }

    #[test]
    fn is_idempotent_on_cleaned_values() {
        for value in ["(1,234)", "$45,678.90", "Net sales", ""] {
            let once = clean_monetary_value(value);
            assert_eq!(clean_monetary_value(&once), once);
        }
    }

    #[test]
    fn collapses_internal_whitespace() {
        assert_eq!(collapse_whitespace("  Total \n\t assets "), "Total assets");
    }
}
