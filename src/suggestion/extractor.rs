//! Best-effort numeric extraction from AI-generated text
//!
//! Patterns are tried from most to least specific:
//! 1. an explicit `FINAL SUGGESTION: $X` marker
//! 2. any dollar amount
//! 3. a quantity followed by "unit"/"units"
//! 4. any bare number
//!
//! The first tier that yields a parseable number wins. Thousands separators
//! are ignored, so `$12,500.00` reads as 12500.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static FINAL_SUGGESTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)FINAL\s+SUGGESTION:\s*\$\s*(\d[\d,]*(?:\.\d+)?)").expect("valid regex")
});

static DOLLAR_AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\s*(\d[\d,]*(?:\.\d+)?)").expect("valid regex"));

static UNIT_QUANTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d[\d,]*(?:\.\d+)?)\s*units?\b").expect("valid regex"));

static BARE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d[\d,]*(?:\.\d+)?)").expect("valid regex"));

/// Which pattern produced the value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    FinalSuggestion,
    DollarAmount,
    UnitQuantity,
    BareNumber,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtractedValue {
    pub value: f64,
    pub kind: MatchKind,
}

/// Return the best available numeric interpretation of `text`, or `None`
pub fn extract_number(text: &str) -> Option<ExtractedValue> {
    let tiers: [(&Regex, MatchKind); 4] = [
        (&*FINAL_SUGGESTION, MatchKind::FinalSuggestion),
        (&*DOLLAR_AMOUNT, MatchKind::DollarAmount),
        (&*UNIT_QUANTITY, MatchKind::UnitQuantity),
        (&*BARE_NUMBER, MatchKind::BareNumber),
    ];

    tiers.iter().find_map(|(pattern, kind)| {
        first_number(pattern, text).map(|(value, _)| ExtractedValue { value, kind: *kind })
    })
}

/// Value of the `FINAL SUGGESTION: $X` marker only
pub fn extract_final(text: &str) -> Option<f64> {
    first_number(&FINAL_SUGGESTION, text).map(|(value, _)| value)
}

/// Value of the final marker together with the byte offset where its number ends
pub(crate) fn final_suggestion_span(text: &str) -> Option<(f64, usize)> {
    first_number(&FINAL_SUGGESTION, text)
}

fn first_number(pattern: &Regex, text: &str) -> Option<(f64, usize)> {
    pattern.captures_iter(text).find_map(|caps| {
        let number = caps.get(1)?;
        parse_amount(number.as_str()).map(|value| (value, number.end()))
    })
}

fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_final_suggestion_wins() {
        let text = "Competitors charge $35 to $50 for 2 units.\n\nFINAL SUGGESTION: $42.99";
        let found = extract_number(text).unwrap();
        assert_eq!(found.value, 42.99);
        assert_eq!(found.kind, MatchKind::FinalSuggestion);
    }

    #[test]
    fn test_final_suggestion_case_and_separators() {
        let found = extract_number("final suggestion: $ 12,500.00").unwrap();
        assert_eq!(found.value, 12_500.0);
        assert_eq!(found.kind, MatchKind::FinalSuggestion);
    }

    #[test]
    fn test_dollar_fallback() {
        let found = extract_number("Rent in Austin runs about $3,200, utilities extra.").unwrap();
        assert_eq!(found.value, 3200.0);
        assert_eq!(found.kind, MatchKind::DollarAmount);
    }

    #[test]
    fn test_units_fallback() {
        let found = extract_number("Year 1 target: expect 2 stores selling 1,250 units monthly").unwrap();
        assert_eq!(found.value, 1250.0);
        assert_eq!(found.kind, MatchKind::UnitQuantity);

        let found = extract_number("Roughly 1 Unit per visitor").unwrap();
        assert_eq!(found.value, 1.0);
        assert_eq!(found.kind, MatchKind::UnitQuantity);
    }

    #[test]
    fn test_bare_number_fallback() {
        let found = extract_number("About 18 months should be realistic.").unwrap();
        assert_eq!(found.value, 18.0);
        assert_eq!(found.kind, MatchKind::BareNumber);
    }

    #[test]
    fn test_trailing_punctuation_is_ignored() {
        assert_eq!(extract_number("Charge $45.").unwrap().value, 45.0);
        assert_eq!(extract_number("Budget $1,500, then scale").unwrap().value, 1500.0);
    }

    #[test]
    fn test_no_number() {
        assert_eq!(extract_number("I cannot estimate that without more detail."), None);
        assert_eq!(extract_number(""), None);
        assert_eq!(extract_final("the price should be $40"), None);
    }

    #[test]
    fn test_final_span_marks_number_end() {
        let text = "FINAL SUGGESTION: $1,2";
        let (value, end) = final_suggestion_span(text).unwrap();
        assert_eq!(value, 12.0);
        assert_eq!(end, text.len());
    }
}
