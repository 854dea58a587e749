//! Value extractors shared by the catalog rules.
//!
//! Ambiguity is settled by document order: the first matching token or
//! entity wins.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use crate::annotate::{Annotation, Dep, EntityLabel, Pos};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}\b").expect("valid email pattern")
});

static ISO_DATE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}").expect("valid date pattern"));

/// Product phrase following the `for` that modifies `orders`.
///
/// Collects the contiguous NOUN/PROPN/ADJ or compound tokens right after
/// `for`. Only the first such `for` is considered.
pub fn product_after_for(ann: &Annotation) -> Option<String> {
    let for_tok = ann
        .tokens
        .iter()
        .find(|t| t.text == "for" && ann.head_text(t) == Some("orders"))?;

    let words: Vec<&str> = ann.tokens[for_tok.index + 1..]
        .iter()
        .take_while(|t| {
            matches!(t.pos, Pos::Noun | Pos::Propn | Pos::Adj) || t.dep == Dep::Compound
        })
        .map(|t| t.text.as_str())
        .collect();

    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

/// First PERSON entity, else the word right after `keyword`.
pub fn person_or_word_after(ann: &Annotation, keyword: &str) -> Option<String> {
    if let Some(person) = ann.first_entity(EntityLabel::Person) {
        return Some(person.text.clone());
    }
    let at = ann.position(keyword)?;
    ann.tokens
        .get(at + 1)
        .filter(|t| t.pos != Pos::Punct)
        .map(|t| t.text.clone())
}

/// First numeric-like token that parses as a float.
pub fn first_float(ann: &Annotation) -> Option<f64> {
    ann.tokens
        .iter()
        .filter(|t| t.like_num)
        .find_map(|t| t.text.parse::<f64>().ok())
}

/// First numeric-like token that parses as an integer.
pub fn first_int(ann: &Annotation) -> Option<i64> {
    ann.tokens
        .iter()
        .filter(|t| t.like_num)
        .find_map(|t| t.text.parse::<i64>().ok())
}

/// First numeric-like token made of exactly four digits.
pub fn four_digit_year(ann: &Annotation) -> Option<i32> {
    ann.tokens
        .iter()
        .find(|t| t.like_num && t.text.len() == 4 && t.text.chars().all(|c| c.is_ascii_digit()))
        .and_then(|t| t.text.parse().ok())
}

/// First email address in the raw, case-preserved question.
pub fn email(raw: &str) -> Option<String> {
    EMAIL.find(raw).map(|m| m.as_str().to_string())
}

/// Cutoff for "registered after": a `YYYY-MM-DD` DATE entity gives a strict
/// bound; otherwise "last year" gives January 1st of the previous year,
/// inclusive.
pub fn registration_cutoff(
    ann: &Annotation,
    lowered: &str,
    today: NaiveDate,
) -> Option<(NaiveDate, bool)> {
    let explicit = ann
        .entities
        .iter()
        .filter(|e| e.label == EntityLabel::Date)
        .filter_map(|e| ISO_DATE_PREFIX.find(e.text.trim()))
        .find_map(|m| NaiveDate::parse_from_str(m.as_str(), "%Y-%m-%d").ok());

    if let Some(date) = explicit {
        return Some((date, false));
    }

    if lowered.contains("last year") {
        return NaiveDate::from_ymd_opt(today.year() - 1, 1, 1).map(|d| (d, true));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::{Annotator, LexiconAnnotator};

    fn ann(text: &str) -> Annotation {
        LexiconAnnotator::new().annotate(text)
    }

    #[test]
    fn test_product_phrase() {
        assert_eq!(
            product_after_for(&ann("show orders for wireless mouse")),
            Some("wireless mouse".to_string())
        );
        assert_eq!(
            product_after_for(&ann("orders for laptop from alice")),
            Some("laptop".to_string())
        );
    }

    #[test]
    fn test_product_phrase_missing() {
        assert_eq!(product_after_for(&ann("show orders for")), None);
        assert_eq!(product_after_for(&ann("orders for the laptop")), None);
    }

    #[test]
    fn test_first_number_wins() {
        let a = ann("orders over 2 by price greater than 100");
        assert_eq!(first_float(&a), Some(2.0));
        assert_eq!(first_int(&ann("orders with quantity 1,000 or 3")), Some(3));
    }

    #[test]
    fn test_year() {
        assert_eq!(four_digit_year(&ann("users registered in 2023")), Some(2023));
        assert_eq!(four_digit_year(&ann("users registered in 23")), None);
    }

    #[test]
    fn test_email_keeps_case() {
        assert_eq!(
            email("Users with email Alice@Example.com please"),
            Some("Alice@Example.com".to_string())
        );
        assert_eq!(email("users with email nobody"), None);
    }

    #[test]
    fn test_registration_cutoff() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let text = "users registered after 2023-04-01";
        assert_eq!(
            registration_cutoff(&ann(text), text, today),
            Some((NaiveDate::from_ymd_opt(2023, 4, 1).unwrap(), false))
        );
        let text = "users registered after last year";
        assert_eq!(
            registration_cutoff(&ann(text), text, today),
            Some((NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(), true))
        );
        let text = "users registered after tuesday";
        assert_eq!(registration_cutoff(&ann(text), text, today), None);
    }
}
