//! Named-entity recognition over tagged tokens.

use std::sync::LazyLock;

use regex::Regex;

use super::lexer::RawToken;
use super::lexicon::{MONTHS, PERIODS, RELATIVE_DAYS, is_surname, is_unknown};
use super::{EntityLabel, EntitySpan, Pos};

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid ISO date pattern"));

static YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(19|20)\d{2}$").expect("valid year pattern"));

const PERIOD_MODIFIERS: &[&str] = &["last", "this", "next", "past"];
const YEAR_PREPOSITIONS: &[&str] = &["in", "since", "of", "before", "after", "during"];

/// Surnames or unknown words that may follow a first name.
const MAX_NAME_EXTENSION: usize = 2;

/// Find PERSON, DATE and CARDINAL spans, in document order, without
/// overlaps.
pub fn recognize(
    text: &str,
    raw: &[RawToken<'_>],
    pos: &[Pos],
    is_name: impl Fn(&str) -> bool,
) -> Vec<EntitySpan> {
    let mut spans = Vec::new();
    let mut i = 0;

    while i < raw.len() {
        let word = raw[i].text;

        let matched = if is_name(word) {
            let mut end = i + 1;
            while end < raw.len()
                && end - i <= MAX_NAME_EXTENSION
                && (is_surname(raw[end].text) || is_unknown(raw[end].text))
            {
                end += 1;
            }
            Some((EntityLabel::Person, end))
        } else if ISO_DATE.is_match(word) || RELATIVE_DAYS.contains(&word) {
            Some((EntityLabel::Date, i + 1))
        } else if PERIOD_MODIFIERS.contains(&word)
            && raw.get(i + 1).is_some_and(|t| PERIODS.contains(&t.text))
        {
            Some((EntityLabel::Date, i + 2))
        } else if MONTHS.contains(&word) && month_context(raw, i) {
            let mut end = i + 1;
            while end < raw.len() && end - i <= 3 && (pos[end] == Pos::Num || raw[end].text == ",")
            {
                end += 1;
            }
            if raw[end - 1].text == "," {
                end -= 1;
            }
            Some((EntityLabel::Date, end))
        } else if YEAR.is_match(word)
            && i > 0
            && YEAR_PREPOSITIONS.contains(&raw[i - 1].text)
        {
            Some((EntityLabel::Date, i + 1))
        } else if pos[i] == Pos::Num {
            Some((EntityLabel::Cardinal, i + 1))
        } else {
            None
        };

        match matched {
            Some((label, end)) => {
                spans.push(EntitySpan {
                    text: text[raw[i].start..raw[end - 1].end].to_string(),
                    label,
                    start: i,
                    end,
                });
                i = end;
            }
            None => i += 1,
        }
    }

    spans
}

/// `may` and `march` are months only next to a number or a preposition.
fn month_context(raw: &[RawToken<'_>], i: usize) -> bool {
    let word = raw[i].text;
    if word != "may" && word != "march" {
        return true;
    }
    let numeric_next = raw
        .get(i + 1)
        .is_some_and(|t| t.text.chars().all(|c| c.is_ascii_digit()));
    let after_prep = i > 0 && YEAR_PREPOSITIONS.contains(&raw[i - 1].text);
    numeric_next || after_prep
}

#[cfg(test)]
mod tests {
    use super::super::lexer::tokenize;
    use super::super::lexicon::{is_first_name, tag};
    use super::*;

    fn entities(text: &str) -> Vec<(String, EntityLabel)> {
        let raw = tokenize(text);
        let pos: Vec<Pos> = raw.iter().map(tag).collect();
        recognize(text, &raw, &pos, is_first_name)
            .into_iter()
            .map(|e| (e.text, e.label))
            .collect()
    }

    #[test]
    fn test_person_with_surname() {
        assert_eq!(
            entities("orders from user alice smith"),
            vec![("alice smith".to_string(), EntityLabel::Person)]
        );
    }

    #[test]
    fn test_person_stops_at_known_word() {
        assert_eq!(
            entities("users named charlie who ordered"),
            vec![("charlie".to_string(), EntityLabel::Person)]
        );
    }

    #[test]
    fn test_dates() {
        assert_eq!(
            entities("users registered after 2023-04-01"),
            vec![("2023-04-01".to_string(), EntityLabel::Date)]
        );
        assert_eq!(
            entities("users registered after last year"),
            vec![("last year".to_string(), EntityLabel::Date)]
        );
        assert_eq!(
            entities("all users registered in 2023"),
            vec![("2023".to_string(), EntityLabel::Date)]
        );
        assert_eq!(
            entities("joined in january 15, 2024"),
            vec![("january 15, 2024".to_string(), EntityLabel::Date)]
        );
    }

    #[test]
    fn test_cardinal() {
        assert_eq!(
            entities("orders with quantity 2"),
            vec![("2".to_string(), EntityLabel::Cardinal)]
        );
    }

    #[test]
    fn test_may_is_not_always_a_month() {
        assert!(entities("may i see all users").is_empty());
    }
}
