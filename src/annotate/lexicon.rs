//! Word lists and per-token tagging.

use super::Pos;
use super::lexer::RawToken;

const DETERMINERS: &[&str] = &[
    "a", "an", "the", "all", "every", "each", "some", "any", "this", "that", "these", "those",
    "no", "which", "another", "both", "either", "neither",
];

const PRONOUNS: &[&str] = &[
    "i", "me", "my", "mine", "we", "us", "our", "you", "your", "he", "him", "his", "she", "her",
    "it", "its", "they", "them", "their", "who", "whom", "whose", "what", "there", "someone",
    "everyone", "anyone", "everything", "something",
];

const AUXILIARIES: &[&str] = &[
    "is", "are", "was", "were", "be", "been", "being", "am", "do", "does", "did", "have", "has",
    "had", "can", "could", "will", "would", "shall", "should", "may", "might", "must",
];

const ADPOSITIONS: &[&str] = &[
    "for", "from", "of", "in", "on", "at", "by", "with", "to", "after", "before", "since",
    "than", "about", "into", "over", "under", "between", "during", "without", "per", "above",
    "below", "until", "within", "like",
];

const CONJUNCTIONS: &[&str] = &["and", "or", "but", "nor"];

const SUBORDINATORS: &[&str] = &["if", "because", "whether", "while", "whereas"];

const PARTICLES: &[&str] = &["not", "'s", "n't", "'t"];

const ADVERBS: &[&str] = &[
    "how", "when", "where", "why", "also", "only", "just", "very", "more", "most", "less",
    "least", "ever", "then", "again", "too", "please", "now", "currently",
];

const VERBS: &[&str] = &[
    "show", "list", "find", "get", "give", "display", "count", "fetch", "tell", "see", "sum",
    "named", "called", "registered", "placed", "bought", "ordered", "made", "sold", "want",
    "need", "return", "search", "look", "select", "know", "buy", "purchased", "signed",
    "joined",
];

const ADJECTIVES: &[&str] = &[
    "many", "much", "total", "greater", "new", "old", "wireless", "large", "small", "big",
    "red", "blue", "black", "white", "cheap", "expensive", "last", "first", "recent",
    "specific", "same", "different", "gaming", "mechanical", "smart", "external", "portable",
    "distinct", "unique", "higher", "lower", "bigger", "smaller", "latest", "next",
];

const NUMBER_WORDS: &[&str] = &[
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
    "hundred", "thousand", "million", "billion", "trillion",
];

/// First names that open a PERSON span. Words that double as common
/// English vocabulary (`will`, `may`, `june`) are left out.
const FIRST_NAMES: &[&str] = &[
    "alice", "bob", "charlie", "diana", "eve", "frank", "grace", "heidi", "ivan", "judy",
    "mallory", "oscar", "peggy", "trent", "victor", "walter", "john", "jane", "james", "mary",
    "michael", "linda", "david", "sarah", "robert", "emma", "william", "olivia", "thomas",
    "sophia", "daniel", "emily", "matthew", "anna", "andrew", "laura", "peter", "susan",
    "paul", "karen", "george", "lisa", "henry", "nancy", "jack", "kate", "sam", "tom",
    "chris", "alex", "maria", "carlos", "ahmed", "fatima", "wei", "yuki", "priya", "raj",
    "dhruv", "arjun", "nina", "leo", "max", "lucy", "ben", "zoe", "ethan", "mia",
];

/// Surnames that extend a PERSON span.
const SURNAMES: &[&str] = &[
    "smith", "johnson", "brown", "prince", "adams", "williams", "jones", "miller", "davis",
    "garcia", "wilson", "anderson", "taylor", "thomas", "moore", "martin", "jackson",
    "white", "harris", "clark", "lewis", "walker", "hall", "young", "king", "wright", "lopez",
    "hill", "scott", "green", "baker", "nelson", "carter", "mitchell", "perez", "roberts",
    "turner", "phillips", "campbell", "parker", "evans", "edwards", "collins", "stewart",
    "patel", "kumar", "singh", "chen", "wang", "li", "kim", "nguyen", "sharma",
];

/// Domain nouns that never continue a person's name.
const DOMAIN_NOUNS: &[&str] = &[
    "user", "users", "order", "orders", "product", "products", "name", "names", "email",
    "emails", "quantity", "quantities", "price", "prices", "sales", "date", "dates", "year",
    "years", "registration", "account", "accounts", "customer", "customers", "item", "items",
];

pub(crate) const MONTHS: &[&str] = &[
    "january", "february", "march", "april", "may", "june", "july", "august", "september",
    "october", "november", "december", "jan", "feb", "mar", "apr", "jun", "jul", "aug", "sep",
    "sept", "oct", "nov", "dec",
];

pub(crate) const RELATIVE_DAYS: &[&str] = &["today", "yesterday", "tomorrow"];
pub(crate) const PERIODS: &[&str] = &["year", "month", "week", "quarter"];

pub fn is_first_name(word: &str) -> bool {
    FIRST_NAMES.contains(&word)
}

pub fn is_surname(word: &str) -> bool {
    SURNAMES.contains(&word)
}

/// Whether `word` is outside every word list, i.e. plausibly a name.
pub fn is_unknown(word: &str) -> bool {
    word.chars().all(char::is_alphabetic)
        && closed_class(word).is_none()
        && !VERBS.contains(&word)
        && !ADJECTIVES.contains(&word)
        && !NUMBER_WORDS.contains(&word)
        && !DOMAIN_NOUNS.contains(&word)
        && !MONTHS.contains(&word)
        && !RELATIVE_DAYS.contains(&word)
        && !PERIODS.contains(&word)
}

/// Part of speech for a single token, without sentence context.
pub fn tag(token: &RawToken<'_>) -> Pos {
    let text = token.text;

    if text.contains('@') {
        return Pos::X;
    }
    if like_num(text) {
        return Pos::Num;
    }
    if !text.chars().any(char::is_alphanumeric) {
        return Pos::Punct;
    }
    if let Some(pos) = closed_class(text) {
        return pos;
    }
    if VERBS.contains(&text) {
        return Pos::Verb;
    }
    if ADJECTIVES.contains(&text) {
        return Pos::Adj;
    }
    if text.len() > 3 && text.ends_with("ly") {
        return Pos::Adv;
    }
    if text.len() > 4 && text.ends_with("ed") {
        return Pos::Verb;
    }
    Pos::Noun
}

fn closed_class(word: &str) -> Option<Pos> {
    let lists: [(&[&str], Pos); 8] = [
        (DETERMINERS, Pos::Det),
        (PRONOUNS, Pos::Pron),
        (AUXILIARIES, Pos::Aux),
        (ADPOSITIONS, Pos::Adp),
        (CONJUNCTIONS, Pos::Cconj),
        (SUBORDINATORS, Pos::Sconj),
        (PARTICLES, Pos::Part),
        (ADVERBS, Pos::Adv),
    ];
    lists
        .iter()
        .find(|(list, _)| list.contains(&word))
        .map(|(_, pos)| *pos)
}

/// Whether `text` looks like a number: digits once `,` and `.` are removed
/// (after an optional leading sign), a simple `a/b` fraction, or an English
/// number word.
pub fn like_num(text: &str) -> bool {
    let text = text
        .strip_prefix(['+', '-', '~', '±'])
        .unwrap_or(text);
    let digits: String = text.chars().filter(|c| *c != ',' && *c != '.').collect();
    if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }
    if let Some((num, denom)) = text.split_once('/') {
        let all_digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
        if all_digits(num) && all_digits(denom) {
            return true;
        }
    }
    NUMBER_WORDS.contains(&text.to_lowercase().as_str())
}
